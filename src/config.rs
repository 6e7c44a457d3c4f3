//! Grid Configuration
//!
//! Console-wide grid defaults and their TOML persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{
    AVATAR_PLACEHOLDER, CONFIG_FILE_NAME, DEFAULT_ID_FIELD, DEFAULT_PAGE_SIZE,
    DEFAULT_PAGE_SIZE_OPTIONS, EMPTY_MESSAGE, EMPTY_PLACEHOLDER, ITEMS_LABEL, LONG_TEXT_MAX_LEN,
    NO_RESULTS_MESSAGE, SEARCH_DEBOUNCE_MS,
};
use crate::error::{Error, Result};
use crate::helpers::get_or_create_config_dir;

/// Grid settings shared by every list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows per page in local mode
    pub page_size: usize,
    /// Choices offered by the page-size picker
    pub page_size_options: Vec<usize>,
    /// Quiet interval for the search box
    pub search_debounce_ms: u64,
    /// Characters before long text is truncated
    pub long_text_max_len: usize,
    /// Shown for empty or null cells
    pub empty_placeholder: String,
    /// Asset used when an avatar image fails to load
    pub avatar_placeholder: String,
    /// Label for map-service links
    pub map_link_label: String,
    /// Record field used as row identity
    pub id_field: String,
    pub empty_message: String,
    pub no_results_message: String,
    pub items_label: String,
    /// Extra status -> tone entries (`"on_hold" = "warning"`)
    pub status_tones: BTreeMap<String, String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            long_text_max_len: LONG_TEXT_MAX_LEN,
            empty_placeholder: EMPTY_PLACEHOLDER.to_string(),
            avatar_placeholder: AVATAR_PLACEHOLDER.to_string(),
            map_link_label: "View map".to_string(),
            id_field: DEFAULT_ID_FIELD.to_string(),
            empty_message: EMPTY_MESSAGE.to_string(),
            no_results_message: NO_RESULTS_MESSAGE.to_string(),
            items_label: ITEMS_LABEL.to_string(),
            status_tones: BTreeMap::new(),
        }
    }
}

impl GridConfig {
    /// Parse from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GridConfig = toml::from_str(content)?;
        config.validate()
    }

    /// Load from a file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded grid config from {}", path.display());
        Ok(config)
    }

    /// Load from the platform config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Write as pretty TOML
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(mut self) -> Result<Self> {
        if self.page_size == 0 {
            return Err(Error::InvalidPageSize { page_size: 0 });
        }
        if self.id_field.trim().is_empty() {
            return Err(Error::Invalid {
                message: "id_field must not be empty".to_string(),
            });
        }
        self.page_size_options.retain(|&size| size > 0);
        if !self.page_size_options.contains(&self.page_size) {
            self.page_size_options.push(self.page_size);
        }
        self.page_size_options.sort_unstable();
        self.page_size_options.dedup();
        Ok(self)
    }
}

/// Path of `grid.toml` in the platform config directory
pub fn config_path() -> Result<PathBuf> {
    Ok(get_or_create_config_dir()?.join(CONFIG_FILE_NAME))
}
