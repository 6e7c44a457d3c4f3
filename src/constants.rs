//! Grid Constants
//!
//! Centralized defaults shared by the engine and the configuration layer.

/// Default rows per page in local mode
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size picker
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];

/// Quiet interval before a typed query is applied
pub const SEARCH_DEBOUNCE_MS: u64 = 500;

/// Characters shown before long text is truncated
pub const LONG_TEXT_MAX_LEN: usize = 60;

/// Shown for empty or null cells
pub const EMPTY_PLACEHOLDER: &str = "-";

/// Static asset swapped in when an avatar image fails to load
pub const AVATAR_PLACEHOLDER: &str = "assets/avatar-placeholder.png";

/// Field conventionally holding a record's identity
pub const DEFAULT_ID_FIELD: &str = "id";

/// Pages shown on each side of the current page in the page strip
pub const PAGE_STRIP_SIBLINGS: usize = 1;

/// Empty-state messages
pub const EMPTY_MESSAGE: &str = "No data";
pub const NO_RESULTS_MESSAGE: &str = "No results match the current search or filters";

/// Noun used by the pagination footer ("137 items")
pub const ITEMS_LABEL: &str = "items";

/// Config file name inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "grid.toml";
