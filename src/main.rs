//! egov-grid - Demo Entry Point
//!
//! Prints one page of the document-requests list as text.
//!
//! ```text
//! egov-grid [RECORDS] [--search TEXT] [--sort COLUMN[:asc|desc]] [--page N] [--remote]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use egov_grid::components::composite::data_table::{
    DataTable, SortDirection, TableView, VecDataProvider,
};
use egov_grid::config::GridConfig;
use egov_grid::domain::{DocumentRequest, Record};
use egov_grid::features::requests::fixtures::sample_requests;
use egov_grid::features::requests::{
    InMemoryBackend, RequestsController, SOURCE_ID, request_actions, request_columns,
    request_toolbar,
};
use egov_grid::helpers::load_records;
use egov_grid::services::runtime_handle;

fn parse_sort(value: &str) -> Result<(String, SortDirection), String> {
    let (column, direction) = match value.split_once(':') {
        Some((column, "asc")) => (column, SortDirection::Asc),
        Some((column, "desc")) => (column, SortDirection::Desc),
        Some((_, other)) => return Err(format!("unknown sort direction '{other}'")),
        None => (value, SortDirection::Asc),
    };
    if column.is_empty() {
        return Err("sort column must not be empty".into());
    }
    Ok((column.to_string(), direction))
}

fn parse_page(value: &str) -> Result<usize, String> {
    let page = value
        .parse::<usize>()
        .map_err(|err| format!("invalid page '{value}': {err}"))?;
    if page == 0 {
        return Err("pages start at 1".into());
    }
    Ok(page)
}

#[derive(Debug, Parser)]
#[command(
    name = "egov-grid",
    about = "Print one page of the document-requests list"
)]
struct Args {
    /// JSON array of records to show instead of the sample requests.
    #[arg(value_name = "RECORDS")]
    file: Option<PathBuf>,
    /// Global search text.
    #[arg(long)]
    search: Option<String>,
    /// Sort column, optionally suffixed with :asc or :desc.
    #[arg(long, value_name = "COLUMN[:asc|desc]", value_parser = parse_sort)]
    sort: Option<(String, SortDirection)>,
    /// Page to show, starting at 1.
    #[arg(long, value_parser = parse_page)]
    page: Option<usize>,
    /// Serve the sample requests through the paged backend.
    #[arg(long)]
    remote: bool,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting egov-grid demo...");

    let args = Args::parse();
    let config = GridConfig::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "Falling back to default grid config");
        GridConfig::default()
    });

    let view = if args.remote {
        run_remote(&args, config)?
    } else {
        run_local(&args, config)?
    };
    print_view(&view);
    Ok(())
}

fn sample_records(count: usize) -> Result<Vec<Record>> {
    Ok(sample_requests(count)
        .iter()
        .map(DocumentRequest::to_record)
        .collect::<egov_grid::error::Result<Vec<_>>>()?)
}

fn run_local(args: &Args, config: GridConfig) -> Result<TableView> {
    let (source, records) = match &args.file {
        Some(path) => (
            path.display().to_string(),
            load_records(path).with_context(|| format!("loading {}", path.display()))?,
        ),
        None => (SOURCE_ID.to_string(), sample_records(30)?),
    };

    let (commands, _) = crossbeam_channel::unbounded();
    let mut table = DataTable::new_local(request_columns(), config)?
        .with_row_actions(request_actions(commands))
        .with_toolbar(request_toolbar());
    table.set_source(&VecDataProvider::new(source, records))?;

    if let Some(query) = &args.search {
        table.apply_search(query.as_str());
    }
    if let Some((column, direction)) = &args.sort {
        table.toggle_sort(column)?;
        if *direction == SortDirection::Desc {
            table.toggle_sort(column)?;
        }
    }
    if let Some(page) = args.page {
        table.go_to_page(page);
    }
    Ok(table.view())
}

fn run_remote(args: &Args, config: GridConfig) -> Result<TableView> {
    let backend = InMemoryBackend::new(sample_requests(137))?;
    let (commands, _) = crossbeam_channel::unbounded();
    let mut controller = RequestsController::new(backend, config, request_actions(commands))?;

    runtime_handle().block_on(async {
        controller.refresh().await?;
        let table = controller.table_mut();
        if let Some(query) = &args.search {
            table.apply_search(query.as_str());
        }
        if let Some((column, direction)) = &args.sort {
            table.toggle_sort(column)?;
        if *direction == SortDirection::Desc {
            table.toggle_sort(column)?;
        }
        }
        controller.sync().await?;
        if let Some(page) = args.page {
            controller.table_mut().go_to_page(page);
            controller.sync().await?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    Ok(controller.table().view())
}

fn print_view(view: &TableView) {
    let headers: Vec<String> = view
        .headers
        .iter()
        .map(|h| match h.sort {
            Some(direction) => format!("{} ({direction:?})", h.label),
            None => h.label.clone(),
        })
        .collect();
    println!("{}", headers.join(" | "));

    if let Some(empty) = &view.empty {
        println!("{}", empty.message);
        return;
    }
    for row in &view.rows {
        let cells: Vec<&str> = row.cells.iter().map(|c| c.content.display_text()).collect();
        println!("{}", cells.join(" | "));
    }
    if let Some(controls) = &view.pagination {
        println!(
            "{}  page {}  ({})",
            controls.summary(),
            controls.page_label(),
            controls.range_label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_all_options() {
        let args = Args::try_parse_from([
            "egov-grid",
            "requests.json",
            "--search",
            "maria",
            "--sort",
            "fee:desc",
            "--page",
            "3",
            "--remote",
        ])
        .expect("valid arguments");
        assert_eq!(args.file, Some(PathBuf::from("requests.json")));
        assert_eq!(args.search.as_deref(), Some("maria"));
        assert_eq!(args.sort, Some(("fee".to_string(), SortDirection::Desc)));
        assert_eq!(args.page, Some(3));
        assert!(args.remote);
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        let args = Args::try_parse_from(["egov-grid", "--sort", "reference"]).expect("valid arguments");
        assert_eq!(args.sort, Some(("reference".to_string(), SortDirection::Asc)));
        assert_eq!(args.file, None);
        assert!(!args.remote);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Args::try_parse_from(["egov-grid", "--sort", "fee:sideways"]).is_err());
        assert!(Args::try_parse_from(["egov-grid", "--sort", ":desc"]).is_err());
        assert!(Args::try_parse_from(["egov-grid", "--page", "0"]).is_err());
        assert!(Args::try_parse_from(["egov-grid", "--page", "two"]).is_err());
        assert!(Args::try_parse_from(["egov-grid", "--unknown"]).is_err());
    }
}
