mod args;
mod render;
mod view;

use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dashtable::{RowId, RowIdResolver, SortingState, TableEngine};
use serde_json::Value;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::args::Cli;
use crate::view::{ViewFile, infer_columns};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let text = fs::read_to_string(&cli.rows)
        .with_context(|| format!("Failed to read rows from {}", cli.rows.display()))?;
    let rows: Vec<Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of rows", cli.rows.display()))?;
    log::info!("Loaded {} rows from {}", rows.len(), cli.rows.display());

    let mut saved = match &cli.view {
        Some(path) => ViewFile::load(path)?,
        None => ViewFile::default(),
    };
    if saved.columns.is_empty() {
        saved.columns = infer_columns(&rows);
        log::debug!("Inferred {} columns from the first row", saved.columns.len());
    }
    if cli.sort.len() > 1 {
        saved.config.multi_sort = true;
    }
    let id_key = saved.id_key.clone().unwrap_or_else(|| cli.id_key.clone());

    let mut builder = TableEngine::builder(saved.config.clone())
        .columns(saved.columns.iter().map(|c| c.to_descriptor()).collect())
        .row_id(RowIdResolver::key(id_key))
        .rows(rows)
        .sorting(saved.sorting.clone())
        .filtering(saved.filtering.clone())
        .selection(saved.selection.clone());
    if let Some(pagination) = saved.pagination {
        builder = builder.pagination(pagination);
    }
    let mut engine = builder.build().context("Invalid table view")?;

    if !cli.sort.is_empty() {
        let sorting: SortingState = cli
            .sort
            .iter()
            .fold(SortingState::default(), |state, arg| {
                state.with_sort(&arg.column, arg.descending, true)
            });
        engine.set_sorting(sorting)?;
    }
    for filter in &cli.filter {
        engine
            .set_column_filter(&filter.column, Some(filter.value.clone()))
            .with_context(|| format!("Cannot filter on '{}'", filter.column))?;
    }
    if let Some(query) = &cli.search {
        engine.set_global_filter(query)?;
    }
    if let Some(size) = cli.page_size {
        engine.set_page_size(size)?;
    }
    if let Some(page) = cli.page {
        if page == 0 {
            bail!("Pages start at 1");
        }
        engine.set_page_index(page - 1)?;
    }
    select_ids(&mut engine, &cli.select);

    let view = engine.view();
    print!("{}", render::render(&view, engine.columns()));

    if let Some(path) = &cli.save_view {
        saved.capture(&engine).save(path)?;
        log::info!("Saved view to {}", path.display());
    }
    Ok(())
}

/// Add ids to the selection without deselecting ones already selected.
fn select_ids(engine: &mut TableEngine<Value>, ids: &[String]) {
    let next = engine
        .selection()
        .with_selected(ids.iter().map(|id| RowId::new(id.as_str())));
    engine.set_selection(next);
}
