use anyhow::{bail, Context, Result};

use lakeline_catalog::CatalogSession;
use lakeline_engine::config::{parser, validator};
use lakeline_engine::layout::ProjectLayout;
use lakeline_engine::{ExtractOutcome, Extractor};

/// Execute the `extract` command: pull source tables into the raw layer.
pub fn execute(layout: &ProjectLayout, all: bool, table: Option<&str>, force: bool) -> Result<()> {
    let source = parser::load_source_tables(&layout.source_tables_path())?;
    validator::validate_source_tables(&source)?;

    let session = CatalogSession::open(&layout.catalog_config())?;
    session.ensure_layers()?;
    let extractor = Extractor::new(&session);

    if all {
        if source.tables.is_empty() {
            bail!(
                "no tables configured in {}",
                layout.source_tables_path().display()
            );
        }
        for entry in &source.tables {
            let outcome = extractor.extract(&source, entry, force)?;
            print_outcome(&outcome);
        }
    } else if let Some(name) = table {
        // The sole requested target: a missing registry entry is fatal.
        let entry = source.table(name).with_context(|| {
            format!(
                "table '{name}' not found in {}",
                layout.source_tables_path().display()
            )
        })?;
        let outcome = extractor.extract(&source, entry, force)?;
        print_outcome(&outcome);
    } else {
        bail!("specify --all or --table NAME");
    }

    session.close();
    Ok(())
}

fn print_outcome(outcome: &ExtractOutcome) {
    let meta = outcome.metadata();
    if outcome.was_fresh() {
        println!("{}: fresh, skipped (last run {})", meta.table, meta.recorded_at);
    } else {
        println!(
            "{}: extracted {} rows, {} columns",
            meta.table, meta.row_count, meta.column_count
        );
    }
}
