use anyhow::Result;

use lakeline_catalog::CatalogSession;
use lakeline_engine::layout::ProjectLayout;
use lakeline_engine::{FreshnessOracle, DEFAULT_MAX_AGE};

/// Execute the `status` command: catalog contents and freshness.
pub fn execute(layout: &ProjectLayout) -> Result<()> {
    let session = CatalogSession::open(&layout.catalog_config())?;
    session.ensure_layers()?;

    let stats = session.stats()?;
    println!("Catalog:   {}", layout.catalog_path().display());
    println!("Snapshots: {}", stats.snapshot_count);

    if stats.tables.is_empty() {
        println!("No tables materialized yet.");
        session.close();
        return Ok(());
    }

    let oracle = FreshnessOracle::new(&session);
    println!(
        "{:<32} {:>10} {:>6}  {:<28} {}",
        "TABLE", "ROWS", "COLS", "LAST SNAPSHOT", "FRESH"
    );
    for table in &stats.tables {
        let fresh = !oracle.is_stale(&table.table, DEFAULT_MAX_AGE)?;
        println!(
            "{:<32} {:>10} {:>6}  {:<28} {}",
            table.table.to_string(),
            table.row_count,
            table.column_count,
            table.last_snapshot.as_deref().unwrap_or("-"),
            if fresh { "yes" } else { "no" }
        );
    }

    session.close();
    Ok(())
}
