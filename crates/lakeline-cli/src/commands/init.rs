use std::path::Path;

use anyhow::{Context, Result};

use lakeline_engine::layout::ProjectLayout;

const SOURCE_TABLES_EXAMPLE: &str = r"connection:
  type: postgres
  server: ${LAKELINE_DB_HOST}:5432
  database: shop
  username: ${LAKELINE_DB_USER}
  password: ${LAKELINE_DB_PASSWORD}
tables:
  - name: customers
    schema: sales
    description: Customer master data
  - name: orders
    schema: sales
    description: Order transactions
";

const PIPELINE_EXAMPLE: &str = r"name: main
description: Main transformation pipeline
steps:
  - sql/cleaned/customers_cleaned.sql
  - sql/curated/dim_customers.sql
";

const NAMED_PIPELINES_EXAMPLE: &str = r"daily_refresh:
  description: Daily data refresh for reporting
  extract:
    tables: [sales.customers, sales.orders]
  transform:
    steps:
      - sql/cleaned/customers_cleaned.sql
      - sql/curated/dim_customers.sql
";

const CLEANED_EXAMPLE_SQL: &str = r"-- name: customers_cleaned
-- layer: cleaned
-- description: Clean and standardize customer data
-- depends_on: raw.customers

CREATE OR REPLACE TABLE cleaned.customers_cleaned AS
SELECT
    id,
    trim(upper(first_name)) AS first_name,
    trim(upper(last_name)) AS last_name,
    lower(trim(email)) AS email,
    created_date
FROM raw.customers
WHERE id IS NOT NULL
  AND email LIKE '%@%.%';
";

const CURATED_EXAMPLE_SQL: &str = r"-- name: dim_customers
-- layer: curated
-- description: Customer dimension table for analytics
-- depends_on: cleaned.customers_cleaned

CREATE OR REPLACE TABLE curated.dim_customers AS
SELECT
    id,
    first_name,
    last_name,
    email,
    date_trunc('month', CAST(created_date AS DATE)) AS signup_month
FROM cleaned.customers_cleaned;
";

const GITIGNORE: &str = "/data/
*.duckdb
*.duckdb.wal
";

/// Execute the `init` command: scaffold a new project.
///
/// Existing files are left untouched, so re-running is safe.
pub fn execute(layout: &ProjectLayout) -> Result<()> {
    layout.ensure_directories()?;

    write_if_absent(&layout.source_tables_path(), SOURCE_TABLES_EXAMPLE)?;
    write_if_absent(&layout.pipeline_path(), PIPELINE_EXAMPLE)?;
    write_if_absent(&layout.named_pipelines_path(), NAMED_PIPELINES_EXAMPLE)?;
    write_if_absent(
        &layout.sql_dir().join("cleaned").join("customers_cleaned.sql"),
        CLEANED_EXAMPLE_SQL,
    )?;
    write_if_absent(
        &layout.sql_dir().join("curated").join("dim_customers.sql"),
        CURATED_EXAMPLE_SQL,
    )?;
    write_if_absent(&layout.base_dir().join(".gitignore"), GITIGNORE)?;

    println!("Project initialized at {}", layout.base_dir().display());
    println!("Next steps:");
    println!("  1. Edit config/source_tables.yml with your database connection");
    println!("  2. lakeline extract --all");
    println!("  3. Add transformations under sql/cleaned/ and sql/curated/");
    println!("  4. lakeline run --pipeline main");
    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!(path = %path.display(), "File exists, leaving as is");
        return Ok(());
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_scaffolds_and_is_rerunnable() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path());

        execute(&layout).unwrap();
        assert!(layout.source_tables_path().is_file());
        assert!(layout
            .sql_dir()
            .join("curated")
            .join("dim_customers.sql")
            .is_file());

        // Second run keeps user edits.
        std::fs::write(layout.pipeline_path(), "name: edited\nsteps: []\n").unwrap();
        execute(&layout).unwrap();
        let kept = std::fs::read_to_string(layout.pipeline_path()).unwrap();
        assert!(kept.contains("edited"));
    }
}
