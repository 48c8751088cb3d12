use anyhow::{bail, ensure, Result};

use lakeline_catalog::CatalogSession;
use lakeline_engine::config::{parser, validator};
use lakeline_engine::layout::ProjectLayout;
use lakeline_engine::{Orchestrator, RunReport};

/// Execute the `run` command: drive a pipeline to completion.
pub fn execute(layout: &ProjectLayout, pipeline: Option<&str>, named: Option<&str>) -> Result<()> {
    let session = CatalogSession::open(&layout.catalog_config())?;
    session.ensure_layers()?;
    let orchestrator =
        Orchestrator::new(&session, layout.base_dir()).with_export_dir(layout.export_dir());

    let report = if let Some(name) = pipeline {
        let config = parser::load_pipeline(&layout.pipeline_path())?;
        validator::validate_pipeline(&config)?;
        ensure!(
            config.name == name,
            "pipeline '{name}' not found in {} (it defines '{}')",
            layout.pipeline_path().display(),
            config.name
        );
        orchestrator.run(&config)?
    } else if let Some(name) = named {
        let registry = parser::load_named_pipelines(&layout.named_pipelines_path())?;
        let source = parser::load_source_tables(&layout.source_tables_path())?;
        validator::validate_source_tables(&source)?;
        orchestrator.run_named(name, &registry, &source)?
    } else {
        bail!("specify --pipeline NAME or --named NAME");
    };

    print_report(&report);
    drop(orchestrator);
    session.close();
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("Pipeline '{}' completed.", report.pipeline);
    println!(
        "  Transform steps: {} completed, {} skipped",
        report.steps_completed, report.steps_skipped
    );
    if !report.extracted.is_empty() {
        println!("  Extracted:       {}", report.extracted.join(", "));
    }
    if !report.extraction_fresh.is_empty() {
        println!("  Fresh, skipped:  {}", report.extraction_fresh.join(", "));
    }
    if !report.extraction_skipped.is_empty() {
        println!("  Unresolved:      {}", report.extraction_skipped.join(", "));
    }
}
