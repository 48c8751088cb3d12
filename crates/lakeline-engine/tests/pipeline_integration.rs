//! Integration tests for the full extract → transform path.
//!
//! These run against an in-memory catalog and a source-connector double,
//! using the real fixture files under `tests/fixtures/`.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lakeline_catalog::CatalogSession;
use lakeline_engine::config::parser;
use lakeline_engine::config::types::{SourceTableEntry, SourceTablesConfig};
use lakeline_engine::source::{SourceConnector, SourceError};
use lakeline_engine::{Orchestrator, PipelineError};
use lakeline_types::{Layer, ProvenanceInput, ResultSet, SourceValue, TableRef};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn session() -> CatalogSession {
    let session = CatalogSession::in_memory().expect("in-memory catalog");
    session.ensure_layers().expect("layer bootstrap");
    session
}

fn customer_rows() -> ResultSet {
    ResultSet {
        columns: vec!["id".into(), "email".into()],
        rows: vec![
            vec![SourceValue::Int(1), SourceValue::Text(" Ada@X.io ".into())],
            vec![SourceValue::Int(2), SourceValue::Text("bo@y.dev".into())],
            vec![SourceValue::Int(3), SourceValue::Null],
        ],
    }
}

fn seed_raw_customers(session: &CatalogSession) {
    session
        .replace_table(
            &TableRef::new(Layer::Raw, "customers"),
            &customer_rows(),
            &ProvenanceInput {
                produced_by: "extract:customers".into(),
                ..ProvenanceInput::default()
            },
        )
        .expect("seed raw.customers");
}

/// Connector double shared with the orchestrator's source factory.
struct FakeSource {
    data: ResultSet,
    queries: Rc<RefCell<Vec<String>>>,
}

impl SourceConnector for FakeSource {
    fn fetch(&mut self, query: &str) -> Result<ResultSet, SourceError> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.data.clone())
    }
}

fn source_registry() -> SourceTablesConfig {
    SourceTablesConfig {
        connection: serde_yaml::from_str(
            "{type: postgres, server: 'localhost:5432', database: shop, trusted_connection: true}",
        )
        .expect("connection yaml"),
        tables: vec![SourceTableEntry {
            name: "customers".into(),
            schema: "sales".into(),
            description: Some("Customer master data".into()),
            query: None,
        }],
    }
}

#[test]
fn pipeline_runs_steps_in_declared_order() {
    let session = session();
    seed_raw_customers(&session);
    let orchestrator = Orchestrator::new(&session, fixtures_dir());

    let pipeline = lakeline_engine::config::types::PipelineConfig {
        name: "main".into(),
        description: None,
        steps: vec![
            "sql/cleaned/customers_cleaned.sql".into(),
            "sql/curated/dim_customers.sql".into(),
        ],
    };
    let report = orchestrator.run(&pipeline).expect("run succeeds");

    assert_eq!(report.steps_completed, 2);
    assert_eq!(report.steps_skipped, 0);

    // The cleaned step dropped the NULL-email row; curated derives from it.
    let cleaned = TableRef::new(Layer::Cleaned, "customers_cleaned");
    let curated = TableRef::new(Layer::Curated, "dim_customers");
    assert_eq!(session.table_counts(&cleaned).unwrap().0, 2);
    assert_eq!(session.table_counts(&curated).unwrap(), (2, 3));

    let meta = session.table_metadata(&curated).unwrap().unwrap();
    assert_eq!(meta.produced_by, "dim_customers");
    assert_eq!(meta.depends_on, vec!["cleaned.customers_cleaned"]);
}

#[test]
fn failing_step_stops_the_run_and_later_steps_never_execute() {
    let session = session();
    seed_raw_customers(&session);
    let orchestrator = Orchestrator::new(&session, fixtures_dir());

    let pipeline = lakeline_engine::config::types::PipelineConfig {
        name: "main".into(),
        description: None,
        steps: vec![
            "sql/cleaned/broken_cleaned.sql".into(),
            "sql/curated/dim_customers.sql".into(),
        ],
    };
    let failure = orchestrator.run(&pipeline).expect_err("run must fail");

    assert_eq!(failure.step, 0);
    assert_eq!(failure.completed, 0);
    assert!(failure.source.is_execution());
    assert!(!session
        .table_exists(&TableRef::new(Layer::Curated, "dim_customers"))
        .unwrap());
}

#[test]
fn named_pipeline_skips_unresolved_tables_and_still_transforms() {
    let session = session();
    let queries = Rc::new(RefCell::new(Vec::new()));
    let queries_for_factory = queries.clone();

    let orchestrator =
        Orchestrator::new(&session, fixtures_dir()).with_source_factory(move |_config| {
            Ok(Box::new(FakeSource {
                data: customer_rows(),
                queries: queries_for_factory.clone(),
            }) as Box<dyn SourceConnector>)
        });

    let registry =
        parser::load_named_pipelines(&fixtures_dir().join("config/named_pipelines.yml"))
            .expect("registry fixture");
    let report = orchestrator
        .run_named("daily_refresh", &registry, &source_registry())
        .expect("run succeeds despite the unresolved table");

    // ghost_table has no registry entry: warned and skipped, not fatal.
    assert_eq!(report.extraction_skipped, vec!["sales.ghost_table"]);
    assert_eq!(report.extracted, vec!["customers"]);
    assert_eq!(report.steps_completed, 2);
    assert_eq!(queries.borrow().as_slice(), ["SELECT * FROM sales.customers"]);
    assert!(session
        .table_exists(&TableRef::new(Layer::Curated, "dim_customers"))
        .unwrap());
}

#[test]
fn fresh_tables_never_open_a_source_connection() {
    let session = session();
    seed_raw_customers(&session);

    let factory_calls = Rc::new(RefCell::new(0usize));
    let calls_for_factory = factory_calls.clone();
    let orchestrator =
        Orchestrator::new(&session, fixtures_dir()).with_source_factory(move |_config| {
            *calls_for_factory.borrow_mut() += 1;
            Ok(Box::new(FakeSource {
                data: customer_rows(),
                queries: Rc::new(RefCell::new(Vec::new())),
            }) as Box<dyn SourceConnector>)
        });

    let registry =
        parser::load_named_pipelines(&fixtures_dir().join("config/named_pipelines.yml"))
            .expect("registry fixture");
    let report = orchestrator
        .run_named("daily_refresh", &registry, &source_registry())
        .expect("run succeeds");

    assert_eq!(report.extraction_fresh, vec!["customers"]);
    assert!(report.extracted.is_empty());
    assert_eq!(*factory_calls.borrow(), 0);
}

#[test]
fn extraction_failure_surfaces_as_a_failed_run() {
    let session = session();
    let orchestrator =
        Orchestrator::new(&session, fixtures_dir()).with_source_factory(|_config| {
            Err(SourceError::Connect("connection refused".into()))
        });

    let registry =
        parser::load_named_pipelines(&fixtures_dir().join("config/named_pipelines.yml"))
            .expect("registry fixture");
    let failure = orchestrator
        .run_named("daily_refresh", &registry, &source_registry())
        .expect_err("run must fail");

    assert_eq!(failure.completed, 0);
    assert!(matches!(failure.source, PipelineError::Connection(_)));
    // The transform steps never ran.
    assert!(!session
        .table_exists(&TableRef::new(Layer::Cleaned, "customers_cleaned"))
        .unwrap());
}

#[test]
fn export_round_trip_preserves_recorded_counts() {
    let session = session();
    seed_raw_customers(&session);
    let export = tempfile::tempdir().expect("tempdir");
    let orchestrator = Orchestrator::new(&session, fixtures_dir()).with_export_dir(export.path());

    let pipeline = lakeline_engine::config::types::PipelineConfig {
        name: "main".into(),
        description: None,
        steps: vec!["sql/cleaned/customers_cleaned.sql".into()],
    };
    orchestrator.run(&pipeline).expect("run succeeds");

    let path = export.path().join("cleaned/customers_cleaned.parquet");
    let meta = session
        .table_metadata(&TableRef::new(Layer::Cleaned, "customers_cleaned"))
        .unwrap()
        .unwrap();
    let (rows, columns) = session.parquet_file_counts(&path).unwrap();
    assert_eq!(rows, meta.row_count);
    assert_eq!(columns, meta.column_count);
}

#[test]
fn source_tables_fixture_parses_with_placeholders_intact() {
    let config = parser::load_source_tables(&fixtures_dir().join("config/source_tables.yml"))
        .expect("fixture parses");

    assert_eq!(config.connection.kind, "postgres");
    // Placeholders are resolved at connect time, not load time.
    assert!(config.connection.server.contains("${LAKELINE_TEST_DB_HOST}"));
    assert_eq!(config.tables.len(), 2);
    assert!(config.table("orders").unwrap().query.is_some());
}
