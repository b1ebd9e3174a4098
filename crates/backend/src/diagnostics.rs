//! Self-check of the environment the component runs in.
//!
//! Every check appends exactly one line per result to the report, so the
//! length of the log is the number of checks performed. A failing check
//! never stops the ones after it. Banners go to tracing only.

use contracts::domain::a001_field::aggregate::Field;
use contracts::domain::a002_field_value::aggregate::FieldValue;
use contracts::domain::common::AggregateRoot;
use contracts::shared::diagnostics::DiagnosticsReport;
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, EntityName};

use crate::domain::{a001_field, a002_field_value};
use crate::processors::ProcessorRegistry;
use crate::shared::data::db;
use crate::shared::host::Host;
use crate::shared::lexicon::Lexicon;

const PREFIX: &str = "[diagnostics]";

/// Processors the admin UI cannot work without
pub const REQUIRED_PROCESSORS: [&str; 3] = ["mgr/field/create", "mgr/field/update", "mgr/field/delete"];

pub struct Diagnostics<'a> {
    host: &'a dyn Host,
    registry: &'a ProcessorRegistry,
    ok: bool,
    log: Vec<String>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(host: &'a dyn Host, registry: &'a ProcessorRegistry) -> Self {
        Self {
            host,
            registry,
            ok: true,
            log: Vec::new(),
        }
    }

    pub async fn run(mut self) -> DiagnosticsReport {
        self.log_start();

        self.check_host().await;
        self.check_schema_mapping();
        self.check_entity_definitions();
        self.check_object_creation();
        self.check_tables().await;
        self.check_basic_operations().await;
        self.check_processors();

        self.log_end();

        DiagnosticsReport {
            ok: self.ok,
            log: self.log,
        }
    }

    fn log_start(&self) {
        tracing::info!("{} Starting ExtraFields diagnostics", PREFIX);
        tracing::info!(
            "{} Version: {}, backend: {:?}",
            PREFIX,
            env!("CARGO_PKG_VERSION"),
            self.host.db().get_database_backend()
        );
    }

    fn log_end(&self) {
        let status = if self.ok { "PASSED" } else { "FAILED" };
        tracing::info!("{} Overall status: {}", PREFIX, status);
    }

    fn record(&mut self, message: String, success: bool) {
        let marker = if success { "✅" } else { "❌" };
        self.log.push(format!("{} {} {}", PREFIX, marker, message));
        if !success {
            self.ok = false;
        }
    }

    async fn check_host(&mut self) {
        match self.host.db().ping().await {
            Ok(()) => self.record("Database connection reachable: yes".into(), true),
            Err(e) => self.record(format!("Database connection reachable: no ({})", e), false),
        }
    }

    fn check_schema_mapping(&mut self) {
        let path = self.host.component_path().to_path_buf();
        let exists = path.is_dir();
        self.record(
            format!(
                "Component directory exists: {} - {}",
                path.display(),
                if exists { "found" } else { "not found" }
            ),
            exists,
        );

        if exists {
            match Lexicon::load(&path, self.host.locale()) {
                Ok(lexicon) => self.record(
                    format!(
                        "Lexicon topic loaded: {} ({} entries)",
                        lexicon.locale(),
                        lexicon.len()
                    ),
                    true,
                ),
                Err(e) => self.record(format!("Lexicon topic loaded: no ({})", e), false),
            }
        } else {
            self.record(
                "Skipped lexicon check - component directory not found".into(),
                false,
            );
        }

        let backend = self.host.db().get_database_backend();
        let statements = db::schema_statements(backend);
        self.record(
            format!(
                "Schema registered: {} statement(s) for {:?}",
                statements.len(),
                backend
            ),
            !statements.is_empty(),
        );
    }

    fn check_entity_definitions(&mut self) {
        let field_table = a001_field::repository::Entity.table_name().to_string();
        let value_table = a002_field_value::repository::Entity.table_name().to_string();

        let field_ok = field_table == Field::table_name();
        let value_ok = value_table == FieldValue::table_name();

        self.record(
            format!("{} entity maps to table: {}", Field::element_name(), field_table),
            field_ok,
        );
        self.record(
            format!("{} entity maps to table: {}", FieldValue::element_name(), value_table),
            value_ok,
        );
    }

    fn check_object_creation(&mut self) {
        let field = <a001_field::repository::ActiveModel as ActiveModelBehavior>::new();
        let value = <a002_field_value::repository::ActiveModel as ActiveModelBehavior>::new();

        let field_created = !field.is_changed();
        let value_created = !value.is_changed();

        self.record(
            format!(
                "Blank {} object created: {}",
                Field::element_name(),
                if field_created { "yes" } else { "no" }
            ),
            field_created,
        );
        self.record(
            format!(
                "Blank {} object created: {}",
                FieldValue::element_name(),
                if value_created { "yes" } else { "no" }
            ),
            value_created,
        );
    }

    async fn check_tables(&mut self) {
        for table in [a001_field::repository::TABLE, a002_field_value::repository::TABLE] {
            match db::table_exists(self.host.db(), table).await {
                Ok(exists) => self.record(
                    format!("Table {} exists: {}", table, if exists { "yes" } else { "no" }),
                    exists,
                ),
                Err(e) => self.record(format!("Table {} exists: unknown ({})", table, e), false),
            }
        }
    }

    async fn check_basic_operations(&mut self) {
        match a001_field::repository::count(self.host.db()).await {
            Ok(n) => self.record(format!("count(Field) successful: {} record(s)", n), true),
            Err(e) => {
                self.record(format!("Basic operations (count) failed: {}", e), false);
                return;
            }
        }

        match a002_field_value::repository::count(self.host.db()).await {
            Ok(n) => self.record(format!("count(FieldValue) successful: {} record(s)", n), true),
            Err(e) => self.record(format!("Basic operations (count) failed: {}", e), false),
        }
    }

    fn check_processors(&mut self) {
        let loaded = !self.registry.is_empty();
        self.record(
            format!("Processor registry loaded: {} processor(s)", self.registry.len()),
            loaded,
        );

        if loaded {
            for action in REQUIRED_PROCESSORS {
                let found = self.registry.contains(action);
                self.record(
                    format!(
                        "Processor {} registered: {}",
                        action,
                        if found { "found" } else { "not found" }
                    ),
                    found,
                );
            }
        }
    }
}
