// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Development tasks for the relief workspace: linting, building, testing,
//! and a self-contained check that the embedded `SQLite` migrations produce
//! the schema the persistence layer depends on.
//!
//! ### Commands
//!
//! - `cargo xtask ci`: lint, build, tests, and migration verification
//! - `cargo xtask verify-migrations`: apply migrations to a scratch database and
//!   check every table, foreign key, and index the coordinator relies on
//!
//! Nothing here needs external services. Standard `cargo test` stays fast and
//! infrastructure-free.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use cargo_metadata::MetadataCommand;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test, migrations)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Check if README.md is up-to-date
    #[command(visible_alias = "cr")]
    CheckReadme,

    /// Lint clippy, docs, and formatting
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Fix formatting issues in the project
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Verify the migrated `SQLite` schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::CheckReadme => check_readme(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::FixFormatting => fix_format(),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test, migrations)
fn ci() -> Result<()> {
    lint()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Run cargo-rdme to check if README.md is up-to-date with the library documentation
fn check_readme() -> Result<()> {
    run_cargo(vec!["rdme", "--workspace-project", "relief", "--check"])
}

/// Lint clippy, docs, and formatting
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that every workspace crate documents cleanly
fn lint_docs() -> Result<()> {
    let meta = MetadataCommand::new()
        .exec()
        .wrap_err("failed to get cargo metadata")?;

    for package in meta.workspace_default_packages() {
        cmd(
            "cargo",
            ["doc", "--no-deps", "--all-features", "--package", &package.name],
        )
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    }

    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Fix formatting issues in the project
fn fix_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all"])
}

/// Run unit, integration, and doc tests
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])?;
    run_cargo(vec!["test", "--doc", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Verify the migrated `SQLite` schema
///
/// Applies the embedded migrations to a scratch in-memory database,
/// introspects the result, and checks it against what the persistence layer
/// depends on:
///
/// - every expected table and column exists with the expected type and nullability
/// - assignment and audit rows reference their parents through foreign keys
/// - the one-active-assignment-per-volunteer index is unique
/// - phones are unique across volunteers
///
/// The migrations are then rolled back and re-applied to prove `down.sql`
/// is consistent with `up.sql`.
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Applying SQLite migrations");
    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;

    tracing::info!("Introspecting SQLite schema");
    let schema = introspect_sqlite_schema(&mut conn)?;
    check_schema(&schema)?;

    tracing::info!("Reverting and re-applying migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert SQLite migrations: {}", e))?;
    let reverted = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "Tables left behind after revert: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to re-apply SQLite migrations: {}", e))?;
    let reapplied = introspect_sqlite_schema(&mut conn)?;
    if reapplied != schema {
        return Err(color_eyre::eyre::eyre!(
            "Schema differs after revert and re-apply"
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    unique: bool,
    partial: bool,
    columns: Vec<String>,
}

/// A column the persistence layer reads or writes: (name, type, nullable).
type ExpectedColumn = (&'static str, &'static str, bool);

/// Tables and columns the persistence layer depends on.
const EXPECTED_TABLES: &[(&str, &[ExpectedColumn])] = &[
    (
        "volunteers",
        &[
            ("volunteer_id", "integer", true),
            ("name", "text", false),
            ("phone", "text", false),
            ("member_count", "integer", true),
            ("status", "text", false),
        ],
    ),
    (
        "disaster_requests",
        &[
            ("request_id", "integer", true),
            ("location", "text", false),
            ("description", "text", true),
            ("contact_name", "text", false),
            ("contact_phone", "text", false),
            ("required_volunteers", "integer", false),
            ("status", "text", false),
            ("created_at", "text", false),
        ],
    ),
    (
        "assignments",
        &[
            ("assignment_id", "integer", true),
            ("volunteer_id", "integer", false),
            ("request_id", "integer", false),
            ("headcount", "integer", false),
            ("status", "text", false),
            ("assigned_at", "text", false),
            ("confirmed_at", "text", true),
            ("completed_at", "text", true),
            ("cancelled_at", "text", true),
            ("rejection_reason", "text", true),
        ],
    ),
    (
        "audit_events",
        &[
            ("event_id", "integer", true),
            ("request_id", "integer", true),
            ("volunteer_id", "integer", true),
            ("assignment_id", "integer", true),
            ("actor_json", "text", false),
            ("cause_json", "text", false),
            ("action_json", "text", false),
            ("before_snapshot_json", "text", false),
            ("after_snapshot_json", "text", false),
            ("created_at", "text", false),
        ],
    ),
];

/// Foreign keys the lifecycle relies on: (table, column, parent table, parent column).
const EXPECTED_FOREIGN_KEYS: &[(&str, &str, &str, &str)] = &[
    ("assignments", "volunteer_id", "volunteers", "volunteer_id"),
    ("assignments", "request_id", "disaster_requests", "request_id"),
    ("audit_events", "request_id", "disaster_requests", "request_id"),
    ("audit_events", "volunteer_id", "volunteers", "volunteer_id"),
    ("audit_events", "assignment_id", "assignments", "assignment_id"),
];

/// Check an introspected schema against what the persistence layer expects
fn check_schema(schema: &Schema) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    for (table_name, columns) in EXPECTED_TABLES {
        let Some(table) = schema.tables.get(*table_name) else {
            errors.push(format!("Missing table: {table_name}"));
            continue;
        };

        for (column_name, column_type, nullable) in *columns {
            match table.columns.get(*column_name) {
                None => errors.push(format!("Missing column: {table_name}.{column_name}")),
                Some(column) => {
                    if column.normalized_type != *column_type {
                        errors.push(format!(
                            "Column {table_name}.{column_name} has type {}, expected {column_type}",
                            column.normalized_type
                        ));
                    }
                    // Primary keys report as nullable in SQLite; only check the rest.
                    if !table.primary_keys.contains(*column_name) && column.nullable != *nullable
                    {
                        errors.push(format!(
                            "Column {table_name}.{column_name} nullable={}, expected {nullable}",
                            column.nullable
                        ));
                    }
                }
            }
        }
    }

    for (table_name, from, to_table, to_column) in EXPECTED_FOREIGN_KEYS {
        let expected = ForeignKey {
            from_column: (*from).to_string(),
            to_table: (*to_table).to_string(),
            to_column: (*to_column).to_string(),
        };
        let present = schema
            .tables
            .get(*table_name)
            .is_some_and(|t| t.foreign_keys.contains(&expected));
        if !present {
            errors.push(format!(
                "Missing foreign key: {table_name}.{from} -> {to_table}.{to_column}"
            ));
        }
    }

    let phone_unique = schema.tables.get("volunteers").is_some_and(|t| {
        t.unique_constraints
            .iter()
            .any(|u| u.columns == ["phone".to_string()])
    });
    if !phone_unique {
        errors.push("volunteers.phone is not unique".to_string());
    }

    let one_active = schema.tables.get("assignments").and_then(|t| {
        t.indexes
            .iter()
            .find(|i| i.unique && i.partial && i.columns == ["volunteer_id".to_string()])
    });
    match one_active {
        Some(index) => tracing::info!("one-active-assignment index: {}", index.name),
        None => errors.push(
            "assignments lacks a unique partial index on volunteer_id for active rows"
                .to_string(),
        ),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for error in &errors {
            tracing::error!("{error}");
        }
        Err(color_eyre::eyre::eyre!(
            "Schema verification failed with {} error(s)",
            errors.len()
        ))
    }
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        cid: i32,
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
        #[diesel(sql_type = Integer)]
        partial: i32,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // Origin 'u' is a UNIQUE column constraint (sqlite_autoindex_*)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.indexes.insert(Index {
                    name: idx.name,
                    unique: idx.unique != 0,
                    partial: idx.partial != 0,
                    columns: column_names,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

/// Normalize `SQLite` type to common representation
fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let normalized = sqlite_type.to_uppercase();
    if normalized.contains("INT") {
        "integer".to_string()
    } else if normalized.contains("REAL")
        || normalized.contains("FLOA")
        || normalized.contains("DOUB")
    {
        "real".to_string()
    } else if normalized.contains("BLOB") {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
