//! Command line handling: argument parsing, store selection and the
//! non-interactive actions (`--save`, `--output`, `--list`, ...).

use crate::config::{Config, default_db_path};
use anyhow::{Context, Result, anyhow, bail};
use shiftgrid_core::report::write_report_file;
use shiftgrid_core::storage::{CollectionRef, DocumentStore, MemoryStore, SqliteStore};
use shiftgrid_core::{CellRef, Document, Session, ShiftgridError, WorkTimeMode};
use shiftgrid_engine::engine::{PageGeometry, parse_month};
use std::path::PathBuf;
use tracing::warn;

/// Name used when none is given on the command line.
pub const DEFAULT_NAME: &str = "untitled";

/// `--db` value selecting the in-memory store.
const MEMORY_DB: &str = ":memory:";

#[derive(Debug, Default)]
pub struct Args {
    pub name: Option<String>,
    pub double: bool,
    pub columns: Vec<String>,
    pub month: Option<String>,
    pub sets: Vec<(CellRef, String)>,
    pub save: bool,
    pub output: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub import_json: Option<PathBuf>,
    pub totals: bool,
    pub list: bool,
    pub list_collections: bool,
    pub list_databases: bool,
    pub delete: Option<String>,
    pub db: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub config: Option<PathBuf>,
    pub no_config: bool,
}

pub enum Parsed {
    Run(Args),
    Help,
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str, what: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires {}", flag, what))
}

impl Args {
    /// Parse everything after the program name.
    pub fn parse(args: &[String]) -> Result<Parsed, String> {
        let mut parsed = Args::default();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "-h" | "--help" => return Ok(Parsed::Help),
                "--double" => parsed.double = true,
                "--columns" => {
                    parsed.columns = value(args, &mut i, flag, "a comma separated list")?
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                "--month" => parsed.month = Some(value(args, &mut i, flag, "YYYY-MM")?.to_string()),
                "--set" => {
                    let assignment = value(args, &mut i, flag, "CELL=VALUE")?;
                    parsed.sets.push(parse_assignment(assignment)?);
                }
                "--save" => parsed.save = true,
                "-o" | "--output" => {
                    parsed.output = Some(PathBuf::from(value(args, &mut i, flag, "a file path")?));
                }
                "--export-json" => {
                    parsed.export_json = Some(PathBuf::from(value(args, &mut i, flag, "a file path")?));
                }
                "--import-json" => {
                    parsed.import_json = Some(PathBuf::from(value(args, &mut i, flag, "a file path")?));
                }
                "--totals" => parsed.totals = true,
                "--list" => parsed.list = true,
                "--list-collections" => parsed.list_collections = true,
                "--list-databases" => parsed.list_databases = true,
                "--delete" => parsed.delete = Some(value(args, &mut i, flag, "a name")?.to_string()),
                "--db" => parsed.db = Some(value(args, &mut i, flag, "a path")?.to_string()),
                "--database" => {
                    parsed.database = Some(value(args, &mut i, flag, "a name")?.to_string());
                }
                "--collection" => {
                    parsed.collection = Some(value(args, &mut i, flag, "a name")?.to_string());
                }
                "--config" => {
                    parsed.config = Some(PathBuf::from(value(args, &mut i, flag, "a file path")?));
                }
                "--no-config" => parsed.no_config = true,
                arg if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
                arg => {
                    if parsed.name.is_some() {
                        return Err(format!("Unexpected argument: {}", arg));
                    }
                    parsed.name = Some(arg.to_string());
                }
            }
            i += 1;
        }
        Ok(Parsed::Run(parsed))
    }

    /// Whether the listing/deleting flags were given. These run on their own.
    pub fn is_store_query(&self) -> bool {
        self.list || self.list_collections || self.list_databases || self.delete.is_some()
    }

    /// Whether the run is non-interactive.
    pub fn is_batch(&self) -> bool {
        self.is_store_query()
            || !self.sets.is_empty()
            || self.save
            || self.totals
            || self.output.is_some()
            || self.export_json.is_some()
    }

    /// Whether a batch run edits the document without `--save`.
    pub fn discards_edits(&self) -> bool {
        !self.save && (!self.sets.is_empty() || self.month.is_some())
    }
}

/// Parse `A1=8` into a cell and the text to enter.
fn parse_assignment(input: &str) -> Result<(CellRef, String), String> {
    let (cell, text) = input
        .split_once('=')
        .ok_or_else(|| format!("Invalid --set '{}': expected CELL=VALUE", input))?;
    let cell_ref = CellRef::from_str(cell.trim())
        .ok_or_else(|| format!("Invalid cell reference: {}", cell.trim()))?;
    Ok((cell_ref, text.to_string()))
}

/// Open the store named by `--db`, the config, or the default location.
pub fn open_store(db: Option<&str>, config: &Config) -> Result<Box<dyn DocumentStore>> {
    if db == Some(MEMORY_DB) {
        return Ok(Box::new(MemoryStore::new()));
    }
    let path = db
        .map(PathBuf::from)
        .or_else(|| config.store.path.clone())
        .or_else(default_db_path)
        .ok_or_else(|| anyhow!("no data directory available; pass --db PATH"))?;
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    Ok(Box::new(store))
}

pub fn location(args: &Args, config: &Config) -> CollectionRef {
    CollectionRef::new(
        args.database.clone().unwrap_or_else(|| config.store.database.clone()),
        args.collection.clone().unwrap_or_else(|| config.store.collection.clone()),
    )
}

/// Run `--list*` and `--delete`.
pub fn run_store_query(store: &dyn DocumentStore, at: &CollectionRef, args: &Args) -> Result<()> {
    if args.list_databases {
        for database in store.list_databases()? {
            println!("{}", database);
        }
    }
    if args.list_collections {
        for collection in store.list_collections(&at.database)? {
            println!("{}", collection);
        }
    }
    if args.list {
        for meta in store.list_metadata(at)? {
            println!("{}\t{}", meta.id, meta.name);
        }
    }
    if let Some(name) = &args.delete {
        if !store.delete_by_name(at, name)? {
            bail!("no document named '{}' in {}", name, at);
        }
        println!("Deleted {} from {}", name, at);
    }
    Ok(())
}

/// Open, import or create the document the arguments name, then apply
/// `--month` and `--set`.
pub fn prepare_document(session: &mut Session, args: &Args) -> Result<()> {
    if let Some(path) = &args.import_json {
        let mut doc = Document::import_json(path, session.tokens().clone())
            .with_context(|| format!("failed to import {}", path.display()))?;
        if let Some(name) = &args.name {
            doc.name = name.clone();
        }
        session.open_document(doc);
    } else {
        let name = args.name.as_deref().unwrap_or(DEFAULT_NAME);
        match session.open_by_name(name) {
            Ok(_) => {
                if args.double || !args.columns.is_empty() {
                    warn!(%name, "document exists; ignoring --double and --columns");
                    eprintln!("Warning: '{}' exists; --double and --columns ignored", name);
                }
            }
            Err(ShiftgridError::DocumentNotFound(_)) => {
                let mode = if args.double {
                    WorkTimeMode::Double
                } else {
                    WorkTimeMode::Single
                };
                session.new_document(name, mode, args.columns.clone());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let doc = session.current()?;
    if let Some(month) = &args.month {
        let (year, month) =
            parse_month(month).ok_or_else(|| anyhow!("invalid month '{}': expected YYYY-MM", month))?;
        doc.set_month(year, month);
    }
    for (cell_ref, text) in &args.sets {
        doc.set_cell_from_input(*cell_ref, text)
            .with_context(|| format!("cannot set {}", cell_ref))?;
    }
    Ok(())
}

/// Non-interactive document actions.
fn doc_name(session: &Session) -> String {
    session.document().map(|d| d.name.clone()).unwrap_or_default()
}

pub fn run_batch(session: &mut Session, args: &Args, geometry: &PageGeometry) -> Result<()> {
    let doc = session.current()?;
    if args.totals {
        for (name, total) in doc.column_names.iter().zip(doc.group_totals()?) {
            println!("{}\t{}", name, total);
        }
    }
    if let Some(path) = &args.output {
        let pages = write_report_file(path, doc, geometry)
            .with_context(|| format!("failed to print to {}", path.display()))?;
        println!("Printed {} page(s) to {}", pages, path.display());
    }
    if let Some(path) = &args.export_json {
        doc.export_json(path)
            .with_context(|| format!("failed to export {}", path.display()))?;
        println!("Exported to {}", path.display());
    }
    if args.save {
        let id = session.save()?;
        println!("Saved {} ({}) to {}", doc_name(session), id, session.location());
    } else if args.discards_edits() {
        eprintln!(
            "Warning: edits to '{}' were not saved; add --save to keep them",
            doc_name(session)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Args::parse(&args)
    }

    fn parse_run(args: &[&str]) -> Args {
        match parse(args) {
            Ok(Parsed::Run(args)) => args,
            Ok(Parsed::Help) => panic!("unexpected help"),
            Err(err) => panic!("parse failed: {}", err),
        }
    }

    #[test]
    fn parses_document_flags() {
        let args = parse_run(&[
            "October",
            "--double",
            "--columns",
            "Ann, Bob,,Cara",
            "--set",
            "A1=8",
            "--set",
            "b2= A ",
            "--month",
            "2026-10",
            "--save",
        ]);
        assert_eq!(args.name.as_deref(), Some("October"));
        assert!(args.double);
        assert_eq!(args.columns, vec!["Ann", "Bob", "Cara"]);
        assert_eq!(args.sets[0], (CellRef::new(0, 0), "8".to_string()));
        assert_eq!(args.sets[1], (CellRef::new(1, 1), " A ".to_string()));
        assert_eq!(args.month.as_deref(), Some("2026-10"));
        assert!(args.is_batch());
        assert!(!args.is_store_query());
    }

    #[test]
    fn bare_name_is_interactive() {
        let args = parse_run(&["October", "--db", ":memory:", "--no-config"]);
        assert!(!args.is_batch());
    }

    #[test]
    fn edits_without_save_are_flagged() {
        assert!(parse_run(&["October", "--set", "A1=8"]).discards_edits());
        assert!(parse_run(&["October", "--month", "2026-10", "--totals"]).discards_edits());
        assert!(!parse_run(&["October", "--set", "A1=8", "--save"]).discards_edits());
        assert!(!parse_run(&["October", "--totals"]).discards_edits());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["a", "b"]).is_err());
        assert!(parse(&["--set", "A1"]).is_err());
        assert!(parse(&["--set", "1A=3"]).is_err());
        assert!(parse(&["--output"]).is_err());
        assert!(matches!(parse(&["x", "-h"]), Ok(Parsed::Help)));
    }

    fn memory_session() -> Session {
        let config = Config::default();
        let store = open_store(Some(MEMORY_DB), &config).unwrap();
        let at = location(&Args::default(), &config);
        Session::new(store, at, config.special_tokens)
    }

    #[test]
    fn prepare_creates_then_reopens() {
        let mut session = memory_session();
        let args = parse_run(&["October", "--columns", "Ann,Bob", "--set", "A1=8", "--set", "B1=16", "--save"]);
        prepare_document(&mut session, &args).unwrap();
        run_batch(&mut session, &args, &PageGeometry::default()).unwrap();

        session.close();
        let args = parse_run(&["October", "--set", "C1=A", "--totals"]);
        prepare_document(&mut session, &args).unwrap();
        let doc = session.current().unwrap();
        assert_eq!(doc.group_totals().unwrap(), vec![8, 8]);
        assert!(doc.modified);
    }

    #[test]
    fn prepare_rejects_bad_month_and_cells() {
        let mut session = memory_session();
        let args = parse_run(&["x", "--month", "2026-13"]);
        assert!(prepare_document(&mut session, &args).is_err());

        let mut session = memory_session();
        let args = parse_run(&["x", "--columns", "Ann", "--set", "C1=8"]);
        assert!(prepare_document(&mut session, &args).is_err());
    }

    #[test]
    fn location_prefers_flags() {
        let config = Config::default();
        let args = parse_run(&["--collection", "night"]);
        let at = location(&args, &config);
        assert_eq!(at.to_string(), "default/night");
    }
}
