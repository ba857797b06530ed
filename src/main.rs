//! Shiftgrid - monthly shift schedule editor

mod cli;
mod config;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use cli::{Args, Parsed};
use config::{Config, load_config};
use logging::LogTarget;
use shiftgrid_core::Session;
use std::env;
use tracing::warn;

fn print_usage() {
    eprintln!("Usage: shiftgrid [OPTIONS] [NAME]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [NAME]                    Schedule to open (created if missing)");
    eprintln!();
    eprintln!("Document options:");
    eprintln!("  --double                  New schedule with two shifts per day");
    eprintln!("  --columns <A,B,..>        Column group names for a new schedule");
    eprintln!("  --month <YYYY-MM>         Month the schedule covers");
    eprintln!("  --set <CELL=VALUE>        Enter a value, e.g. A1=8 (can be repeated)");
    eprintln!("  --import-json <FILE>      Start from an exported schedule");
    eprintln!();
    eprintln!("Actions (non-interactive):");
    eprintln!("  --save                    Save the schedule");
    eprintln!("  --totals                  Print worked time per column group");
    eprintln!("  -o, --output <FILE>       Print the paginated report to a file");
    eprintln!("  --export-json <FILE>      Export the schedule as JSON");
    eprintln!("  --list                    List schedules in the collection");
    eprintln!("  --list-collections        List collections in the database");
    eprintln!("  --list-databases          List databases");
    eprintln!("  --delete <NAME>           Delete a schedule");
    eprintln!();
    eprintln!("Store options:");
    eprintln!("  --db <PATH>               SQLite file, or :memory:");
    eprintln!("  --database <NAME>         Database (default: default)");
    eprintln!("  --collection <NAME>       Collection (default: schedules)");
    eprintln!("  --config <PATH>           Config file");
    eprintln!("  --no-config               Ignore the config file");
    eprintln!("  -h, --help                Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let args = match Args::parse(&args[1..]) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let (config, warnings) = if args.no_config {
        (Config::default(), Vec::new())
    } else {
        load_config(args.config.as_deref())
    };

    let interactive = !args.is_batch();
    let target = if interactive && cfg!(feature = "tui") {
        logging::default_log_path()
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Stderr)
    } else {
        LogTarget::Stderr
    };
    logging::init(target)?;

    for warning in warnings {
        warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let store = cli::open_store(args.db.as_deref(), &config)?;
    let at = cli::location(&args, &config);

    if args.is_store_query() {
        return cli::run_store_query(store.as_ref(), &at, &args);
    }

    let mut session = Session::new(store, at, config.special_tokens.clone());
    cli::prepare_document(&mut session, &args)?;

    if !interactive {
        return cli::run_batch(&mut session, &args, &config.print);
    }

    #[cfg(feature = "tui")]
    {
        let mut app = tui::App::new(session, config.print);
        tui::run(&mut app)
    }

    #[cfg(not(feature = "tui"))]
    {
        anyhow::bail!("built without the terminal editor; use --save, --totals or --output")
    }
}
