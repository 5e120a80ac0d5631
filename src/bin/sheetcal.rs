use anyhow::Result;
use sheetcal::cli::{self, Command};
use sheetcal::config::Config;
use sheetcal::context::{AppContext, StandardContext};
use sheetcal::display::{self, ViewMode};
use sheetcal::logging;
use sheetcal::range::NamedRange;
use sheetcal::session::Session;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .and_then(|a| std::path::Path::new(a).file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("sheetcal")
        .to_string();

    let parsed = match cli::parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!("Run '{} --help' for usage.", binary_name);
            std::process::exit(2);
        }
    };

    if parsed.command == Command::Help {
        cli::print_help(&binary_name);
        return Ok(());
    }

    let ctx = StandardContext::new(parsed.root.clone());

    let config = match Config::load(&ctx) {
        Ok(config) => config,
        Err(e) if Config::is_missing_config_error(&e) => {
            // First run: write the defaults so the column names are discoverable.
            let config = Config::default();
            if let Err(e) = config.save(&ctx) {
                eprintln!("Warning: could not write default config: {:#}", e);
            }
            config
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Ok(path) = ctx.get_config_file_path() {
                eprintln!("Fix or remove {} and try again.", path.display());
            }
            std::process::exit(1);
        }
    };

    logging::init(&ctx, config.log_level_filter());

    let view_mode: ViewMode = parsed.view_mode.unwrap_or(config.view_mode);
    let mut session = Session::open(&ctx, config)?;

    if let Some(count) = session.restore() {
        println!("{}", display::restore_status(count));
    }

    let named = match parsed.command {
        Command::Load(path) => {
            match session.load_file(&path).await {
                Ok(outcome) => {
                    println!("{}", display::load_status(outcome.count, outcome.skipped));
                    if !outcome.saved {
                        eprintln!("Warning: the events could not be saved for next time.");
                    }
                }
                Err(e) => eprintln!("{}", display::error_status(&e, &session.config().columns)),
            }
            NamedRange::Today
        }
        Command::Show(named) => named,
        Command::Help => return Ok(()),
    };

    match session.query_named(named) {
        Ok(outcome) => println!("\n{}", display::render(&outcome, view_mode)),
        Err(e) => {
            eprintln!("{}", display::error_status(&e, &session.config().columns));
            std::process::exit(1);
        }
    }

    Ok(())
}
