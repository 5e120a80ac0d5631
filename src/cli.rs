// File: ./src/cli.rs
//! Command-line parsing and help text.
use crate::display::ViewMode;
use crate::range::NamedRange;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::str::FromStr;
use strum::IntoEnumIterator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Load a spreadsheet, save it, then show today.
    Load(PathBuf),
    Show(NamedRange),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub view_mode: Option<ViewMode>,
}

/// Parses arguments (without the binary name).
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut root = None;
    let mut view_mode = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                return Ok(CliArgs {
                    command: Command::Help,
                    root,
                    view_mode,
                });
            }
            "-r" | "--root" => {
                let path = iter.next().ok_or("--root needs a path")?;
                root = Some(PathBuf::from(path));
            }
            "--view" => {
                let name = iter.next().ok_or("--view needs a mode")?;
                view_mode = Some(
                    ViewMode::from_str(name).map_err(|_| format!("Unknown view mode: {}", name))?,
                );
            }
            "--table" => view_mode = Some(ViewMode::Table),
            "--cards" => view_mode = Some(ViewMode::Cards),
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            other => positional.push(other),
        }
    }

    let command = match positional.as_slice() {
        [] | ["today"] => Command::Show(NamedRange::Today),
        ["tomorrow"] => Command::Show(NamedRange::Tomorrow),
        ["week"] => Command::Show(NamedRange::WEEK),
        ["month"] => Command::Show(NamedRange::NextMonth),
        ["days", n] => {
            let n = n
                .parse::<u64>()
                .map_err(|_| format!("Not a number of days: {}", n))?;
            Command::Show(NamedRange::NextDays(n))
        }
        ["until"] => Command::Show(NamedRange::Until(None)),
        ["until", date] => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| format!("Expected a date like 2024-06-30, got: {}", date))?;
            Command::Show(NamedRange::Until(Some(date)))
        }
        ["load", path] => Command::Load(PathBuf::from(path)),
        ["load"] => return Err("load needs a spreadsheet path".to_string()),
        other => return Err(format!("Unknown command: {}", other.join(" "))),
    };

    Ok(CliArgs {
        command,
        root,
        view_mode,
    })
}

pub fn print_help(binary_name: &str) {
    let modes: Vec<String> = ViewMode::iter().map(|m| m.to_string()).collect();

    println!(
        "Sheetcal v{} - View spreadsheet calendar events by date range",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] [COMMAND]", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    load <file>           Load a spreadsheet (xlsx, xls, xlsb, ods), save it, show today");
    println!("    today                 Events starting today (default)");
    println!("    tomorrow              Events starting tomorrow");
    println!("    week                  Events from today through 7 days from now");
    println!("    month                 Events from today through the same day next month");
    println!("    days <n>              Events from today through n days from now");
    println!("    until [YYYY-MM-DD]    Events from today through the given date");
    println!();
    println!("OPTIONS:");
    println!("    --view <mode>         Layout: {}", modes.join(", "));
    println!("    --table, --cards      Shorthand for --view table / --view cards");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("SPREADSHEET FORMAT:");
    println!("    The first sheet is read. Its first row names the columns; by default");
    println!("    Subject, Location, Start and End. Rename them under [columns] in config.toml.");
    println!("    Start/End may be date cells or text like 2024-06-01 10:00.");
    println!("    Rows without a readable Start are skipped.");
}
