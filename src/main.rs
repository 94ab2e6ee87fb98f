use airroute::catalog::Catalog;
use airroute::planner::{Planner, RotationChange};
use airroute::store::{JsonFileStore, RotationStore};
use airroute::timeline::Timeline;
use airroute::{error, logger, view};
use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[derive(Parser)]
struct Args {
    /// Path to the JSON catalog of aircraft and flights
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,

    /// Path to the JSON file holding planned rotations
    #[arg(long, value_name = "FILE", env = "AIRROUTE_STORE", default_value = "data/rotations.json")]
    store: PathBuf,

    /// Planning date (YYYY-MM-DD), today if omitted
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Aircraft selected on startup
    #[arg(short, long)]
    aircraft: Option<String>,

    /// Log level (off, error, warn, info, debug, trace), falls back to RUST_LOG
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Also append log lines to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

const COMMANDS: [&str; 11] = [
    "fleet", "select", "date", "ls", "rotation", "add", "rm", "clear", "timeline", "help", "exit",
];

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub aircraft: Vec<String>,
    pub flights: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let (start, prefix, words): (usize, &str, Vec<&str>) = match line.split_once(' ') {
            None => (0, line, COMMANDS.to_vec()),
            Some((cmd, rest)) => {
                let start = line.rfind(' ').map_or(0, |i| i + 1);
                let words = match cmd {
                    "select" => self.aircraft.iter().map(String::as_str).collect(),
                    "add" | "rm" => self.flights.iter().map(String::as_str).collect(),
                    _ => vec![],
                };
                (start, rest.rsplit(' ').next().unwrap_or(rest), words)
            }
        };

        let candidates = words
            .into_iter()
            .filter(|w| w.starts_with(prefix))
            .map(|w| Pair {
                display: w.to_string(),
                replacement: format!("{} ", w),
            })
            .collect();

        Ok((start, candidates))
    }
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());

    let Ok(mut pager) = pager else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                log::error!("Error writing to pager: {}", e);
            }
        }
    }

    // Wait for the user to close the pager before returning to the prompt
    let _ = pager.wait();
}

fn print_table(table: String, rows: usize) {
    if rows > 20 {
        paginate(table);
    } else {
        println!("{}", table);
    }
}

fn print_change(change: &RotationChange) {
    if !change.removed.is_empty() {
        let removed = change.removed.iter().map(|l| &*l.ident).collect::<Vec<_>>();
        println!("Removed {}.", removed.join(", "));
    }
    println!("Rotation {} on {}:", change.aircraft, change.date);
    if change.rotation.is_empty() {
        println!("No flights registered.");
    } else {
        println!("{}", view::legs_table(change.rotation.legs()));
    }
    println!("{}", view::timeline_bar(&Timeline::derive(change.rotation.legs())));
}

struct Session {
    aircraft: Option<String>,
    date: NaiveDate,
}

impl Session {
    fn prompt(&self) -> String {
        format!("{} {} >> ", self.aircraft.as_deref().unwrap_or("-"), self.date)
    }
}

fn selected(session: &Session) -> error::Result<&str> {
    session.aircraft.as_deref().ok_or(error::Error::NoAircraftSelected)
}

fn run<S: RotationStore>(planner: &mut Planner<S>, session: &mut Session, parts: &[&str]) -> error::Result<()> {
    match parts[0] {
        "fleet" | "f" => {
            let usage = planner.fleet_usage(session.date);
            if usage.is_empty() {
                println!("No aircraft found.");
            } else {
                print_table(view::fleet_table(&usage), usage.len());
            }
        }
        "select" | "s" => match parts.get(1) {
            Some(ident) => {
                let rotation = planner.rotation(ident, session.date)?;
                session.aircraft = Some(ident.to_string());
                println!("Selected {} ({} flights on {}).", ident, rotation.len(), session.date);
            }
            None => println!("Usage: select <aircraft>"),
        },
        "date" | "d" => match parts.get(1) {
            Some(date) => match date.parse::<NaiveDate>() {
                Ok(date) => {
                    session.date = date;
                    println!("Planning {}.", date);
                }
                Err(e) => println!("Invalid date {}: {}", date, e),
            },
            None => println!("Planning {}.", session.date),
        },
        "help" | "?" => {
            println!("\nAvailable Commands:");
            println!("  fleet               - List aircraft with their usage on the current date");
            println!("  select <aircraft>   - Select the aircraft to plan");
            println!("  date <YYYY-MM-DD>   - Change the planning date");
            println!("  ls                  - List flights that can still be added to the selected aircraft");
            println!("  rotation            - Show the rotation of the selected aircraft");
            println!("  add <flight>        - Append <flight> to the rotation");
            println!("  rm <flight>         - Remove <flight> and every later flight from the rotation");
            println!("  clear               - Remove the whole rotation");
            println!("  timeline            - Show the 24h timeline of the selected aircraft");
            println!("  help / ?            - Show this help menu");
            println!("  exit / quit         - Exit the planner\n");
        }
        "ls" => {
            let aircraft = selected(session)?;
            let flights = planner.available_flights(aircraft, session.date)?;
            if flights.is_empty() {
                println!("No flights left to add.");
            } else {
                print_table(view::legs_table(flights.iter().copied()), flights.len());
            }
        }
        "rotation" | "rot" => {
            let rotation = planner.rotation(selected(session)?, session.date)?;
            if rotation.is_empty() {
                println!("No flights registered.");
            } else {
                print_table(view::legs_table(rotation.legs()), rotation.len());
            }
        }
        "add" | "a" => {
            let aircraft = selected(session)?;
            match parts.get(1) {
                Some(flight) => print_change(&planner.assign(aircraft, session.date, flight)?),
                None => println!("Usage: add <flight>"),
            }
        }
        "rm" => {
            let aircraft = selected(session)?;
            match parts.get(1) {
                Some(flight) => print_change(&planner.remove(aircraft, session.date, flight)?),
                None => println!("Usage: rm <flight>"),
            }
        }
        "clear" => print_change(&planner.clear(selected(session)?, session.date)?),
        "timeline" | "tl" => {
            println!("{}", view::timeline_bar(&planner.timeline(selected(session)?, session.date)?));
        }
        cmd => println!("Unknown command: {}", cmd),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init(logger::level(args.log_level), args.log_file.as_deref())?;

    let catalog = Catalog::load_from_file(&args.scenario)?;
    let store = JsonFileStore::open(&args.store)?;
    println!(
        "AirRoute ready. Loaded {} aircraft and {} flights from {}, rotations in {}",
        catalog.aircraft().len(),
        catalog.flights().len(),
        args.scenario.display(),
        store.path().display()
    );

    let helper = CompleteHelper {
        aircraft: catalog.aircraft().iter().map(|a| a.ident.to_string()).collect(),
        flights: catalog.flights().iter().map(|f| f.ident.to_string()).collect(),
    };
    let mut planner = Planner::new(catalog, store);
    let mut session = Session {
        aircraft: None,
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
    };
    if let Some(aircraft) = args.aircraft.as_deref() {
        if let Err(e) = run(&mut planner, &mut session, &["select", aircraft]) {
            println!("{} {}", "Error:".red(), e);
        }
    }

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(&session.prompt());
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if matches!(parts[0], "exit" | "quit") {
                    break;
                }
                if let Err(e) = run(&mut planner, &mut session, &parts) {
                    println!("{} {}", "Error:".red(), e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
