//! desk-runner: headless operator console for the ticket desk.
//!
//! Usage:
//!   desk-runner import tickets.csv [--replace] [--db desk.db]
//!   desk-runner managers managers.csv [--replace] [--db desk.db]
//!   desk-runner distribute [--db desk.db]
//!   desk-runner list [--type T]... [--segment S]... [--language L]... [--priority LABEL]...
//!   desk-runner stats [--db desk.db]
//!   desk-runner generate --seed 42 --tickets 50 --managers 6 --out ./data
//!   desk-runner --ipc-mode [--db desk.db]

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::{self, BufRead, Write};
use ticket_desk_core::{
    config::DeskConfig,
    filter::{count_active_filters, FilterOptions, TicketFilters},
    pipeline::DeskPipeline,
    sample_data::{encode_managers_csv, encode_tickets_csv, SampleGenerator},
    stats::TicketStats,
    store::DeskStore,
    ticket::Ticket,
};

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Filter {
        #[serde(default)]
        filters: TicketFilters,
    },
    Options,
    Distribute,
    Quit,
}

#[derive(Serialize)]
struct UiState {
    total_tickets: i64,
    unassigned_tickets: usize,
    managers: usize,
    stats: TicketStats,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterResponse {
    tickets: Vec<Ticket>,
    active_count: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let config = match flag_value(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };

    let positional = positional_args(&args);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let command = match positional.first() {
        Some(cmd) if !ipc_mode => *cmd,
        _ => "--ipc-mode",
    };
    if command == "generate" {
        return run_generate(&args);
    }

    let store = DeskStore::open(db)?;
    store.migrate()?;
    let pipeline = DeskPipeline::new(store, config);
    let replace = args.iter().any(|a| a == "--replace");

    match command {
        "--ipc-mode" => run_ipc_loop(&pipeline)?,
        "import" => {
            let text = read_input(&positional)?;
            let summary = pipeline.import_tickets(&text, replace)?;
            println!("=== IMPORT ===");
            println!("  batch:     {}", summary.batch_id);
            println!("  imported:  {} of {} rows", summary.rows_imported, summary.rows_total);
            for issue in &summary.parse_errors {
                println!("  error:     {issue}");
            }
            for issue in &summary.validation.errors {
                println!("  invalid:   {issue}");
            }
        }
        "managers" => {
            let text = read_input(&positional)?;
            let summary = pipeline.import_managers(&text, replace)?;
            println!("=== ROSTER ===");
            println!("  imported:  {} of {} rows", summary.rows_imported, summary.rows_total);
            for issue in &summary.parse_errors {
                println!("  error:     {issue}");
            }
        }
        "distribute" => {
            let result = pipeline.distribute()?;
            println!("=== DISTRIBUTION ===");
            for a in &result.assignments {
                println!("  {} -> {} ({})", a.ticket_id, a.manager_name, a.manager_id);
            }
            if !result.unassigned.is_empty() {
                println!("  unassigned: {}", result.unassigned.join(", "));
            }
        }
        "list" => {
            let filters = filters_from_args(&args);
            for t in pipeline.query(&filters)? {
                println!(
                    "  {:>6} | {:<8} | {:<30} | p{:<2} | {:<2} | {:<10} | {}",
                    t.id, t.segment, t.ticket_type, t.priority, t.language, t.office, t.manager
                );
            }
        }
        "stats" => print_stats(&pipeline.stats()?),
        other => bail!("Unknown command: {other}"),
    }

    Ok(())
}

fn run_ipc_loop(pipeline: &DeskPipeline) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Malformed IPC command: {e}");
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let response = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => serde_json::to_string(&build_ui_state(pipeline)?)?,
            IpcCommand::Filter { filters } => {
                let response = FilterResponse {
                    tickets: pipeline.query(&filters)?,
                    active_count: count_active_filters(&filters),
                };
                serde_json::to_string(&response)?
            }
            IpcCommand::Options => serde_json::to_string(&FilterOptions::catalog())?,
            IpcCommand::Distribute => serde_json::to_string(&pipeline.distribute()?)?,
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(pipeline: &DeskPipeline) -> Result<UiState> {
    let store = pipeline.store();
    Ok(UiState {
        total_tickets: store.ticket_count()?,
        unassigned_tickets: store.unassigned_tickets(&pipeline.config)?.len(),
        managers: store.all_managers()?.len(),
        stats: pipeline.stats()?,
    })
}

fn run_generate(args: &[String]) -> Result<()> {
    let seed = parse_arg(args, "--seed", 42u64);
    let tickets = parse_arg(args, "--tickets", 50usize);
    let managers = parse_arg(args, "--managers", 6usize);
    let out = flag_value(args, "--out").unwrap_or(".");

    let generator = SampleGenerator::new(seed);
    let tickets_path = format!("{out}/tickets.csv");
    let managers_path = format!("{out}/managers.csv");
    std::fs::create_dir_all(out).with_context(|| format!("Cannot create {out}"))?;
    std::fs::write(&tickets_path, encode_tickets_csv(&generator.tickets(tickets)))
        .with_context(|| format!("Cannot write {tickets_path}"))?;
    std::fs::write(&managers_path, encode_managers_csv(&generator.managers(managers)))
        .with_context(|| format!("Cannot write {managers_path}"))?;

    println!("Ticket desk — sample data");
    println!("  seed:      {seed}");
    println!("  tickets:   {tickets} -> {tickets_path}");
    println!("  managers:  {managers} -> {managers_path}");
    Ok(())
}

fn print_stats(stats: &TicketStats) {
    println!("=== STATS ===");
    println!("  total:      {}", stats.total);
    println!("  processed:  {}", stats.processed);
    println!("  unassigned: {}", stats.unassigned);
    for (label, counts) in [
        ("type", &stats.by_type),
        ("sentiment", &stats.by_sentiment),
        ("office", &stats.by_office),
        ("language", &stats.by_language),
    ] {
        println!("  by {label}:");
        for (key, n) in counts {
            println!("    {key:<30} {n}");
        }
    }
}

/// Flags that consume the argument after them.
const VALUE_FLAGS: &[&str] = &[
    "--db", "--config", "--type", "--segment", "--language", "--priority", "--seed", "--tickets",
    "--managers", "--out",
];

/// Arguments after the program name that are neither flags nor flag values,
/// so `--db d.db import t.csv` yields `["import", "t.csv"]`.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut positional = Vec::new();
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            rest.next();
        } else if !arg.starts_with("--") {
            positional.push(arg.as_str());
        }
    }
    positional
}

/// Read the file named by the first positional argument after the command.
fn read_input(positional: &[&str]) -> Result<String> {
    let Some(path) = positional.get(1) else {
        let command = positional.first().copied().unwrap_or("import");
        bail!("Missing input file. Usage: desk-runner {command} <file.csv>");
    };
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {path}"))
}

fn filters_from_args(args: &[String]) -> TicketFilters {
    TicketFilters {
        ticket_type: flag_values(args, "--type"),
        segment: flag_values(args, "--segment"),
        language: flag_values(args, "--language"),
        priority_range: flag_values(args, "--priority"),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn flag_values(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        std::iter::once("desk-runner")
            .chain(line.split_whitespace())
            .map(String::from)
            .collect()
    }

    #[test]
    fn command_found_after_global_flags() {
        let a = args("--db d.db --config desk.json import t.csv --replace");
        assert_eq!(positional_args(&a), vec!["import", "t.csv"]);
    }

    #[test]
    fn flag_values_are_not_commands() {
        let a = args("list --type Жалоба --priority high");
        assert_eq!(positional_args(&a), vec!["list"]);
        assert!(positional_args(&args("--db d.db --ipc-mode")).is_empty());
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let err = read_input(&["import"]).unwrap_err();
        assert!(err.to_string().contains("desk-runner import <file.csv>"));
    }
}
