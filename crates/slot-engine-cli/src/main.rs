use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use slot_engine::{
    schedule_slots_with_limits, select_option, Class, NonClassActivity, ScheduleResult,
    SearchLimits, SectionKind, Timeslot,
};

/// Find every class schedule with the fewest overlapping meetings.
#[derive(Debug, Parser)]
#[command(name = "slots", author, version, about, long_about = None)]
struct Cli {
    /// Schedule file (JSON). Reads standard input when omitted or "-".
    input: Option<PathBuf>,

    /// Stop the search after exploring this many section placements.
    #[arg(long)]
    max_nodes: Option<u64>,

    /// Stop the search after this many milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Zero-based index of the option to show. Out of range falls back to 0.
    #[arg(long, default_value_t = 0)]
    option: usize,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log search statistics to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// The selection to schedule.
#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    classes: Vec<Class>,
    #[serde(default)]
    activities: Vec<NonClassActivity>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    selected_option: usize,
    total_options: usize,
    too_many_options: bool,
    #[serde(flatten)]
    result: &'a ScheduleResult,
    schedule: Vec<ChosenSection<'a>>,
}

/// A section on the calendar after an option has been applied.
#[derive(Debug, Serialize)]
struct ChosenSection<'a> {
    class: &'a str,
    kind: SectionKind,
    label: &'a str,
    locked: bool,
    timeslots: &'a [Timeslot],
}

fn chosen_sections(classes: &[Class]) -> Vec<ChosenSection<'_>> {
    classes
        .iter()
        .flat_map(|class| {
            class.groups.iter().filter_map(move |group| {
                let section = group.selected_section()?;
                Some(ChosenSection {
                    class: &class.number,
                    kind: group.kind,
                    label: &section.label,
                    locked: group.is_locked(),
                    timeslots: &section.timeslots,
                })
            })
        })
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.verbose);

    let raw = read_input(cli.input.as_ref())?;
    let ScheduleFile {
        mut classes,
        activities,
    } = serde_json::from_str::<ScheduleFile>(&raw).context("failed to parse schedule file")?;

    let limits = SearchLimits {
        max_nodes: cli.max_nodes,
        time_limit: cli.time_limit_ms.map(Duration::from_millis),
    };
    let result = schedule_slots_with_limits(&classes, &activities, &limits)?;
    info!("search finished: {}", result.statistics);

    let selected = select_option(&mut classes, &result, Some(cli.option))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Json => {
            let report = Report {
                selected_option: selected,
                total_options: result.options.len(),
                too_many_options: result.has_too_many_options(),
                result: &result,
                schedule: chosen_sections(&classes),
            };
            serde_json::to_writer_pretty(&mut out, &report)?;
            writeln!(out)?;
        }
        Format::Text => write_text(&mut out, &result, selected, &classes, &activities)?,
    }
    Ok(())
}

fn configure_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}: {}",
                record.level().as_str().to_lowercase(),
                record.args()
            )
        })
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => io::read_to_string(io::stdin()).context("failed to read standard input"),
    }
}

fn write_text(
    out: &mut impl Write,
    result: &ScheduleResult,
    selected: usize,
    classes: &[Class],
    activities: &[NonClassActivity],
) -> Result<()> {
    let total = result.options.len();
    let shown = if total > 0 { selected + 1 } else { 0 };
    match result.conflicts {
        Some(conflicts) => writeln!(
            out,
            "Option {shown} of {total} ({conflicts} conflicts, {} among fixed times)",
            result.fixed_conflicts
        )?,
        None => writeln!(out, "No complete schedule found ({})", result.termination)?,
    }
    if result.is_truncated() {
        writeln!(out, "Search stopped early: {}", result.termination)?;
    }
    if result.has_too_many_options() {
        writeln!(out, "Too many options? Lock sections to narrow them down.")?;
    }

    for chosen in chosen_sections(classes) {
        let lock = if chosen.locked { " (locked)" } else { "" };
        writeln!(
            out,
            "{} {}: {}{}",
            chosen.class,
            chosen.kind.short_name(),
            chosen.label,
            lock
        )?;
        for timeslot in chosen.timeslots {
            writeln!(out, "    {timeslot}")?;
        }
    }
    for activity in activities {
        writeln!(out, "{}", activity.name)?;
        for timeslot in &activity.timeslots {
            writeln!(out, "    {timeslot}")?;
        }
    }
    Ok(())
}
