//! zone2 CLI - offline driver for the zone engine
//!
//! Commands:
//! - replay: Drive a session from recorded samples and emit snapshots
//! - zones: Print the Zone 2 range computed for an age

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use zone2_core::{UserSettings, ZoneSession, ENGINE_VERSION};

/// zone2 - heart-rate zone engine driver
#[derive(Parser)]
#[command(name = "zone2")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Replay heart-rate samples through the zone engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a session from recorded samples and emit snapshots (NDJSON)
    Replay {
        /// Input file of NDJSON samples `{"bpm":117,"timestamp":"..."}`
        /// (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Age for the estimated zone range
        #[arg(long, default_value = "40")]
        age: u16,

        /// Custom lower bound (bpm); requires --high
        #[arg(long, requires = "high")]
        low: Option<u16>,

        /// Custom upper bound (bpm); requires --low
        #[arg(long, requires = "low")]
        high: Option<u16>,

        /// Tick interval in seconds
        #[arg(long, default_value = "1")]
        tick_secs: i64,
    },

    /// Print the Zone 2 range computed for an age
    Zones {
        /// Age in years
        #[arg(long)]
        age: u16,
    },
}

/// One recorded sample line
#[derive(Debug, Deserialize)]
struct SampleRecord {
    bpm: u16,
    timestamp: DateTime<Utc>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            input,
            age,
            low,
            high,
            tick_secs,
        } => {
            let settings = match (low, high) {
                (Some(low), Some(high)) => UserSettings::with_custom_range(low, high),
                _ => UserSettings::from_age(age),
            };
            cmd_replay(&input, settings, tick_secs)
        }
        Commands::Zones { age } => cmd_zones(age),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_lines(input: &PathBuf) -> io::Result<Vec<String>> {
    if input.as_os_str() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("reading samples from stdin (one JSON object per line, ^D to end)");
        }
        io::stdin().lock().lines().collect()
    } else {
        Ok(fs::read_to_string(input)?
            .lines()
            .map(|l| l.to_string())
            .collect())
    }
}

fn cmd_replay(
    input: &PathBuf,
    settings: UserSettings,
    tick_secs: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ZoneSession::new(settings);
    let tick_interval = Duration::seconds(tick_secs.max(1));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut next_tick: Option<DateTime<Utc>> = None;

    for (lineno, line) in read_lines(input)?.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: SampleRecord = serde_json::from_str(line)
            .map_err(|e| format!("line {}: {e}", lineno + 1))?;

        // Ticks are derived from sample time, so a recorded session replays
        // with the same staleness behavior it had live
        let mut tick_at = *next_tick.get_or_insert(record.timestamp);
        while tick_at <= record.timestamp {
            let snapshot = session.tick(tick_at)?;
            serde_json::to_writer(&mut out, &snapshot)?;
            out.write_all(b"\n")?;
            tick_at = tick_at + tick_interval;
        }
        next_tick = Some(tick_at);

        session.on_sample(record.bpm, record.timestamp, record.timestamp)?;
    }

    // Close out the final partial tick so the last samples are visible
    if let Some(tick_at) = next_tick {
        let snapshot = session.tick(tick_at)?;
        serde_json::to_writer(&mut out, &snapshot)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}

fn cmd_zones(age: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserSettings::from_age(age).effective_config();
    println!(
        "age {age}: max HR {}, Zone 2 {}-{} bpm",
        220u16.saturating_sub(age),
        config.low,
        config.high
    );
    Ok(())
}
