//! BedWars engine CLI
//!
//! Development harness around `bw_core`: replays captured chat logs through
//! the event pipeline, computes team rankings from a JSON stats snapshot,
//! and validates custom rank equations. It stands in for the real
//! transport and stats collaborators.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures_util::future::BoxFuture;
use serde::Deserialize;

use bw_core::{
    DisplayMode, FetchError, MatchSession, NormalizedStats, RankEquation, RankOptions,
    RawPlayerStats, SigmoidOverrides, StatsReply, StatsSource, TeamColor, ThreatScorer,
};

#[derive(Parser)]
#[command(name = "bw")]
#[command(about = "BedWars match event extraction and team ranking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DisplayModeArg {
    Total,
    Avg,
}

impl From<DisplayModeArg> for DisplayMode {
    fn from(mode: DisplayModeArg) -> Self {
        match mode {
            DisplayModeArg::Total => DisplayMode::Total,
            DisplayModeArg::Avg => DisplayMode::Avg,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a captured chat log through the event pipeline
    Replay {
        /// Chat log, one pre-stripped line per row; the roster is taken
        /// from the first line starting with "ONLINE: "
        #[arg(long)]
        log: PathBuf,

        /// Directory for per-match log files (disabled when absent)
        #[arg(long)]
        match_logs: Option<PathBuf>,

        /// Print every detected event as it is classified
        #[arg(long, default_value = "false")]
        events: bool,
    },

    /// Rank teams from a JSON stats snapshot
    Rank {
        /// Snapshot file: { "<name>": { "team": "R", "nicked": false, ...stats } }
        #[arg(long)]
        players: PathBuf,

        /// Your own team letter (R/B/G/Y/A/W/P/S)
        #[arg(long)]
        local_team: Option<char>,

        /// Total or per-player-average stats in entries
        #[arg(long, value_enum, default_value = "total")]
        display_mode: DisplayModeArg,

        /// Maximum enemy teams to display
        #[arg(long, default_value = "4")]
        max_teams: usize,

        /// Leave your own team out of the output
        #[arg(long, default_value = "false")]
        hide_local_team: bool,

        /// Skip the neighboring-team (first rush) stat lines
        #[arg(long, default_value = "false")]
        no_first_rushes: bool,

        /// Custom rank equation (default weighted formula when absent)
        #[arg(long)]
        equation: Option<String>,

        /// Sigmoid override store (JSON)
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Validate a custom rank equation
    CheckEquation {
        /// The equation text, e.g. "0.5 * fkdr + 0.5 * ws"
        equation: String,
    },
}

/// Stats source backed by a snapshot file, one record per player.
#[derive(Debug, Deserialize)]
struct PlayerRecord {
    team: char,
    #[serde(default)]
    nicked: bool,
    #[serde(flatten)]
    stats: RawPlayerStats,
}

struct SnapshotSource {
    players: HashMap<String, PlayerRecord>,
}

impl StatsSource for SnapshotSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<StatsReply, FetchError>> {
        let reply = match self.players.get(name) {
            Some(record) if record.nicked => Ok(StatsReply::Nicked),
            Some(record) => Ok(StatsReply::Stats(record.stats)),
            None => Err(FetchError::Unavailable {
                name: name.to_string(),
                reason: "not in snapshot".to_string(),
            }),
        };
        Box::pin(async move { reply })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay {
            log,
            match_logs,
            events,
        } => replay(log, match_logs, events),
        Commands::Rank {
            players,
            local_team,
            display_mode,
            max_teams,
            hide_local_team,
            no_first_rushes,
            equation,
            overrides,
        } => rank(
            players,
            local_team,
            display_mode.into(),
            max_teams,
            hide_local_team,
            no_first_rushes,
            equation,
            overrides,
        ),
        Commands::CheckEquation { equation } => check_equation(&equation),
    }
}

fn replay(log: PathBuf, match_logs: Option<PathBuf>, print_events: bool) -> Result<()> {
    let text = fs::read_to_string(&log)
        .with_context(|| format!("reading chat log {}", log.display()))?;

    let mut session = MatchSession::new(ThreatScorer::default(), RankOptions::default());
    if let Some(dir) = match_logs {
        session = session.with_match_logs(dir);
    }

    let mut lines = 0usize;
    let mut detected = 0usize;
    for line in text.lines() {
        if let Some(roster) = line.strip_prefix("ONLINE: ") {
            session.on_roster(roster.split(", ").map(str::trim));
            continue;
        }
        let event = session.on_chat_line(line);
        lines += 1;
        if event.is_known() {
            detected += 1;
            if print_events {
                println!("{event:?}");
            }
        }
    }
    session.on_match_end();

    println!("{lines} lines, {detected} events detected");
    for (name, stats) in session.final_stats() {
        if !stats.is_empty() {
            println!(
                "{name}: Beds={}, FK={}, K={}, D={}",
                stats.beds_broken, stats.final_kills, stats.kills, stats.deaths
            );
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn rank(
    players: PathBuf,
    local_team: Option<char>,
    display_mode: DisplayMode,
    max_teams: usize,
    hide_local_team: bool,
    no_first_rushes: bool,
    equation: Option<String>,
    overrides: Option<PathBuf>,
) -> Result<()> {
    let text = fs::read_to_string(&players)
        .with_context(|| format!("reading snapshot {}", players.display()))?;
    let records: HashMap<String, PlayerRecord> =
        serde_json::from_str(&text).context("parsing player snapshot")?;

    let local_team = match local_team {
        Some(letter) => Some(
            TeamColor::from_letter(letter)
                .with_context(|| format!("unknown team letter '{letter}'"))?,
        ),
        None => None,
    };

    let mut teams = HashMap::new();
    for (name, record) in &records {
        let team = TeamColor::from_letter(record.team)
            .with_context(|| format!("unknown team letter '{}' for {name}", record.team))?;
        teams.insert(name.clone(), team);
    }

    let sigmoid = match &overrides {
        Some(path) => SigmoidOverrides::load(path),
        None => SigmoidOverrides::empty(),
    };
    let equation = equation.and_then(RankEquation::new);
    let scorer = ThreatScorer::new(&sigmoid, equation);

    let options = RankOptions {
        display_mode,
        max_teams,
        show_local_team: !hide_local_team,
        first_rushes: !no_first_rushes,
    };
    let mut session = MatchSession::new(scorer, options);
    session.on_roster(records.keys().cloned());

    let source = SnapshotSource { players: records };
    let runtime = tokio::runtime::Runtime::new()?;
    let messages = runtime.block_on(session.rank_teams(&source, &teams, local_team));

    if messages.is_empty() {
        bail!("no ranking produced (no enemy team in snapshot?)");
    }
    for message in messages {
        println!("{message}");
    }
    Ok(())
}

fn check_equation(text: &str) -> Result<()> {
    let Some(equation) = RankEquation::new(text) else {
        println!("empty equation: the default weighted formula will be used");
        return Ok(());
    };

    // Probe with mid-curve values; any structural problem surfaces here.
    match equation.evaluate(&NormalizedStats::uniform(0.5)) {
        Ok(value) => {
            println!("ok: score {:.2} with all variables at 0.5", value * 100.0);
            Ok(())
        }
        Err(err) => bail!("invalid equation: {err}"),
    }
}
