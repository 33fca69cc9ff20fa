// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for single matches, batches and state dumps
// ═══════════════════════════════════════════════════════════════════════

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::prelude::*;

use isles_engine::types::PlayerId;
use isles_engine::{player_view, summary, Game, GameConfig, GameView};
use isles_sim::{make_agents, run_batch, run_match, AgentKind, SimConfig};

#[derive(Parser)]
#[command(name = "isles-runner", about = "Island territory game: headless matches and batches")]
struct Cli {
    /// JSON simulation config; flags given on the command line win.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides shared by every subcommand.
#[derive(Args)]
struct TableArgs {
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long)]
    players: Option<usize>,
    /// Enable the optional ruleset (coins and helpers).
    #[arg(long)]
    expert: Option<bool>,
    /// Agent type: "random", "heuristic" or "mixed"
    #[arg(short, long)]
    agent: Option<AgentKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one match and print the result
    Play {
        #[command(flatten)]
        table: TableArgs,
        #[arg(long)]
        disconnect_rate: Option<f64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run many matches in parallel and print a summary
    Batch {
        #[command(flatten)]
        table: TableArgs,
        #[arg(short, long)]
        matches: Option<u64>,
        #[arg(long)]
        disconnect_rate: Option<f64>,
        /// Check conservation after every decision
        #[arg(long)]
        audit: bool,
        #[arg(long)]
        json: bool,
    },
    /// Dump the public state as JSON, optionally after some decisions
    Inspect {
        #[command(flatten)]
        table: TableArgs,
        /// Decisions to play before dumping
        #[arg(short, long, default_value_t = 0)]
        decisions: usize,
        /// Dump this seat's view (own hand included) instead of the table
        #[arg(long)]
        viewer: Option<u32>,
    },
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let base = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    info!(config = ?cli.config, "configuration loaded");

    match cli.command {
        Commands::Play { table, disconnect_rate, json } => {
            let mut config = apply_table(base, &table);
            if let Some(rate) = disconnect_rate {
                config.disconnect_rate = rate;
            }
            config.validate()?;
            cmd_play(&config, json)
        }
        Commands::Batch { table, matches, disconnect_rate, audit, json } => {
            let mut config = apply_table(base, &table);
            if let Some(m) = matches {
                config.matches = m;
            }
            if let Some(rate) = disconnect_rate {
                config.disconnect_rate = rate;
            }
            config.audit |= audit;
            config.validate()?;
            cmd_batch(&config, json)
        }
        Commands::Inspect { table, decisions, viewer } => {
            let config = apply_table(base, &table);
            config.validate()?;
            cmd_inspect(&config, decisions, viewer.map(PlayerId))
        }
    }
}

fn apply_table(mut config: SimConfig, table: &TableArgs) -> SimConfig {
    if let Some(seed) = table.seed {
        config.seed = seed;
    }
    if let Some(players) = table.players {
        config.players = players;
    }
    if let Some(expert) = table.expert {
        config.expert = expert;
    }
    if let Some(agent) = table.agent {
        config.agent = agent;
    }
    config
}

fn cmd_play(config: &SimConfig, json: bool) -> Result<()> {
    let mut agents = make_agents(config.agent, config.players, config.seed);
    let result = run_match(&mut agents, config.seed, config)
        .with_context(|| format!("match with seed {}", config.seed))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    println!("=== Islands: seed={}, players={}, agent={} ===\n", config.seed, config.players, config.agent);
    println!("  Winner:      {}", result.winner);
    println!("  Turns:       {}", result.turns);
    println!("  Decisions:   {} ({} rejected, {} turns skipped)", result.decisions, result.rejected, result.skipped_turns);
    println!("  Disconnects: {}", result.disconnects);
    println!();
    println!("  Final standings:");
    for p in &result.players {
        println!(
            "    {:4} {:10} -- rooks placed: {}, islands: {}, professors: {}, coins: {}",
            p.id.to_string(),
            p.agent_name,
            p.rooks_placed,
            p.islands_owned,
            p.professors,
            p.coins,
        );
    }
    Ok(())
}

fn cmd_batch(config: &SimConfig, json: bool) -> Result<()> {
    let summary = run_batch(config);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!(
        "=== Batch: {} matches, {} players, agent={} ===\n",
        config.matches, config.players, config.agent
    );
    println!("--- Summary ({} finished, {} errors) ---", summary.finished, summary.errors);
    for (i, seat) in summary.seats.iter().enumerate() {
        println!(
            "  {:4} {:10}: {:>5} wins ({:.1}%)",
            seat.id.to_string(),
            seat.agent_name,
            seat.wins,
            summary.win_rate(i) * 100.0
        );
    }
    println!("\n  Average turns: {:.2}", summary.average_turns());
    println!("  Rejected decisions: {}, skipped turns: {}, disconnects: {}",
        summary.rejected, summary.skipped_turns, summary.disconnects);
    Ok(())
}

fn cmd_inspect(config: &SimConfig, decisions: usize, viewer: Option<PlayerId>) -> Result<()> {
    let mut agents = make_agents(config.agent, config.players, config.seed);
    let ids = agents.iter().map(|a| a.id()).collect();
    let mut game = Game::new(GameConfig::new(ids, config.expert), config.seed)?;

    for _ in 0..decisions {
        let Some(current) = GameView::new(&game).current_player() else {
            break;
        };
        let Some(agent) = agents.iter_mut().find(|a| a.id() == current) else {
            break;
        };
        let action = agent.decide(&player_view(&game, current));
        if game.apply_action(current, &action).is_err() {
            game.skip_turn()?;
        }
    }

    let out = match viewer {
        Some(id) => serde_json::to_string_pretty(&player_view(&game, id))?,
        None => serde_json::to_string_pretty(&summary(&game))?,
    };
    println!("{}", out);
    Ok(())
}
