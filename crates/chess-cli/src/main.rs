//! Command-line front end for the mailbox chess engine.
//!
//! Runs perft counts against the move generator and plays UCI move
//! sequences from a position, printing the resulting board.

mod config;

use anyhow::{bail, Context};
use chess_engine::{perft, perft_divide, ChessBoardIndex, GameResult};
use clap::{Args, Parser, Subcommand};
use config::CliConfig;
use serde::Serialize;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Mailbox chess engine: perft and move playback")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes at a given depth
    Perft(PerftArgs),
    /// Perft split by root move
    Divide(PerftArgs),
    /// Apply UCI moves and print the resulting position
    Play(PlayArgs),
}

/// Where the game starts.
#[derive(Args)]
struct PositionArgs {
    /// Starting position as FEN
    #[arg(long, conflicts_with = "position")]
    fen: Option<String>,

    /// Named position from chess.toml ("startpos" is always available)
    #[arg(long)]
    position: Option<String>,
}

#[derive(Args)]
struct PerftArgs {
    #[command(flatten)]
    start: PositionArgs,

    /// Search depth (defaults to `default_depth` from chess.toml)
    #[arg(long, short)]
    depth: Option<u32>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PlayArgs {
    #[command(flatten)]
    start: PositionArgs,

    /// Take back this many moves after playing
    #[arg(long, default_value = "0")]
    undo: usize,

    /// Moves in UCI notation, e.g. e2e4 e7e5 g1f3
    moves: Vec<String>,
}

#[derive(Serialize)]
struct PerftReport<'a> {
    fen: &'a str,
    depth: u32,
    nodes: u64,
    elapsed_ms: u128,
}

#[derive(Serialize)]
struct DivideEntry {
    #[serde(rename = "move")]
    mv: String,
    nodes: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load().context("loading chess.toml")?;

    match cli.command {
        Command::Perft(args) => run_perft(&config, args),
        Command::Divide(args) => run_divide(&config, args),
        Command::Play(args) => run_play(&config, args),
    }
}

fn starting_index(config: &CliConfig, start: &PositionArgs) -> anyhow::Result<ChessBoardIndex> {
    let fen = match (&start.fen, &start.position) {
        (Some(fen), _) => fen.as_str(),
        (None, Some(name)) => config.position(name)?,
        (None, None) => config.position("startpos")?,
    };
    ChessBoardIndex::from_fen(fen).with_context(|| format!("loading position {fen:?}"))
}

fn run_perft(config: &CliConfig, args: PerftArgs) -> anyhow::Result<()> {
    let mut index = starting_index(config, &args.start)?;
    let depth = args.depth.unwrap_or(config.default_depth);
    let fen = index.to_fen();

    tracing::info!("Running perft to depth {} on {}", depth, fen);
    let started = Instant::now();
    let nodes = perft(&mut index, depth);
    let elapsed = started.elapsed();

    if args.json {
        let report = PerftReport {
            fen: &fen,
            depth,
            nodes,
            elapsed_ms: elapsed.as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Nodes: {}", nodes);
        println!("Time:  {:.3}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn run_divide(config: &CliConfig, args: PerftArgs) -> anyhow::Result<()> {
    let mut index = starting_index(config, &args.start)?;
    let depth = args.depth.unwrap_or(config.default_depth).max(1);

    let results = perft_divide(&mut index, depth);
    let total: u64 = results.iter().map(|(_, nodes)| nodes).sum();

    if args.json {
        let entries: Vec<DivideEntry> = results
            .into_iter()
            .map(|(mv, nodes)| DivideEntry { mv, nodes })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (mv, nodes) in &results {
            println!("{}: {}", mv, nodes);
        }
        println!();
        println!("Moves: {}", results.len());
        println!("Nodes: {}", total);
    }
    Ok(())
}

fn run_play(config: &CliConfig, args: PlayArgs) -> anyhow::Result<()> {
    let mut index = starting_index(config, &args.start)?;
    let promotion = config.promotion_piece()?;
    let mut result: Option<GameResult> = index.check_game_ended();

    for uci in &args.moves {
        if let Some(finished) = result {
            bail!("game is already over ({}), cannot play {}", finished, uci);
        }
        let Some(m) = index.find_move_uci(uci) else {
            bail!("illegal move {} in {}", uci, index.to_fen());
        };

        // A bare promotion ("a7a8") waits for the configured piece.
        let bare_promotion = m.is_promotion() && uci.len() == 4;
        result = index.make_move(m, bare_promotion)?;
        if bare_promotion {
            result = index.resolve_promotion(promotion)?;
        }
    }

    for _ in 0..args.undo {
        match index.unmake_last_move(true) {
            Some(m) => tracing::info!("Took back {}", m.to_uci()),
            None => {
                tracing::warn!("No more moves to take back");
                break;
            }
        }
    }
    if args.undo > 0 {
        result = index.check_game_ended();
    }

    println!("{}", index.board());
    println!();
    println!("FEN:   {}", index.to_fen());
    println!("Moves: {}", index.legal_moves().len());
    if index.is_check() {
        println!("{} is in check", index.side_to_move());
    }
    if let Some(result) = result {
        println!("Result: {}", result);
    }
    Ok(())
}
