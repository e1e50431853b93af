use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sweepduel_core::*;
use sweepduel_protocol::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Host a game: read a map, then answer move lines on stdin with boards
    Serve,
    /// Play the solver side over stdin/stdout
    Client,
    /// Run the solver against a map and report the result
    Play(PlayArgs),
    /// Print a random map
    Generate(GenerateArgs),
}

#[derive(ClapArgs, Debug)]
struct PlayArgs {
    /// Map file, stdin when omitted
    map: Option<PathBuf>,

    /// Cell visited before the solver takes over
    #[arg(long, value_name = "ROW,COL", value_parser = parse_coords)]
    first: Option<Coord2>,

    /// Print every board the solver sees
    #[arg(long)]
    trace: bool,

    /// Print the game report as JSON
    #[arg(long)]
    json: bool,

    /// Give up after this many turns
    #[arg(long)]
    max_turns: Option<usize>,
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    #[arg(long, default_value_t = 9)]
    rows: Coord,

    #[arg(long, default_value_t = 9)]
    columns: Coord,

    #[arg(long, default_value_t = 10)]
    mines: CellCount,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Keep this cell free of mines
    #[arg(long, value_name = "ROW,COL", value_parser = parse_coords)]
    safe: Option<Coord2>,

    /// Also keep the neighbors of the safe cell free of mines
    #[arg(long, requires = "safe")]
    zero: bool,
}

fn parse_coords(text: &str) -> std::result::Result<Coord2, String> {
    let (row, column) = text
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got `{text}`"))?;
    let row = row.trim().parse().map_err(|err| format!("bad row: {err}"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|err| format!("bad column: {err}"))?;
    Ok((row, column))
}

fn serve() -> Result<()> {
    let mut reader = LineReader::new(io::stdin().lock());
    let summary = run_host(&mut reader, &mut io::stdout().lock()).context("hosting game")?;
    log::info!("game ended: {:?}", summary.state);
    Ok(())
}

fn client() -> Result<()> {
    let mut reader = LineReader::new(io::stdin().lock());
    let moves = run_client(&mut reader, &mut io::stdout().lock(), &mut InferenceSolver)
        .context("playing client")?;
    log::info!("sent {moves} moves");
    Ok(())
}

fn read_map_input(path: Option<&PathBuf>) -> Result<MineLayout> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading map {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading map from stdin")?;
            text
        }
    };
    parse_map(&text).context("parsing map")
}

fn play(args: PlayArgs) -> Result<()> {
    let layout = read_map_input(args.map.as_ref())?;
    if let Some(first) = args.first {
        layout
            .validate_coords(first)
            .with_context(|| format!("opening cell {first:?}"))?;
    }

    let config = RefereeConfig {
        opening: args.first,
        max_turns: args.max_turns,
        keep_transcript: args.trace || args.json,
    };
    let report = Referee::new(layout, InferenceSolver, config).run()?;
    log::info!(
        "{:?} after {} turns ({:?})",
        report.finish,
        report.turns,
        report.tiers
    );

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report).context("writing report")?;
        writeln!(out)?;
        return Ok(());
    }

    if args.trace {
        for turn in &report.transcript {
            write!(out, "{}", turn.board)?;
            writeln!(out, "> {}", turn.command)?;
        }
    }
    write!(out, "{}", report.final_board)?;
    write!(out, "{}", SummaryLines(report.summary))?;
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    if args.rows == 0 || args.columns == 0 {
        bail!("board must have at least one row and one column");
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let start_tile = match (args.safe, args.zero) {
        (None, _) => StartTile::Random,
        (Some(_), false) => StartTile::SimpleSafe,
        (Some(_), true) => StartTile::AlwaysZero,
    };
    let start = args.safe.unwrap_or_default();
    let config = GameConfig::new((args.rows, args.columns), args.mines);
    if config.mines < args.mines {
        log::warn!("only {} mines fit on the board", config.mines);
    }

    let layout = RandomLayoutGenerator::new(seed, start, start_tile).generate(config);
    io::stdout()
        .lock()
        .write_all(render_map(&layout).as_bytes())
        .context("writing map")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(args.verbose.tracing_level_filter())
        .init();
    log::debug!("{args:?}");

    match args.command {
        Mode::Serve => serve(),
        Mode::Client => client(),
        Mode::Play(args) => play(args),
        Mode::Generate(args) => generate(args),
    }
}
