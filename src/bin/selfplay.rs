use std::io::Write;

use clap::Parser;
use log::{error, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use tablut::{find_move, AiConfig, Board, Side};

/// Engine-vs-engine games from the initial position, optionally opened with
/// a few random plies so that games differ.
#[derive(Parser, Debug)]
#[command(author, version, about = "Tablut selfplay harness (engine vs engine)")]
struct Cli {
    /// Number of games to run
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Maximum plies per game before it is abandoned
    #[arg(long, default_value_t = 200)]
    max_moves: usize,

    /// Plies played at random before the engine takes over
    #[arg(long, default_value_t = 0)]
    random_plies: usize,

    /// Seed for the random opening plies
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Cap on the search depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Print a JSON summary instead of one line per game
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct GameRecord {
    game: u32,
    winner: Option<Side>,
    repeated: bool,
    moves: Vec<String>,
}

#[derive(Serialize, Default)]
struct Summary {
    games: u32,
    white_wins: u32,
    black_wins: u32,
    unfinished: u32,
    records: Vec<GameRecord>,
}

fn play_game(game: u32, cli: &Cli, config: &AiConfig, rng: &mut StdRng) -> tablut::Result<GameRecord> {
    let mut board = Board::new();
    let mut moves = Vec::new();

    while !board.is_game_over() && board.move_count() < cli.max_moves {
        let mv = if board.move_count() < cli.random_plies {
            let legal = board.legal_moves(board.turn());
            match legal.choose(rng) {
                Some(&mv) => mv,
                None => break,
            }
        } else {
            find_move(&board, config)?.mv
        };
        board.make_move(mv)?;
        moves.push(mv.to_string());
    }

    Ok(GameRecord {
        game,
        winner: board.winner(),
        repeated: board.repeated_position(),
        moves,
    })
}

fn run(cli: &Cli) -> tablut::Result<()> {
    let config = AiConfig {
        max_depth: cli.max_depth,
        ..AiConfig::new()
    };
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let mut summary = Summary::default();

    for game in 1..=cli.games {
        let record = play_game(game, cli, &config, &mut rng)?;
        summary.games += 1;
        match record.winner {
            Some(Side::White) => summary.white_wins += 1,
            Some(Side::Black) => summary.black_wins += 1,
            None => summary.unfinished += 1,
        }
        let outcome = match record.winner {
            Some(side) if record.repeated => format!("{side} wins by repetition"),
            Some(side) => format!("{side} wins"),
            None => "unfinished".to_string(),
        };
        info!("game {game}: {outcome} after {} moves", record.moves.len());
        if !cli.json {
            println!("game {game}: {outcome} after {} moves: {}", record.moves.len(), record.moves.join(" "));
            std::io::stdout().flush().ok();
        }
        summary.records.push(record);
    }

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => error!("cannot encode summary: {e}"),
        }
    } else {
        println!(
            "White {} - Black {} ({} unfinished, {} games)",
            summary.white_wins, summary.black_wins, summary.unfinished, summary.games
        );
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(&cli) {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
