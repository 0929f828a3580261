use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use log::{error, info};

use tablut::player::{MoveSource, Player};
use tablut::{AiConfig, Board, Move, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Manual,
    Auto,
}

/// Play Tablut on the terminal. Manual sides type moves such as `a4-a3`;
/// other commands: new, undo, dump, encoded, auto <side>, manual <side>, quit.
#[derive(Parser, Debug)]
#[command(author, version, about = "Tablut text shell")]
struct Cli {
    /// Who plays White
    #[arg(long, value_enum, default_value_t = Mode::Auto)]
    white: Mode,

    /// Who plays Black
    #[arg(long, value_enum, default_value_t = Mode::Manual)]
    black: Mode,

    /// Cap on the automatic players' search depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Reads one line per request from stdin after printing a prompt.
struct StdinSource;

impl MoveSource for StdinSource {
    fn next_command(&mut self, side: Side, _board: &Board) -> Option<String> {
        read_command(&format!("{side}> "))
    }
}

fn read_command(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn make_player(side: Side, mode: Mode, config: &AiConfig) -> Player {
    match mode {
        Mode::Manual => Player::manual(side, StdinSource),
        Mode::Auto => Player::automatic(side, config.clone()),
    }
}

struct Shell {
    board: Board,
    white: Player,
    black: Player,
    config: AiConfig,
    announced: bool,
}

impl Shell {
    fn player(&mut self, side: Side) -> &mut Player {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }

    /// Run until `quit` or end of input.
    fn run(&mut self) {
        loop {
            if let Some(winner) = self.board.winner() {
                if !self.announced {
                    println!("{winner} wins.");
                    self.announced = true;
                }
            }

            let side = self.board.turn();
            let (command, automatic) = if self.board.is_game_over() {
                (read_command("> "), false)
            } else {
                let Shell { board, white, black, .. } = self;
                let player = match side {
                    Side::White => white,
                    Side::Black => black,
                };
                let automatic = !player.is_manual();
                match player.my_move(board) {
                    Ok(command) => (command, automatic),
                    Err(e) => {
                        error!("{side} cannot move: {e}");
                        return;
                    }
                }
            };

            let Some(command) = command else {
                return;
            };
            if !self.execute(&command, automatic) {
                return;
            }
        }
    }

    /// Apply one command. Returns false when the shell should stop.
    fn execute(&mut self, command: &str, automatic: bool) -> bool {
        let words: Vec<&str> = command.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit"] => return false,
            ["new"] => {
                self.board = Board::new();
                self.announced = false;
            }
            ["undo"] => {
                if let Err(e) = self.board.undo() {
                    eprintln!("error: {e}");
                }
                self.announced = false;
            }
            ["dump"] => print!("===\n{}===\n", self.board),
            ["encoded"] => println!("{}", self.board.encoded_board()),
            [mode @ ("auto" | "manual"), name] => match Side::from_name(name) {
                Some(side) => {
                    let mode = if *mode == "auto" { Mode::Auto } else { Mode::Manual };
                    let player = make_player(side, mode, &self.config);
                    *self.player(side) = player;
                }
                None => eprintln!("error: unknown side {name:?}"),
            },
            [text] => match text.parse::<Move>().and_then(|m| self.board.make_move(m).map(|()| m)) {
                Ok(m) if automatic => println!("* {m}"),
                Ok(_) => {}
                Err(e) => eprintln!("error: {e}"),
            },
            _ => eprintln!("error: unknown command {command:?}"),
        }
        true
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);
    info!("tablut shell (built {})", env!("BUILD_TIMESTAMP"));

    let config = AiConfig {
        max_depth: cli.max_depth,
        ..AiConfig::new()
    };
    let mut shell = Shell {
        board: Board::new(),
        white: make_player(Side::White, cli.white, &config),
        black: make_player(Side::Black, cli.black, &config),
        config,
        announced: false,
    };
    shell.run();
}
