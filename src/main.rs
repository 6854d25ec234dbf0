use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four::ai::Difficulty;
use connect_four::arena::{play_game, MatchStats};
use connect_four::config::AppConfig;
use connect_four::game::{GameOutcome, Player, COLS};
use connect_four::session::{ComputerWorker, GameSession, ReplyOutcome};
use connect_four::Engine;

/// Play Connect Four against the computer, or pit two tiers against each other.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four with a minimax opponent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive game on stdin: enter a column 1-7, 'r' to restart, 'q' to quit
    Play {
        /// Override the configured difficulty
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Side the computer plays: red, yellow, or none for two humans
        #[arg(long)]
        computer: Option<String>,

        /// Override the search depth of the hard tier
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Computer-vs-computer series
    Match {
        #[arg(long, default_value = "hard")]
        red: Difficulty,

        #[arg(long, default_value = "medium")]
        yellow: Difficulty,

        #[arg(long, default_value_t = 10)]
        games: usize,

        /// Seed for reproducible random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Override the search depth of the hard tier
        #[arg(long)]
        depth: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        let toml = AppConfig::default_toml().context("serializing default config")?;
        print!("{toml}");
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Play {
        difficulty: None,
        computer: None,
        depth: None,
    }) {
        Command::Play {
            difficulty,
            computer,
            depth,
        } => {
            if let Some(difficulty) = difficulty {
                config.session.difficulty = difficulty;
            }
            if let Some(computer) = computer {
                if computer.eq_ignore_ascii_case("none") {
                    config.session.vs_computer = false;
                } else {
                    config.session.vs_computer = true;
                    config.session.computer = computer
                        .parse::<Player>()
                        .map_err(anyhow::Error::msg)?;
                }
            }
            if let Some(depth) = depth {
                config.engine.max_depth = depth;
            }
            config.validate().context("validating overrides")?;
            run_play(&config)
        }
        Command::Match {
            red,
            yellow,
            games,
            seed,
            depth,
        } => {
            if let Some(depth) = depth {
                config.engine.max_depth = depth;
            }
            config.validate().context("validating overrides")?;
            run_match(&config, red, yellow, games, seed);
            Ok(())
        }
    }
}

fn run_match(
    config: &AppConfig,
    red: Difficulty,
    yellow: Difficulty,
    games: usize,
    seed: Option<u64>,
) {
    let mut engine = match seed {
        Some(seed) => Engine::with_seed(config.engine, seed),
        None => Engine::new(config.engine),
    };
    let mut stats = MatchStats::new();

    println!("Red ({red}) vs Yellow ({yellow}), {games} games");
    println!("-------------------------------------------");
    for game in 1..=games {
        let record = play_game(&mut engine, red, yellow);
        let result = match record.winner {
            Some(player) => format!("{player} wins"),
            None => "draw".to_string(),
        };
        println!("Game {game}/{games}: {result} in {} moves", record.game_length);
        stats.record(record);
    }
    println!("-------------------------------------------");
    println!(
        "Red: {} ({:.1}%) | Yellow: {} ({:.1}%) | Draws: {} | avg_len: {:.1}",
        stats.wins(Player::Red),
        stats.win_rate(Player::Red) * 100.0,
        stats.wins(Player::Yellow),
        stats.win_rate(Player::Yellow) * 100.0,
        stats.draws(),
        stats.average_game_length(),
    );
}

fn run_play(config: &AppConfig) -> Result<()> {
    let mut session = GameSession::new(&config.session);
    let worker = ComputerWorker::spawn(
        Engine::try_new(config.engine)?,
        config.session.computer_delay(),
        session.generation_handle(),
    );
    info!(
        difficulty = %session.difficulty(),
        computer = ?session.computer(),
        "starting session"
    );

    if let Some(request) = session.reset() {
        worker.submit(request);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_board(&session);

        if session.is_computer_turn() {
            println!("Computer is thinking...");
            let Some(reply) = worker.recv_timeout(Duration::from_secs(600)) else {
                anyhow::bail!("computer did not answer");
            };
            match session.apply_computer_reply(reply) {
                ReplyOutcome::Applied { column, .. } => {
                    println!("Computer plays column {}", column + 1);
                }
                ReplyOutcome::Stale => {
                    if let Some(request) = session.pending_request() {
                        worker.submit(request);
                    }
                }
            }
            continue;
        }

        if let GameOutcome::Winner(_) | GameOutcome::Draw = session.state().outcome() {
            println!("Game over! Enter 'r' to restart or 'q' to quit.");
        } else {
            println!(
                "{} to move. Column (1-{COLS}), 'r' restart, 'q' quit:",
                session.state().current_player()
            );
        }
        io::stdout().flush().context("flushing stdout")?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("reading stdin")?;
        match line.trim() {
            "q" | "Q" => return Ok(()),
            "r" | "R" => {
                if let Some(request) = session.reset() {
                    worker.submit(request);
                }
                println!("New game started!");
            }
            input => match input.parse::<usize>() {
                Ok(column) if (1..=COLS).contains(&column) => match session.play(column - 1) {
                    Ok(Some(request)) => {
                        worker.submit(request);
                    }
                    Ok(None) => {}
                    Err(err) => println!("{err}"),
                },
                _ => println!("Enter a column between 1 and {COLS}."),
            },
        }
    }
}

fn print_board(session: &GameSession) {
    println!();
    println!("{}", (1..=COLS).map(|c| c.to_string()).collect::<String>());
    println!("{}", session.state().board());
    match session.state().outcome() {
        GameOutcome::Winner(player) => println!("{player} wins!"),
        GameOutcome::Draw => println!("It's a draw!"),
        GameOutcome::InProgress => {}
    }
}
