use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minimax_chess::config::{validate_depth, Cli, Command, GameConfig, PlayArgs, UciArgs};
use minimax_chess::game::{choose_mode, Game};
use minimax_chess::uci::UciHandler;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match Cli::parse().into_command() {
        Command::Play(args) => play(args),
        Command::Uci(args) => uci(args),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let mode = match args.mode {
        Some(mode) => mode,
        None => match choose_mode(&mut input, &mut output)? {
            Some(mode) => mode,
            None => return Ok(()),
        },
    };

    let config = GameConfig::new(mode, &args).context("invalid game settings")?;
    let outcome = Game::new(config, input, output).run()?;
    info!(?outcome, "exiting");
    Ok(())
}

fn uci(args: UciArgs) -> Result<()> {
    let depth = validate_depth(args.depth).context("invalid UCI settings")?;
    let stdin = io::stdin();
    UciHandler::new(depth).run(stdin.lock(), io::stdout())
}
