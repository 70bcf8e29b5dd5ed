use std::fmt;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::board::{Board, Color};
use crate::error::ConfigError;
use crate::game::Player;

pub const DEFAULT_DEPTH: u32 = 3;
pub const MAX_DEPTH: u32 = 6;

#[derive(Debug, Parser)]
#[command(name = "minimax-chess", version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub play: PlayArgs,
}

impl Cli {
    // Top-level flags mean `play`.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Play(self.play))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play a game in the terminal (the default)
    Play(PlayArgs),
    /// Speak the Universal Chess Interface on stdin/stdout
    Uci(UciArgs),
}

#[derive(Debug, Clone, Args)]
pub struct PlayArgs {
    /// Who plays whom; without it a menu is shown
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Search depth in plies for minimax players
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// The side the human plays in hvr and hvm
    #[arg(long, value_enum, default_value_t = Side::White)]
    pub human: Side,

    /// Seed for the random player
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start from this position instead of the initial one
    #[arg(long)]
    pub fen: Option<String>,

    /// Draw the board without ANSI colours
    #[arg(long)]
    pub no_color: bool,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            mode: None,
            depth: DEFAULT_DEPTH,
            human: Side::White,
            seed: None,
            fen: None,
            no_color: false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct UciArgs {
    /// Depth used by `go` when it names none
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Human vs human
    Hvh,
    /// Human vs random mover
    Hvr,
    /// Human vs minimax
    Hvm,
    /// Minimax (White) vs random mover (Black)
    Mvr,
    /// Minimax vs minimax
    Mvm,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Hvh => "hvh",
            Mode::Hvr => "hvr",
            Mode::Hvm => "hvm",
            Mode::Mvr => "mvr",
            Mode::Mvm => "mvm",
        }
    }

    pub fn players(self, human: Color, depth: u32) -> (Player, Player) {
        let minimax = Player::Minimax { depth };
        let against_human = |computer: Player| match human {
            Color::White => (Player::Human, computer),
            Color::Black => (computer, Player::Human),
        };
        match self {
            Mode::Hvh => (Player::Human, Player::Human),
            Mode::Hvr => against_human(Player::Random),
            Mode::Hvm => against_human(minimax),
            Mode::Mvr => (minimax, Player::Random),
            Mode::Mvm => (minimax, minimax),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Color {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub mode: Mode,
    pub white: Player,
    pub black: Player,
    pub board: Board,
    pub seed: Option<u64>,
    pub colored: bool,
}

impl GameConfig {
    pub fn new(mode: Mode, args: &PlayArgs) -> Result<Self, ConfigError> {
        let depth = validate_depth(args.depth)?;
        let board = match &args.fen {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::new(),
        };
        let (white, black) = mode.players(args.human.into(), depth);
        Ok(Self {
            mode,
            white,
            black,
            board,
            seed: args.seed,
            colored: !args.no_color,
        })
    }
}

pub fn validate_depth(depth: u32) -> Result<u32, ConfigError> {
    if (1..=MAX_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(ConfigError::Depth { depth, max: MAX_DEPTH })
    }
}
