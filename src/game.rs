use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::{Board, Color};
use crate::config::{GameConfig, Mode};
use crate::evaluation::Evaluator;
use crate::movegen::{GameState, Move};
use crate::random::pick_random;
use crate::render::render;
use crate::rules::Rules;
use crate::search::find_best_move;

const INVALID_MOVE: &str = "Invalid or illegal move! Use algebraic notation (e.g., e2e4, Nf3). Try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    Human,
    Random,
    Minimax { depth: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Finished(GameState),
    Abandoned,
}

pub fn choose_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<Mode>> {
    writeln!(output, "\n--- Chess Game Modes ---")?;
    writeln!(output, "1: Human vs Human")?;
    writeln!(output, "2: Human vs Computer (Random)")?;
    writeln!(output, "3: Human vs Computer (Minimax AI)")?;
    write!(output, "Choose mode (1/2/3): ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line).context("failed to read mode choice")?;
    let mode = match line.trim() {
        "1" => Some(Mode::Hvh),
        "2" => Some(Mode::Hvr),
        "3" => Some(Mode::Hvm),
        _ => None,
    };
    if mode.is_none() {
        writeln!(output, "Invalid choice. Exiting.")?;
    }
    Ok(mode)
}

pub struct Game<R, W> {
    board: Board,
    mode: Mode,
    white: Player,
    black: Player,
    evaluator: Evaluator,
    rng: StdRng,
    input: R,
    output: W,
    colored: bool,
}

impl<R: BufRead, W: Write> Game<R, W> {
    pub fn new(config: GameConfig, input: R, output: W) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            board: config.board,
            mode: config.mode,
            white: config.white,
            black: config.black,
            evaluator: Evaluator::new(),
            rng,
            input,
            output,
            colored: config.colored,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn player(&self, color: Color) -> Player {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    pub fn run(&mut self) -> Result<GameOutcome> {
        writeln!(self.output, "Starting Chess Game | Mode: {}", self.mode)?;
        info!(mode = %self.mode, fen = %self.board.to_fen(), "game started");

        let state = loop {
            let state = self.board.game_state();
            if state.is_over() {
                break state;
            }

            write!(self.output, "{}", render(&self.board, self.colored))?;
            let side = self.board.side_to_move;
            writeln!(self.output, "{side}'s move")?;

            let mv = match self.player(side) {
                Player::Human => match self.ask_human_move()? {
                    Some(mv) => mv,
                    None => {
                        info!(moves = self.board.move_stack().count(), "game abandoned");
                        return Ok(GameOutcome::Abandoned);
                    }
                },
                computer => {
                    writeln!(self.output, "Computer is thinking...")?;
                    let mv = self.computer_move(computer)?;
                    writeln!(self.output, "Computer plays: {}", self.board.san(&mv))?;
                    mv
                }
            };

            info!(side = %side, mv = %mv.to_uci(), "move played");
            self.board.make_move(mv);
        };

        write!(self.output, "{}", render(&self.board, self.colored))?;
        writeln!(self.output, "Game over!")?;
        match state {
            GameState::Checkmate(winner) => writeln!(self.output, "Checkmate! {winner} wins!")?,
            _ => writeln!(self.output, "It's a draw! {}", state.result())?,
        }
        self.output.flush()?;
        info!(result = state.result(), ?state, "game over");
        Ok(GameOutcome::Finished(state))
    }

    fn ask_human_move(&mut self) -> Result<Option<Move>> {
        let mut line = String::new();
        loop {
            write!(self.output, "Enter your move (e.g., e2e4): ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line).context("failed to read move")? == 0 {
                return Ok(None);
            }
            let text = line.trim();
            if text == "quit" {
                return Ok(None);
            }

            match self.board.parse_san(text) {
                Ok(mv) => return Ok(Some(mv)),
                Err(err) => {
                    debug!(input = text, %err, "rejected move");
                    writeln!(self.output, "{INVALID_MOVE}")?;
                }
            }
        }
    }

    fn computer_move(&mut self, player: Player) -> Result<Move> {
        match player {
            Player::Random => pick_random(&self.board.legal_moves(), &mut self.rng)
                .ok_or_else(|| anyhow!("no legal moves in an unfinished game")),
            Player::Minimax { depth } => {
                let result = find_best_move(&mut self.board, &self.evaluator, depth)
                    .context("minimax search failed")?;
                result
                    .best_move
                    .ok_or_else(|| anyhow!("search returned no move at depth {depth}"))
            }
            Player::Human => Err(anyhow!("human moves come from the prompt")),
        }
    }
}
