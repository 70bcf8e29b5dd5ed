use crate::board::{Board, START_FEN};
use crate::config::{validate_depth, DEFAULT_DEPTH};
use crate::evaluation::Evaluator;
use crate::movegen::Move;
use crate::rules::Rules;
use crate::search::find_best_move_counting;
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const CENTIPAWNS: i32 = 100;

pub struct UciHandler {
    board: Board,
    evaluator: Evaluator,
    depth: u32,
}

impl Default for UciHandler {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl UciHandler {
    pub fn new(depth: u32) -> Self {
        UciHandler {
            board: Board::new(),
            evaluator: Evaluator::new(),
            depth,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let mut line = String::new();
        while input.read_line(&mut line).context("failed to read UCI command")? > 0 {
            let command = line.trim();
            if command == "quit" {
                break;
            }

            match self.handle_command(command) {
                Ok(response) => output.write_all(response.as_bytes())?,
                Err(err) => warn!(command, "{err:#}"),
            }
            output.flush()?;
            line.clear();
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        let parts: Vec<&str> = command.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(String::new());
        }

        match parts[0] {
            "uci" => Ok(self.handle_uci()),
            "isready" => Ok("readyok\n".to_string()),
            "ucinewgame" => Ok(self.handle_ucinewgame()),
            "position" => self.handle_position(&parts[1..]),
            "go" => self.handle_go(&parts[1..]),
            "d" => Ok(format!("{}Fen: {}\n", self.board, self.board.to_fen())),
            "quit" => Ok(String::new()),
            other => {
                debug!(command = other, "ignoring unknown command");
                Ok(String::new())
            }
        }
    }

    fn handle_uci(&self) -> String {
        format!(
            "id name minimax-chess {}\nid author the minimax-chess developers\nuciok\n",
            env!("CARGO_PKG_VERSION")
        )
    }

    fn handle_ucinewgame(&mut self) -> String {
        self.board = Board::new();
        String::new()
    }

    fn handle_position(&mut self, parts: &[&str]) -> Result<String> {
        let moves_at = parts.iter().position(|part| *part == "moves").unwrap_or(parts.len());
        let (setup, moves) = parts.split_at(moves_at);

        let mut board = match setup {
            ["startpos"] => Board::from_fen(START_FEN)?,
            ["fen", fields @ ..] if !fields.is_empty() => {
                let fen = fields.join(" ");
                Board::from_fen(&fen).with_context(|| format!("bad FEN {fen:?}"))?
            }
            _ => bail!("expected `startpos` or `fen <fields>`, got {:?}", setup.join(" ")),
        };

        for text in moves.iter().skip(1) {
            let mv = board.parse_uci(text)?;
            board.make_move(mv);
        }

        self.board = board;
        Ok(String::new())
    }

    // Time controls are ignored; the search always runs to a fixed depth.
    fn handle_go(&mut self, parts: &[&str]) -> Result<String> {
        let mut depth = self.depth;
        let mut args = parts.iter();
        while let Some(arg) = args.next() {
            if *arg == "depth" {
                let value = args.next().context("`go depth` needs a number")?;
                depth = value.parse().with_context(|| format!("bad depth {value:?}"))?;
            }
        }
        let depth = validate_depth(depth)?;

        let side = self.board.side_to_move();
        let (result, nodes) = find_best_move_counting(&mut self.board, &self.evaluator, depth)?;

        let centipawns = result.score.value().saturating_mul(CENTIPAWNS);
        let centipawns = if side.is_maximizing() { centipawns } else { -centipawns };
        Ok(format!(
            "info depth {depth} score cp {centipawns} nodes {nodes}\nbestmove {}\n",
            result.best_move.as_ref().map_or_else(|| "0000".to_string(), Move::to_uci)
        ))
    }
}
