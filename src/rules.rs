use std::fmt::Debug;

use crate::board::{Board, Color};
use crate::movegen::{GameState, Move, MoveGenerator};

// `apply` and `undo` must be exact inverses, called in LIFO order.
pub trait Rules {
    type Move: Copy + PartialEq + Debug;

    fn legal_moves(&self) -> Vec<Self::Move>;

    fn apply(&mut self, mv: Self::Move);

    fn undo(&mut self) -> Option<Self::Move>;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_game_over(&self) -> bool;

    fn side_to_move(&self) -> Color;
}

impl Rules for Board {
    type Move = Move;

    fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new().generate_moves(self)
    }

    fn apply(&mut self, mv: Move) {
        self.make_move(mv);
    }

    fn undo(&mut self) -> Option<Move> {
        self.unmake_move()
    }

    fn is_checkmate(&self) -> bool {
        let generator = MoveGenerator::new();
        generator.is_king_in_check(self, self.side_to_move) && !generator.has_legal_move(self)
    }

    fn is_stalemate(&self) -> bool {
        let generator = MoveGenerator::new();
        !generator.is_king_in_check(self, self.side_to_move) && !generator.has_legal_move(self)
    }

    fn is_game_over(&self) -> bool {
        self.game_state() != GameState::Ongoing
    }

    fn side_to_move(&self) -> Color {
        self.side_to_move
    }
}
