use crate::board::{Board, Color, Piece};
use crate::movegen::GameState;
use crate::score::Score;

pub trait Evaluate<P: ?Sized> {
    fn evaluate(&self, position: &P) -> Score;
}

// Kings are worth nothing: losing one is already checkmate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    pub const fn piece_value(piece: Piece) -> i32 {
        match piece {
            Piece::Pawn => 1,
            Piece::Knight => 3,
            Piece::Bishop => 3,
            Piece::Rook => 5,
            Piece::Queen => 9,
            Piece::King => 0,
        }
    }

    pub fn material(&self, board: &Board) -> Score {
        let mut score = 0;
        for piece in Piece::ALL {
            let value = Self::piece_value(piece);
            score += value * board.white_pieces[piece.index()].count_ones() as i32;
            score -= value * board.black_pieces[piece.index()].count_ones() as i32;
        }
        Score::new(score)
    }
}

impl Evaluate<Board> for Evaluator {
    fn evaluate(&self, board: &Board) -> Score {
        match board.game_state() {
            GameState::Checkmate(Color::White) => Score::MATE,
            GameState::Checkmate(Color::Black) => -Score::MATE,
            GameState::Ongoing => self.material(board),
            _ => Score::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(fen: &str) -> Score {
        Evaluator::new().evaluate(&Board::from_fen(fen).unwrap())
    }

    #[test]
    fn start_position_is_level() {
        assert_eq!(Evaluator::new().evaluate(&Board::new()), Score::ZERO);
    }

    #[test]
    fn material_is_summed_per_side() {
        // White is a rook up.
        assert_eq!(evaluate("4k3/pppppppp/8/8/8/8/PPPPPPPP/R3K3 w - - 0 1"), Score::new(5));
        // Black has a queen and knight against a bishop.
        assert_eq!(evaluate("4k3/8/8/3qn3/8/8/8/2B1K3 w - - 0 1"), Score::new(-9));
    }

    #[test]
    fn kings_are_worth_nothing() {
        assert_eq!(Evaluator::piece_value(Piece::King), 0);
        assert_eq!(evaluate("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"), Score::new(1));
    }

    #[test]
    fn checkmate_is_signed_against_the_mated_side() {
        // Black to move and mated.
        let black_mated = evaluate("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1");
        assert_eq!(black_mated, Score::MATE);

        // Fool's mate: White to move and mated.
        let white_mated = evaluate("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(white_mated, -Score::MATE);
    }

    #[test]
    fn checkmate_dominates_any_material_balance() {
        // White mates while a queen and two rooks down.
        let mate = evaluate("4R1k1/5ppp/8/8/8/7K/rr6/q7 b - - 0 1");
        let material = evaluate("6k1/5ppp/8/8/8/7K/rr6/q3R3 w - - 0 1");
        assert_eq!(mate, Score::MATE);
        assert!(mate.value().abs() > material.value().abs());
        assert!(material < Score::ZERO);
    }

    #[test]
    fn stalemate_is_zero_regardless_of_material() {
        assert_eq!(evaluate("k7/8/1Q6/8/8/8/8/1K6 b - - 0 1"), Score::ZERO);
        assert_eq!(evaluate("k7/8/1Q6/8/8/8/7R/1K6 b - - 0 1"), Score::ZERO);
    }

    #[test]
    fn other_draws_are_zero() {
        // Bare kings plus a bishop.
        assert_eq!(evaluate("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1"), Score::ZERO);
        // Seventy-five moves without a capture or pawn move.
        assert_eq!(evaluate("4k3/8/8/8/8/8/8/R3K3 w - - 150 120"), Score::ZERO);
    }
}
