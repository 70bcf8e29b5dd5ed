use rand::seq::SliceRandom;
use rand::Rng;

pub fn pick_random<M: Copy, R: Rng + ?Sized>(moves: &[M], rng: &mut R) -> Option<M> {
    moves.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::rules::Rules;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn both_moves_of_a_two_move_position_get_picked() {
        // White: king a1 (only Ka2, the b-file is covered) and pawn e2 (only e3).
        let board = Board::from_fen("1r5k/8/8/8/4p3/8/4P3/K7 w - - 0 1").unwrap();
        let moves = board.legal_moves();
        assert_eq!(moves.len(), 2);

        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 2];
        for _ in 0..1000 {
            let mv = pick_random(&moves, &mut rng).unwrap();
            let index = moves.iter().position(|m| *m == mv).unwrap();
            counts[index] += 1;
        }
        assert!(counts[0] > 300 && counts[1] > 300, "{counts:?}");
    }

    #[test]
    fn checkmated_position_yields_none() {
        let board =
            Board::from_fen("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 1").unwrap();
        let moves = board.legal_moves();
        assert!(moves.is_empty());
        assert_eq!(pick_random(&moves, &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn same_seed_same_choice() {
        let moves = Board::new().legal_moves();
        let first = pick_random(&moves, &mut StdRng::seed_from_u64(42));
        let second = pick_random(&moves, &mut StdRng::seed_from_u64(42));
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
