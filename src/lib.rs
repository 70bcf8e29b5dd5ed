pub mod board;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod random;
pub mod render;
pub mod rules;
pub mod score;
pub mod search;
pub mod uci;

pub use board::{Board, Color, Piece};
pub use error::{ConfigError, FenError, InvalidMoveError, SearchError};
pub use evaluation::{Evaluate, Evaluator};
pub use movegen::{GameState, Move, MoveGenerator};
pub use random::pick_random;
pub use rules::Rules;
pub use score::Score;
pub use search::{find_best_move, Bounds, Search, SearchResult};

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    fn play(board: &mut Board, moves: &[&str]) {
        for text in moves {
            let mv = board.parse_uci(text).unwrap();
            board.make_move(mv);
        }
    }

    #[test]
    fn test_initial_position() {
        let board = Board::new();
        let moves = MoveGenerator::new().generate_moves(&board);

        // White should have 20 legal moves in the initial position
        assert_eq!(moves.len(), 20);
        for mv in moves {
            assert_eq!(board.get_piece_at(mv.from), Some((mv.piece, Color::White)));
        }
    }

    #[test]
    fn test_pawn_moves() {
        let generator = MoveGenerator::new();

        let moves = generator.generate_moves(&Board::new());
        let double_push = moves
            .iter()
            .find(|mv| mv.piece == Piece::Pawn && mv.from / 8 == 1 && mv.to / 8 == 3);
        assert!(double_push.is_some());

        // White pawn on e4, black pawn on d5
        let capture_board = board("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let moves = generator.generate_moves(&capture_board);
        let capture = moves
            .iter()
            .find(|mv| mv.piece == Piece::Pawn && mv.captured_piece == Some(Piece::Pawn));
        assert_eq!(capture.map(|mv| (mv.from, mv.to)), Some((28, 35)));

        // Blocked pawns cannot advance
        let blocked = board("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1");
        let moves = generator.generate_moves(&blocked);
        assert!(moves.iter().all(|mv| mv.piece != Piece::Pawn));
    }

    #[test]
    fn test_castling() {
        let generator = MoveGenerator::new();

        let both = board("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = generator.generate_moves(&both);
        assert!(moves.iter().any(|mv| mv.is_castling && mv.from == 4 && mv.to == 6));
        assert!(moves.iter().any(|mv| mv.is_castling && mv.from == 4 && mv.to == 2));

        // The rook on f2 covers f1, which the king would pass over.
        let covered = board("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1");
        let moves = generator.generate_moves(&covered);
        assert!(!moves.iter().any(|mv| mv.is_castling && mv.to == 6));
        assert!(moves.iter().any(|mv| mv.is_castling && mv.to == 2));

        // No rights, no castling
        let no_rights = board("4k3/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(!generator.generate_moves(&no_rights).iter().any(|mv| mv.is_castling));

        // Castling moves the rook too, and unmaking puts it back
        let mut castled = both.clone();
        let short = castled.parse_uci("e1g1").unwrap();
        castled.make_move(short);
        assert_eq!(castled.get_piece_at(5), Some((Piece::Rook, Color::White)));
        assert_eq!(castled.get_piece_at(7), None);
        assert_eq!(castled.castling_rights, 0);
        castled.unmake_move();
        assert_eq!(castled, both);
    }

    #[test]
    fn test_en_passant() {
        let mut board = Board::new();
        play(&mut board, &["e2e4", "d7d5", "e4e5", "f7f5"]);

        let moves = MoveGenerator::new().generate_moves(&board);
        let en_passant = moves
            .iter()
            .find(|mv| mv.is_en_passant && mv.from == 36 && mv.to == 45)
            .copied();
        assert!(en_passant.is_some());
        // d5 was not the last double push
        assert!(!moves.iter().any(|mv| mv.is_en_passant && mv.to == 43));

        let before = board.clone();
        board.make_move(en_passant.unwrap());
        assert_eq!(board.get_piece_at(37), None);
        assert_eq!(board.get_piece_at(45), Some((Piece::Pawn, Color::White)));
        board.unmake_move();
        assert_eq!(board, before);
    }

    #[test]
    fn test_promotion() {
        let board = board("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = MoveGenerator::new().generate_moves(&board);
        let promotions = moves
            .iter()
            .filter(|mv| mv.piece == Piece::Pawn && mv.promotion.is_some())
            .count();

        // Should have 4 promotion options (Queen, Rook, Bishop, Knight)
        assert_eq!(promotions, 4);
        assert!(!moves.iter().any(|mv| mv.piece == Piece::Pawn && mv.promotion.is_none()));
    }

    #[test]
    fn test_check() {
        let generator = MoveGenerator::new();

        // White queen on a4 checks the black king on e8 along the diagonal
        let board = board("4k3/8/8/8/Q7/8/8/4K3 b - - 0 1");
        assert!(generator.is_king_in_check(&board, Color::Black));
        assert!(!generator.is_king_in_check(&board, Color::White));
        assert!(board.is_check());
        assert_eq!(board.game_state(), GameState::Ongoing);
    }

    #[test]
    fn test_checkmate() {
        let generator = MoveGenerator::new();

        // Black king on a1, white queen on b1 guarded by the king on c1
        let board = board("8/8/8/8/8/8/8/kQK5 b - - 0 1");
        assert!(generator.is_king_in_check(&board, Color::Black));
        assert!(generator.generate_moves(&board).is_empty());
        assert_eq!(generator.get_game_state(&board), GameState::Checkmate(Color::White));
        assert!(board.is_checkmate());
    }

    #[test]
    fn test_stalemate() {
        let generator = MoveGenerator::new();

        // White king on a1, black king on c2, black queen on b3
        let board = board("8/8/8/8/8/1q6/2k5/K7 w - - 0 1");
        assert!(!generator.is_king_in_check(&board, Color::White));
        assert!(generator.generate_moves(&board).is_empty());
        assert_eq!(generator.get_game_state(&board), GameState::Stalemate);
        assert!(board.is_stalemate());
    }

    #[test]
    fn test_insufficient_material() {
        let generator = MoveGenerator::new();

        for fen in [
            "4k3/8/8/8/8/8/8/3K4 w - - 0 1",
            "4k3/8/8/8/8/8/8/2BK4 w - - 0 1",
            "4k3/8/8/8/8/8/8/3K2N1 w - - 0 1",
            "2b1k3/8/8/8/8/8/8/3K1B2 w - - 0 1",
        ] {
            assert_eq!(generator.get_game_state(&board(fen)), GameState::InsufficientMaterial, "{fen}");
        }

        for fen in [
            "4k3/8/8/8/8/8/8/R2K4 w - - 0 1",
            "4k3/8/8/8/8/8/4P3/3K4 w - - 0 1",
            "3bk3/8/8/8/8/8/8/3K1B2 w - - 0 1",
        ] {
            assert_eq!(generator.get_game_state(&board(fen)), GameState::Ongoing, "{fen}");
        }
    }

    #[test]
    fn test_seventy_five_move_rule() {
        let generator = MoveGenerator::new();

        let board_149 = board("4k3/8/8/8/8/8/8/R3K3 w - - 149 120");
        assert_eq!(generator.get_game_state(&board_149), GameState::Ongoing);

        let board_150 = board("4k3/8/8/8/8/8/8/R3K3 w - - 150 120");
        assert_eq!(generator.get_game_state(&board_150), GameState::SeventyFiveMoveRule);

        // Checkmate on the last move still counts as checkmate
        let mated = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 150 120");
        assert_eq!(generator.get_game_state(&mated), GameState::Checkmate(Color::White));
    }

    #[test]
    fn test_fivefold_repetition() {
        let mut board = Board::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        for _ in 0..3 {
            play(&mut board, &shuffle);
        }
        assert_eq!(board.repetition_count(), 4);
        assert_eq!(board.game_state(), GameState::Ongoing);

        play(&mut board, &shuffle);
        assert_eq!(board.repetition_count(), 5);
        assert_eq!(board.game_state(), GameState::FivefoldRepetition);
        assert!(board.game_state().is_draw());
    }

    #[test]
    fn test_move_validation() {
        // The bishop on e2 is pinned to its king by the rook on e7
        let pinned = board("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        let moves = MoveGenerator::new().generate_moves(&pinned);
        assert!(moves.iter().all(|mv| mv.piece != Piece::Bishop));
        assert!(matches!(pinned.parse_uci("e2d3"), Err(InvalidMoveError::Illegal(_))));

        // In check, only moves that deal with it are legal
        let checked = board("4k3/8/8/8/8/8/8/r3K2R w K - 0 1");
        let moves = MoveGenerator::new().generate_moves(&checked);
        assert!(moves.iter().all(|mv| !mv.is_castling));
        assert!(moves.iter().all(|mv| mv.piece == Piece::King));
    }

    #[test]
    fn test_perft_initial_position() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 1), 20);
        assert_eq!(perft(&mut board, 2), 400);
        assert_eq!(perft(&mut board, 3), 8902);
    }

    #[test]
    fn test_perft_tricky_positions() {
        let cases: [(&str, &[u64]); 4] = [
            ("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", &[48, 2039]),
            ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]),
            ("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1", &[6, 264, 9467]),
            ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", &[44, 1486]),
        ];
        for (fen, expected) in cases {
            let mut board = board(fen);
            for (depth, nodes) in expected.iter().enumerate() {
                assert_eq!(perft(&mut board, depth as u32 + 1), *nodes, "{fen} depth {}", depth + 1);
            }
            assert_eq!(board.to_fen(), fen);
        }
    }

    // Helper function to perform perft on one board with make/unmake
    fn perft(board: &mut Board, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = board.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            let before = board.clone();
            board.make_move(mv);
            nodes += perft(board, depth - 1);
            assert_eq!(board.unmake_move(), Some(mv));
            assert_eq!(*board, before);
        }

        nodes
    }
}
