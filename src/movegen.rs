use crate::board::{
    Board, Color, Piece, BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE, WHITE_QUEENSIDE,
};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const PROMOTIONS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

const LIGHT_SQUARES: u64 = 0x55AA55AA55AA55AA;
const DARK_SQUARES: u64 = 0xAA55AA55AA55AA55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8,
    pub to: u8,
    pub piece: Piece,
    pub captured_piece: Option<Piece>,
    pub promotion: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castling: bool,
}

impl Move {
    pub fn new(from: u8, to: u8, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured_piece: None,
            promotion: None,
            is_en_passant: false,
            is_castling: false,
        }
    }

    pub fn new_capture(from: u8, to: u8, piece: Piece, captured_piece: Piece) -> Self {
        Self {
            captured_piece: Some(captured_piece),
            ..Self::new(from, to, piece)
        }
    }

    pub fn new_en_passant(from: u8, to: u8) -> Self {
        Self {
            captured_piece: Some(Piece::Pawn),
            is_en_passant: true,
            ..Self::new(from, to, Piece::Pawn)
        }
    }

    pub fn new_castling(from: u8, to: u8) -> Self {
        Self {
            is_castling: true,
            ..Self::new(from, to, Piece::King)
        }
    }

    pub fn new_promotion(from: u8, to: u8, captured_piece: Option<Piece>, promotion: Piece) -> Self {
        Self {
            captured_piece,
            promotion: Some(promotion),
            ..Self::new(from, to, Piece::Pawn)
        }
    }

    // Differs from `to` only for en passant.
    pub fn captured_square(&self) -> u8 {
        if self.is_en_passant {
            (self.from / 8) * 8 + self.to % 8
        } else {
            self.to
        }
    }

    pub fn castling_rook_squares(&self) -> (u8, u8) {
        if self.to > self.from {
            (self.from + 3, self.from + 1)
        } else {
            (self.from - 4, self.from - 1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate(Color), // Color is the winner
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoveRule,
    FivefoldRepetition,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        *self != GameState::Ongoing
    }

    pub fn is_draw(&self) -> bool {
        !matches!(self, GameState::Ongoing | GameState::Checkmate(_))
    }

    pub fn result(&self) -> &'static str {
        match self {
            GameState::Ongoing => "*",
            GameState::Checkmate(Color::White) => "1-0",
            GameState::Checkmate(Color::Black) => "0-1",
            _ => "1/2-1/2",
        }
    }
}

fn offset(square: u8, dr: i8, df: i8) -> Option<u8> {
    let rank = (square / 8) as i8 + dr;
    let file = (square % 8) as i8 + df;
    ((0..8).contains(&rank) && (0..8).contains(&file)).then(|| (rank * 8 + file) as u8)
}

fn step_attacks(square: u8, steps: &[(i8, i8)]) -> u64 {
    steps
        .iter()
        .filter_map(|&(dr, df)| offset(square, dr, df))
        .fold(0, |acc, sq| acc | 1u64 << sq)
}

fn slide_attacks(square: u8, occupied: u64, directions: &[(i8, i8)]) -> u64 {
    let mut attacks = 0u64;
    for &(dr, df) in directions {
        let mut current = square;
        while let Some(target) = offset(current, dr, df) {
            attacks |= 1u64 << target;
            if occupied & (1u64 << target) != 0 {
                break;
            }
            current = target;
        }
    }
    attacks
}

pub fn pawn_attacks(square: u8, color: Color) -> u64 {
    let dr = match color {
        Color::White => 1,
        Color::Black => -1,
    };
    step_attacks(square, &[(dr, -1), (dr, 1)])
}

fn squares(mut bb: u64) -> impl Iterator<Item = u8> {
    std::iter::from_fn(move || {
        if bb == 0 {
            return None;
        }
        let square = bb.trailing_zeros() as u8;
        bb &= bb - 1;
        Some(square)
    })
}

fn is_attacked_by(attackers: &[u64; 6], occupied: u64, square: u8, attacker_color: Color) -> bool {
    // A pawn attacks `square` from wherever an opposing pawn on `square` would attack.
    if pawn_attacks(square, attacker_color.opposite()) & attackers[Piece::Pawn.index()] != 0 {
        return true;
    }
    if step_attacks(square, &KNIGHT_STEPS) & attackers[Piece::Knight.index()] != 0 {
        return true;
    }
    if step_attacks(square, &KING_STEPS) & attackers[Piece::King.index()] != 0 {
        return true;
    }
    let queens = attackers[Piece::Queen.index()];
    let diagonal = attackers[Piece::Bishop.index()] | queens;
    if slide_attacks(square, occupied, &BISHOP_DIRECTIONS) & diagonal != 0 {
        return true;
    }
    let straight = attackers[Piece::Rook.index()] | queens;
    slide_attacks(square, occupied, &ROOK_DIRECTIONS) & straight != 0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn is_square_under_attack(&self, board: &Board, square: u8, attacker_color: Color) -> bool {
        is_attacked_by(board.pieces(attacker_color), board.occupied(), square, attacker_color)
    }

    pub fn is_king_in_check(&self, board: &Board, color: Color) -> bool {
        match board.king_square(color) {
            Some(king_square) => self.is_square_under_attack(board, king_square, color.opposite()),
            None => false,
        }
    }

    pub fn generate_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        self.generate_pseudo_legal(board, &mut moves);
        moves.retain(|mv| self.leaves_king_safe(board, mv));
        moves
    }

    pub fn has_legal_move(&self, board: &Board) -> bool {
        let mut moves = Vec::with_capacity(64);
        self.generate_pseudo_legal(board, &mut moves);
        moves.iter().any(|mv| self.leaves_king_safe(board, mv))
    }

    // Plays `mv` on copies of the bitboards and checks the mover's king.
    fn leaves_king_safe(&self, board: &Board, mv: &Move) -> bool {
        let us = board.side_to_move;
        let mut own = *board.pieces(us);
        let mut theirs = *board.pieces(us.opposite());

        own[mv.piece.index()] &= !(1u64 << mv.from);
        own[mv.promotion.unwrap_or(mv.piece).index()] |= 1u64 << mv.to;
        if let Some(captured) = mv.captured_piece {
            theirs[captured.index()] &= !(1u64 << mv.captured_square());
        }
        if mv.is_castling {
            let (rook_from, rook_to) = mv.castling_rook_squares();
            own[Piece::Rook.index()] &= !(1u64 << rook_from);
            own[Piece::Rook.index()] |= 1u64 << rook_to;
        }

        let king = own[Piece::King.index()];
        if king == 0 {
            return true;
        }
        let occupied = own.iter().chain(theirs.iter()).fold(0, |acc, bb| acc | bb);
        !is_attacked_by(&theirs, occupied, king.trailing_zeros() as u8, us.opposite())
    }

    fn generate_pseudo_legal(&self, board: &Board, moves: &mut Vec<Move>) {
        let us = board.side_to_move;
        let pieces = board.pieces(us);
        let own = board.occupied_by(us);
        let enemy = board.occupied_by(us.opposite());
        let occupied = own | enemy;

        self.generate_pawn_moves(board, pieces[Piece::Pawn.index()], enemy, occupied, moves);

        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            for from in squares(pieces[piece.index()]) {
                let targets = match piece {
                    Piece::Knight => step_attacks(from, &KNIGHT_STEPS),
                    Piece::Bishop => slide_attacks(from, occupied, &BISHOP_DIRECTIONS),
                    Piece::Rook => slide_attacks(from, occupied, &ROOK_DIRECTIONS),
                    Piece::Queen => {
                        slide_attacks(from, occupied, &BISHOP_DIRECTIONS)
                            | slide_attacks(from, occupied, &ROOK_DIRECTIONS)
                    }
                    _ => step_attacks(from, &KING_STEPS),
                };
                for to in squares(targets & !own) {
                    let mv = match board.get_piece_at(to) {
                        Some((captured, _)) => Move::new_capture(from, to, piece, captured),
                        None => Move::new(from, to, piece),
                    };
                    moves.push(mv);
                }
            }
        }

        self.generate_castling(board, occupied, moves);
    }

    fn generate_pawn_moves(
        &self,
        board: &Board,
        pawns: u64,
        enemy: u64,
        occupied: u64,
        moves: &mut Vec<Move>,
    ) {
        let us = board.side_to_move;
        let (forward, start_rank, promotion_rank) = match us {
            Color::White => (1i8, 1u8, 7u8),
            Color::Black => (-1i8, 6u8, 0u8),
        };

        for from in squares(pawns) {
            if let Some(to) = offset(from, forward, 0) {
                if occupied & (1u64 << to) == 0 {
                    if to / 8 == promotion_rank {
                        for promotion in PROMOTIONS {
                            moves.push(Move::new_promotion(from, to, None, promotion));
                        }
                    } else {
                        moves.push(Move::new(from, to, Piece::Pawn));
                        if from / 8 == start_rank {
                            if let Some(double) = offset(to, forward, 0) {
                                if occupied & (1u64 << double) == 0 {
                                    moves.push(Move::new(from, double, Piece::Pawn));
                                }
                            }
                        }
                    }
                }
            }

            let attacks = pawn_attacks(from, us);
            for to in squares(attacks & enemy) {
                let captured = board.get_piece_at(to).map(|(piece, _)| piece);
                if to / 8 == promotion_rank {
                    for promotion in PROMOTIONS {
                        moves.push(Move::new_promotion(from, to, captured, promotion));
                    }
                } else if let Some(captured) = captured {
                    moves.push(Move::new_capture(from, to, Piece::Pawn, captured));
                }
            }
        }

        self.generate_en_passant(board, pawns, moves);
    }

    fn generate_en_passant(&self, board: &Board, pawns: u64, moves: &mut Vec<Move>) {
        let Some(ep_square) = board.en_passant_square else {
            return;
        };
        let us = board.side_to_move;
        let enemy_pawns = board.pieces(us.opposite())[Piece::Pawn.index()];
        for from in squares(pawns & pawn_attacks(ep_square, us.opposite())) {
            let victim = (from / 8) * 8 + ep_square % 8;
            if enemy_pawns & (1u64 << victim) != 0 {
                moves.push(Move::new_en_passant(from, ep_square));
            }
        }
    }

    // Repetition only counts the en passant square when the capture is legal.
    pub fn has_legal_en_passant(&self, board: &Board) -> bool {
        let mut moves = Vec::new();
        let pawns = board.pieces(board.side_to_move)[Piece::Pawn.index()];
        self.generate_en_passant(board, pawns, &mut moves);
        moves.iter().any(|mv| self.leaves_king_safe(board, mv))
    }

    fn generate_castling(&self, board: &Board, occupied: u64, moves: &mut Vec<Move>) {
        let us = board.side_to_move;
        let them = us.opposite();
        let (king_home, kingside, queenside) = match us {
            Color::White => (4u8, WHITE_KINGSIDE, WHITE_QUEENSIDE),
            Color::Black => (60u8, BLACK_KINGSIDE, BLACK_QUEENSIDE),
        };
        let pieces = board.pieces(us);
        if pieces[Piece::King.index()] & (1u64 << king_home) == 0 {
            return;
        }
        if board.castling_rights & (kingside | queenside) == 0 {
            return;
        }
        if self.is_square_under_attack(board, king_home, them) {
            return;
        }

        let rooks = pieces[Piece::Rook.index()];
        let attacked = |square: u8| self.is_square_under_attack(board, square, them);

        // Kingside: f and g files empty, king passes over f.
        let empty = (1u64 << (king_home + 1)) | (1u64 << (king_home + 2));
        if board.castling_rights & kingside != 0
            && rooks & (1u64 << (king_home + 3)) != 0
            && occupied & empty == 0
            && !attacked(king_home + 1)
        {
            moves.push(Move::new_castling(king_home, king_home + 2));
        }

        // Queenside: b, c and d files empty, king passes over d.
        let empty = (1u64 << (king_home - 1)) | (1u64 << (king_home - 2)) | (1u64 << (king_home - 3));
        if board.castling_rights & queenside != 0
            && rooks & (1u64 << (king_home - 4)) != 0
            && occupied & empty == 0
            && !attacked(king_home - 1)
        {
            moves.push(Move::new_castling(king_home, king_home - 2));
        }
    }

    pub fn get_game_state(&self, board: &Board) -> GameState {
        let has_moves = self.has_legal_move(board);
        if !has_moves && self.is_king_in_check(board, board.side_to_move) {
            return GameState::Checkmate(board.side_to_move.opposite());
        }
        if self.is_insufficient_material(board) {
            return GameState::InsufficientMaterial;
        }
        if !has_moves {
            return GameState::Stalemate;
        }
        if board.halfmove_clock >= 150 {
            return GameState::SeventyFiveMoveRule;
        }
        if board.repetition_count() >= 5 {
            return GameState::FivefoldRepetition;
        }
        GameState::Ongoing
    }

    pub fn is_insufficient_material(&self, board: &Board) -> bool {
        self.has_insufficient_material(board, Color::White)
            && self.has_insufficient_material(board, Color::Black)
    }

    fn has_insufficient_material(&self, board: &Board, color: Color) -> bool {
        let own = board.pieces(color);
        let theirs = board.pieces(color.opposite());
        if own[Piece::Pawn.index()] | own[Piece::Rook.index()] | own[Piece::Queen.index()] != 0 {
            return false;
        }

        if own[Piece::Knight.index()] != 0 {
            // A single knight can only mate if the opponent has something to block with.
            let own_count: u32 = own.iter().map(|bb| bb.count_ones()).sum();
            let blockers = board.occupied_by(color.opposite())
                & !theirs[Piece::King.index()]
                & !theirs[Piece::Queen.index()];
            return own_count <= 2 && blockers == 0;
        }

        if own[Piece::Bishop.index()] != 0 {
            let bishops = board.white_pieces[Piece::Bishop.index()] | board.black_pieces[Piece::Bishop.index()];
            let same_colour = bishops & DARK_SQUARES == 0 || bishops & LIGHT_SQUARES == 0;
            let pawns = board.white_pieces[Piece::Pawn.index()] | board.black_pieces[Piece::Pawn.index()];
            let knights = board.white_pieces[Piece::Knight.index()] | board.black_pieces[Piece::Knight.index()];
            return same_colour && pawns == 0 && knights == 0;
        }

        true
    }
}

impl Board {
    pub fn game_state(&self) -> GameState {
        MoveGenerator::new().get_game_state(self)
    }

    pub fn is_check(&self) -> bool {
        MoveGenerator::new().is_king_in_check(self, self.side_to_move)
    }
}
