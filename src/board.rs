use std::fmt;

use crate::error::FenError;
use crate::movegen::{Move, MoveGenerator};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<Piece> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Piece::Pawn),
            'N' => Some(Piece::Knight),
            'B' => Some(Piece::Bishop),
            'R' => Some(Piece::Rook),
            'Q' => Some(Piece::Queen),
            'K' => Some(Piece::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn is_maximizing(&self) -> bool {
        *self == Color::White
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

// State needed to reverse one `make_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Undo {
    mv: Move,
    castling_rights: u8,
    en_passant_square: Option<u8>,
    halfmove_clock: u16,
    fullmove_number: u16,
    key: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub white_pieces: [u64; 6], // Pawn, Knight, Bishop, Rook, Queen, King
    pub black_pieces: [u64; 6], // Pawn, Knight, Bishop, Rook, Queen, King
    pub side_to_move: Color,
    pub castling_rights: u8, // 4 bits: KQkq
    pub en_passant_square: Option<u8>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    history: Vec<Undo>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            white_pieces: [
                0x000000000000FF00, // Pawns
                0x0000000000000042, // Knights
                0x0000000000000024, // Bishops
                0x0000000000000081, // Rooks
                0x0000000000000008, // Queen
                0x0000000000000010, // King
            ],
            black_pieces: [
                0x00FF000000000000, // Pawns
                0x4200000000000000, // Knights
                0x2400000000000000, // Bishops
                0x8100000000000000, // Rooks
                0x0800000000000000, // Queen
                0x1000000000000000, // King
            ],
            side_to_move: Color::White,
            castling_rights: 0b1111,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            white_pieces: [0; 6],
            black_pieces: [0; 6],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::MissingField("piece placement"))?;
        let side = fields.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = fields.next().ok_or(FenError::MissingField("castling rights"))?;
        let en_passant = fields.next().ok_or(FenError::MissingField("en passant square"))?;
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut board = Board::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement(format!("expected 8 ranks, found {}", ranks.len())));
        }
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(FenError::Placement(format!("bad empty-square count {c:?}")));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_letter(c)
                        .ok_or_else(|| FenError::Placement(format!("unknown piece {c:?}")))?;
                    if file >= 8 {
                        return Err(FenError::Placement(format!("rank {} is too long", rank + 1)));
                    }
                    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                    board.put_piece(color, piece, rank * 8 + file);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::Placement(format!("rank {} is too long", rank + 1)));
                }
            }
            if file != 8 {
                return Err(FenError::Placement(format!("rank {} has {} files", rank + 1, file)));
            }
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        if castling != "-" {
            for c in castling.chars() {
                board.castling_rights |= match c {
                    'K' => WHITE_KINGSIDE,
                    'Q' => WHITE_QUEENSIDE,
                    'k' => BLACK_KINGSIDE,
                    'q' => BLACK_QUEENSIDE,
                    _ => return Err(FenError::Castling(castling.to_string())),
                };
            }
        }

        // The square behind the pawn that just double-pushed, on the mover's far side.
        let en_passant_rank = match board.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        if en_passant != "-" {
            let square = parse_square(en_passant)
                .filter(|sq| sq / 8 == en_passant_rank)
                .ok_or_else(|| FenError::EnPassant(en_passant.to_string()))?;
            board.en_passant_square = Some(square);
        }

        board.halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::Counter(halfmove.to_string()))?;
        board.fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::Counter(fullmove.to_string()))?;

        for color in [Color::White, Color::Black] {
            let count = board.pieces(color)[Piece::King.index()].count_ones();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.get_piece_at(rank * 8 + file) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        let letter = piece.letter();
                        fen.push(match color {
                            Color::White => letter,
                            Color::Black => letter.to_ascii_lowercase(),
                        });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push_str(match self.side_to_move {
            Color::White => " w ",
            Color::Black => " b ",
        });

        if self.castling_rights == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [
                (WHITE_KINGSIDE, 'K'),
                (WHITE_QUEENSIDE, 'Q'),
                (BLACK_KINGSIDE, 'k'),
                (BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castling_rights & flag != 0 {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant_square {
            Some(square) => fen.push_str(&square_name(square)),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    pub fn pieces(&self, color: Color) -> &[u64; 6] {
        match color {
            Color::White => &self.white_pieces,
            Color::Black => &self.black_pieces,
        }
    }

    fn pieces_mut(&mut self, color: Color) -> &mut [u64; 6] {
        match color {
            Color::White => &mut self.white_pieces,
            Color::Black => &mut self.black_pieces,
        }
    }

    pub fn occupied_by(&self, color: Color) -> u64 {
        self.pieces(color).iter().fold(0, |acc, bb| acc | bb)
    }

    pub fn occupied(&self) -> u64 {
        self.occupied_by(Color::White) | self.occupied_by(Color::Black)
    }

    pub fn king_square(&self, color: Color) -> Option<u8> {
        let king = self.pieces(color)[Piece::King.index()];
        (king != 0).then(|| king.trailing_zeros() as u8)
    }

    fn put_piece(&mut self, color: Color, piece: Piece, square: u8) {
        self.pieces_mut(color)[piece.index()] |= 1u64 << square;
    }

    fn remove_piece(&mut self, color: Color, piece: Piece, square: u8) {
        self.pieces_mut(color)[piece.index()] &= !(1u64 << square);
    }

    // The move must come from the generator or the notation parser for this position.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = us.opposite();

        self.history.push(Undo {
            mv,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            key: self.position_key(),
        });

        if let Some(captured) = mv.captured_piece {
            self.remove_piece(them, captured, mv.captured_square());
        }
        self.remove_piece(us, mv.piece, mv.from);
        self.put_piece(us, mv.promotion.unwrap_or(mv.piece), mv.to);

        if mv.is_castling {
            let (rook_from, rook_to) = mv.castling_rook_squares();
            self.remove_piece(us, Piece::Rook, rook_from);
            self.put_piece(us, Piece::Rook, rook_to);
        }

        // A king or rook leaving its home square, or a rook captured on it.
        self.castling_rights &= !(castling_mask(mv.from) | castling_mask(mv.to));

        self.en_passant_square = if mv.piece == Piece::Pawn && mv.from.abs_diff(mv.to) == 16 {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        };

        if mv.piece == Piece::Pawn || mv.captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = them;
    }

    pub fn unmake_move(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        let mv = undo.mv;

        self.side_to_move = self.side_to_move.opposite();
        let us = self.side_to_move;

        self.remove_piece(us, mv.promotion.unwrap_or(mv.piece), mv.to);
        self.put_piece(us, mv.piece, mv.from);

        if mv.is_castling {
            let (rook_from, rook_to) = mv.castling_rook_squares();
            self.remove_piece(us, Piece::Rook, rook_to);
            self.put_piece(us, Piece::Rook, rook_from);
        }

        if let Some(captured) = mv.captured_piece {
            self.put_piece(us.opposite(), captured, mv.captured_square());
        }

        self.castling_rights = undo.castling_rights;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        Some(mv)
    }

    pub fn move_stack(&self) -> impl Iterator<Item = &Move> + '_ {
        self.history.iter().map(|undo| &undo.mv)
    }

    pub fn get_piece_at(&self, square: u8) -> Option<(Piece, Color)> {
        let mask = 1u64 << square;
        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                if self.pieces(color)[piece.index()] & mask != 0 {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    // The en passant square only counts when the capture is legal.
    pub fn position_key(&self) -> u64 {
        fn mix(hash: u64, value: u64) -> u64 {
            (hash ^ value).wrapping_mul(0x100000001b3)
        }

        let mut hash = 0xcbf29ce484222325u64;
        for bb in self.white_pieces.iter().chain(self.black_pieces.iter()) {
            hash = mix(hash, *bb);
        }
        hash = mix(hash, self.side_to_move as u64);
        hash = mix(hash, self.castling_rights as u64);
        if let Some(square) = self.en_passant_square {
            if MoveGenerator::new().has_legal_en_passant(self) {
                hash = mix(hash, 64 + square as u64);
            }
        }
        hash
    }

    pub fn repetition_count(&self) -> usize {
        let key = self.position_key();
        1 + self.history.iter().filter(|undo| undo.key == key).count()
    }
}

// Castling rights lost when a piece moves from or to `square`.
fn castling_mask(square: u8) -> u8 {
    match square {
        0 => WHITE_QUEENSIDE,
        4 => WHITE_KINGSIDE | WHITE_QUEENSIDE,
        7 => WHITE_KINGSIDE,
        56 => BLACK_QUEENSIDE,
        60 => BLACK_KINGSIDE | BLACK_QUEENSIDE,
        63 => BLACK_KINGSIDE,
        _ => 0,
    }
}

pub fn square_name(square: u8) -> String {
    let file = (b'a' + square % 8) as char;
    let rank = (b'1' + square / 8) as char;
    format!("{file}{rank}")
}

pub fn parse_square(text: &str) -> Option<u8> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].checked_sub(b'a').filter(|f| *f < 8)?;
    let rank = bytes[1].checked_sub(b'1').filter(|r| *r < 8)?;
    Some(rank * 8 + file)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let c = match self.get_piece_at(rank * 8 + file) {
                    Some((piece, Color::White)) => piece.letter(),
                    Some((piece, Color::Black)) => piece.letter().to_ascii_lowercase(),
                    None => '.',
                };
                write!(f, "{c}")?;
                if file < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
