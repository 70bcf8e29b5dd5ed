use crate::board::{parse_square, square_name, Board, Piece};
use crate::error::InvalidMoveError;
use crate::movegen::{GameState, Move, MoveGenerator};

impl Move {
    pub fn to_uci(&self) -> String {
        let mut text = format!("{}{}", square_name(self.from), square_name(self.to));
        if let Some(promotion) = self.promotion {
            text.push(promotion.letter().to_ascii_lowercase());
        }
        text
    }
}

impl Board {
    pub fn san(&self, mv: &Move) -> String {
        let mut text = if mv.is_castling {
            if mv.to > mv.from { "O-O".to_string() } else { "O-O-O".to_string() }
        } else {
            let mut text = String::new();
            if mv.piece == Piece::Pawn {
                if mv.captured_piece.is_some() {
                    text.push(square_name(mv.from).remove(0));
                }
            } else {
                text.push(mv.piece.letter());
                text.push_str(&self.disambiguation(mv));
            }
            if mv.captured_piece.is_some() {
                text.push('x');
            }
            text.push_str(&square_name(mv.to));
            if let Some(promotion) = mv.promotion {
                text.push('=');
                text.push(promotion.letter());
            }
            text
        };

        let mut after = self.clone();
        after.make_move(*mv);
        match after.game_state() {
            GameState::Checkmate(_) => text.push('#'),
            _ if after.is_check() => text.push('+'),
            _ => {}
        }
        text
    }

    fn disambiguation(&self, mv: &Move) -> String {
        let rivals: Vec<Move> = MoveGenerator::new()
            .generate_moves(self)
            .into_iter()
            .filter(|other| other.piece == mv.piece && other.to == mv.to && other.from != mv.from)
            .collect();
        if rivals.is_empty() {
            return String::new();
        }

        let name = square_name(mv.from);
        if rivals.iter().all(|other| other.from % 8 != mv.from % 8) {
            name[..1].to_string()
        } else if rivals.iter().all(|other| other.from / 8 != mv.from / 8) {
            name[1..].to_string()
        } else {
            name
        }
    }

    pub fn parse_uci(&self, text: &str) -> Result<Move, InvalidMoveError> {
        let malformed = || InvalidMoveError::Malformed(text.to_string());
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(malformed());
        }
        let from = parse_square(&text[0..2]).ok_or_else(malformed)?;
        let to = parse_square(&text[2..4]).ok_or_else(malformed)?;
        let promotion = match text[4..].chars().next() {
            Some(c) => match Piece::from_letter(c) {
                Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(piece),
                _ => return Err(malformed()),
            },
            None => None,
        };

        MoveGenerator::new()
            .generate_moves(self)
            .into_iter()
            .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
            .ok_or_else(|| InvalidMoveError::Illegal(text.to_string()))
    }

    // Coordinate notation is accepted too.
    pub fn parse_san(&self, text: &str) -> Result<Move, InvalidMoveError> {
        let trimmed = text.trim().trim_end_matches(['+', '#', '!', '?']);
        if trimmed.is_empty() {
            return Err(InvalidMoveError::Malformed(text.to_string()));
        }

        let legal = MoveGenerator::new().generate_moves(self);

        let castle = match trimmed {
            "O-O" | "0-0" => Some(true),
            "O-O-O" | "0-0-0" => Some(false),
            _ => None,
        };
        if let Some(kingside) = castle {
            return legal
                .into_iter()
                .find(|mv| mv.is_castling && (mv.to > mv.from) == kingside)
                .ok_or_else(|| InvalidMoveError::Illegal(text.to_string()));
        }

        if is_uci_shaped(trimmed) {
            return self.parse_uci(trimmed);
        }

        let pattern = SanPattern::parse(trimmed).ok_or_else(|| InvalidMoveError::Malformed(text.to_string()))?;
        let mut candidates = legal.into_iter().filter(|mv| pattern.matches(mv));
        match (candidates.next(), candidates.next()) {
            (Some(mv), None) => Ok(mv),
            (None, _) => Err(InvalidMoveError::Illegal(text.to_string())),
            (Some(_), Some(_)) => Err(InvalidMoveError::Ambiguous(text.to_string())),
        }
    }
}

fn is_uci_shaped(text: &str) -> bool {
    let bytes = text.as_bytes();
    (bytes.len() == 4 || bytes.len() == 5)
        && matches!(bytes[0], b'a'..=b'h')
        && matches!(bytes[1], b'1'..=b'8')
        && matches!(bytes[2], b'a'..=b'h')
        && matches!(bytes[3], b'1'..=b'8')
}

#[derive(Debug, PartialEq, Eq)]
struct SanPattern {
    piece: Piece,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: u8,
    promotion: Option<Piece>,
}

impl SanPattern {
    fn parse(text: &str) -> Option<Self> {
        let mut rest = text;

        let piece = match rest.chars().next()? {
            c @ ('N' | 'B' | 'R' | 'Q' | 'K') => {
                rest = &rest[1..];
                Piece::from_letter(c)?
            }
            _ => Piece::Pawn,
        };

        let mut promotion = None;
        if let Some(last) = rest.chars().last() {
            if matches!(last, 'N' | 'B' | 'R' | 'Q' | 'n' | 'b' | 'r' | 'q') && rest.len() >= 3 {
                promotion = Piece::from_letter(last);
                rest = &rest[..rest.len() - 1];
                rest = rest.strip_suffix('=').unwrap_or(rest);
            }
        }
        if promotion.is_some() && piece != Piece::Pawn {
            return None;
        }

        if rest.len() < 2 || !rest.is_ascii() {
            return None;
        }
        let (prefix, target) = rest.split_at(rest.len() - 2);
        let to = parse_square(target)?;

        let prefix = prefix.strip_suffix(['x', '-']).unwrap_or(prefix);
        let mut from_file = None;
        let mut from_rank = None;
        for c in prefix.chars() {
            match c {
                'a'..='h' if from_file.is_none() && from_rank.is_none() => from_file = Some(c as u8 - b'a'),
                '1'..='8' if from_rank.is_none() => from_rank = Some(c as u8 - b'1'),
                _ => return None,
            }
        }

        Some(Self {
            piece,
            from_file,
            from_rank,
            to,
            promotion,
        })
    }

    fn matches(&self, mv: &Move) -> bool {
        mv.piece == self.piece
            && mv.to == self.to
            && mv.promotion == self.promotion
            && !mv.is_castling
            && self.from_file.map_or(true, |file| mv.from % 8 == file)
            && self.from_rank.map_or(true, |rank| mv.from / 8 == rank)
    }
}
