use thiserror::Error;

use crate::board::Color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMoveError {
    #[error("invalid move notation: {0:?}")]
    Malformed(String),

    #[error("illegal move in this position: {0}")]
    Illegal(String),

    #[error("ambiguous move, add a file or rank: {0}")]
    Ambiguous(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("missing FEN field: {0}")]
    MissingField(&'static str),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid side to move: {0:?}")]
    SideToMove(String),

    #[error("invalid castling rights: {0:?}")]
    Castling(String),

    #[error("invalid en passant square: {0:?}")]
    EnPassant(String),

    #[error("invalid move counter: {0:?}")]
    Counter(String),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("no legal moves in a position the rules did not report as terminal")]
    NoLegalMoves,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("search depth must be between 1 and {max}, got {depth}")]
    Depth { depth: u32, max: u32 },

    #[error("invalid starting position")]
    Fen(#[from] FenError),
}
