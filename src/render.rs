use crate::board::{Board, Color, Piece};

const LIGHT_BG: &str = "\x1b[47m";
const DARK_BG: &str = "\x1b[42m";
const RESET: &str = "\x1b[0m";

const FILES: &str = "    a  b  c  d  e  f  g  h";

pub fn glyph(piece: Piece, color: Color) -> char {
    match (color, piece) {
        (Color::White, Piece::Pawn) => '♙',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::King) => '♔',
        (Color::Black, Piece::Pawn) => '♟',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::King) => '♚',
    }
}

pub fn render(board: &Board, colored: bool) -> String {
    let border = format!("  {}", "-".repeat(25));
    let mut out = String::new();
    out.push('\n');
    out.push_str(FILES);
    out.push('\n');
    out.push_str(&border);
    out.push('\n');

    for row in 0..8u8 {
        let rank = 7 - row;
        out.push_str(&format!("{} |", rank + 1));
        for file in 0..8u8 {
            let symbol = board
                .get_piece_at(rank * 8 + file)
                .map_or('.', |(piece, color)| glyph(piece, color));
            if colored {
                let background = if (row + file) % 2 == 0 { LIGHT_BG } else { DARK_BG };
                out.push_str(&format!("{background} {symbol} {RESET}"));
            } else {
                out.push_str(&format!(" {symbol} "));
            }
        }
        out.push_str(&format!("| {}\n", rank + 1));
    }

    out.push_str(&border);
    out.push('\n');
    out.push_str(FILES);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render_of_start_position() {
        let text = render(&Board::new(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], FILES);
        assert_eq!(lines[3], "8 | ♜  ♞  ♝  ♛  ♚  ♝  ♞  ♜ | 8");
        assert_eq!(lines[5], "6 | .  .  .  .  .  .  .  . | 6");
        assert_eq!(lines[10], "1 | ♖  ♘  ♗  ♕  ♔  ♗  ♘  ♖ | 1");
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn colored_render_alternates_backgrounds() {
        let text = render(&Board::new(), true);
        let rank_eight = text.lines().nth(3).unwrap();
        assert!(rank_eight.starts_with(&format!("8 |{LIGHT_BG} ♜ {RESET}{DARK_BG} ♞ {RESET}")));
    }
}
