//! Board state and rules, backed by shakmaty.
//!
//! The driver owns exactly one [`GameBoard`] per run and mutates it
//! through this adapter only. Undo history is one move deep, which is
//! all the suggested-move probe needs.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position, Role, Square};
use thiserror::Error;

use uci_engine::SuggestedMove;

/// Errors from applying moves or seeding a position.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The FEN string could not be turned into a legal position.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    /// The move is not legal (or not unambiguous) in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// The live position of an analysis run.
#[derive(Debug, Clone)]
pub struct GameBoard {
    pos: Chess,
    prev: Option<Chess>,
}

impl GameBoard {
    /// A board at the standard starting position.
    pub fn startpos() -> Self {
        Self {
            pos: Chess::default(),
            prev: None,
        }
    }

    /// A board seeded from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|_| BoardError::InvalidFen(fen.to_string()))?;
        let pos = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| BoardError::InvalidFen(fen.to_string()))?;
        Ok(Self { pos, prev: None })
    }

    /// Whose turn it is.
    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// The canonical encoding of the current position, used for
    /// equality comparison between two boards.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// Applies a move in standard algebraic notation.
    pub fn play_san(&mut self, san: &str) -> Result<(), BoardError> {
        let parsed: SanPlus = san
            .parse()
            .map_err(|_| BoardError::IllegalMove(san.to_string()))?;
        let mv = parsed
            .san
            .to_move(&self.pos)
            .map_err(|_| BoardError::IllegalMove(san.to_string()))?;
        self.prev = Some(self.pos.clone());
        self.pos.play_unchecked(mv);
        Ok(())
    }

    /// Applies a coordinate move. A pawn reaching the last rank with no
    /// promotion piece supplied promotes to a queen.
    pub fn play_suggested(&mut self, suggested: &SuggestedMove) -> Result<(), BoardError> {
        let coord = self.with_default_promotion(suggested);
        let parsed: UciMove = coord
            .parse()
            .map_err(|_| BoardError::IllegalMove(coord.clone()))?;
        let mv = parsed
            .to_move(&self.pos)
            .map_err(|_| BoardError::IllegalMove(coord.clone()))?;
        self.prev = Some(self.pos.clone());
        self.pos.play_unchecked(mv);
        Ok(())
    }

    /// Reverts the most recent apply. Returns `false` if there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.prev.take() {
            Some(prev) => {
                self.pos = prev;
                true
            }
            None => false,
        }
    }

    fn with_default_promotion(&self, suggested: &SuggestedMove) -> String {
        if suggested.promotion.is_none() && self.is_pawn_to_last_rank(suggested) {
            return format!("{}{}q", suggested.from, suggested.to);
        }
        suggested.to_string()
    }

    fn is_pawn_to_last_rank(&self, suggested: &SuggestedMove) -> bool {
        let is_pawn = Square::from_ascii(suggested.from.as_bytes())
            .ok()
            .and_then(|sq| self.pos.board().piece_at(sq))
            .is_some_and(|piece| piece.role == Role::Pawn);
        is_pawn && (suggested.to.ends_with('1') || suggested.to.ends_with('8'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggested(token: &str) -> SuggestedMove {
        token.parse().unwrap()
    }

    #[test]
    fn test_startpos_turn_and_fen() {
        let board = GameBoard::startpos();
        assert_eq!(board.turn(), Color::White);
        assert!(board.fen().starts_with("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"));
    }

    #[test]
    fn test_from_fen_seeds_position() {
        let board = GameBoard::from_fen("8/8/8/8/8/8/k6K/8 b - - 0 1").unwrap();
        assert_eq!(board.turn(), Color::Black);
    }

    #[test]
    fn test_from_fen_rejects_garbage() {
        assert!(matches!(
            GameBoard::from_fen("not a fen"),
            Err(BoardError::InvalidFen(_))
        ));
    }

    #[test]
    fn test_san_and_coordinate_reach_same_encoding() {
        let mut by_san = GameBoard::startpos();
        by_san.play_san("Nf3").unwrap();

        let mut by_coord = GameBoard::startpos();
        by_coord.play_suggested(&suggested("g1f3")).unwrap();

        assert_eq!(by_san.fen(), by_coord.fen());
    }

    #[test]
    fn test_illegal_san_is_rejected() {
        let mut board = GameBoard::startpos();
        assert!(matches!(
            board.play_san("Ke2"),
            Err(BoardError::IllegalMove(_))
        ));
        // The board is untouched after a rejected move.
        assert_eq!(board.turn(), Color::White);
    }

    #[test]
    fn test_illegal_coordinate_is_rejected() {
        let mut board = GameBoard::startpos();
        assert!(matches!(
            board.play_suggested(&suggested("e2e5")),
            Err(BoardError::IllegalMove(_))
        ));
    }

    #[test]
    fn test_undo_is_one_deep() {
        let mut board = GameBoard::startpos();
        let initial = board.fen();

        board.play_san("e4").unwrap();
        assert_ne!(board.fen(), initial);
        assert!(board.undo());
        assert_eq!(board.fen(), initial);
        // History does not stack.
        assert!(!board.undo());
    }

    #[test]
    fn test_probe_then_real_move() {
        let mut board = GameBoard::startpos();

        board.play_suggested(&suggested("e2e4")).unwrap();
        let predicted = board.fen();
        board.undo();

        board.play_san("e4").unwrap();
        assert_eq!(board.fen(), predicted);
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        // White pawn on b7 about to promote.
        let mut board = GameBoard::from_fen("8/1P6/8/8/8/8/k6K/8 w - - 0 1").unwrap();
        board.play_suggested(&suggested("b7b8")).unwrap();

        let mut explicit = GameBoard::from_fen("8/1P6/8/8/8/8/k6K/8 w - - 0 1").unwrap();
        explicit.play_san("b8=Q").unwrap();

        assert_eq!(board.fen(), explicit.fen());
    }

    #[test]
    fn test_explicit_underpromotion_kept() {
        let mut board = GameBoard::from_fen("8/1P6/8/8/8/8/k6K/8 w - - 0 1").unwrap();
        board.play_suggested(&suggested("b7b8n")).unwrap();

        let mut explicit = GameBoard::from_fen("8/1P6/8/8/8/8/k6K/8 w - - 0 1").unwrap();
        explicit.play_san("b8=N").unwrap();

        assert_eq!(board.fen(), explicit.fen());
    }
}
