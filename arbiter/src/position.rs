/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Deref, Index},
};

use anyhow::{bail, Result};

use super::{Color, MoveRecord, Piece, PieceKind, Square, BOARD_SIZE};

/// Whether a king is currently attacked, and by whom.
///
/// Recomputed after every committed move. Rejected and simulated moves never touch it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CheckState {
    /// `true` if the opponent of the last mover has their King attacked.
    pub in_check: bool,

    /// The color whose King is attacked, if any.
    pub checked: Option<Color>,

    /// Square of the piece delivering check.
    ///
    /// When the moved piece gives check it is reported, otherwise the discovered checker.
    pub checker: Option<Square>,

    /// `true` if the checked side has no legal move left.
    pub checkmate: bool,
}

/// The 8x8 grid of occupants.
///
/// Every square holds exactly one occupant: `None` (empty) or `Some(piece)`.
/// This mailbox is the only record of where a piece stands.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    mailbox: [Option<Piece>; Square::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] containing no pieces.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            mailbox: [None; Square::COUNT],
        }
    }

    /// Returns `true` if there is a piece at the given [`Square`], else `false`.
    #[inline(always)]
    pub const fn has(&self, square: Square) -> bool {
        self.mailbox[square.index()].is_some()
    }

    /// Fetches the [`Piece`] at the provided [`Square`], if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()]
    }

    /// Fetches the [`Color`] of the piece at the provided [`Square`], if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Places the provided [`Piece`] on the supplied [`Square`], replacing any occupant.
    #[inline(always)]
    pub(crate) fn place(&mut self, piece: Piece, square: Square) {
        self.mailbox[square.index()] = Some(piece);
    }

    /// Takes the [`Piece`] from a given [`Square`], if there is one present, leaving it empty.
    #[inline(always)]
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.mailbox[square.index()].take()
    }

    /// Iterates over every occupied square and its piece, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Iterates over every square holding a piece of `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.iter().filter(move |(_, piece)| piece.is(color))
    }

    /// Finds the square of `color`'s King.
    ///
    /// Yields `None` when that King is absent, which callers treat as "not in check".
    pub fn king(&self, color: Color) -> Option<Square> {
        self.iter()
            .find(|(_, piece)| piece.is_a(color, PieceKind::King))
            .map(|(square, _)| square)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.mailbox[index.index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            write!(f, "{row}| ")?;
            for col in 0..BOARD_SIZE {
                match self.piece_at(Square::new_unchecked(row, col)) {
                    Some(piece) => write!(f, "{piece} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, " +")?;
        for _ in 0..BOARD_SIZE {
            write!(f, "--")?;
        }
        write!(f, "\n   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, "{col} ")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// The full rules state: the [`Board`], the [`CheckState`] and the en-passant window.
///
/// A [`Position`] is a plain `Copy` value. Simulating a move copies it, so nothing done to a
/// simulated copy can reach the original.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// The grid of pieces.
    pub(crate) board: Board,

    /// Check status after the last committed move.
    pub(crate) check: CheckState,

    /// Square of the Pawn that completed a two-square advance on the last committed move.
    ///
    /// Cleared by the next committed move, whatever it is.
    pub(crate) ep_pawn: Option<Square>,
}

impl Position {
    /// Creates a new [`Position`] with no pieces, no check and no en-passant window.
    ///
    /// # Example
    /// ```
    /// # use arbiter::Position;
    /// let position = Position::empty();
    /// assert_eq!(position.iter().count(), 0);
    /// assert!(!position.is_in_check());
    /// ```
    pub const fn empty() -> Self {
        Self {
            board: Board::new(),
            check: CheckState {
                in_check: false,
                checked: None,
                checker: None,
                checkmate: false,
            },
            ep_pawn: None,
        }
    }

    /// Creates the standard starting setup: Black on rows `0..=1`, White on rows `6..=7`.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, PieceKind, Position, Square};
    /// let position = Position::standard();
    /// assert_eq!(position.iter().count(), 32);
    /// assert_eq!(position.king(Color::White), Square::new(7, 4).ok());
    /// let queen = position.piece_at(Square::new(0, 3).unwrap()).unwrap();
    /// assert!(queen.is_a(Color::Black, PieceKind::Queen));
    /// ```
    pub fn standard() -> Self {
        const BACK_ROW: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut position = Self::empty();
        for color in Color::all() {
            for (col, kind) in BACK_ROW.into_iter().enumerate() {
                let col = col as u8;
                position.board.place(
                    Piece::new(color, kind),
                    Square::new_unchecked(color.back_row(), col),
                );
                position.board.place(
                    Piece::new(color, PieceKind::Pawn),
                    Square::new_unchecked(color.pawn_row(), col),
                );
            }
        }
        position
    }

    /// Places `piece` on an empty `square` during setup.
    ///
    /// Fails if the square is occupied, or if `piece` is a King and its color already has one.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Color, Piece, PieceKind, Position, Square};
    /// let mut position = Position::empty();
    /// let king = Piece::new(Color::White, PieceKind::King);
    /// position.place(king, Square::new(7, 4).unwrap()).unwrap();
    ///
    /// // Only one King per color
    /// assert!(position.place(king, Square::new(7, 0).unwrap()).is_err());
    /// // Only one occupant per square
    /// let rook = Piece::new(Color::Black, PieceKind::Rook);
    /// assert!(position.place(rook, Square::new(7, 4).unwrap()).is_err());
    /// ```
    pub fn place(&mut self, piece: Piece, square: Square) -> Result<()> {
        if let Some(occupant) = self.board.piece_at(square) {
            bail!("Cannot place {piece:?} on {square}: already occupied by {occupant:?}");
        }

        if piece.kind() == PieceKind::King {
            if let Some(existing) = self.board.king(piece.color()) {
                bail!(
                    "Cannot place a second {} king on {square}: one already stands on {existing}",
                    piece.color()
                );
            }
        }

        self.board.place(piece, square);
        Ok(())
    }

    /// Removes and returns whatever stands on `square` during setup.
    pub fn clear(&mut self, square: Square) -> Option<Piece> {
        self.board.take(square)
    }

    /// The underlying [`Board`].
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Check status as of the last committed move.
    #[inline(always)]
    pub const fn check_state(&self) -> CheckState {
        self.check
    }

    /// `true` if the last committed move left the opponent's King attacked.
    #[inline(always)]
    pub const fn is_in_check(&self) -> bool {
        self.check.in_check
    }

    /// `true` if the last committed move checkmated the opponent.
    #[inline(always)]
    pub const fn is_checkmate(&self) -> bool {
        self.check.checkmate
    }

    /// Square of the Pawn that may be captured en passant on the next move, if any.
    #[inline(always)]
    pub const fn en_passant(&self) -> Option<Square> {
        self.ep_pawn
    }

    /// The square a Pawn of `color` would move to in order to capture en passant, if that is
    /// currently possible.
    ///
    /// This is the square the opposing Pawn passed over during its two-square advance.
    pub fn en_passant_target(&self, color: Color) -> Option<Square> {
        let ep_pawn = self.ep_pawn?;
        let victim = self.board.piece_at(ep_pawn)?;
        if victim.is(color) || victim.kind() != PieceKind::Pawn {
            return None;
        }

        // The passed-over square lies one row "behind" the victim, toward where it started.
        ep_pawn.offset(color.forward(), 0)
    }

    /// Copies `self` and returns a [`Position`] with the move `from -> to` applied, legal or not.
    ///
    /// Only the copy changes. Used to ask "would this leave my King attacked?" and then thrown away.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Position, Square};
    /// let position = Position::standard();
    /// let (from, to) = (Square::new(6, 4).unwrap(), Square::new(4, 4).unwrap());
    /// let simulated = position.with_move_simulated(from, to);
    ///
    /// assert!(simulated.board().has(to));
    /// assert!(!position.board().has(to));
    /// ```
    pub fn with_move_simulated(&self, from: Square, to: Square) -> Self {
        let mut copied = *self;
        copied.apply(from, to);
        copied
    }

    /// Moves the piece on `from` to `to` with no legality enforcement.
    ///
    /// This is the only routine that relocates pieces. It vacates `from`, captures whatever
    /// stood on `to`, removes a Pawn taken en passant, promotes a Pawn reaching its far row,
    /// marks the mover as moved, and opens or closes the en-passant window.
    ///
    /// Yields `None`, changing nothing, if `from` is empty. The returned record's check state is
    /// left at its default; the caller fills it in.
    pub(crate) fn apply(&mut self, from: Square, to: Square) -> Option<MoveRecord> {
        let piece = self.board.take(from)?;
        let color = piece.color();
        let is_pawn = piece.kind() == PieceKind::Pawn;
        let (d_row, d_col) = from.delta_to(to);

        let mut captured = self.board.take(to).map(|victim| (to, victim));

        // En passant: a one-row diagonal Pawn step onto the square the enemy Pawn passed over
        let mut en_passant = false;
        if is_pawn && captured.is_none() && d_row.abs() == 1 && d_col.abs() == 1 {
            if let Some(ep_pawn) = self.ep_pawn {
                let behind_target = to.offset(-color.forward(), 0);
                let victim_is_enemy_pawn = self
                    .board
                    .piece_at(ep_pawn)
                    .is_some_and(|victim| victim.is_a(color.opponent(), PieceKind::Pawn));

                if to.col() == ep_pawn.col() && behind_target == Some(ep_pawn) && victim_is_enemy_pawn
                {
                    captured = self.board.take(ep_pawn).map(|victim| (ep_pawn, victim));
                    en_passant = captured.is_some();
                }
            }
        }

        let promoted = is_pawn && to.row() == color.promotion_row();
        let landed = if promoted {
            Piece::new(color, PieceKind::Queen)
        } else {
            piece.as_moved()
        };
        self.board.place(landed, to);

        let double_step = is_pawn && d_row.abs() == 2;
        self.ep_pawn = double_step.then_some(to);

        Some(MoveRecord {
            from,
            to,
            piece,
            captured,
            promoted,
            en_passant,
            double_step,
            check: CheckState::default(),
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl Deref for Position {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

impl Index<Square> for Position {
    type Output = Option<Piece>;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self.board[index]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "Check: {:?}\nEn passant: ", self.check)?;
        match self.ep_pawn {
            Some(square) => write!(f, "{square}"),
            None => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_standard_setup_is_symmetric() {
        let position = Position::standard();
        for square in Square::iter() {
            let mirrored = sq(7 - square.row(), square.col());
            match (position.piece_at(square), position.piece_at(mirrored)) {
                (Some(a), Some(b)) => {
                    assert_eq!(a.kind(), b.kind());
                    assert_eq!(a.color(), b.color().opponent());
                }
                (None, None) => {}
                _ => panic!("{square} and {mirrored} differ"),
            }
        }
    }

    #[test]
    fn test_apply_vacates_source_and_marks_moved() {
        let mut position = Position::standard();
        let record = position.apply(sq(7, 1), sq(5, 2)).unwrap();

        assert!(!position.has(sq(7, 1)));
        let knight = position.piece_at(sq(5, 2)).unwrap();
        assert!(knight.has_moved());
        assert!(!record.piece.has_moved());
        assert_eq!(record.captured, None);
        assert_eq!(position.en_passant(), None);
    }

    #[test]
    fn test_apply_on_empty_square_changes_nothing() {
        let mut position = Position::standard();
        let before = position;
        assert!(position.apply(sq(4, 4), sq(3, 4)).is_none());
        assert_eq!(position, before);
    }

    #[test]
    fn test_double_step_opens_window_and_next_move_closes_it() {
        let mut position = Position::standard();
        position.apply(sq(1, 3), sq(3, 3));
        assert_eq!(position.en_passant(), Some(sq(3, 3)));
        assert_eq!(position.en_passant_target(Color::White), Some(sq(2, 3)));
        assert_eq!(position.en_passant_target(Color::Black), None);

        position.apply(sq(7, 6), sq(5, 5));
        assert_eq!(position.en_passant(), None);
    }

    #[test]
    fn test_clear_and_place_round_trip() {
        let mut position = Position::standard();
        let rook = position.clear(sq(0, 0)).unwrap();
        assert!(!position.has(sq(0, 0)));
        position.place(rook, sq(0, 0)).unwrap();
        assert_eq!(position, Position::standard());
    }

    #[test]
    fn test_board_display_has_one_line_per_row() {
        let rendered = Position::standard().to_string();
        assert_eq!(rendered.lines().count(), 10);
        assert!(rendered.starts_with("0| r n b q k b n r"));
    }
}
