/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use log::debug;
use thiserror::Error;

use super::{
    compute_check_state, is_king_attacked, rules_for, would_self_check, CheckState, MoveList,
    Piece, Position, Square,
};

/// Why a requested move was refused.
///
/// A rejected move never alters the [`Position`] it was tried on.
#[derive(Error, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Rejection {
    #[error("square lies off the board")]
    OutOfBounds,

    #[error("no piece stands on the source square")]
    NoPiece,

    #[error("target square holds a piece of the mover's own color")]
    OwnPieceAtTarget,

    #[error("another piece stands in the way")]
    PathBlocked,

    #[error("pawns may only move diagonally when capturing")]
    DiagonalWithoutCapture,

    #[error("pawns cannot move straight into an occupied square")]
    StraightIntoOccupied,

    #[error("piece cannot reach the target square")]
    Unreachable,

    #[error("kings cannot be captured")]
    KingCapture,

    #[error("move would leave the mover's own king attacked")]
    WouldSelfCheck,
}

/// Everything that happened during one committed move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,

    /// The moved piece as it stood on `from`, before moving or promoting.
    pub piece: Piece,

    /// The captured piece and the square it was taken from.
    ///
    /// For en passant that square differs from `to`.
    pub captured: Option<(Square, Piece)>,

    pub promoted: bool,
    pub en_passant: bool,

    /// `true` if a Pawn advanced two rows, opening an en-passant window.
    pub double_step: bool,

    /// Check status after this move.
    pub check: CheckState,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} -> {}",
            self.piece.color(),
            self.piece.kind(),
            self.from,
            self.to
        )?;

        if let Some((square, victim)) = self.captured {
            write!(f, " x {} {square}", victim.kind())?;
        }
        if self.en_passant {
            write!(f, " e.p.")?;
        }
        if self.promoted {
            write!(f, " =queen")?;
        }
        if self.check.checkmate {
            write!(f, " #")?;
        } else if self.check.in_check {
            write!(f, " +")?;
        }

        Ok(())
    }
}

/// Notified after every committed move, with the updated [`Position`].
///
/// Implemented for `()` (does nothing) and for any `FnMut(&Position, &MoveRecord)`.
pub trait CommitHook {
    fn on_commit(&mut self, position: &Position, record: &MoveRecord);
}

impl CommitHook for () {
    #[inline(always)]
    fn on_commit(&mut self, _position: &Position, _record: &MoveRecord) {}
}

impl<F: FnMut(&Position, &MoveRecord)> CommitHook for F {
    #[inline(always)]
    fn on_commit(&mut self, position: &Position, record: &MoveRecord) {
        self(position, record)
    }
}

impl Position {
    /// Attempts to move the piece on `from` to `to`.
    ///
    /// On success the move is committed and described by the returned [`MoveRecord`].
    /// On failure `self` is left exactly as it was.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Position, Rejection, Square};
    /// let mut position = Position::standard();
    /// let e2 = Square::new(6, 4).unwrap();
    /// let e4 = Square::new(4, 4).unwrap();
    ///
    /// let record = position.try_move(e2, e4).unwrap();
    /// assert!(record.double_step);
    /// assert_eq!(position.en_passant(), Some(e4));
    ///
    /// // Once moved, the double step is gone
    /// let e6 = Square::new(2, 4).unwrap();
    /// assert_eq!(position.try_move(e4, e6), Err(Rejection::Unreachable));
    /// ```
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, Rejection> {
        self.try_move_with(from, to, ())
    }

    /// Like [`Position::try_move`], invoking `hook` once the move has been committed.
    ///
    /// The hook is not called for rejected moves.
    pub fn try_move_with<H: CommitHook>(
        &mut self,
        from: Square,
        to: Square,
        mut hook: H,
    ) -> Result<MoveRecord, Rejection> {
        let (next, record) = self.vet(from, to).map_err(|reason| {
            debug!("Rejected {from} -> {to}: {reason}");
            reason
        })?;

        *self = next;
        debug!("Committed {record}");
        hook.on_commit(self, &record);

        Ok(record)
    }

    /// Like [`Position::try_move`], for raw signed `(row, column)` coordinates.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Position, Rejection};
    /// let mut position = Position::standard();
    /// assert_eq!(position.try_move_coords((6, 0), (6, -1)), Err(Rejection::OutOfBounds));
    /// assert!(position.try_move_coords((7, 1), (5, 2)).is_ok());
    /// ```
    pub fn try_move_coords(
        &mut self,
        (from_row, from_col): (i8, i8),
        (to_row, to_col): (i8, i8),
    ) -> Result<MoveRecord, Rejection> {
        let from = Square::from_coords(from_row, from_col).ok_or(Rejection::OutOfBounds)?;
        let to = Square::from_coords(to_row, to_col).ok_or(Rejection::OutOfBounds)?;
        self.try_move(from, to)
    }

    /// Moves the piece on `from` to `to` if the move is legal, returning whether it was.
    #[inline(always)]
    pub fn move_piece(&mut self, from: Square, to: Square) -> bool {
        self.try_move(from, to).is_ok()
    }

    /// Every square the piece on `from` could legally move to right now.
    ///
    /// Empty if `from` holds no piece.
    ///
    /// # Example
    /// ```
    /// # use arbiter::{Position, Square};
    /// let position = Position::standard();
    /// let knight = Square::new(0, 6).unwrap();
    /// assert_eq!(position.legal_destinations(knight).len(), 2);
    /// ```
    pub fn legal_destinations(&self, from: Square) -> MoveList {
        let Some(piece) = self.piece_at(from) else {
            return MoveList::new();
        };
        let rules = rules_for(piece.kind());

        rules
            .destinations(self, from, piece)
            .into_iter()
            .filter(|&to| {
                rules.check_target(self, from, to, piece).is_ok()
                    && !would_self_check(self, from, to)
            })
            .collect()
    }

    /// Builds the position that results from `from -> to` on a copy, passing it through
    /// both gates. `self` is never touched.
    fn vet(&self, from: Square, to: Square) -> Result<(Self, MoveRecord), Rejection> {
        let piece = self.piece_at(from).ok_or(Rejection::NoPiece)?;
        rules_for(piece.kind()).check_target(self, from, to, piece)?;

        let mut next = *self;
        let mut record = next.apply(from, to).ok_or(Rejection::NoPiece)?;

        if is_king_attacked(&next, piece.color()) {
            return Err(Rejection::WouldSelfCheck);
        }

        next.check = compute_check_state(&next, to, piece.color());
        record.check = next.check;

        Ok((next, record))
    }
}
