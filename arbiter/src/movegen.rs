/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use arrayvec::ArrayVec;

use super::{
    Color, Piece, PieceKind, Position, Rejection, Square, BISHOP_DIRECTIONS, KING_OFFSETS,
    KNIGHT_OFFSETS, MAX_NUM_DESTINATIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS,
};

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_DESTINATIONS`] squares.
pub type MoveList = ArrayVec<Square, MAX_NUM_DESTINATIONS>;

/// Every on-board square a piece's geometry reaches, paired with the verdict of the
/// occupancy filters for that square.
pub type Candidates = ArrayVec<(Square, Result<(), Rejection>), MAX_NUM_DESTINATIONS>;

/// Movement capability shared by every piece kind.
///
/// Implementors only describe their geometry and filters through [`PieceRules::candidates`];
/// the pseudo-legal destination set and the target predicate are derived from it, so the two
/// can never disagree.
pub trait PieceRules: Sync {
    /// Enumerates the on-board squares this kind's geometry reaches from `from`, each with
    /// `Ok(())` if it passes the occupancy filters or the reason it does not.
    fn candidates(&self, position: &Position, from: Square, piece: Piece) -> Candidates;

    /// All pseudo-legal destinations of `piece` standing on `from`.
    ///
    /// Pseudo-legal means consistent with geometry and occupancy, without regard to whether
    /// the move would expose the mover's own King. Squares holding the enemy King are included,
    /// so this doubles as the piece's attack set.
    fn destinations(&self, position: &Position, from: Square, piece: Piece) -> MoveList {
        self.candidates(position, from, piece)
            .into_iter()
            .filter_map(|(square, verdict)| verdict.ok().map(|_| square))
            .collect()
    }

    /// Decides whether `piece` on `from` may move to `to`, ignoring self-check.
    fn check_target(
        &self,
        position: &Position,
        from: Square,
        to: Square,
        piece: Piece,
    ) -> Result<(), Rejection> {
        self.candidates(position, from, piece)
            .into_iter()
            .find(|(square, _)| *square == to)
            .map_or(Err(Rejection::Unreachable), |(_, verdict)| verdict)?;

        // Kings are never captured
        if position
            .piece_at(to)
            .is_some_and(|victim| victim.is_a(piece.color().opponent(), PieceKind::King))
        {
            return Err(Rejection::KingCapture);
        }

        Ok(())
    }
}

/// Fetches the movement rules for a [`PieceKind`].
///
/// # Example
/// ```
/// # use arbiter::{rules_for, Color, Piece, PieceKind, Position, Square};
/// let position = Position::standard();
/// let knight = Piece::new(Color::White, PieceKind::Knight);
/// let from = Square::new(7, 1).unwrap();
///
/// let destinations = rules_for(PieceKind::Knight).destinations(&position, from, knight);
/// assert_eq!(destinations.len(), 2);
/// ```
#[inline(always)]
pub fn rules_for(kind: PieceKind) -> &'static dyn PieceRules {
    match kind {
        PieceKind::Pawn => &PAWN,
        PieceKind::Knight => &KNIGHT,
        PieceKind::Bishop => &BISHOP,
        PieceKind::Rook => &ROOK,
        PieceKind::Queen => &QUEEN,
        PieceKind::King => &KING,
    }
}

static PAWN: PawnRules = PawnRules;
static KNIGHT: LeaperRules = LeaperRules {
    offsets: &KNIGHT_OFFSETS,
};
static KING: LeaperRules = LeaperRules {
    offsets: &KING_OFFSETS,
};
static BISHOP: SliderRules = SliderRules {
    directions: &BISHOP_DIRECTIONS,
};
static ROOK: SliderRules = SliderRules {
    directions: &ROOK_DIRECTIONS,
};
static QUEEN: SliderRules = SliderRules {
    directions: &QUEEN_DIRECTIONS,
};

/// Rejects squares held by the mover's own color.
#[inline(always)]
fn not_own_piece(position: &Position, square: Square, color: Color) -> Result<(), Rejection> {
    if position.color_at(square) == Some(color) {
        Err(Rejection::OwnPieceAtTarget)
    } else {
        Ok(())
    }
}

/// Pawns.
///
/// An unmoved Pawn may step forward one or two squares. A Pawn that has moved may step forward
/// one square or capture one square diagonally forward.
pub struct PawnRules;

impl PawnRules {
    /// Candidate `(row, column)` offsets for a Pawn of `color`.
    fn offsets(color: Color, has_moved: bool) -> ArrayVec<(i8, i8), 3> {
        let forward = color.forward();
        let mut offsets = ArrayVec::new();
        if has_moved {
            offsets.push((forward, -1));
            offsets.push((forward, 1));
            offsets.push((forward, 0));
        } else {
            offsets.push((forward * 2, 0));
            offsets.push((forward, 0));
        }
        offsets
    }
}

impl PieceRules for PawnRules {
    fn candidates(&self, position: &Position, from: Square, piece: Piece) -> Candidates {
        let color = piece.color();
        let ep_target = position.en_passant_target(color);

        Self::offsets(color, piece.has_moved())
            .into_iter()
            .filter_map(|(d_row, d_col)| {
                let to = from.offset(d_row, d_col)?;
                let occupant = position.piece_at(to);

                let verdict = not_own_piece(position, to, color).and_then(|_| {
                    if d_col != 0 {
                        // Diagonals only capture; the en-passant square counts as a capture
                        if occupant.is_none() && ep_target != Some(to) {
                            return Err(Rejection::DiagonalWithoutCapture);
                        }
                    } else if occupant.is_some() {
                        return Err(Rejection::StraightIntoOccupied);
                    }
                    Ok(())
                });

                Some((to, verdict))
            })
            .collect()
    }
}

/// Knights and Kings: a fixed set of jumps, blocked only by the mover's own pieces.
pub struct LeaperRules {
    offsets: &'static [(i8, i8)],
}

impl PieceRules for LeaperRules {
    fn candidates(&self, position: &Position, from: Square, piece: Piece) -> Candidates {
        self.offsets
            .iter()
            .filter_map(|&(d_row, d_col)| {
                let to = from.offset(d_row, d_col)?;
                Some((to, not_own_piece(position, to, piece.color())))
            })
            .collect()
    }
}

/// Bishops, Rooks and Queens: rays that stop at the first occupied square.
pub struct SliderRules {
    directions: &'static [(i8, i8)],
}

impl PieceRules for SliderRules {
    fn candidates(&self, position: &Position, from: Square, piece: Piece) -> Candidates {
        let mut candidates = Candidates::new();

        for &(d_row, d_col) in self.directions {
            let mut blocked = false;
            let mut current = from;

            while let Some(to) = current.offset(d_row, d_col) {
                let verdict = if blocked {
                    Err(Rejection::PathBlocked)
                } else {
                    not_own_piece(position, to, piece.color())
                };
                candidates.push((to, verdict));

                blocked |= position.has(to);
                current = to;
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    fn setup(pieces: &[(char, u8, u8)]) -> Position {
        let mut position = Position::empty();
        for &(c, row, col) in pieces {
            position.place(Piece::from_uci(c).unwrap(), sq(row, col)).unwrap();
        }
        position
    }

    fn destinations_of(position: &Position, from: Square) -> Vec<Square> {
        let piece = position.piece_at(from).unwrap();
        let mut squares = rules_for(piece.kind()).destinations(position, from, piece).to_vec();
        squares.sort();
        squares
    }

    #[test]
    fn test_unmoved_pawn_steps_one_or_two() {
        let position = Position::standard();
        assert_eq!(destinations_of(&position, sq(6, 4)), vec![sq(4, 4), sq(5, 4)]);
        assert_eq!(destinations_of(&position, sq(1, 2)), vec![sq(2, 2), sq(3, 2)]);
    }

    #[test]
    fn test_moved_pawn_captures_diagonally_only() {
        let mut position = setup(&[('n', 4, 3), ('N', 4, 5)]);
        let pawn = Piece::new(Color::White, PieceKind::Pawn).as_moved();
        position.place(pawn, sq(5, 4)).unwrap();

        let rules = rules_for(PieceKind::Pawn);
        assert_eq!(destinations_of(&position, sq(5, 4)), vec![sq(4, 3), sq(4, 4)]);
        assert_eq!(
            rules.check_target(&position, sq(5, 4), sq(4, 5), pawn),
            Err(Rejection::OwnPieceAtTarget)
        );
        assert_eq!(
            rules.check_target(&position, sq(5, 4), sq(3, 4), pawn),
            Err(Rejection::Unreachable)
        );
    }

    #[test]
    fn test_pawn_diagonal_needs_a_capture() {
        let mut position = Position::empty();
        let pawn = Piece::new(Color::Black, PieceKind::Pawn).as_moved();
        position.place(pawn, sq(2, 2)).unwrap();

        assert_eq!(
            PAWN.check_target(&position, sq(2, 2), sq(3, 3), pawn),
            Err(Rejection::DiagonalWithoutCapture)
        );
        assert_eq!(PAWN.check_target(&position, sq(2, 2), sq(3, 2), pawn), Ok(()));
    }

    #[test]
    fn test_pawn_cannot_capture_head_on() {
        let position = setup(&[('P', 6, 0), ('p', 5, 0), ('P', 6, 1), ('p', 4, 1)]);
        let pawn = Piece::new(Color::White, PieceKind::Pawn);

        assert_eq!(
            PAWN.check_target(&position, sq(6, 0), sq(5, 0), pawn),
            Err(Rejection::StraightIntoOccupied)
        );
        // Only the landing square matters for the double step
        assert_eq!(PAWN.check_target(&position, sq(6, 0), sq(4, 0), pawn), Ok(()));
        assert_eq!(
            PAWN.check_target(&position, sq(6, 1), sq(4, 1), pawn),
            Err(Rejection::StraightIntoOccupied)
        );
        assert_eq!(PAWN.check_target(&position, sq(6, 1), sq(5, 1), pawn), Ok(()));
    }

    #[test]
    fn test_knight_jumps_over_pieces() {
        let position = Position::standard();
        assert_eq!(destinations_of(&position, sq(7, 6)), vec![sq(5, 5), sq(5, 7)]);

        let corner = setup(&[('n', 0, 0)]);
        assert_eq!(destinations_of(&corner, sq(0, 0)), vec![sq(1, 2), sq(2, 1)]);
    }

    #[test]
    fn test_sliders_stop_at_first_blocker() {
        let position = setup(&[('R', 4, 4), ('p', 4, 6), ('P', 2, 4)]);
        let rook = position.piece_at(sq(4, 4)).unwrap();

        let destinations = destinations_of(&position, sq(4, 4));
        assert!(destinations.contains(&sq(4, 6)));
        assert!(!destinations.contains(&sq(4, 7)));
        assert!(destinations.contains(&sq(3, 4)));
        assert!(!destinations.contains(&sq(2, 4)));
        assert_eq!(destinations.len(), 4 + 2 + 1 + 3);

        assert_eq!(
            ROOK.check_target(&position, sq(4, 4), sq(4, 7), rook),
            Err(Rejection::PathBlocked)
        );
        assert_eq!(
            ROOK.check_target(&position, sq(4, 4), sq(2, 4), rook),
            Err(Rejection::OwnPieceAtTarget)
        );
        assert_eq!(
            ROOK.check_target(&position, sq(4, 4), sq(3, 3), rook),
            Err(Rejection::Unreachable)
        );
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        let position = setup(&[('Q', 3, 3), ('b', 1, 1), ('N', 3, 6)]);
        let queen = position.piece_at(sq(3, 3)).unwrap();

        let mut union: Vec<Square> = ROOK
            .destinations(&position, sq(3, 3), queen)
            .into_iter()
            .chain(BISHOP.destinations(&position, sq(3, 3), queen))
            .collect();
        union.sort();

        assert_eq!(destinations_of(&position, sq(3, 3)), union);
        assert_eq!(union.len(), 12 + 12);
    }

    #[test]
    fn test_king_steps_once_and_never_captures_a_king() {
        let position = setup(&[('K', 7, 4), ('k', 6, 5), ('R', 7, 3)]);
        let king = position.piece_at(sq(7, 4)).unwrap();

        assert_eq!(
            destinations_of(&position, sq(7, 4)),
            vec![sq(6, 3), sq(6, 4), sq(6, 5), sq(7, 5)]
        );
        assert_eq!(
            KING.check_target(&position, sq(7, 4), sq(6, 5), king),
            Err(Rejection::KingCapture)
        );
        assert_eq!(
            KING.check_target(&position, sq(7, 4), sq(5, 4), king),
            Err(Rejection::Unreachable)
        );
    }
}
