/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::{trace, warn};

use super::{rules_for, CheckState, Color, Position, Square};

/// Returns `true` if any piece of color `by` has `square` among its pseudo-legal destinations.
///
/// # Example
/// ```
/// # use arbiter::{is_under_attack, Color, Position, Square};
/// let position = Position::standard();
/// // Black's b-knight covers (2, 2)
/// assert!(is_under_attack(&position, Square::new(2, 2).unwrap(), Color::Black));
/// assert!(!is_under_attack(&position, Square::new(4, 4).unwrap(), Color::Black));
/// ```
pub fn is_under_attack(position: &Position, square: Square, by: Color) -> bool {
    attackers_of(position, square, by).next().is_some()
}

/// Iterates over the squares of every piece of color `by` that attacks `square`.
pub fn attackers_of(
    position: &Position,
    square: Square,
    by: Color,
) -> impl Iterator<Item = Square> + '_ {
    position
        .pieces_of(by)
        .filter(move |&(from, piece)| {
            rules_for(piece.kind())
                .destinations(position, from, piece)
                .contains(&square)
        })
        .map(|(from, _)| from)
}

/// Returns `true` if `color`'s King is attacked by any enemy piece.
///
/// A position lacking that King is reported as not in check.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    let Some(king) = position.king(color) else {
        warn!("No {color} king on the board; treating it as not in check");
        return false;
    };

    is_under_attack(position, king, color.opponent())
}

/// Returns `true` if moving the piece on `from` to `to` would leave its own King attacked.
///
/// The move is played on a copy of `position`, which is then discarded.
pub fn would_self_check(position: &Position, from: Square, to: Square) -> bool {
    let Some(piece) = position.piece_at(from) else {
        return false;
    };

    let simulated = position.with_move_simulated(from, to);
    let exposed = is_king_attacked(&simulated, piece.color());
    trace!("Simulated {piece:?} {from} -> {to}: king exposed = {exposed}");
    exposed
}

/// Returns `true` if `color` has at least one move that passes every rule, self-check included.
pub fn has_legal_move(position: &Position, color: Color) -> bool {
    position
        .pieces_of(color)
        .any(|(from, _)| !position.legal_destinations(from).is_empty())
}

/// Computes the [`CheckState`] after `mover` has committed a move that landed on `moved_to`.
///
/// Only the mover's opponent can be put in check by a legal move. The moved piece is reported as
/// the checker when it is one; otherwise the first discovered attacker is.
pub fn compute_check_state(position: &Position, moved_to: Square, mover: Color) -> CheckState {
    let defender = mover.opponent();
    let Some(king) = position.king(defender) else {
        return CheckState::default();
    };

    let mut attackers = attackers_of(position, king, mover).peekable();
    let Some(&first) = attackers.peek() else {
        return CheckState::default();
    };
    let checker = if attackers.any(|sq| sq == moved_to) {
        moved_to
    } else {
        first
    };

    CheckState {
        in_check: true,
        checked: Some(defender),
        checker: Some(checker),
        checkmate: !has_legal_move(position, defender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Piece;

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

    #[test]
    fn test_single_rook_gives_check_until_removed() {
        let mut position = setup(&[('K', 7, 4), ('r', 0, 4)]);
        assert!(is_king_attacked(&position, Color::White));
        assert_eq!(
            attackers_of(&position, sq(7, 4), Color::Black).collect::<Vec<_>>(),
            vec![sq(0, 4)]
        );

        position.clear(sq(0, 4));
        assert!(!is_king_attacked(&position, Color::White));
    }

    #[test]
    fn test_blocked_ray_is_not_an_attack() {
        let position = setup(&[('K', 7, 4), ('r', 0, 4), ('n', 3, 4)]);
        assert!(!is_king_attacked(&position, Color::White));
    }

    #[test]
    fn test_missing_king_is_never_attacked() {
        let position = setup(&[('r', 0, 4), ('Q', 4, 4)]);
        assert_eq!(position.king(Color::White), None);
        assert!(!is_king_attacked(&position, Color::White));
    }

    #[test]
    fn test_unmoved_pawns_do_not_attack_diagonally() {
        let position = setup(&[('K', 7, 4), ('p', 6, 3)]);
        assert!(!is_under_attack(&position, sq(7, 4), Color::Black));

        let mut moved = Position::empty();
        moved.place(Piece::from_uci('K').unwrap(), sq(7, 4)).unwrap();
        moved
            .place(Piece::from_uci('p').unwrap().as_moved(), sq(6, 3))
            .unwrap();
        assert!(is_under_attack(&moved, sq(7, 4), Color::Black));
    }

    #[test]
    fn test_simulation_leaves_original_untouched() {
        let position = setup(&[('K', 7, 4), ('R', 6, 4), ('r', 0, 4)]);
        let before = position;

        assert!(would_self_check(&position, sq(6, 4), sq(6, 0)));
        assert!(!would_self_check(&position, sq(6, 4), sq(3, 4)));
        assert_eq!(position, before);
    }

    #[test]
    fn test_check_state_prefers_the_moved_piece() {
        let position = setup(&[('k', 0, 4), ('R', 0, 0), ('B', 3, 1), ('K', 7, 7)]);
        let state = compute_check_state(&position, sq(3, 1), Color::White);

        assert!(state.in_check);
        assert_eq!(state.checked, Some(Color::Black));
        assert_eq!(state.checker, Some(sq(3, 1)));
        assert!(!state.checkmate);

        let quiet = compute_check_state(&position, sq(3, 1), Color::Black);
        assert_eq!(quiet, CheckState::default());
    }
}
