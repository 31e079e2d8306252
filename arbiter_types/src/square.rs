/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use super::BOARD_SIZE;

/// A square on the board, identified by `(row, column)`.
///
/// Row `0` is Black's back rank and row `7` is White's, so White advances toward row `0`.
/// Internally stored as `row * 8 + column`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

    /// Creates a new [`Square`] from a row and a column, each in `0..8`.
    ///
    /// # Example
    /// ```
    /// # use arbiter_types::Square;
    /// let sq = Square::new(6, 4).unwrap();
    /// assert_eq!(sq.row(), 6);
    /// assert_eq!(sq.col(), 4);
    /// assert!(Square::new(8, 0).is_err());
    /// ```
    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            bail!("Square ({row}, {col}) is off the board: rows and columns must be in 0..{BOARD_SIZE}");
        }

        Ok(Self::new_unchecked(row, col))
    }

    /// Creates a new [`Square`] without checking bounds.
    ///
    /// Callers must guarantee `row < 8` and `col < 8`; debug builds panic otherwise.
    #[inline(always)]
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        debug_assert!(row < BOARD_SIZE && col < BOARD_SIZE);
        Self(row * BOARD_SIZE + col)
    }

    /// Creates a [`Square`] from signed coordinates, yielding `None` if they lie off the board.
    ///
    /// # Example
    /// ```
    /// # use arbiter_types::Square;
    /// assert_eq!(Square::from_coords(0, 7), Square::new(0, 7).ok());
    /// assert_eq!(Square::from_coords(-1, 3), None);
    /// ```
    #[inline(always)]
    pub const fn from_coords(row: i8, col: i8) -> Option<Self> {
        if row < 0 || col < 0 || row >= BOARD_SIZE as i8 || col >= BOARD_SIZE as i8 {
            None
        } else {
            Some(Self::new_unchecked(row as u8, col as u8))
        }
    }

    /// Creates a [`Square`] from an index in `0..64`.
    #[inline(always)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Index of this square in `0..64`, suitable for indexing a mailbox.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Row of this square, `0` being Black's back rank.
    #[inline(always)]
    pub const fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Column of this square.
    #[inline(always)]
    pub const fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Shifts this square by `(d_row, d_col)`, yielding `None` if the result is off the board.
    ///
    /// # Example
    /// ```
    /// # use arbiter_types::Square;
    /// let sq = Square::new(1, 0).unwrap();
    /// assert_eq!(sq.offset(2, 1), Square::new(3, 1).ok());
    /// assert_eq!(sq.offset(0, -1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Self::from_coords(self.row() as i8 + d_row, self.col() as i8 + d_col)
    }

    /// Signed `(row, column)` distance from `self` to `other`.
    #[inline(always)]
    pub const fn delta_to(self, other: Self) -> (i8, i8) {
        (
            other.row() as i8 - self.row() as i8,
            other.col() as i8 - self.col() as i8,
        )
    }

    /// Iterates over all 64 squares, row by row.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square{self}")
    }
}

impl TryFrom<(i8, i8)> for Square {
    type Error = anyhow::Error;
    fn try_from((row, col): (i8, i8)) -> Result<Self> {
        match Self::from_coords(row, col) {
            Some(square) => Ok(square),
            None => bail!("Square ({row}, {col}) is off the board"),
        }
    }
}
