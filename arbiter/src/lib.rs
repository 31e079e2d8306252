/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

pub use arbiter_types::*;

/// King-attack detection and the self-check simulation.
mod check;
/// Per-kind movement rules and pseudo-legal destination generation.
mod movegen;
/// Move orchestration: rejection reasons, move records and commit hooks.
mod moves;
/// The board grid, check state and en-passant window.
mod position;

pub use check::*;
pub use movegen::*;
pub use moves::*;
pub use position::*;

/// Re-exports all the things you'll need.
pub mod prelude {
    pub use crate::check::*;
    pub use crate::movegen::*;
    pub use crate::moves::*;
    pub use crate::position::*;
    pub use arbiter_types::*;
}
