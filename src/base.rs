// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Core identifier and coordinate types for reservations and seats.

use crate::error::ReservationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of seat rows on the bus.
pub const ROWS: usize = 12;

/// Number of seats per row.
pub const COLUMNS: usize = 4;

/// Total seat capacity of a trip.
pub const TOTAL_SEATS: usize = ROWS * COLUMNS;

/// Unique identifier for a reservation.
///
/// Assigned by the repository at insertion time and never reused while the
/// repository is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ReservationId(pub u64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated seat coordinate.
///
/// Internally 0-based: `row` in `0..12`, `column` in `0..4`. Passengers and
/// operators see 1-based display coordinates, converted with
/// [`Seat::from_display`] and [`Seat::display_row`]/[`Seat::display_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Seat {
    row: u8,
    column: u8,
}

impl Seat {
    /// Creates a seat from 0-based coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::OutOfRange`] if the coordinate falls outside
    /// the 12×4 grid.
    pub fn new(row: i64, column: i64) -> Result<Self, ReservationError> {
        if !(0..ROWS as i64).contains(&row) || !(0..COLUMNS as i64).contains(&column) {
            return Err(ReservationError::OutOfRange { row, column });
        }
        Ok(Self {
            row: row as u8,
            column: column as u8,
        })
    }

    /// Creates a seat from 1-based display coordinates.
    ///
    /// The error reports the coordinate the caller supplied, not the shifted one.
    pub fn from_display(row: i64, column: i64) -> Result<Self, ReservationError> {
        Self::new(row - 1, column - 1).map_err(|_| ReservationError::OutOfRange { row, column })
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn column(&self) -> usize {
        self.column as usize
    }

    pub fn display_row(&self) -> usize {
        self.row() + 1
    }

    pub fn display_column(&self) -> usize {
        self.column() + 1
    }

    /// Iterates every seat of the grid in row-major order.
    pub fn all() -> impl Iterator<Item = Seat> {
        (0..ROWS as u8).flat_map(|row| (0..COLUMNS as u8).map(move |column| Seat { row, column }))
    }
}

/// Formats as `row-column` in display coordinates, e.g. `1-1` for the front-left seat.
impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.display_row(), self.display_column())
    }
}
