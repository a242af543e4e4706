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

//! Error types for reservation processing.

use crate::base::ReservationId;
use thiserror::Error;

/// Reservation processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Passenger name is empty, shorter than 2 or longer than 100 characters
    #[error("invalid passenger name (must be 2-100 characters)")]
    InvalidName,

    /// Seat coordinate falls outside the 12×4 grid
    #[error("seat {row}-{column} is out of range")]
    OutOfRange { row: i64, column: i64 },

    /// Seat already holds a live reservation, in the caller's coordinates
    #[error("seat {row}-{column} is already taken")]
    SeatTaken { row: usize, column: usize },

    /// Referenced reservation does not exist
    #[error("reservation {0} not found")]
    NotFound(ReservationId),

    /// Backing store failed (I/O, decoding or a violated unique constraint)
    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl From<std::io::Error> for ReservationError {
    fn from(error: std::io::Error) -> Self {
        Self::StorageFailure(error.to_string())
    }
}

impl From<csv::Error> for ReservationError {
    fn from(error: csv::Error) -> Self {
        Self::StorageFailure(error.to_string())
    }
}
