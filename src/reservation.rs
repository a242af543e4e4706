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

//! Reservation records.

use crate::base::{ReservationId, Seat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shortest accepted passenger name, after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Longest accepted passenger name, after trimming.
pub const MAX_NAME_LEN: usize = 100;

/// Ordering for reservation listings, by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// A reservation as the store hands it out.
///
/// Coordinates are kept raw (0-based) because records loaded from a persisted
/// store may predate validation. Use [`Reservation::seat`] to get the
/// validated coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    #[serde(rename = "passengerName")]
    pub passenger_name: String,
    #[serde(rename = "seatRow")]
    pub seat_row: i64,
    #[serde(rename = "seatColumn")]
    pub seat_column: i64,
    #[serde(rename = "eTicketNumber")]
    pub e_ticket_number: String,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// The validated seat, or `None` for a legacy out-of-range record.
    pub fn seat(&self) -> Option<Seat> {
        Seat::new(self.seat_row, self.seat_column).ok()
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seat() {
            Some(seat) => write!(f, "{} - Seat {}", self.passenger_name, seat),
            None => write!(
                f,
                "{} - Seat ?{}-{}",
                self.passenger_name, self.seat_row, self.seat_column
            ),
        }
    }
}

/// A reservation about to be inserted; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub passenger_name: String,
    pub seat: Seat,
    pub e_ticket_number: String,
    pub created_at: DateTime<Utc>,
}

impl NewReservation {
    pub(crate) fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            passenger_name: self.passenger_name,
            seat_row: self.seat.row() as i64,
            seat_column: self.seat.column() as i64,
            e_ticket_number: self.e_ticket_number,
            created_at: self.created_at,
        }
    }
}

/// Trims `name` and checks its length in characters.
///
/// Returns the trimmed name on success.
pub fn validate_name(name: &str) -> Option<&str> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len).then_some(trimmed)
}

/// Sorts reservations by creation time, ties broken by id.
pub(crate) fn sort_reservations(reservations: &mut [Reservation], order: SortOrder) {
    reservations.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
    if order == SortOrder::Descending {
        reservations.reverse();
    }
}
