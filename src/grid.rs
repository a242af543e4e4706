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

//! Seat map projections.
//!
//! Both projections are recomputed from a full reservation listing on every
//! call. Records whose coordinates fall outside the grid are skipped with a
//! warning instead of failing the whole projection.

use crate::base::{COLUMNS, ROWS, Seat};
use crate::reservation::Reservation;
use serde::Serialize;
use std::ops::Index;
use tracing::warn;

/// A 12×4 matrix indexed by 0-based `[row][column]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SeatGrid<T> {
    cells: [[T; COLUMNS]; ROWS],
}

impl<T> SeatGrid<T> {
    fn filled(value: impl Fn() -> T) -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| value())),
        }
    }

    pub fn get(&self, seat: Seat) -> &T {
        &self.cells[seat.row()][seat.column()]
    }

    pub fn rows(&self) -> &[[T; COLUMNS]; ROWS] {
        &self.cells
    }

    fn set(&mut self, seat: Seat, value: T) {
        self.cells[seat.row()][seat.column()] = value;
    }
}

impl<T> Index<usize> for SeatGrid<T> {
    type Output = [T; COLUMNS];

    fn index(&self, row: usize) -> &Self::Output {
        &self.cells[row]
    }
}

/// Availability grid: `true` where the seat is free.
pub fn availability(reservations: &[Reservation]) -> SeatGrid<bool> {
    let mut grid = SeatGrid::filled(|| true);
    for (seat, _) in placed(reservations) {
        grid.set(seat, false);
    }
    grid
}

/// Occupant grid: passenger name where the seat is taken.
pub fn occupant_names(reservations: &[Reservation]) -> SeatGrid<Option<String>> {
    let mut grid = SeatGrid::filled(|| None);
    for (seat, reservation) in placed(reservations) {
        grid.set(seat, Some(reservation.passenger_name.clone()));
    }
    grid
}

/// Pairs each reservation with its seat, dropping out-of-range records.
pub(crate) fn placed(
    reservations: &[Reservation],
) -> impl Iterator<Item = (Seat, &Reservation)> {
    reservations.iter().filter_map(|reservation| match reservation.seat() {
        Some(seat) => Some((seat, reservation)),
        None => {
            warn!(
                id = %reservation.id,
                row = reservation.seat_row,
                column = reservation.seat_column,
                "skipping reservation with out-of-range seat"
            );
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ReservationId;
    use chrono::Utc;

    fn reservation(id: u64, name: &str, row: i64, column: i64) -> Reservation {
        Reservation {
            id: ReservationId(id),
            passenger_name: name.to_string(),
            seat_row: row,
            seat_column: column,
            e_ticket_number: format!("T{id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_listing_is_fully_available() {
        let grid = availability(&[]);
        assert!(Seat::all().all(|seat| *grid.get(seat)));

        let names = occupant_names(&[]);
        assert!(Seat::all().all(|seat| names.get(seat).is_none()));
    }

    #[test]
    fn reserved_seats_show_as_taken_with_name() {
        let list = vec![reservation(1, "Alice", 3, 2), reservation(2, "Bob", 0, 0)];

        let grid = availability(&list);
        assert!(!grid[3][2]);
        assert!(!grid[0][0]);
        assert!(grid[0][1]);
        assert_eq!(grid.rows().iter().flatten().filter(|free| !**free).count(), 2);

        let names = occupant_names(&list);
        assert_eq!(names[3][2].as_deref(), Some("Alice"));
        assert_eq!(names[0][0].as_deref(), Some("Bob"));
        assert_eq!(names[11][3], None);
    }

    #[test]
    fn out_of_range_records_are_ignored() {
        let list = vec![
            reservation(1, "Ghost", 12, 0),
            reservation(2, "Ghost", -1, 2),
            reservation(3, "Carol", 11, 3),
        ];

        let grid = availability(&list);
        assert_eq!(grid.rows().iter().flatten().filter(|free| !**free).count(), 1);
        assert!(!grid[11][3]);

        let names = occupant_names(&list);
        assert_eq!(names[11][3].as_deref(), Some("Carol"));
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let grid = availability(&[reservation(1, "Alice", 0, 1)]);
        let json = serde_json::to_value(&grid).unwrap();
        assert_eq!(json.as_array().unwrap().len(), ROWS);
        assert_eq!(json[0], serde_json::json!([true, false, true, true]));
    }
}
