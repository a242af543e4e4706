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

//! Reservation engine.
//!
//! The [`ReservationEngine`] is the entry point for callers such as a web
//! front-end. It speaks 1-based display coordinates and composes the store,
//! price table and seat projections.
//!
//! # Operations
//!
//! - **Book**: Reserve a seat, issue an e-ticket and quote its price.
//! - **Cancel**: Delete a reservation, freeing its seat.
//! - **Dashboard**: Counts, sales, seat maps and the reservation list from one read.
//!
//! # Thread Safety
//!
//! The engine is `Send + Sync`. Build it once at start-up and share it behind
//! an [`Arc`](std::sync::Arc); every method takes `&self`.

use crate::base::{ReservationId, Seat, TOTAL_SEATS};
use crate::error::ReservationError;
use crate::grid::{self, SeatGrid};
use crate::pricing::PriceTable;
use crate::repository::{MemoryRepository, Repository};
use crate::reservation::{Reservation, SortOrder, validate_name};
use crate::store::{ReservationStore, total_price};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Confirmation of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub reservation: Reservation,
    pub price: Decimal,
}

impl Booking {
    pub fn reservation_id(&self) -> ReservationId {
        self.reservation.id
    }

    pub fn e_ticket_number(&self) -> &str {
        &self.reservation.e_ticket_number
    }
}

/// What was cancelled, for confirmation messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cancellation {
    pub reservation_id: ReservationId,
    pub passenger_name: String,
    pub seat_row_display: i64,
    pub seat_column_display: i64,
}

/// A reservation as shown to operators, in display coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationView {
    pub id: ReservationId,
    pub passenger_name: String,
    pub seat_row_display: i64,
    pub seat_column_display: i64,
    pub e_ticket_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationView {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            passenger_name: reservation.passenger_name,
            seat_row_display: reservation.seat_row.saturating_add(1),
            seat_column_display: reservation.seat_column.saturating_add(1),
            e_ticket_number: reservation.e_ticket_number,
            created_at: reservation.created_at,
        }
    }
}

/// Point-in-time view of the whole trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub total_seats: usize,
    pub reserved_count: usize,
    pub available_count: usize,
    pub total_sales: Decimal,
    pub availability: SeatGrid<bool>,
    pub names: SeatGrid<Option<String>>,
    /// Oldest first.
    pub reservations: Vec<ReservationView>,
}

/// Seat reservation engine for a single trip.
///
/// # Invariants
///
/// - A seat holds at most one reservation; concurrent bookings of the same
///   seat yield exactly one success.
/// - E-ticket numbers are unique across live reservations.
/// - `reserved_count + available_count == 48` in every snapshot.
pub struct ReservationEngine<R: Repository = MemoryRepository> {
    store: ReservationStore<R>,
}

impl ReservationEngine<MemoryRepository> {
    /// Creates an engine over an empty in-memory store.
    pub fn new() -> Self {
        Self::with_store(ReservationStore::in_memory())
    }
}

impl<R: Repository> ReservationEngine<R> {
    pub fn with_repository(repository: R) -> Self {
        Self::with_store(ReservationStore::new(repository))
    }

    pub fn with_store(store: ReservationStore<R>) -> Self {
        ReservationEngine { store }
    }

    pub fn store(&self) -> &ReservationStore<R> {
        &self.store
    }

    /// Books the seat at 1-based `(row, column)` for `passenger_name`.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::InvalidName`] - Name is not 2-100 characters after trimming.
    /// - [`ReservationError::OutOfRange`] - Row not in 1-12 or column not in 1-4.
    /// - [`ReservationError::SeatTaken`] - Seat is already booked (display coordinates).
    /// - [`ReservationError::StorageFailure`] - The backing store failed.
    pub fn book(
        &self,
        passenger_name: &str,
        row: i64,
        column: i64,
    ) -> Result<Booking, ReservationError> {
        validate_name(passenger_name).ok_or(ReservationError::InvalidName)?;
        let seat = Seat::from_display(row, column)?;

        let taken = || ReservationError::SeatTaken {
            row: seat.display_row(),
            column: seat.display_column(),
        };

        // Cheap early rejection under the read lock; create() re-checks under the write lock.
        if !self.store.is_available(seat)? {
            debug!(%seat, "booking rejected by availability pre-check");
            return Err(taken());
        }

        let reservation = self
            .store
            .create(passenger_name, seat.row() as i64, seat.column() as i64)
            .map_err(|e| match e {
                ReservationError::SeatTaken { .. } => taken(),
                other => other,
            })?;
        Ok(Booking {
            reservation,
            price: PriceTable::seat_price(seat),
        })
    }

    /// Cancels a reservation.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::NotFound`] - No such reservation.
    /// - [`ReservationError::StorageFailure`] - The backing store failed.
    pub fn cancel(&self, id: ReservationId) -> Result<Cancellation, ReservationError> {
        let reservation = self.store.delete(id)?;
        Ok(Cancellation {
            reservation_id: reservation.id,
            passenger_name: reservation.passenger_name,
            seat_row_display: reservation.seat_row.saturating_add(1),
            seat_column_display: reservation.seat_column.saturating_add(1),
        })
    }

    /// Builds every dashboard figure from a single listing of the store.
    pub fn dashboard_snapshot(&self) -> Result<DashboardSnapshot, ReservationError> {
        let reservations = self.store.list_all(SortOrder::Ascending)?;

        let availability = grid::availability(&reservations);
        let available_count = availability.rows().iter().flatten().filter(|free| **free).count();

        Ok(DashboardSnapshot {
            total_seats: TOTAL_SEATS,
            reserved_count: TOTAL_SEATS - available_count,
            available_count,
            total_sales: total_price(&reservations),
            names: grid::occupant_names(&reservations),
            availability,
            reservations: reservations.into_iter().map(ReservationView::from).collect(),
        })
    }

    pub fn total_sales(&self) -> Result<Decimal, ReservationError> {
        self.store.total_sales()
    }

    pub fn availability(&self) -> Result<SeatGrid<bool>, ReservationError> {
        let reservations = self.store.list_all(SortOrder::Ascending)?;
        Ok(grid::availability(&reservations))
    }

    pub fn occupant_names(&self) -> Result<SeatGrid<Option<String>>, ReservationError> {
        let reservations = self.store.list_all(SortOrder::Ascending)?;
        Ok(grid::occupant_names(&reservations))
    }

    pub fn reservation(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        self.store.get(id)
    }

    pub fn reservations(&self, order: SortOrder) -> Result<Vec<Reservation>, ReservationError> {
        self.store.list_all(order)
    }
}

impl Default for ReservationEngine<MemoryRepository> {
    fn default() -> Self {
        Self::new()
    }
}
