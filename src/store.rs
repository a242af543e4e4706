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

//! The authoritative reservation table.
//!
//! # Thread Safety
//!
//! The repository sits behind a single [`RwLock`]. Creation and deletion hold
//! the write lock across the whole check, ticket generation and insert, so two
//! callers can never both see a seat as free and both reserve it. Reads hold
//! the read lock and copy out what they need, so they never observe a
//! half-applied mutation.

use crate::base::{ReservationId, Seat};
use crate::error::ReservationError;
use crate::grid::placed;
use crate::pricing::PriceTable;
use crate::repository::{MemoryRepository, Repository};
use crate::reservation::{
    NewReservation, Reservation, SortOrder, sort_reservations, validate_name,
};
use crate::ticket::TicketGenerator;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Lock-guarded reservation table over a [`Repository`].
///
/// # Invariants
///
/// - No two live reservations share a seat.
/// - No two live reservations share an e-ticket number.
pub struct ReservationStore<R: Repository = MemoryRepository> {
    repository: RwLock<R>,
}

impl ReservationStore<MemoryRepository> {
    /// Creates a store over an empty in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(MemoryRepository::new())
    }
}

impl<R: Repository> ReservationStore<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: RwLock::new(repository),
        }
    }

    /// Reserves `(row, column)` (0-based) for `passenger_name`.
    ///
    /// Gates run in order: name, bounds, seat availability. The availability
    /// check, ticket generation and insert share one write lock.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::InvalidName`] - Name is not 2-100 characters after trimming.
    /// - [`ReservationError::OutOfRange`] - Coordinate is outside the grid.
    /// - [`ReservationError::SeatTaken`] - Seat already has a reservation (0-based, as passed in).
    /// - [`ReservationError::StorageFailure`] - The repository failed.
    pub fn create(
        &self,
        passenger_name: &str,
        row: i64,
        column: i64,
    ) -> Result<Reservation, ReservationError> {
        let name = validate_name(passenger_name).ok_or(ReservationError::InvalidName)?;
        let seat = Seat::new(row, column)?;

        let mut repository = self.repository.write();
        if repository.is_occupied(seat)? {
            debug!(%seat, "seat already taken");
            return Err(ReservationError::SeatTaken {
                row: seat.row(),
                column: seat.column(),
            });
        }

        let tickets = repository.tickets()?;
        let e_ticket_number = TicketGenerator::generate(name, &tickets);

        let reservation = repository.insert(NewReservation {
            passenger_name: name.to_string(),
            seat,
            e_ticket_number,
            created_at: Utc::now(),
        })?;
        drop(repository);

        info!(
            id = %reservation.id,
            %seat,
            ticket = %reservation.e_ticket_number,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Deletes a reservation and returns it.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::NotFound`] - No reservation with that id (including a second delete).
    /// - [`ReservationError::StorageFailure`] - The repository failed.
    pub fn delete(&self, id: ReservationId) -> Result<Reservation, ReservationError> {
        let removed = self.repository.write().remove(id)?;
        let reservation = removed.ok_or(ReservationError::NotFound(id))?;
        info!(%id, ticket = %reservation.e_ticket_number, "reservation deleted");
        Ok(reservation)
    }

    pub fn get(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        self.repository.read().get(id)
    }

    /// Lists every reservation ordered by creation time.
    pub fn list_all(&self, order: SortOrder) -> Result<Vec<Reservation>, ReservationError> {
        let mut reservations = self.repository.read().list()?;
        sort_reservations(&mut reservations, order);
        Ok(reservations)
    }

    /// Whether a seat is currently free.
    ///
    /// Only a hint: the answer may be stale by the time the caller acts on it.
    /// [`ReservationStore::create`] re-checks under the write lock.
    pub fn is_available(&self, seat: Seat) -> Result<bool, ReservationError> {
        Ok(!self.repository.read().is_occupied(seat)?)
    }

    /// Sum of seat prices over all live reservations.
    ///
    /// Out-of-range legacy records count as zero.
    pub fn total_sales(&self) -> Result<Decimal, ReservationError> {
        let reservations = self.repository.read().list()?;
        Ok(total_price(&reservations))
    }
}

impl Default for ReservationStore<MemoryRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Sums seat prices, skipping records without a valid seat.
pub(crate) fn total_price(reservations: &[Reservation]) -> Decimal {
    placed(reservations)
        .map(|(seat, _)| PriceTable::seat_price(seat))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ReservationId;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    /// Repository that fails every call, for error propagation tests.
    struct BrokenRepository;

    impl Repository for BrokenRepository {
        fn insert(&mut self, _: NewReservation) -> Result<Reservation, ReservationError> {
            Err(ReservationError::StorageFailure("disk on fire".into()))
        }

        fn remove(&mut self, _: ReservationId) -> Result<Option<Reservation>, ReservationError> {
            Err(ReservationError::StorageFailure("disk on fire".into()))
        }

        fn get(&self, _: ReservationId) -> Result<Option<Reservation>, ReservationError> {
            Err(ReservationError::StorageFailure("disk on fire".into()))
        }

        fn list(&self) -> Result<Vec<Reservation>, ReservationError> {
            Err(ReservationError::StorageFailure("disk on fire".into()))
        }
    }

    #[test]
    fn create_stores_trimmed_name_and_ticket() {
        let store = ReservationStore::in_memory();
        let reservation = store.create("  Alice ", 0, 1).unwrap();

        assert_eq!(reservation.passenger_name, "Alice");
        assert_eq!(reservation.e_ticket_number, "AIlNiFcOeTC4320");
        assert_eq!((reservation.seat_row, reservation.seat_column), (0, 1));
        assert_eq!(store.get(reservation.id).unwrap(), Some(reservation));
    }

    #[test]
    fn name_is_checked_before_bounds() {
        let store = ReservationStore::in_memory();
        assert_eq!(store.create("A", 99, 99), Err(ReservationError::InvalidName));
    }

    #[test]
    fn bounds_are_checked_before_occupancy() {
        let store = ReservationStore::in_memory();
        assert_eq!(
            store.create("Alice", 12, 0),
            Err(ReservationError::OutOfRange { row: 12, column: 0 })
        );
        assert!(store.list_all(SortOrder::Ascending).unwrap().is_empty());
    }

    #[test]
    fn second_booking_of_seat_is_rejected() {
        let store = ReservationStore::in_memory();
        store.create("Alice", 3, 2).unwrap();
        assert_eq!(
            store.create("Bob", 3, 2),
            Err(ReservationError::SeatTaken { row: 3, column: 2 })
        );
    }

    #[test]
    fn same_name_gets_disambiguated_tickets() {
        let store = ReservationStore::in_memory();
        let tickets: HashSet<String> = (0..3)
            .map(|column| store.create("Alice", 0, column).unwrap().e_ticket_number)
            .collect();

        let expected: HashSet<String> = ["AIlNiFcOeTC4320", "AIlNiFcOeTC43201", "AIlNiFcOeTC43202"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tickets, expected);
    }

    #[test]
    fn delete_twice_is_not_found() {
        let store = ReservationStore::in_memory();
        let reservation = store.create("Alice", 0, 0).unwrap();

        assert_eq!(store.delete(reservation.id).unwrap(), reservation);
        assert_eq!(
            store.delete(reservation.id),
            Err(ReservationError::NotFound(reservation.id))
        );
    }

    #[test]
    fn total_sales_sums_column_prices() {
        let store = ReservationStore::in_memory();
        store.create("Alice", 0, 0).unwrap();
        store.create("Bob", 5, 1).unwrap();
        store.create("Carol", 11, 2).unwrap();

        assert_eq!(store.total_sales().unwrap(), dec!(225));
    }

    #[test]
    fn total_sales_skips_legacy_rows() {
        let legacy = Reservation {
            id: ReservationId(1),
            passenger_name: "Ghost".into(),
            seat_row: 30,
            seat_column: 0,
            e_ticket_number: "OLD".into(),
            created_at: Utc::now(),
        };
        let store = ReservationStore::new(MemoryRepository::from_records(vec![legacy]).unwrap());
        store.create("Alice", 0, 2).unwrap();

        assert_eq!(store.total_sales().unwrap(), dec!(50));
    }

    #[test]
    fn list_orders_by_creation() {
        let store = ReservationStore::in_memory();
        let first = store.create("Alice", 0, 0).unwrap();
        let second = store.create("Bob", 0, 1).unwrap();

        let ascending = store.list_all(SortOrder::Ascending).unwrap();
        assert_eq!(ascending, vec![first.clone(), second.clone()]);

        let descending = store.list_all(SortOrder::Descending).unwrap();
        assert_eq!(descending, vec![second, first]);
    }

    #[test]
    fn storage_failures_are_not_masked() {
        let store = ReservationStore::new(BrokenRepository);
        let failure = ReservationError::StorageFailure("disk on fire".into());

        assert_eq!(store.total_sales(), Err(failure.clone()));
        assert_eq!(store.list_all(SortOrder::Ascending), Err(failure.clone()));
        assert_eq!(store.create("Alice", 0, 0), Err(failure.clone()));
        assert_eq!(store.delete(ReservationId(1)), Err(failure));
    }
}
