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

//! Storage backends for reservations.
//!
//! A [`Repository`] is a plain seat-keyed table. It does no locking of its
//! own: [`ReservationStore`](crate::ReservationStore) wraps it in a lock and
//! runs every check-then-insert sequence under that lock. Repositories still
//! enforce unique seats and unique ticket numbers on insert, so a bug above
//! them surfaces as [`ReservationError::StorageFailure`] instead of a
//! double-booking.

use crate::base::{ReservationId, Seat};
use crate::error::ReservationError;
use crate::reservation::{NewReservation, Reservation};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

/// Seat-keyed reservation table.
pub trait Repository: Send + Sync {
    /// Inserts a reservation, assigning it a fresh id.
    ///
    /// # Errors
    ///
    /// [`ReservationError::StorageFailure`] if the seat or the ticket number is
    /// already present, or if the backend fails to persist the row.
    fn insert(&mut self, reservation: NewReservation) -> Result<Reservation, ReservationError>;

    /// Removes and returns a reservation, `None` if no such id exists.
    fn remove(&mut self, id: ReservationId) -> Result<Option<Reservation>, ReservationError>;

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError>;

    /// All reservations in id order.
    fn list(&self) -> Result<Vec<Reservation>, ReservationError>;

    fn is_occupied(&self, seat: Seat) -> Result<bool, ReservationError> {
        Ok(self.list()?.iter().any(|r| r.seat() == Some(seat)))
    }

    /// Every issued ticket number.
    fn tickets(&self) -> Result<HashSet<String>, ReservationError> {
        Ok(self
            .list()?
            .into_iter()
            .map(|r| r.e_ticket_number)
            .collect())
    }
}

/// In-memory repository with unique indexes on seat and ticket number.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    reservations: BTreeMap<ReservationId, Reservation>,
    /// Valid seats only; legacy out-of-range rows have no entry.
    seats: HashMap<Seat, ReservationId>,
    tickets: HashMap<String, ReservationId>,
    next_id: u64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from previously stored records, keeping their ids.
    ///
    /// Out-of-range coordinates are accepted, and several legacy rows may share
    /// one. Duplicate ids, valid seats or ticket numbers are rejected.
    pub fn from_records(
        records: impl IntoIterator<Item = Reservation>,
    ) -> Result<Self, ReservationError> {
        let mut repository = Self::new();
        for record in records {
            repository.restore(record)?;
        }
        Ok(repository)
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Re-inserts a complete record under its own id.
    pub(crate) fn restore(&mut self, record: Reservation) -> Result<(), ReservationError> {
        if self.reservations.contains_key(&record.id) {
            return Err(ReservationError::StorageFailure(format!(
                "duplicate reservation id {}",
                record.id
            )));
        }
        self.check_unique(record.seat(), &record.e_ticket_number)?;

        self.next_id = self.next_id.max(record.id.0);
        self.index(&record);
        self.reservations.insert(record.id, record);
        Ok(())
    }

    fn check_unique(&self, seat: Option<Seat>, ticket: &str) -> Result<(), ReservationError> {
        if let Some(seat) = seat {
            if let Some(holder) = self.seats.get(&seat) {
                warn!(%seat, %holder, "seat constraint violated");
                return Err(ReservationError::StorageFailure(format!(
                    "unique constraint violated: seat {seat} held by reservation {holder}"
                )));
            }
        }
        if let Some(holder) = self.tickets.get(ticket) {
            warn!(ticket, %holder, "ticket constraint violated");
            return Err(ReservationError::StorageFailure(format!(
                "unique constraint violated: ticket {ticket} held by reservation {holder}"
            )));
        }
        Ok(())
    }

    fn index(&mut self, record: &Reservation) {
        if let Some(seat) = record.seat() {
            self.seats.insert(seat, record.id);
        }
        self.tickets.insert(record.e_ticket_number.clone(), record.id);
    }
}

impl Repository for MemoryRepository {
    fn insert(&mut self, reservation: NewReservation) -> Result<Reservation, ReservationError> {
        self.check_unique(Some(reservation.seat), &reservation.e_ticket_number)?;

        self.next_id += 1;
        let record = reservation.into_reservation(ReservationId(self.next_id));
        self.index(&record);
        self.reservations.insert(record.id, record.clone());
        Ok(record)
    }

    fn remove(&mut self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        let Some(record) = self.reservations.remove(&id) else {
            return Ok(None);
        };
        if let Some(seat) = record.seat() {
            self.seats.remove(&seat);
        }
        self.tickets.remove(&record.e_ticket_number);
        Ok(Some(record))
    }

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        Ok(self.reservations.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Reservation>, ReservationError> {
        Ok(self.reservations.values().cloned().collect())
    }

    fn is_occupied(&self, seat: Seat) -> Result<bool, ReservationError> {
        Ok(self.seats.contains_key(&seat))
    }

    fn tickets(&self) -> Result<HashSet<String>, ReservationError> {
        Ok(self.tickets.keys().cloned().collect())
    }
}
