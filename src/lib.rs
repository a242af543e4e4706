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

//! # Bus Reservation
//!
//! This library manages the seat inventory of a single bus trip: a 12×4 grid
//! of 48 seats with atomic booking, cancellation, zone pricing and e-ticket
//! issuance.
//!
//! ## Core Components
//!
//! - [`ReservationEngine`]: Entry point speaking 1-based display coordinates
//! - [`ReservationStore`]: Lock-guarded reservation table over a [`Repository`]
//! - [`PriceTable`]: Column-based seat prices
//! - [`TicketGenerator`]: Name-derived, collision-free e-ticket numbers
//! - [`SeatGrid`]: Availability and occupant projections
//! - [`ReservationError`]: Error types for reservation failures
//!
//! ## Example
//!
//! ```
//! use bus_reservation_rs::ReservationEngine;
//! use rust_decimal_macros::dec;
//!
//! let engine = ReservationEngine::new();
//!
//! // Book the front-left window seat
//! let booking = engine.book("Bob Smith", 1, 1).unwrap();
//! assert_eq!(booking.price, dec!(100));
//! assert_eq!(booking.e_ticket_number(), "BIoNbFsOmTiCt4320");
//!
//! let snapshot = engine.dashboard_snapshot().unwrap();
//! assert_eq!(snapshot.reserved_count, 1);
//! assert_eq!(snapshot.available_count, 47);
//! assert_eq!(snapshot.total_sales, dec!(100));
//! ```
//!
//! ## Thread Safety
//!
//! The engine serializes every check-then-reserve sequence under a write lock,
//! so concurrent bookings of the same seat produce exactly one reservation.

mod base;
pub mod csv_repository;
mod engine;
pub mod error;
pub mod grid;
mod pricing;
pub mod repository;
mod reservation;
mod store;
mod ticket;

pub use base::{COLUMNS, ROWS, ReservationId, Seat, TOTAL_SEATS};
pub use csv_repository::CsvRepository;
pub use engine::{Booking, Cancellation, DashboardSnapshot, ReservationEngine, ReservationView};
pub use error::ReservationError;
pub use grid::SeatGrid;
pub use pricing::PriceTable;
pub use repository::{MemoryRepository, Repository};
pub use reservation::{
    MAX_NAME_LEN, MIN_NAME_LEN, NewReservation, Reservation, SortOrder, validate_name,
};
pub use store::ReservationStore;
pub use ticket::{FILLER, TicketGenerator};
