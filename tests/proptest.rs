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

//! Property-based tests for the reservation engine.
//!
//! These tests verify invariants that should hold for any sequence of
//! bookings and cancellations.

use bus_reservation_rs::{
    FILLER, PriceTable, ReservationEngine, ReservationError, ReservationId, Seat, SortOrder,
    TOTAL_SEATS, TicketGenerator,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// A passenger name that passes validation.
fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z][a-z]{1,10}( [A-Za-z][a-z]{0,10})?"
}

/// A small pool of names so ticket collisions actually happen.
fn arb_colliding_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Alice", "alice", "Bob Smith", "BobSmith", "Al"])
        .prop_map(String::from)
}

#[derive(Debug, Clone)]
enum Op {
    Book { name: String, row: i64, column: i64 },
    Cancel { pick: usize },
}

/// Display coordinates slightly wider than the grid, to exercise bounds errors.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_colliding_name(), 0i64..=13, 0i64..=5)
            .prop_map(|(name, row, column)| Op::Book { name, row, column }),
        1 => any::<usize>().prop_map(|pick| Op::Cancel { pick }),
    ]
}

// =============================================================================
// Ticket Generator Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Base ticket length is head + filler + tail.
    #[test]
    fn base_ticket_length(name in arb_name()) {
        let letters = name.chars().filter(|c| !c.is_whitespace()).count();
        let ticket = TicketGenerator::base(&name);
        prop_assert_eq!(ticket.chars().count(), letters + FILLER.len());
    }

    /// The filler survives, in order, inside the ticket body.
    #[test]
    fn filler_appears_in_order(name in arb_name()) {
        let ticket = TicketGenerator::base(&name);
        let mut filler = FILLER.chars().peekable();
        for c in ticket.chars().skip(1) {
            if filler.peek() == Some(&c) {
                filler.next();
            }
        }
        prop_assert!(filler.next().is_none());
    }

    /// Generated tickets never collide with the existing set.
    #[test]
    fn generated_ticket_is_fresh(
        name in arb_colliding_name(),
        taken in 0usize..20,
    ) {
        let base = TicketGenerator::base(&name);
        let mut existing: HashSet<String> = HashSet::new();
        existing.insert(base.clone());
        for suffix in 1..taken {
            existing.insert(format!("{base}{suffix}"));
        }

        let ticket = TicketGenerator::generate(&name, &existing);
        prop_assert!(!existing.contains(&ticket));
        prop_assert!(ticket.starts_with(&base));
    }

    /// Whitespace placement never changes the ticket.
    #[test]
    fn whitespace_is_irrelevant(name in arb_name(), pad in "[ \t]{0,3}") {
        let padded = format!("{pad}{}{pad}", name.replace(' ', &format!(" {pad}")));
        prop_assert_eq!(TicketGenerator::base(&padded), TicketGenerator::base(&name));
    }
}

// =============================================================================
// Pricing Properties
// =============================================================================

proptest! {
    /// Price depends on the column only.
    #[test]
    fn price_is_row_independent(row_a in 0i64..12, row_b in 0i64..12, column in 0i64..4) {
        prop_assert_eq!(
            PriceTable::price(row_a, column).unwrap(),
            PriceTable::price(row_b, column).unwrap()
        );
    }

    /// Every coordinate outside the grid is rejected.
    #[test]
    fn price_rejects_outside_grid(row in -50i64..50, column in -50i64..50) {
        let inside = (0..12).contains(&row) && (0..4).contains(&column);
        prop_assert_eq!(PriceTable::price(row, column).is_ok(), inside);
    }
}

// =============================================================================
// Engine Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any sequence of operations: seats and tickets are unique, the
    /// dashboard adds up, and sales match the booked seats.
    #[test]
    fn engine_invariants_hold(ops in prop::collection::vec(arb_op(), 1..80)) {
        let engine = ReservationEngine::new();
        let mut live: Vec<ReservationId> = Vec::new();

        for op in ops {
            match op {
                Op::Book { name, row, column } => {
                    let in_bounds = (1..=12).contains(&row) && (1..=4).contains(&column);
                    match engine.book(&name, row, column) {
                        Ok(booking) => {
                            prop_assert!(in_bounds);
                            live.push(booking.reservation_id());
                        }
                        Err(ReservationError::OutOfRange { .. }) => prop_assert!(!in_bounds),
                        Err(ReservationError::SeatTaken { .. }) => prop_assert!(in_bounds),
                        Err(e) => prop_assert!(false, "unexpected error: {e}"),
                    }
                }
                Op::Cancel { pick } => {
                    if !live.is_empty() {
                        let id = live.remove(pick % live.len());
                        prop_assert!(engine.cancel(id).is_ok());
                        prop_assert_eq!(engine.cancel(id), Err(ReservationError::NotFound(id)));
                    }
                }
            }
        }

        let reservations = engine.reservations(SortOrder::Ascending).unwrap();
        prop_assert_eq!(reservations.len(), live.len());

        let seats: HashSet<Seat> = reservations.iter().filter_map(|r| r.seat()).collect();
        let tickets: HashSet<&str> = reservations.iter().map(|r| r.e_ticket_number.as_str()).collect();
        prop_assert_eq!(seats.len(), reservations.len());
        prop_assert_eq!(tickets.len(), reservations.len());

        let snapshot = engine.dashboard_snapshot().unwrap();
        prop_assert_eq!(snapshot.reserved_count + snapshot.available_count, TOTAL_SEATS);
        prop_assert_eq!(snapshot.reserved_count, reservations.len());

        let expected_sales: Decimal = seats.iter().map(|seat| PriceTable::seat_price(*seat)).sum();
        prop_assert_eq!(snapshot.total_sales, expected_sales);
        prop_assert_eq!(engine.total_sales().unwrap(), expected_sales);

        for seat in Seat::all() {
            prop_assert_eq!(*snapshot.availability.get(seat), !seats.contains(&seat));
        }
    }

    /// A rejected booking leaves the store exactly as it was.
    #[test]
    fn failed_booking_never_mutates(
        row in prop_oneof![-5i64..=0, 13i64..=20],
        column in 1i64..=4,
        name in arb_name(),
    ) {
        let engine = ReservationEngine::new();
        engine.book("Existing", 1, 1).unwrap();
        let before = engine.reservations(SortOrder::Ascending).unwrap();

        prop_assert!(engine.book(&name, row, column).is_err());
        prop_assert!(engine.book("x", 2, 2).is_err());
        prop_assert!(engine.book(&name, 1, 1).is_err());

        prop_assert_eq!(engine.reservations(SortOrder::Ascending).unwrap(), before);
    }
}
