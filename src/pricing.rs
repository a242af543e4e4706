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

//! Zone pricing.
//!
//! Prices depend on the column only: window seats (columns 0 and 3) cost 100,
//! the left aisle seat 75 and the right aisle seat 50, on every row.
//!
//! # Example
//!
//! ```
//! use bus_reservation_rs::PriceTable;
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(PriceTable::price(4, 1).unwrap(), dec!(75));
//! assert!(PriceTable::price(12, 0).is_err());
//! ```

use crate::base::{COLUMNS, ROWS, Seat};
use crate::error::ReservationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const ROW_PRICES: [Decimal; COLUMNS] = [dec!(100), dec!(75), dec!(50), dec!(100)];

static MATRIX: [[Decimal; COLUMNS]; ROWS] = [ROW_PRICES; ROWS];

/// Constant 12×4 price matrix.
pub struct PriceTable;

impl PriceTable {
    /// Returns the price of the seat at 0-based `(row, column)`.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::OutOfRange`] outside the 12×4 grid.
    pub fn price(row: i64, column: i64) -> Result<Decimal, ReservationError> {
        let seat = Seat::new(row, column)?;
        Ok(Self::seat_price(seat))
    }

    /// Infallible lookup for an already validated seat.
    pub fn seat_price(seat: Seat) -> Decimal {
        MATRIX[seat.row()][seat.column()]
    }

    pub fn matrix() -> &'static [[Decimal; COLUMNS]; ROWS] {
        &MATRIX
    }
}
