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

//! E-ticket number generation.
//!
//! A ticket number is derived from the passenger name: the first letter
//! upper-cased, followed by the rest of the name (lower-cased) interleaved
//! with the filler token [`FILLER`], filler character first at each position.
//!
//! ```text
//! "Alice" -> A + I l N i F c O e T C 4 3 2 0 -> "AIlNiFcOeTC4320"
//! ```
//!
//! Collisions are resolved by appending `1`, `2`, ... to the base number.
//!
//! # Example
//!
//! ```
//! use bus_reservation_rs::TicketGenerator;
//! use std::collections::HashSet;
//!
//! let mut issued = HashSet::new();
//! let first = TicketGenerator::generate("Alice", &issued);
//! assert_eq!(first, "AIlNiFcOeTC4320");
//!
//! issued.insert(first);
//! assert_eq!(TicketGenerator::generate("Alice", &issued), "AIlNiFcOeTC43201");
//! ```

use std::collections::HashSet;
use std::hash::BuildHasher;

/// Fixed token interleaved into every ticket number.
pub const FILLER: &str = "INFOTC4320";

/// Stateless ticket number generator.
pub struct TicketGenerator;

impl TicketGenerator {
    /// Builds the name-derived ticket number without collision handling.
    ///
    /// Whitespace anywhere in the name is ignored. An empty name yields the
    /// bare filler; callers validate names before reaching this point.
    pub fn base(passenger_name: &str) -> String {
        let mut chars = passenger_name.chars().filter(|c| !c.is_whitespace());

        let mut ticket = String::with_capacity(FILLER.len() + passenger_name.len() * 2);
        if let Some(first) = chars.next() {
            ticket.extend(first.to_uppercase());
        }

        let tail: Vec<char> = chars.flat_map(char::to_lowercase).collect();
        let filler: Vec<char> = FILLER.chars().collect();

        for i in 0..filler.len().max(tail.len()) {
            if let Some(c) = filler.get(i) {
                ticket.push(*c);
            }
            if let Some(c) = tail.get(i) {
                ticket.push(*c);
            }
        }

        ticket
    }

    /// Generates a ticket number that does not appear in `existing`.
    ///
    /// Suffixes are always appended to the base number, so the third
    /// `"Alice"` receives `...43202`, never `...432012`.
    pub fn generate<S: BuildHasher>(passenger_name: &str, existing: &HashSet<String, S>) -> String {
        let base = Self::base(passenger_name);
        if !existing.contains(&base) {
            return base;
        }

        (1u64..)
            .map(|suffix| format!("{base}{suffix}"))
            .find(|candidate| !existing.contains(candidate))
            .unwrap_or(base)
    }
}
