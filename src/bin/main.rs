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

use bus_reservation_rs::{
    CsvRepository, PriceTable, Repository, ReservationEngine, ReservationError, ReservationId,
    ReservationView, Seat, SeatGrid, SortOrder,
};
use clap::{Parser, Subcommand};
use csv::Writer;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Bus Reservation - Manage the seats of a single bus trip
///
/// Reservations are kept in a CSV file. Seat coordinates are 1-based:
/// rows 1-12 from the front, columns 1-4 from the left.
#[derive(Parser, Debug)]
#[command(name = "bus-reservation")]
#[command(about = "Book, cancel and inspect seats on a 12x4 bus", long_about = None)]
struct Args {
    /// Path to the reservations CSV file (created on first booking)
    #[arg(
        long,
        value_name = "FILE",
        env = "BUS_RESERVATION_STORE",
        default_value = "reservations.csv"
    )]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reserve a seat and print the e-ticket
    Book {
        /// Passenger name (2-100 characters)
        name: String,
        /// Seat row, 1-12
        row: i64,
        /// Seat column, 1-4
        column: i64,
    },
    /// Cancel a reservation by id
    Cancel {
        /// Reservation id as printed by `book` or `list`
        id: u64,
    },
    /// Print all reservations as CSV
    List {
        /// Newest reservations first
        #[arg(long)]
        newest_first: bool,
    },
    /// Print the seat map
    Seats,
    /// Print the dashboard snapshot as JSON
    Dashboard,
    /// Print the price of a seat
    Price {
        /// Seat row, 1-12
        row: i64,
        /// Seat column, 1-4
        column: i64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Errors surfaced to the command line.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Reservation(#[from] ReservationError),
    #[error("failed to write output: {0}")]
    Output(String),
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Output(error.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(error: csv::Error) -> Self {
        Self::Output(error.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::Output(error.to_string())
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let Args { store, command } = args;
    let open = || CsvRepository::open(&store).map(ReservationEngine::with_repository);
    let mut out = std::io::stdout().lock();

    match command {
        Command::Book { name, row, column } => {
            let booking = open()?.book(&name, row, column)?;
            writeln!(
                out,
                "Reserved seat {}-{} for {} (reservation {})",
                row,
                column,
                booking.reservation.passenger_name,
                booking.reservation_id()
            )?;
            writeln!(out, "E-ticket: {}", booking.e_ticket_number())?;
            writeln!(out, "Price: {}", booking.price)?;
        }
        Command::Cancel { id } => {
            let cancellation = open()?.cancel(ReservationId(id))?;
            writeln!(
                out,
                "Cancelled reservation {} for {} (seat {}-{})",
                cancellation.reservation_id,
                cancellation.passenger_name,
                cancellation.seat_row_display,
                cancellation.seat_column_display
            )?;
        }
        Command::List { newest_first } => {
            let order = if newest_first {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            write_reservations(&open()?, order, &mut out)?;
        }
        Command::Seats => {
            let names = open()?.occupant_names()?;
            write!(out, "{}", render_seat_map(&names))?;
        }
        Command::Dashboard => {
            let snapshot = open()?.dashboard_snapshot()?;
            serde_json::to_writer_pretty(&mut out, &snapshot)?;
            writeln!(out)?;
        }
        // Pricing is static; no need to touch the store.
        Command::Price { row, column } => {
            let seat = Seat::from_display(row, column)?;
            writeln!(out, "{}", PriceTable::seat_price(seat))?;
        }
    }

    Ok(())
}

/// Write reservations to a CSV writer in display coordinates.
///
/// # CSV Format
///
/// Columns: `id, passenger_name, seat_row_display, seat_column_display, e_ticket_number, created_at`
fn write_reservations<R: Repository, W: Write>(
    engine: &ReservationEngine<R>,
    order: SortOrder,
    writer: W,
) -> Result<(), CliError> {
    let mut wtr = Writer::from_writer(writer);
    for reservation in engine.reservations(order)? {
        wtr.serialize(ReservationView::from(reservation))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders the seat map, one line per row, `X` for taken seats.
///
/// ```text
///      1 2   3 4
///  1   X .   . X
/// ```
fn render_seat_map(names: &SeatGrid<Option<String>>) -> String {
    let mut map = String::from("     1 2   3 4\n");
    for (index, row) in names.rows().iter().enumerate() {
        let cell = |name: &Option<String>| if name.is_some() { 'X' } else { '.' };
        map.push_str(&format!(
            "{:>2}   {} {}   {} {}\n",
            index + 1,
            cell(&row[0]),
            cell(&row[1]),
            cell(&row[2]),
            cell(&row[3])
        ));
    }
    map
}
