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

//! CSV file backed repository.
//!
//! The whole table is loaded on open and rewritten after every mutation
//! (written to a sibling temp file, then renamed over the original).
//!
//! # Exclusivity
//!
//! A repository holds an exclusive `flock` on `<path>.lock` from
//! [`CsvRepository::open`] until it is dropped. The in-memory table is the
//! only writer of the file for that whole time, so two processes can never
//! book from stale copies of it. [`CsvRepository::open`] waits for the lock;
//! [`CsvRepository::try_open`] fails instead.
//!
//! # CSV Format
//!
//! ```csv
//! id,passengerName,seatRow,seatColumn,eTicketNumber,created
//! 1,Bob Smith,0,0,BIoNbFsOmTiCt4320,2025-06-01T09:30:00Z
//! ```
//!
//! `seatRow` is 0-11 and `seatColumn` 0-3. Rows outside that range are kept
//! as-is so the file round-trips, and are ignored by seat projections.

use crate::base::{ReservationId, Seat};
use crate::error::ReservationError;
use crate::repository::{MemoryRepository, Repository};
use crate::reservation::{NewReservation, Reservation};
use csv::{ReaderBuilder, Trim, Writer};
use fs2::FileExt;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Repository persisted to a single CSV file.
#[derive(Debug)]
pub struct CsvRepository {
    path: PathBuf,
    table: MemoryRepository,
    /// Exclusive lock, released when the file handle is closed.
    _lock: File,
}

impl CsvRepository {
    /// Opens the file at `path`, starting empty if it does not exist yet.
    ///
    /// Blocks while another repository holds the store lock.
    ///
    /// # Errors
    ///
    /// [`ReservationError::StorageFailure`] if the lock cannot be taken, the
    /// file cannot be read, a row cannot be decoded, or rows violate the
    /// unique constraints.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ReservationError> {
        Self::open_locked(path.into(), true)
    }

    /// Like [`CsvRepository::open`], but fails with
    /// [`ReservationError::StorageFailure`] if the store is already locked.
    pub fn try_open(path: impl Into<PathBuf>) -> Result<Self, ReservationError> {
        Self::open_locked(path.into(), false)
    }

    fn open_locked(path: PathBuf, wait: bool) -> Result<Self, ReservationError> {
        let lock = acquire_lock(&path, wait)?;
        let table = match File::open(&path) {
            Ok(file) => MemoryRepository::from_records(read_reservations(file)?)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "store file missing, starting empty");
                MemoryRepository::new()
            }
            Err(e) => return Err(e.into()),
        };

        let out_of_range = table
            .list()?
            .iter()
            .filter(|r| r.seat().is_none())
            .count();
        if out_of_range > 0 {
            warn!(
                path = %path.display(),
                count = out_of_range,
                "store contains reservations with out-of-range seats"
            );
        }
        debug!(path = %path.display(), reservations = table.len(), "opened csv store");

        Ok(Self {
            path,
            table,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the file from the in-memory table.
    ///
    /// The temp file is deleted if any step fails.
    fn persist(&self) -> Result<(), ReservationError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;

        let mut writer = Writer::from_writer(tmp.as_file_mut());
        for reservation in self.table.list()? {
            writer.serialize(&reservation)?;
        }
        writer.flush()?;
        drop(writer);

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut lock = path.as_os_str().to_owned();
    lock.push(".lock");
    PathBuf::from(lock)
}

fn acquire_lock(path: &Path, wait: bool) -> Result<File, ReservationError> {
    let lock_path = lock_path(path);
    let lock = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)?;

    if let Err(e) = lock.try_lock_exclusive() {
        if !wait {
            return Err(ReservationError::StorageFailure(format!(
                "store {} is locked by another process: {e}",
                path.display()
            )));
        }
        debug!(lock = %lock_path.display(), "store is locked, waiting");
        lock.lock_exclusive()?;
    }
    Ok(lock)
}

/// Decodes every reservation row from a CSV reader.
///
/// A malformed row fails the whole read.
pub fn read_reservations<R: Read>(reader: R) -> Result<Vec<Reservation>, ReservationError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    rdr.deserialize::<Reservation>()
        .map(|row| row.map_err(ReservationError::from))
        .collect()
}

impl Repository for CsvRepository {
    fn insert(&mut self, reservation: NewReservation) -> Result<Reservation, ReservationError> {
        let record = self.table.insert(reservation)?;
        if let Err(e) = self.persist() {
            self.table.remove(record.id)?;
            return Err(e);
        }
        Ok(record)
    }

    fn remove(&mut self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        let Some(record) = self.table.remove(id)? else {
            return Ok(None);
        };
        if let Err(e) = self.persist() {
            self.table.restore(record)?;
            return Err(e);
        }
        Ok(Some(record))
    }

    fn get(&self, id: ReservationId) -> Result<Option<Reservation>, ReservationError> {
        self.table.get(id)
    }

    fn list(&self) -> Result<Vec<Reservation>, ReservationError> {
        self.table.list()
    }

    fn is_occupied(&self, seat: Seat) -> Result<bool, ReservationError> {
        self.table.is_occupied(seat)
    }

    fn tickets(&self) -> Result<HashSet<String>, ReservationError> {
        self.table.tickets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_rows_with_whitespace() {
        let csv = "id,passengerName,seatRow,seatColumn,eTicketNumber,created\n\
                   1, Bob Smith ,0,0,BIoNbFsOmTiCt4320,2025-06-01T09:30:00Z\n";

        let rows = read_reservations(Cursor::new(csv)).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, ReservationId(1));
        assert_eq!(rows[0].passenger_name, "Bob Smith");
        assert_eq!(rows[0].seat(), Some(Seat::new(0, 0).unwrap()));
    }

    #[test]
    fn legacy_out_of_range_rows_are_kept() {
        let csv = "id,passengerName,seatRow,seatColumn,eTicketNumber,created\n\
                   7,Old Timer,12,4,OLD,2020-01-01T00:00:00Z\n";

        let rows = read_reservations(Cursor::new(csv)).unwrap();

        assert_eq!(rows[0].seat_row, 12);
        assert!(rows[0].seat().is_none());
    }

    #[test]
    fn malformed_row_is_a_storage_failure() {
        let csv = "id,passengerName,seatRow,seatColumn,eTicketNumber,created\n\
                   x,Bob,zero,0,T,yesterday\n";

        let result = read_reservations(Cursor::new(csv));

        assert!(matches!(result, Err(ReservationError::StorageFailure(_))));
    }
}
