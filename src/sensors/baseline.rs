//! SGP30 baseline persistence.
//!
//! The SGP30 takes hours to learn a usable baseline. The learned pair is
//! snapshotted to the storage medium as one text line (`"<eco2> <tvoc>\n"`)
//! and restored at the next boot.
//!
//! Persistence is strictly best-effort: a missing card, absent file or
//! unparseable line degrades to "learn from scratch" and is only logged.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::ports::{BaselineRecord, StorageMedium};
use crate::error::StorageError;

/// Default baseline file name on the storage medium.
pub const BASELINE_FILE: &str = "sgp30_baseline.txt";

/// Parse a line holding exactly two unsigned 16-bit integers.
pub fn parse_baseline_line(line: &str) -> Option<BaselineRecord> {
    let mut fields = line.split_whitespace();
    let eco2 = fields.next()?.parse().ok()?;
    let tvoc = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(BaselineRecord { eco2, tvoc })
}

/// Render a record as the persisted line.
pub fn format_baseline_line(record: BaselineRecord) -> heapless::String<16> {
    let mut line = heapless::String::new();
    // "65535 65535\n" is 12 bytes; cannot overflow.
    let _ = writeln!(line, "{} {}", record.eco2, record.tvoc);
    line
}

/// Baseline store bound to one storage medium and file.
pub struct BaselineStore<M: StorageMedium> {
    medium: M,
    file: heapless::String<32>,
    mounted: bool,
    mount_attempted: bool,
}

impl<M: StorageMedium> BaselineStore<M> {
    pub fn new(medium: M, file: &str) -> Self {
        let mut name = heapless::String::new();
        for c in file.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self {
            medium,
            file: name,
            mounted: false,
            mount_attempted: false,
        }
    }

    /// Mount the medium. Only the first call does anything; a failure
    /// disables persistence for the rest of the run.
    pub fn mount(&mut self) -> bool {
        if self.mount_attempted {
            return self.mounted;
        }
        self.mount_attempted = true;
        match self.medium.mount() {
            Ok(()) => {
                info!("Baseline store: medium mounted");
                self.mounted = true;
            }
            Err(e) => {
                warn!("Baseline store: mount failed ({}), baseline will not persist", e);
            }
        }
        self.mounted
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Read the persisted baseline, if one exists and parses.
    pub fn load(&mut self) -> Option<BaselineRecord> {
        match self.try_load() {
            Ok(record) => record,
            Err(StorageError::NotMounted) => None,
            Err(StorageError::Malformed) => {
                warn!("Baseline store: ignoring malformed baseline file");
                None
            }
            Err(e) => {
                warn!("Baseline store: read failed: {}", e);
                None
            }
        }
    }

    /// Like [`load`](Self::load), but reports why nothing was loaded.
    /// `Ok(None)` means the file does not exist yet.
    pub fn try_load(&mut self) -> Result<Option<BaselineRecord>, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        let Some(contents) = self.medium.read(&self.file)? else {
            return Ok(None);
        };
        let first = contents.lines().next().unwrap_or("");
        parse_baseline_line(first)
            .map(Some)
            .ok_or(StorageError::Malformed)
    }

    /// Overwrite the persisted baseline.
    pub fn save(&mut self, record: BaselineRecord) -> Result<(), StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        let line = format_baseline_line(record);
        match self.medium.overwrite(&self.file, &line) {
            Ok(()) => {
                info!(
                    "Baseline saved  eCO2={}  TVOC={}",
                    record.eco2, record.tvoc
                );
                Ok(())
            }
            Err(e) => {
                warn!("Baseline store: could not write baseline file: {}", e);
                Err(e)
            }
        }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }
}
