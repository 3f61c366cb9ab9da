//! Fuzz target: SGP30 baseline file
//!
//! Feeds arbitrary bytes to the baseline store as the on-card file and
//! verifies:
//! - No panics on any file contents (binary, huge, empty, non-UTF-8)
//! - A loaded record always re-serialises to a line that parses back to it
//! - Saving after a load leaves exactly one well-formed line on the card
//!
//! cargo fuzz run fuzz_baseline_file

#![no_main]

use aqmon::app::ports::StorageMedium;
use aqmon::error::StorageError;
use aqmon::sensors::baseline::{
    BASELINE_FILE, BaselineStore, format_baseline_line, parse_baseline_line,
};
use libfuzzer_sys::fuzz_target;

// ── Single-file StorageMedium for fuzz testing ────────────────

struct OneFile {
    contents: Option<String>,
}

impl StorageMedium for OneFile {
    fn mount(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    fn read(&mut self, _file: &str) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn overwrite(&mut self, _file: &str, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let mut store = BaselineStore::new(OneFile { contents: Some(text) }, BASELINE_FILE);
    assert!(store.mount());

    let Some(record) = store.load() else {
        return;
    };

    let line = format_baseline_line(record);
    assert_eq!(parse_baseline_line(line.trim_end()), Some(record));

    store.save(record).expect("in-memory save cannot fail");
    let written = store.medium().contents.clone().unwrap_or_default();
    assert_eq!(written.lines().count(), 1);
    assert_eq!(store.load(), Some(record));
});
