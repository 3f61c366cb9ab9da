//! Application boundary.
//!
//! The acquisition core in [`crate::sensors`] reaches hardware, storage and
//! the display only through the **port traits** defined in [`ports`], so it
//! runs unchanged against the mocks in `tests/`.

pub mod ports;
