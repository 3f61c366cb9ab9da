//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one sensor channel (or
//! the hub) against mock transports. All tests run on the host (x86_64)
//! with no real hardware required.

mod hub_tests;
mod mock_hw;
