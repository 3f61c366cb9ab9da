//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements     | Connects to                 |
//! |---------------|----------------|-----------------------------|
//! | `i2c_bus`     | BusControl     | ESP32 I²C driver, SCL/SDA   |
//! | `log_display` | DisplaySink    | Serial log output           |
//! | `sd_card`     | StorageMedium  | FAT card via VFS / host dir |
//! | `time`        | (clock)        | ESP32 system timer          |

pub mod i2c_bus;
pub mod log_display;
pub mod sd_card;
pub mod time;
