//! Pin and bus assignments for the AQMon main board.
//!
//! Single source of truth — every adapter references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Shared I²C bus (SCD41, SGP30, BMP280)
// ---------------------------------------------------------------------------

/// Hardware I²C controller the sensors hang off.
pub const I2C_PORT: i32 = 0;
pub const I2C_SDA_GPIO: i32 = 20;
pub const I2C_SCL_GPIO: i32 = 21;
/// Standard-mode clock; the SCD41 and SGP30 both top out at 100 kHz reliably.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Default device addresses
// ---------------------------------------------------------------------------

pub const SCD41_I2C_ADDR: u8 = 0x62;
pub const SGP30_I2C_ADDR: u8 = 0x58;
pub const BMP280_I2C_ADDR: u8 = 0x77;

// ---------------------------------------------------------------------------
// SD card (baseline persistence)
// ---------------------------------------------------------------------------

/// SPI controller the card slot is wired to (`SPI2_HOST`).
pub const SD_SPI_HOST: u32 = 1;
pub const SD_SCLK_GPIO: i32 = 6;
pub const SD_MOSI_GPIO: i32 = 7;
pub const SD_MISO_GPIO: i32 = 2;
pub const SD_CS_GPIO: i32 = 10;

/// VFS mount point of the FAT-formatted SD card.
pub const SD_MOUNT_POINT: &str = "/sdcard";
/// Open-file limit passed to the FAT VFS driver.
pub const SD_MAX_FILES: i32 = 4;
