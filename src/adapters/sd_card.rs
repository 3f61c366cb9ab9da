//! SD card [`StorageMedium`] adapter.
//!
//! - **`feature = "espidf"`**: `mount()` brings up the SPI bus and mounts
//!   the FAT card at [`pins::SD_MOUNT_POINT`] through
//!   `esp_vfs_fat_sdspi_mount`. The card is unmounted on drop.
//! - **`not(feature = "espidf")`**: the root is any existing directory,
//!   which keeps the adapter testable against a temp dir.
//!
//! Once mounted, files go through `std::fs` on both targets. Files are
//! always rewritten in full (`File::create` truncates); nothing here ever
//! appends.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::StorageMedium;
use crate::error::StorageError;
use crate::pins;

pub struct SdCardStorage {
    root: PathBuf,
    mounted: bool,
    #[cfg(feature = "espidf")]
    card: *mut sdmmc_card_t,
}

impl Default for SdCardStorage {
    fn default() -> Self {
        Self::new(pins::SD_MOUNT_POINT)
    }
}

impl SdCardStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mounted: false,
            #[cfg(feature = "espidf")]
            card: core::ptr::null_mut(),
        }
    }

    fn path(&self, file: &str) -> Result<PathBuf, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        Ok(self.root.join(file))
    }

    #[cfg(feature = "espidf")]
    fn base_path(&self) -> Result<std::ffi::CString, StorageError> {
        self.root
            .to_str()
            .and_then(|s| std::ffi::CString::new(s).ok())
            .ok_or(StorageError::NotMounted)
    }

    /// Initialise the SPI bus and mount the card's FAT volume at `root`.
    #[cfg(feature = "espidf")]
    fn mount_card(&mut self) -> Result<(), StorageError> {
        let base = self.base_path()?;

        let mut bus = spi_bus_config_t::default();
        bus.__bindgen_anon_1.mosi_io_num = pins::SD_MOSI_GPIO;
        bus.__bindgen_anon_2.miso_io_num = pins::SD_MISO_GPIO;
        bus.sclk_io_num = pins::SD_SCLK_GPIO;
        bus.__bindgen_anon_3.quadwp_io_num = -1;
        bus.__bindgen_anon_4.quadhd_io_num = -1;
        bus.max_transfer_sz = 4000;

        // SAFETY: called once from the main task before any SPI traffic;
        // `bus` outlives the call.
        let ret = unsafe {
            spi_bus_initialize(pins::SD_SPI_HOST as _, &bus, spi_common_dma_t_SPI_DMA_CH_AUTO)
        };
        if ret != ESP_OK as i32 {
            warn!("storage: SPI bus init failed (rc={})", ret);
            return Err(StorageError::NotMounted);
        }

        // Field-for-field SDSPI_HOST_DEFAULT().
        let mut host = sdmmc_host_t::default();
        host.flags = SDMMC_HOST_FLAG_SPI | SDMMC_HOST_FLAG_DEINIT_ARG;
        host.slot = pins::SD_SPI_HOST as _;
        host.max_freq_khz = SDMMC_FREQ_DEFAULT as _;
        host.io_voltage = 3.3;
        host.init = Some(sdspi_host_init);
        host.set_card_clk = Some(sdspi_host_set_card_clk);
        host.do_transaction = Some(sdspi_host_do_transaction);
        host.__bindgen_anon_1.deinit_p = Some(sdspi_host_remove_device);
        host.io_int_enable = Some(sdspi_host_io_int_enable);
        host.io_int_wait = Some(sdspi_host_io_int_wait);
        host.get_real_freq = Some(sdspi_host_get_real_freq);

        let mut slot = sdspi_device_config_t::default();
        slot.host_id = pins::SD_SPI_HOST as _;
        slot.gpio_cs = pins::SD_CS_GPIO;
        slot.gpio_cd = -1;
        slot.gpio_wp = -1;
        slot.gpio_int = -1;

        let mount = esp_vfs_fat_mount_config_t {
            format_if_mount_failed: false,
            max_files: pins::SD_MAX_FILES,
            allocation_unit_size: 16 * 1024,
            ..Default::default()
        };

        let mut card: *mut sdmmc_card_t = core::ptr::null_mut();
        // SAFETY: all config structs and `base` outlive the call; `card`
        // receives a driver-owned handle released in `Drop`.
        let ret =
            unsafe { esp_vfs_fat_sdspi_mount(base.as_ptr(), &host, &slot, &mount, &mut card) };
        if ret != ESP_OK as i32 {
            warn!("storage: FAT mount at {} failed (rc={})", self.root.display(), ret);
            // SAFETY: the bus was initialised above and has no devices left.
            unsafe { spi_bus_free(pins::SD_SPI_HOST as _) };
            return Err(StorageError::NotMounted);
        }
        self.card = card;
        Ok(())
    }

    /// Host stand-in for mounting: the root must be an existing directory.
    #[cfg(not(feature = "espidf"))]
    fn mount_card(&mut self) -> Result<(), StorageError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => {
                warn!("storage: {} is not a directory", self.root.display());
                Err(StorageError::NotMounted)
            }
            Err(e) => {
                warn!("storage: {} unavailable ({})", self.root.display(), e);
                Err(StorageError::NotMounted)
            }
        }
    }
}

#[cfg(feature = "espidf")]
impl Drop for SdCardStorage {
    fn drop(&mut self) {
        if self.card.is_null() {
            return;
        }
        let Ok(base) = self.base_path() else {
            return;
        };
        // SAFETY: `card` came from a successful mount at `base`; it is
        // nulled so the unmount runs once.
        unsafe {
            esp_vfs_fat_sdcard_unmount(base.as_ptr(), self.card);
            spi_bus_free(pins::SD_SPI_HOST as _);
        }
        self.card = core::ptr::null_mut();
    }
}

impl StorageMedium for SdCardStorage {
    fn mount(&mut self) -> Result<(), StorageError> {
        if self.mounted {
            return Ok(());
        }
        self.mount_card()?;
        self.mounted = true;
        info!("storage: mounted at {}", self.root.display());
        Ok(())
    }

    fn read(&mut self, file: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(file)?;
        let mut f = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(_) => return Err(StorageError::Io),
        };
        let mut contents = String::new();
        f.read_to_string(&mut contents).map_err(|_| StorageError::Io)?;
        Ok(Some(contents))
    }

    fn overwrite(&mut self, file: &str, contents: &str) -> Result<(), StorageError> {
        let path = self.path(file)?;
        let mut f = File::create(&path).map_err(|_| StorageError::Io)?;
        f.write_all(contents.as_bytes())
            .and_then(|()| f.flush())
            .map_err(|_| StorageError::Io)
    }
}
