//! Shared I²C controller adapter.
//!
//! Implements [`BusControl`] for the board's single I²C port.
//!
//! - **`feature = "espidf"`**: raw ESP-IDF sys calls. Releasing the bus
//!   deletes the legacy I²C driver so SCL/SDA can be bit-banged as GPIOs;
//!   acquiring re-installs it with the board's pins and clock.
//! - **`not(feature = "espidf")`**: records line activity in memory so
//!   host builds can drive the recovery path end to end.

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;
use log::{debug, info};
#[cfg(feature = "espidf")]
use log::warn;

use crate::app::ports::BusControl;
#[cfg(feature = "espidf")]
use crate::pins;

/// Owner of the I²C controller session and its two pins.
pub struct I2cBus {
    session_open: bool,
    scl_high: bool,
    clock_pulses: u32,
}

impl Default for I2cBus {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cBus {
    /// Wrap a controller session that is already installed.
    pub fn new() -> Self {
        Self {
            session_open: true,
            scl_high: true,
            clock_pulses: 0,
        }
    }

    /// Install the controller and return the adapter.
    pub fn install() -> Self {
        let mut bus = Self {
            session_open: false,
            scl_high: true,
            clock_pulses: 0,
        };
        bus.acquire_bus();
        bus
    }

    pub fn is_session_open(&self) -> bool {
        self.session_open
    }

    /// Rising SCL edges driven since construction.
    pub fn clock_pulses(&self) -> u32 {
        self.clock_pulses
    }
}

impl BusControl for I2cBus {
    fn release_bus(&mut self) {
        #[cfg(feature = "espidf")]
        {
            // SAFETY: the driver is only installed/deleted from the main
            // polling context, never concurrently with a transaction.
            let ret = unsafe { i2c_driver_delete(pins::I2C_PORT) };
            if ret != ESP_OK as i32 {
                warn!("i2c: driver delete failed (rc={})", ret);
            }
        }
        self.session_open = false;
        debug!("i2c: session released");
    }

    fn drive_clock(&mut self, high: bool) {
        #[cfg(feature = "espidf")]
        {
            // SAFETY: SCL is a plain GPIO while the driver is deleted.
            unsafe {
                gpio_set_direction(pins::I2C_SCL_GPIO, gpio_mode_t_GPIO_MODE_OUTPUT);
                gpio_set_level(pins::I2C_SCL_GPIO, if high { 1 } else { 0 });
            }
        }
        if high && !self.scl_high {
            self.clock_pulses = self.clock_pulses.saturating_add(1);
        }
        self.scl_high = high;
    }

    fn float_lines(&mut self) {
        #[cfg(feature = "espidf")]
        {
            let cfg = gpio_config_t {
                pin_bit_mask: (1u64 << pins::I2C_SCL_GPIO) | (1u64 << pins::I2C_SDA_GPIO),
                mode: gpio_mode_t_GPIO_MODE_INPUT,
                pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
                pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
                intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            };
            // SAFETY: reconfigures two pins owned exclusively by this adapter.
            let ret = unsafe { gpio_config(&cfg) };
            if ret != ESP_OK as i32 {
                warn!("i2c: could not float SCL/SDA (rc={})", ret);
            }
        }
        self.scl_high = true;
    }

    fn acquire_bus(&mut self) {
        #[cfg(feature = "espidf")]
        {
            let mut conf = i2c_config_t::default();
            conf.mode = i2c_mode_t_I2C_MODE_MASTER;
            conf.sda_io_num = pins::I2C_SDA_GPIO;
            conf.scl_io_num = pins::I2C_SCL_GPIO;
            conf.sda_pullup_en = true;
            conf.scl_pullup_en = true;
            conf.__bindgen_anon_1.master.clk_speed = pins::I2C_FREQ_HZ;

            // SAFETY: conf outlives both calls; the port is not in use while
            // the session is closed.
            let ret = unsafe { i2c_param_config(pins::I2C_PORT, &conf) };
            if ret != ESP_OK as i32 {
                warn!("i2c: param config failed (rc={})", ret);
                return;
            }
            let ret = unsafe { i2c_driver_install(pins::I2C_PORT, conf.mode, 0, 0, 0) };
            if ret != ESP_OK as i32 {
                warn!("i2c: driver install failed (rc={})", ret);
                return;
            }
        }
        self.session_open = true;
        info!("i2c: session acquired");
    }
}
