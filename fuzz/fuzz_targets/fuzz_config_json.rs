//! Fuzz target: `MonitorConfig` JSON loader
//!
//! Arbitrary bytes as `config.json` must never panic the loader, and
//! anything it accepts must pass validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use aqmon::config::MonitorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = MonitorConfig::from_json(text) {
        assert!(cfg.validate().is_ok());
        assert!(cfg.retry_policy().max_attempts >= 1);
    }
});
