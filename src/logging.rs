//! Logging macros
//!
//! Messages go through the `log` facade by default. With the `esp32-log`
//! feature they are printed directly with `esp_println`, which is what the
//! bare-metal bulb images use.

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32-log")]
        esp_println::println!($($arg)*);
        #[cfg(not(feature = "esp32-log"))]
        log::debug!($($arg)*);
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32-log")]
        esp_println::println!($($arg)*);
        #[cfg(not(feature = "esp32-log"))]
        log::info!($($arg)*);
    }};
}

macro_rules! warning {
    ($($arg:tt)*) => {{
        #[cfg(feature = "esp32-log")]
        esp_println::println!($($arg)*);
        #[cfg(not(feature = "esp32-log"))]
        log::warn!($($arg)*);
    }};
}

pub(crate) use {debug, info, warning};
