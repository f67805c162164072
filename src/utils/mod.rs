//! Utility Module
//!
//! - [`time`]: monotonic clock types, `web-time` backed on wasm

pub mod time;
