#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod notify;
pub mod telemetry;
pub mod types;
pub mod widget;

pub type Result<T> = std::result::Result<T, error::Error>;
