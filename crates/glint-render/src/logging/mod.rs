//! Global logger setup for glint binaries.
//!
//! The library crates only emit through `log`; picking a backend is left to
//! whoever owns `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
