//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C or test trigger → broadcast → server stops accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
