//! Resource Catalogue common library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared helpers used by the catalogue workspace members:
//!
//! - **Logging**: `tracing` subscriber setup driven by environment variables
//! - **Text**: identifier sanitising and hashing
//! - **Time**: epoch-millisecond timestamps
//! - **Errors**: the common error type
//!
//! # Example
//!
//! ```
//! use catalogue_common::text::{md5_hex, sanitize};
//!
//! let id = format!("{}.{}", "athena", sanitize("Data Portal"));
//! assert_eq!(id, "athena.data_portal");
//! assert_eq!(md5_hex("abc").len(), 32);
//! ```

pub mod error;
pub mod logging;
pub mod text;
pub mod time;

pub use error::{CommonError, Result};
