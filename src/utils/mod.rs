//! Shared utilities: user-friendly error formatting.
//!
//! ```
//! use suyan_host::utils::format_user_error;
//!
//! let err = anyhow::anyhow!("config.yaml: invalid value");
//! eprintln!("{}", format_user_error(&err));
//! ```

pub mod errors;

pub use errors::format_user_error;
