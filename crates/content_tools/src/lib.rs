//! # Content Development Tools
//!
//! Command-line tools for pack authors:
//! - Pack validator (JSON or RON packs, optional options file)
//! - Digest printer

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod load;
pub mod validate;
