//! # peertrust-cli
//!
//! Command-line front end for the `peertrust` verifier.
//!
//! - `peertrust verify`: check a presented chain against anchors, pins and
//!   reference identities
//! - `peertrust fingerprint`: print the SHA-256 digests used by pins and
//!   digest anchors
//!
//! Output is either colored text or JSON (`--output json`).

pub mod cli;
pub mod output;

pub use cli::run;

/// Exit status for an accepted chain or a successful command.
pub const EXIT_ACCEPTED: u8 = 0;
/// Exit status for a rejected chain.
pub const EXIT_REJECTED: u8 = 1;
/// Exit status for usage, config, or I/O errors.
pub const EXIT_ERROR: u8 = 2;
