//! Project configuration for stratus.
//!
//! A stratus project is marked by a `stratus.yml` file at its root. This
//! crate loads that file into a [`Config`] and writes it back out as the
//! deployment manifest during a build pass. The manifest schema itself is
//! deliberately opaque: unknown keys round-trip untouched.

mod config;

pub use config::{Config, DEFAULT_CONFIG_FILENAME};
