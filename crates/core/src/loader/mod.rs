//! Layered property loading.
//!
//! Responsibilities:
//! - Resolve base, extensions, and override locations from the environment
//!   or from pinned `Locations`.
//! - Provide the `Krausening` engine that loads and publishes property sets.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Merging several files into one result (see `merge`).
//! - Detecting on-disk changes (see `reload`).
//!
//! Invariants / Assumptions:
//! - Locations are re-resolved on every load.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

mod engine;
mod env;

pub use engine::{Krausening, LoadReport, ManagedProperties};
pub use env::{DotenvError, LocationSource, Locations, env_var_or_none, load_dotenv};

#[cfg(test)]
mod tests;
