//! Host-side primitives shared by the desktop runtime and its apps.
//!
//! The desktop logic never reads the wall clock or a random generator directly. It goes through
//! the [`Clock`] and [`EntropySource`] seams defined here so reducers and game loops stay
//! deterministic under test.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod entropy;
pub mod time;

pub use entropy::{EntropySource, SmallRngEntropy};
pub use time::{unix_time_ms_now, Clock, ManualClock, SystemClock};
