//! Internal utilities for the kagree workspace
//!
//! Constant-time comparisons and big-endian integer helpers shared by the
//! primitive adapters and the handshake codec. Not part of the public API.

pub mod constant_time;
pub mod endian;

pub use constant_time::{ct_eq, ct_eq_choice};
