//! Protocol-level constants shared by the engine crates

pub mod hash;
pub mod labels;
pub mod wire;
