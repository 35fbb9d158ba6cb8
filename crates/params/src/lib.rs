//! Constant values for kagree
//!
//! Key and ciphertext sizes per family, wire-format limits and the
//! domain-separation labels bound into derivation, signing and confirmation.

#![no_std]

pub mod pqc;
pub mod traditional;
pub mod utils;
