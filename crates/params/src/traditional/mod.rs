//! Constants for classical agreement and signature families

pub mod ecdh;
pub mod ed25519;
pub mod xdh;
