//! Traditional signature schemes

pub mod eddsa;

// Re-export EdDSA types
pub use eddsa::Ed25519;
