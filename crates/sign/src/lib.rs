//! Digital signature primitives
//!
//! Signature families authenticate the initiator in the Signed pattern. They
//! are never agreement families.

pub mod traditional;

use std::sync::Arc;

use kagree_api::{Family, Primitive};

// Re-exports from traditional schemes
pub use traditional::eddsa::Ed25519;

/// The signature primitive for a family, if this crate provides one
pub fn primitive(family: Family) -> Option<Primitive> {
    match family {
        Family::Ed25519 => Some(Primitive::Signature(Arc::new(Ed25519))),
        _ => None,
    }
}

/// Every primitive this crate provides
pub fn all() -> Vec<Primitive> {
    Family::ALL.into_iter().filter_map(primitive).collect()
}
