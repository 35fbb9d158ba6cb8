//! Raw agreement primitives
//!
//! Each family implements one trait from `kagree_api::traits::agreement` on
//! top of an ecosystem crate. Keys cross this boundary as tagged byte
//! strings; nothing here frames messages or derives keys.

pub mod ecdh;
pub mod mlkem;
pub mod xdh;

use std::sync::Arc;

use kagree_api::{Family, Primitive};

// Re-exports
pub use ecdh::{EcdhP256, EcdhP384};
pub use mlkem::{MlKem, MlKem1024, MlKem512, MlKem768};
pub use xdh::X25519;

/// The agreement primitive for a family, if this crate provides one
pub fn primitive(family: Family) -> Option<Primitive> {
    let primitive = match family {
        Family::X25519 => Primitive::DiffieHellman(Arc::new(X25519)),
        Family::EcdhP256 => Primitive::DiffieHellman(Arc::new(EcdhP256)),
        Family::EcdhP384 => Primitive::DiffieHellman(Arc::new(EcdhP384)),
        Family::MlKem512 => Primitive::Kem(Arc::new(MlKem512::new())),
        Family::MlKem768 => Primitive::Kem(Arc::new(MlKem768::new())),
        Family::MlKem1024 => Primitive::Kem(Arc::new(MlKem1024::new())),
        Family::Ed25519 => return None,
    };
    Some(primitive)
}

/// Every primitive this crate provides
pub fn all() -> Vec<Primitive> {
    Family::ALL.into_iter().filter_map(primitive).collect()
}
