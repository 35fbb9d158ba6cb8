//! # kagree
//!
//! A key agreement engine: one wire format and one derivation pipeline for
//! Anonymous, Basic, Signed, MQV, Unified and Composite handshakes over
//! X25519, NIST P-256/P-384 ECDH and ML-KEM.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! kagree = "0.3"
//! ```
//!
//! ```no_run
//! use kagree::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // X25519 next to ML-KEM-768, merged into one secret
//! let spec = AgreementSpec::composite(vec![
//!     AgreementSpec::anonymous(Family::X25519),
//!     AgreementSpec::anonymous(Family::MlKem768),
//! ]);
//! let responder_keys = Registry::global().generate_key_pair(&spec.key_spec, &mut OsRng)?;
//!
//! let mut initiator = negotiate(spec.clone(), None, Some(responder_keys.to_public()))?;
//! let Initiation { message, secret } = initiator.create_initiator_message()?;
//!
//! let mut responder = negotiate(spec, Some(responder_keys), None)?;
//! assert_eq!(responder.accept_initiator_message(&message)?, secret);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `std` (default): standard library support
//! - `primitives` (default): re-export the primitive, signature and KDF crates
//! - `serde`: `Serialize`/`Deserialize` for specs and public keys
//! - `full`: all of the above
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - `kagree-agreement`: patterns, codec, composite agreements, derivation
//! - `kagree-api`: error type, primitive traits, key and secret types
//! - `kagree-kem`: X25519, ECDH P-256/P-384 (with MQV), ML-KEM
//! - `kagree-sign`: Ed25519 for the Signed pattern
//! - `kagree-symmetric`: HKDF, the one-step concatenation KDF, confirmation MAC

// Core re-exports (always available)
pub use kagree_agreement as agreement;
pub use kagree_api as api;
pub use kagree_common as common;
pub use kagree_internal as internal;
pub use kagree_params as params;

#[cfg(feature = "primitives")]
pub use kagree_kem as kem;

#[cfg(feature = "primitives")]
pub use kagree_sign as sign;

#[cfg(feature = "primitives")]
pub use kagree_symmetric as symmetric;

pub use kagree_agreement::{negotiate, negotiate_with, AgreementSpec, Handle, Initiation, Registry};

// Crates that appear in the public API
pub use rand_core;
pub use zeroize;

/// Common imports for kagree users
pub mod prelude {
    // Error types
    pub use crate::api::{Error, ErrorKind, Result};

    // Keys, secrets and algorithm identifiers
    pub use crate::api::{
        Family, FamilyClass, KdfAlgorithm, KeyPair, KeyPairSpec, PrivateKey, PublicKey,
        SessionSecret, SharedSecret,
    };

    // The engine
    pub use crate::agreement::{
        negotiate, negotiate_with, AgreementSpec, Handle, Initiation, KdfSpec, Pattern,
        PatternKind, Registry,
    };

    pub use rand_core::OsRng;
}
