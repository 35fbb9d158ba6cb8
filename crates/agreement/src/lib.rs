//! Key agreement protocol engine
//!
//! Layers a uniform set of handshake patterns over heterogeneous algorithm
//! families:
//!
//! - **Anonymous**: only the responder is authenticated, by its static key
//! - **Basic**: static-static Diffie-Hellman with a fresh nonce
//! - **Signed**: Anonymous plus an initiator signature
//! - **MQV** and **Unified**: static and ephemeral keys on both sides
//! - **Composite**: several agreements merged into one secret, e.g. X25519
//!   next to ML-KEM-768
//!
//! Every pattern speaks the same envelope format ([`codec`]) and derives its
//! secret through the same pipeline ([`derive`]).
//!
//! ```no_run
//! use kagree_agreement::{negotiate, AgreementSpec, Registry};
//! use kagree_api::Family;
//! use rand_core::OsRng;
//!
//! # fn main() -> kagree_api::Result<()> {
//! let spec = AgreementSpec::anonymous(Family::X25519);
//! let responder_keys = Registry::global().generate_key_pair(&spec.key_spec, &mut OsRng)?;
//!
//! let mut initiator = negotiate(spec.clone(), None, Some(responder_keys.to_public()))?;
//! let initiation = initiator.create_initiator_message()?;
//!
//! let mut responder = negotiate(spec, Some(responder_keys), None)?;
//! let secret = responder.accept_initiator_message(&initiation.message)?;
//! assert_eq!(secret, initiation.secret);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod composite;
pub mod derive;
pub mod handle;
pub mod pattern;
pub mod registry;
pub mod spec;

pub use codec::{HandshakeMessage, MessageType};
pub use handle::{negotiate, negotiate_with, Handle, Initiation};
pub use pattern::{AgreementPattern, Credentials};
pub use registry::Registry;
pub use spec::{AgreementSpec, KdfSpec, Pattern, PatternKind};
