//! Raw agreement primitive contract
//!
//! Each supported family implements exactly one of [`DhPrimitive`],
//! [`KemPrimitive`] or [`SignaturePrimitive`]. Implementations must:
//!
//! - reject keys tagged with another family with `TypeMismatch`,
//! - report a malformed peer key, an off-curve point or a degenerate result
//!   as `ComputationFailure`, never as a zero or default secret,
//! - never log key or secret material.

use std::sync::Arc;

use rand_core::CryptoRngCore;

use crate::error::Result;
use crate::types::{Family, FamilyClass, KeyPair, PrivateKey, PublicKey, SharedSecret};

/// Inputs of one side of an MQV computation
///
/// Our static and ephemeral key pairs, and the peer's static and ephemeral
/// public keys.
pub struct MqvInputs<'a> {
    pub static_private: &'a PrivateKey,
    pub ephemeral_private: &'a PrivateKey,
    pub ephemeral_public: &'a PublicKey,
    pub peer_static_public: &'a PublicKey,
    pub peer_ephemeral_public: &'a PublicKey,
}

/// Diffie-Hellman style primitive
pub trait DhPrimitive: Send + Sync {
    fn family(&self) -> Family;

    /// Generate a fresh key pair from the supplied CSPRNG
    fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair>;

    /// Check that a public key decodes to a valid group element
    fn validate_public(&self, public: &PublicKey) -> Result<()>;

    /// Check that a private key decodes and matches the public key
    fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()>;

    /// Raw shared value of our private key and the peer's public key
    fn compute_shared_value(&self, local: &PrivateKey, peer: &PublicKey) -> Result<SharedSecret>;

    /// Whether [`DhPrimitive::mqv_shared_value`] is available
    fn supports_mqv(&self) -> bool {
        false
    }

    /// Raw MQV shared value
    fn mqv_shared_value(&self, _inputs: MqvInputs<'_>) -> Result<SharedSecret> {
        Err(crate::Error::NotImplemented {
            feature: "MQV for this family",
        })
    }
}

/// Key encapsulation primitive
pub trait KemPrimitive: Send + Sync {
    fn family(&self) -> Family;

    fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair>;

    fn validate_public(&self, public: &PublicKey) -> Result<()>;

    fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()>;

    /// Exact size of an encapsulation
    fn encapsulation_len(&self) -> usize;

    /// Encapsulate a fresh shared value to the peer's public key
    fn encapsulate(
        &self,
        peer: &PublicKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(Vec<u8>, SharedSecret)>;

    /// Recover the shared value from an encapsulation
    ///
    /// Implicit rejection is the primitive's business: a tampered but
    /// well-sized encapsulation yields an unrelated value, not an error.
    fn decapsulate(&self, local: &PrivateKey, encapsulation: &[u8]) -> Result<SharedSecret>;
}

/// Signature primitive used by the Signed pattern
pub trait SignaturePrimitive: Send + Sync {
    fn family(&self) -> Family;

    fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair>;

    fn validate_public(&self, public: &PublicKey) -> Result<()>;

    fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()>;

    fn sign(&self, private: &PrivateKey, message: &[u8]) -> Result<Vec<u8>>;

    /// Verify a signature; any failure is `AuthenticationFailed`
    fn verify(&self, public: &PublicKey, message: &[u8], signature: &[u8]) -> Result<()>;
}

/// A primitive selected by family class
#[derive(Clone)]
pub enum Primitive {
    DiffieHellman(Arc<dyn DhPrimitive>),
    Kem(Arc<dyn KemPrimitive>),
    Signature(Arc<dyn SignaturePrimitive>),
}

impl Primitive {
    pub fn family(&self) -> Family {
        match self {
            Primitive::DiffieHellman(p) => p.family(),
            Primitive::Kem(p) => p.family(),
            Primitive::Signature(p) => p.family(),
        }
    }

    pub fn class(&self) -> FamilyClass {
        match self {
            Primitive::DiffieHellman(_) => FamilyClass::DiffieHellman,
            Primitive::Kem(_) => FamilyClass::Kem,
            Primitive::Signature(_) => FamilyClass::Signature,
        }
    }

    pub fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair> {
        match self {
            Primitive::DiffieHellman(p) => p.generate(rng),
            Primitive::Kem(p) => p.generate(rng),
            Primitive::Signature(p) => p.generate(rng),
        }
    }

    pub fn validate_public(&self, public: &PublicKey) -> Result<()> {
        match self {
            Primitive::DiffieHellman(p) => p.validate_public(public),
            Primitive::Kem(p) => p.validate_public(public),
            Primitive::Signature(p) => p.validate_public(public),
        }
    }

    pub fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()> {
        match self {
            Primitive::DiffieHellman(p) => p.validate_pair(public, private),
            Primitive::Kem(p) => p.validate_pair(public, private),
            Primitive::Signature(p) => p.validate_pair(public, private),
        }
    }

    /// The DH view of this primitive, or `TypeMismatch`
    pub fn as_dh(&self) -> Result<&Arc<dyn DhPrimitive>> {
        match self {
            Primitive::DiffieHellman(p) => Ok(p),
            other => Err(crate::Error::type_mismatch(
                "Primitive::as_dh",
                format!("{} is not a Diffie-Hellman family", other.family()),
            )),
        }
    }

    /// The KEM view of this primitive, or `TypeMismatch`
    pub fn as_kem(&self) -> Result<&Arc<dyn KemPrimitive>> {
        match self {
            Primitive::Kem(p) => Ok(p),
            other => Err(crate::Error::type_mismatch(
                "Primitive::as_kem",
                format!("{} is not a KEM family", other.family()),
            )),
        }
    }

    /// The signature view of this primitive, or `TypeMismatch`
    pub fn as_signature(&self) -> Result<&Arc<dyn SignaturePrimitive>> {
        match self {
            Primitive::Signature(p) => Ok(p),
            other => Err(crate::Error::type_mismatch(
                "Primitive::as_signature",
                format!("{} is not a signature family", other.family()),
            )),
        }
    }
}

impl core::fmt::Debug for Primitive {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Primitive({})", self.family())
    }
}
