//! Core types with security guarantees for kagree
//!
//! Algorithm families, key-pair specifications, the opaque key containers
//! handed to primitives, and the two secret types that leave them.

use core::fmt;
use core::str::FromStr;

use kagree_internal::constant_time::ct_eq;
use kagree_params::utils::hash::{SHA256_OUTPUT_SIZE, SHA384_OUTPUT_SIZE, SHA512_OUTPUT_SIZE};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Broad class of an algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FamilyClass {
    /// Two key pairs combine into a shared value
    DiffieHellman,
    /// A public key encapsulates a fresh shared value
    Kem,
    /// Signing only; never an agreement family
    Signature,
}

/// Supported algorithm families
///
/// The wire code of a family is stable and doubles as the algorithm
/// identifier carried in handshake envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Family {
    X25519,
    EcdhP256,
    EcdhP384,
    MlKem512,
    MlKem768,
    MlKem1024,
    Ed25519,
}

impl Family {
    /// Every supported family, in wire-code order
    pub const ALL: [Family; 7] = [
        Family::X25519,
        Family::EcdhP256,
        Family::EcdhP384,
        Family::MlKem512,
        Family::MlKem768,
        Family::MlKem1024,
        Family::Ed25519,
    ];

    /// Stable 16-bit identifier used on the wire
    pub const fn code(self) -> u16 {
        match self {
            Family::X25519 => 0x0001,
            Family::EcdhP256 => 0x0002,
            Family::EcdhP384 => 0x0003,
            Family::MlKem512 => 0x0101,
            Family::MlKem768 => 0x0102,
            Family::MlKem1024 => 0x0103,
            Family::Ed25519 => 0x0201,
        }
    }

    /// Reverse of [`Family::code`]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub const fn class(self) -> FamilyClass {
        match self {
            Family::X25519 | Family::EcdhP256 | Family::EcdhP384 => FamilyClass::DiffieHellman,
            Family::MlKem512 | Family::MlKem768 | Family::MlKem1024 => FamilyClass::Kem,
            Family::Ed25519 => FamilyClass::Signature,
        }
    }

    /// Canonical algorithm identifier
    pub const fn name(self) -> &'static str {
        match self {
            Family::X25519 => "X25519",
            Family::EcdhP256 => "ECDH-P256",
            Family::EcdhP384 => "ECDH-P384",
            Family::MlKem512 => "ML-KEM-512",
            Family::MlKem768 => "ML-KEM-768",
            Family::MlKem1024 => "ML-KEM-1024",
            Family::Ed25519 => "Ed25519",
        }
    }

    /// Whether the family can carry an agreement (DH or KEM class)
    pub const fn is_agreement(self) -> bool {
        !matches!(self.class(), FamilyClass::Signature)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::parameter("Family::from_str", format!("unknown algorithm {s:?}")))
    }
}

/// Shape of a key pair: one family, or an ordered list of component shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyPairSpec {
    Single(Family),
    Composite(Vec<KeyPairSpec>),
}

impl KeyPairSpec {
    /// The family of a single spec
    pub fn family(&self) -> Option<Family> {
        match self {
            KeyPairSpec::Single(family) => Some(*family),
            KeyPairSpec::Composite(_) => None,
        }
    }

    /// Component specs of a composite; empty for a single spec
    pub fn components(&self) -> &[KeyPairSpec] {
        match self {
            KeyPairSpec::Single(_) => &[],
            KeyPairSpec::Composite(parts) => parts,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, KeyPairSpec::Composite(_))
    }
}

impl From<Family> for KeyPairSpec {
    fn from(family: Family) -> Self {
        KeyPairSpec::Single(family)
    }
}

impl fmt::Display for KeyPairSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPairSpec::Single(family) => write!(f, "{family}"),
            KeyPairSpec::Composite(parts) => {
                f.write_str("Composite(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    write!(f, "{part}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Public key bytes tagged with their family
///
/// The encoding is the family's native one (raw for X25519 and Ed25519,
/// SEC1 compressed for the NIST curves, FIPS 203 for ML-KEM).
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PublicKey {
    family: Family,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(family: Family, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            family,
            bytes: bytes.into(),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey<{}>({} bytes)", self.family, self.bytes.len())
    }
}

/// Private key bytes tagged with their family
///
/// Zeroized on drop, redacted in `Debug`, compared in constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    family: Family,
    bytes: Vec<u8>,
}

impl PrivateKey {
    pub fn new(family: Family, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            family,
            bytes: bytes.into(),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Raw secret bytes; only primitives should read these
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family && ct_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey<{}>[REDACTED]", self.family)
    }
}

/// Key material held by a [`KeyPair`]
#[derive(Clone, PartialEq, Eq)]
enum KeyMaterial {
    Single {
        public: PublicKey,
        private: Option<PrivateKey>,
    },
    Composite(Vec<KeyPair>),
}

/// A public key with an optional matching private key, or an ordered list of
/// component key pairs
///
/// A public-only key pair is valid and is what a peer's key usually looks
/// like. Matching of the two halves is checked once, by the family primitive
/// at generation or import; [`KeyPair::from_parts`] only checks family tags.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    spec: KeyPairSpec,
    material: KeyMaterial,
}

impl KeyPair {
    /// Assemble a single key pair from its halves
    ///
    /// Both halves must carry the same family. Use the registry's import path
    /// for material from outside the process, which also checks that the
    /// private key matches the public key.
    pub fn from_parts(public: PublicKey, private: Option<PrivateKey>) -> Result<Self> {
        if let Some(private) = &private {
            let (expected, actual) = (public.family(), private.family());
            crate::error::validate::family("KeyPair::from_parts", expected, actual)?;
        }
        Ok(Self {
            spec: KeyPairSpec::Single(public.family()),
            material: KeyMaterial::Single { public, private },
        })
    }

    /// A key pair that carries only a public key
    pub fn public_only(public: PublicKey) -> Self {
        Self {
            spec: KeyPairSpec::Single(public.family()),
            material: KeyMaterial::Single {
                public,
                private: None,
            },
        }
    }

    /// Group component key pairs into a composite
    pub fn composite(parts: Vec<KeyPair>) -> Result<Self> {
        if parts.len() < 2 {
            return Err(Error::parameter(
                "KeyPair::composite",
                "a composite key pair needs at least two components",
            ));
        }
        let spec = KeyPairSpec::Composite(parts.iter().map(|p| p.spec.clone()).collect());
        Ok(Self {
            spec,
            material: KeyMaterial::Composite(parts),
        })
    }

    pub fn spec(&self) -> &KeyPairSpec {
        &self.spec
    }

    /// Family of a single key pair
    pub fn family(&self) -> Option<Family> {
        self.spec.family()
    }

    /// Public half of a single key pair
    pub fn public_key(&self) -> Option<&PublicKey> {
        match &self.material {
            KeyMaterial::Single { public, .. } => Some(public),
            KeyMaterial::Composite(_) => None,
        }
    }

    /// Private half of a single key pair, when present
    pub fn private_key(&self) -> Option<&PrivateKey> {
        match &self.material {
            KeyMaterial::Single { private, .. } => private.as_ref(),
            KeyMaterial::Composite(_) => None,
        }
    }

    /// Component key pairs of a composite; empty for a single key pair
    pub fn parts(&self) -> &[KeyPair] {
        match &self.material {
            KeyMaterial::Single { .. } => &[],
            KeyMaterial::Composite(parts) => parts,
        }
    }

    /// Whether every private half is present
    pub fn has_private(&self) -> bool {
        match &self.material {
            KeyMaterial::Single { private, .. } => private.is_some(),
            KeyMaterial::Composite(parts) => parts.iter().all(KeyPair::has_private),
        }
    }

    /// Copy of this key pair with every private half removed
    pub fn to_public(&self) -> KeyPair {
        match &self.material {
            KeyMaterial::Single { public, .. } => KeyPair::public_only(public.clone()),
            KeyMaterial::Composite(parts) => KeyPair {
                spec: self.spec.clone(),
                material: KeyMaterial::Composite(parts.iter().map(KeyPair::to_public).collect()),
            },
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.material {
            KeyMaterial::Single { public, private } => f
                .debug_struct("KeyPair")
                .field("public", public)
                .field("private", &private.as_ref().map(|_| "[REDACTED]"))
                .finish(),
            KeyMaterial::Composite(parts) => {
                f.debug_tuple("KeyPair::Composite").field(parts).finish()
            }
        }
    }
}

/// Raw output of an agreement primitive
///
/// Never compared and never handed to callers; it only feeds derivation.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }

    pub fn expose_secret(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({} bytes)[REDACTED]", self.0.len())
    }
}

/// Final key material returned by a completed agreement
///
/// The engine keeps no copy. Equality is constant time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionSecret(Vec<u8>);

impl SessionSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn expose_secret(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for SessionSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for SessionSecret {}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSecret({} bytes)[REDACTED]", self.0.len())
    }
}

/// Key derivation functions available to agreements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KdfAlgorithm {
    /// HKDF (RFC 5869) with SHA-256
    #[default]
    HkdfSha256,
    /// HKDF with SHA-384
    HkdfSha384,
    /// HKDF with SHA-512
    HkdfSha512,
    /// One-step concatenation KDF (SP 800-56C) with SHA-256
    ConcatSha256,
    /// One-step concatenation KDF with SHA-512
    ConcatSha512,
}

impl KdfAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            KdfAlgorithm::HkdfSha256 => "HKDF-SHA256",
            KdfAlgorithm::HkdfSha384 => "HKDF-SHA384",
            KdfAlgorithm::HkdfSha512 => "HKDF-SHA512",
            KdfAlgorithm::ConcatSha256 => "ConcatKDF-SHA256",
            KdfAlgorithm::ConcatSha512 => "ConcatKDF-SHA512",
        }
    }

    /// Output size of the underlying digest, and the default output length
    pub const fn digest_len(self) -> usize {
        match self {
            KdfAlgorithm::HkdfSha256 | KdfAlgorithm::ConcatSha256 => SHA256_OUTPUT_SIZE,
            KdfAlgorithm::HkdfSha384 => SHA384_OUTPUT_SIZE,
            KdfAlgorithm::HkdfSha512 | KdfAlgorithm::ConcatSha512 => SHA512_OUTPUT_SIZE,
        }
    }
}

impl fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
