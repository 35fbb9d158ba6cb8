//! Agreement specifications
//!
//! An [`AgreementSpec`] names the handshake pattern, the shape of the static
//! key pairs both sides hold, and how the final secret is derived. Specs are
//! plain values: cheap to clone, compared by value and reusable across any
//! number of attempts.

use core::fmt;

use kagree_api::error::validate;
use kagree_api::{Error, Family, FamilyClass, KdfAlgorithm, KeyPairSpec, Result};
use kagree_params::utils::wire::{COMPOSITE_ALGORITHM_ID, MAX_FIELDS, MAX_NESTING_DEPTH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fieldless discriminant of [`Pattern`], as carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PatternKind {
    Anonymous,
    Basic,
    Signed,
    Mqv,
    Unified,
    Composite,
}

impl PatternKind {
    pub const fn code(self) -> u8 {
        match self {
            PatternKind::Anonymous => 1,
            PatternKind::Basic => 2,
            PatternKind::Signed => 3,
            PatternKind::Mqv => 4,
            PatternKind::Unified => 5,
            PatternKind::Composite => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => PatternKind::Anonymous,
            2 => PatternKind::Basic,
            3 => PatternKind::Signed,
            4 => PatternKind::Mqv,
            5 => PatternKind::Unified,
            6 => PatternKind::Composite,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            PatternKind::Anonymous => "Anonymous",
            PatternKind::Basic => "Basic",
            PatternKind::Signed => "Signed",
            PatternKind::Mqv => "MQV",
            PatternKind::Unified => "Unified",
            PatternKind::Composite => "Composite",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handshake pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pattern {
    /// Responder static key only; the initiator stays anonymous
    Anonymous,
    /// Static-static Diffie-Hellman with a fresh nonce
    Basic,
    /// Anonymous flow plus an initiator signature made with `signer`
    Signed { signer: Family },
    /// MQV: static and ephemeral pairs on both sides
    Mqv,
    /// Full unified model: four Diffie-Hellman values
    Unified,
    /// Ordered list of independently negotiated agreements
    Composite(Vec<AgreementSpec>),
}

impl Pattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Anonymous => PatternKind::Anonymous,
            Pattern::Basic => PatternKind::Basic,
            Pattern::Signed { .. } => PatternKind::Signed,
            Pattern::Mqv => PatternKind::Mqv,
            Pattern::Unified => PatternKind::Unified,
            Pattern::Composite(_) => PatternKind::Composite,
        }
    }
}

/// How the final secret is derived from the raw shared values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KdfSpec {
    pub algorithm: KdfAlgorithm,
    /// Session secret length; the digest size when `None`
    pub output_len: Option<usize>,
    /// Append a key-confirmation tag to the initiator message
    pub confirmation: bool,
    /// Caller-supplied context bound into the derivation
    pub info: Vec<u8>,
}

impl Default for KdfSpec {
    fn default() -> Self {
        Self::new(KdfAlgorithm::default())
    }
}

impl KdfSpec {
    pub fn new(algorithm: KdfAlgorithm) -> Self {
        Self {
            algorithm,
            output_len: None,
            confirmation: false,
            info: Vec::new(),
        }
    }

    pub fn with_output_len(mut self, output_len: usize) -> Self {
        self.output_len = Some(output_len);
        self
    }

    pub fn with_confirmation(mut self, confirmation: bool) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_info(mut self, info: impl Into<Vec<u8>>) -> Self {
        self.info = info.into();
        self
    }

    /// Length of the session secret this spec produces
    pub fn session_len(&self) -> usize {
        self.output_len.unwrap_or(self.algorithm.digest_len())
    }
}

/// Complete description of one agreement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgreementSpec {
    pub pattern: Pattern,
    pub key_spec: KeyPairSpec,
    pub kdf: KdfSpec,
}

impl AgreementSpec {
    fn single(pattern: Pattern, family: Family) -> Self {
        Self {
            pattern,
            key_spec: KeyPairSpec::Single(family),
            kdf: KdfSpec::default(),
        }
    }

    pub fn anonymous(family: Family) -> Self {
        Self::single(Pattern::Anonymous, family)
    }

    pub fn basic(family: Family) -> Self {
        Self::single(Pattern::Basic, family)
    }

    pub fn signed(family: Family, signer: Family) -> Self {
        Self::single(Pattern::Signed { signer }, family)
    }

    pub fn mqv(family: Family) -> Self {
        Self::single(Pattern::Mqv, family)
    }

    pub fn unified(family: Family) -> Self {
        Self::single(Pattern::Unified, family)
    }

    /// Composite of `components`, in order
    ///
    /// The key spec is the composite of the component key specs. Key
    /// confirmation is on, and [`validate`](Self::validate) refuses a
    /// composite without it: a tampered nested encapsulation must fail the
    /// attempt instead of yielding a divergent secret.
    pub fn composite(components: Vec<AgreementSpec>) -> Self {
        let key_spec =
            KeyPairSpec::Composite(components.iter().map(|c| c.key_spec.clone()).collect());
        Self {
            pattern: Pattern::Composite(components),
            key_spec,
            kdf: KdfSpec::default().with_confirmation(true),
        }
    }

    pub fn with_kdf(mut self, kdf: KdfSpec) -> Self {
        self.kdf = kdf;
        self
    }

    /// Family of a non-composite agreement
    pub fn family(&self) -> Option<Family> {
        self.key_spec.family()
    }

    /// Identifier carried in the envelope header
    pub fn algorithm_id(&self) -> u16 {
        match self.key_spec.family() {
            Some(family) if !self.is_composite() => family.code(),
            _ => COMPOSITE_ALGORITHM_ID,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.pattern, Pattern::Composite(_))
    }

    /// Component specs of a composite; empty otherwise
    pub fn components(&self) -> &[AgreementSpec] {
        match &self.pattern {
            Pattern::Composite(components) => components,
            _ => &[],
        }
    }

    /// Envelope nesting depth of this agreement's messages
    pub fn depth(&self) -> usize {
        1 + self
            .components()
            .iter()
            .map(AgreementSpec::depth)
            .max()
            .unwrap_or(0)
    }

    /// Check that the pattern fits the key shape
    ///
    /// Every failure is `InvalidParameter`. Whether a DH family supports MQV
    /// is a property of its primitive and is checked by the registry.
    pub fn validate(&self) -> Result<()> {
        if self.depth() > MAX_NESTING_DEPTH {
            return Err(Error::parameter(
                "AgreementSpec::validate",
                format!("composite nesting deeper than {MAX_NESTING_DEPTH}"),
            ));
        }
        validate::parameter(
            self.kdf.output_len != Some(0),
            "AgreementSpec::validate",
            "KDF output length must be non-zero",
        )?;

        if let Pattern::Composite(components) = &self.pattern {
            validate::parameter(
                components.len() >= 2,
                "AgreementSpec::validate",
                "a composite needs at least two components",
            )?;
            validate::parameter(
                self.kdf.confirmation,
                "AgreementSpec::validate",
                "a composite requires key confirmation",
            )?;
            // one nested field per component plus the confirmation tag
            if components.len() + 1 > MAX_FIELDS {
                return Err(Error::parameter(
                    "AgreementSpec::validate",
                    format!("a composite holds at most {} components", MAX_FIELDS - 1),
                ));
            }
            let expected =
                KeyPairSpec::Composite(components.iter().map(|c| c.key_spec.clone()).collect());
            if self.key_spec != expected {
                return Err(Error::parameter(
                    "AgreementSpec::validate",
                    "composite key spec does not follow its components",
                ));
            }
            return components.iter().try_for_each(AgreementSpec::validate);
        }

        let family = self.key_spec.family().ok_or_else(|| {
            Error::parameter(
                "AgreementSpec::validate",
                format!("{} needs a single-family key spec", self.pattern.kind()),
            )
        })?;
        let class = family.class();
        let compatible = match &self.pattern {
            Pattern::Anonymous => matches!(class, FamilyClass::DiffieHellman | FamilyClass::Kem),
            Pattern::Basic | Pattern::Mqv | Pattern::Unified => {
                class == FamilyClass::DiffieHellman
            }
            Pattern::Signed { signer } => {
                matches!(class, FamilyClass::DiffieHellman | FamilyClass::Kem)
                    && signer.class() == FamilyClass::Signature
            }
            Pattern::Composite(_) => false,
        };
        if !compatible {
            return Err(Error::parameter(
                "AgreementSpec::validate",
                format!("{} is not compatible with {family}", self.pattern.kind()),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for AgreementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.pattern.kind(), self.key_spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kagree_api::ErrorKind;

    #[test]
    fn test_pattern_codes_roundtrip() {
        for kind in [
            PatternKind::Anonymous,
            PatternKind::Basic,
            PatternKind::Signed,
            PatternKind::Mqv,
            PatternKind::Unified,
            PatternKind::Composite,
        ] {
            assert_eq!(PatternKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PatternKind::from_code(0), None);
        assert_eq!(PatternKind::from_code(7), None);
    }

    #[test]
    fn test_compatible_specs_validate() {
        for spec in [
            AgreementSpec::anonymous(Family::X25519),
            AgreementSpec::anonymous(Family::MlKem768),
            AgreementSpec::basic(Family::EcdhP256),
            AgreementSpec::signed(Family::MlKem512, Family::Ed25519),
            AgreementSpec::mqv(Family::EcdhP384),
            AgreementSpec::unified(Family::X25519),
        ] {
            spec.validate().unwrap();
        }
    }

    #[test]
    fn test_incompatible_specs_rejected() {
        for spec in [
            AgreementSpec::basic(Family::MlKem768),
            AgreementSpec::unified(Family::MlKem1024),
            AgreementSpec::mqv(Family::MlKem512),
            AgreementSpec::anonymous(Family::Ed25519),
            AgreementSpec::signed(Family::X25519, Family::X25519),
            AgreementSpec::composite(vec![AgreementSpec::anonymous(Family::X25519)]),
        ] {
            assert_eq!(
                spec.validate().unwrap_err().kind(),
                ErrorKind::InvalidParameter,
                "{spec}"
            );
        }
    }

    #[test]
    fn test_composite_key_spec_follows_components() {
        let spec = AgreementSpec::composite(vec![
            AgreementSpec::anonymous(Family::X25519),
            AgreementSpec::anonymous(Family::MlKem768),
        ]);
        assert_eq!(
            spec.key_spec,
            KeyPairSpec::Composite(vec![Family::X25519.into(), Family::MlKem768.into()])
        );
        assert_eq!(spec.algorithm_id(), COMPOSITE_ALGORITHM_ID);
        assert!(spec.kdf.confirmation);
        spec.validate().unwrap();

        let mut broken = spec.clone();
        broken.key_spec = KeyPairSpec::Single(Family::X25519);
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_composite_requires_confirmation() {
        let components = vec![
            AgreementSpec::anonymous(Family::X25519),
            AgreementSpec::anonymous(Family::MlKem768),
        ];
        let unconfirmed = AgreementSpec::composite(components.clone())
            .with_kdf(KdfSpec::new(KdfAlgorithm::HkdfSha384));
        assert_eq!(
            unconfirmed.validate().unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );

        // nested composites are checked too
        let mut inner = AgreementSpec::composite(components.clone());
        inner.kdf.confirmation = false;
        let outer =
            AgreementSpec::composite(vec![inner, AgreementSpec::anonymous(Family::EcdhP256)]);
        assert_eq!(outer.validate().unwrap_err().kind(), ErrorKind::InvalidParameter);

        AgreementSpec::composite(components)
            .with_kdf(KdfSpec::new(KdfAlgorithm::HkdfSha384).with_confirmation(true))
            .validate()
            .unwrap();
    }

    #[test]
    fn test_nesting_limit() {
        let mut spec = AgreementSpec::anonymous(Family::X25519);
        for _ in 0..MAX_NESTING_DEPTH {
            spec = AgreementSpec::composite(vec![
                spec.clone(),
                AgreementSpec::anonymous(Family::X25519),
            ]);
        }
        assert_eq!(spec.depth(), MAX_NESTING_DEPTH + 1);
        assert_eq!(spec.validate().unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_kdf_spec_builders() {
        let kdf = KdfSpec::new(KdfAlgorithm::HkdfSha512)
            .with_output_len(40)
            .with_confirmation(true)
            .with_info(b"app".to_vec());
        assert_eq!(kdf.session_len(), 40);
        assert!(kdf.confirmation);
        assert_eq!(kdf.info, b"app");
        assert_eq!(KdfSpec::default().session_len(), 32);
        assert_eq!(KdfSpec::new(KdfAlgorithm::HkdfSha384).session_len(), 48);
    }
}
