//! Factory routing
//!
//! Maps families to their raw primitives and `(family, pattern)` pairs to
//! pattern constructors. The default table covers every family in
//! `kagree-kem` and `kagree-sign`; it is built once and shared read-only.

use std::collections::HashMap;

use kagree_api::{
    Error, Family, FamilyClass, KeyPair, KeyPairSpec, Primitive, PrivateKey, PublicKey, Result,
};
use once_cell::sync::Lazy;
use rand_core::CryptoRngCore;
use tracing::trace;

use crate::composite::Composite;
use crate::pattern::{AgreementPattern, Anonymous, Basic, Mqv, Signed, Unified};
use crate::spec::{AgreementSpec, Pattern, PatternKind};

/// Builds a fresh pattern instance for one attempt
pub type PatternConstructor = fn(&Registry, &AgreementSpec) -> Result<Box<dyn AgreementPattern>>;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::with_defaults);

/// Immutable routing table from families and patterns to implementations
#[derive(Clone, Default)]
pub struct Registry {
    primitives: HashMap<Family, Primitive>,
    patterns: HashMap<(Family, PatternKind), PatternConstructor>,
}

impl Registry {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Every primitive this workspace ships with every compatible pattern
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for primitive in kagree_kem::all().into_iter().chain(kagree_sign::all()) {
            registry.register_primitive(primitive);
        }

        let families: Vec<(Family, FamilyClass, bool)> = registry
            .primitives
            .values()
            .map(|p| {
                let mqv = p.as_dh().map(|dh| dh.supports_mqv()).unwrap_or(false);
                (p.family(), p.class(), mqv)
            })
            .collect();
        for (family, class, mqv) in families {
            match class {
                FamilyClass::DiffieHellman => {
                    registry.register_pattern(family, PatternKind::Anonymous, anonymous);
                    registry.register_pattern(family, PatternKind::Basic, basic);
                    registry.register_pattern(family, PatternKind::Signed, signed);
                    registry.register_pattern(family, PatternKind::Unified, unified);
                    if mqv {
                        registry.register_pattern(family, PatternKind::Mqv, mqv_pattern);
                    }
                }
                FamilyClass::Kem => {
                    registry.register_pattern(family, PatternKind::Anonymous, anonymous);
                    registry.register_pattern(family, PatternKind::Signed, signed);
                }
                FamilyClass::Signature => {}
            }
        }
        registry
    }

    /// The process-wide default table
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    pub fn register_primitive(&mut self, primitive: Primitive) -> &mut Self {
        self.primitives.insert(primitive.family(), primitive);
        self
    }

    pub fn register_pattern(
        &mut self,
        family: Family,
        kind: PatternKind,
        constructor: PatternConstructor,
    ) -> &mut Self {
        self.patterns.insert((family, kind), constructor);
        self
    }

    /// The raw primitive for a family
    pub fn primitive(&self, family: Family) -> Result<&Primitive> {
        self.primitives.get(&family).ok_or_else(|| {
            Error::parameter("Registry::primitive", format!("no primitive for {family}"))
        })
    }

    /// Whether `spec` can be served by this table
    pub fn supports(&self, spec: &AgreementSpec) -> bool {
        match &spec.pattern {
            Pattern::Composite(components) => components.iter().all(|c| self.supports(c)),
            pattern => spec
                .family()
                .map(|family| self.patterns.contains_key(&(family, pattern.kind())))
                .unwrap_or(false),
        }
    }

    /// A fresh pattern instance for one attempt
    ///
    /// Composites are built recursively from their component specs.
    pub fn pattern_for(&self, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
        spec.validate()?;
        if spec.is_composite() {
            return composite(self, spec);
        }
        let family = spec
            .family()
            .ok_or_else(|| Error::parameter("Registry::pattern_for", "spec has no family"))?;
        let constructor = self
            .patterns
            .get(&(family, spec.pattern.kind()))
            .ok_or_else(|| {
                Error::parameter(
                    "Registry::pattern_for",
                    format!("{} is not available for {family}", spec.pattern.kind()),
                )
            })?;
        trace!(%family, pattern = %spec.pattern.kind(), "building pattern");
        constructor(self, spec)
    }

    /// Generate a key pair of any shape
    pub fn generate_key_pair(
        &self,
        spec: &KeyPairSpec,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<KeyPair> {
        match spec {
            KeyPairSpec::Single(family) => self.primitive(*family)?.generate(rng),
            KeyPairSpec::Composite(components) => {
                let parts = components
                    .iter()
                    .map(|component| self.generate_key_pair(component, rng))
                    .collect::<Result<Vec<_>>>()?;
                KeyPair::composite(parts)
            }
        }
    }

    /// Import key material from outside the process
    ///
    /// The public key is validated by the family primitive; a supplied
    /// private key must match it.
    pub fn import_key_pair(
        &self,
        family: Family,
        public: &[u8],
        private: Option<&[u8]>,
    ) -> Result<KeyPair> {
        let primitive = self.primitive(family)?;
        let public = PublicKey::new(family, public);
        primitive.validate_public(&public)?;
        let private = match private {
            Some(bytes) => {
                let private = PrivateKey::new(family, bytes);
                primitive.validate_pair(&public, &private)?;
                Some(private)
            }
            None => None,
        };
        KeyPair::from_parts(public, private)
    }

    /// A validated public-only key pair
    pub fn public_key(&self, family: Family, bytes: &[u8]) -> Result<KeyPair> {
        self.import_key_pair(family, bytes, None)
    }
}

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut families: Vec<_> = self.primitives.keys().collect();
        families.sort();
        f.debug_struct("Registry")
            .field("families", &families)
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

fn family_primitive<'r>(registry: &'r Registry, spec: &AgreementSpec) -> Result<&'r Primitive> {
    let family = spec
        .family()
        .ok_or_else(|| Error::parameter("Registry", "spec has no family"))?;
    registry.primitive(family)
}

fn anonymous(registry: &Registry, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
    let primitive = family_primitive(registry, spec)?;
    Ok(Box::new(Anonymous::new(spec.clone(), primitive)?))
}

fn basic(registry: &Registry, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
    let primitive = family_primitive(registry, spec)?;
    Ok(Box::new(Basic::new(spec.clone(), primitive)?))
}

fn signed(registry: &Registry, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
    let Pattern::Signed { signer } = &spec.pattern else {
        return Err(Error::parameter("Registry", "not a Signed spec"));
    };
    let primitive = family_primitive(registry, spec)?;
    let signer = registry.primitive(*signer)?;
    Ok(Box::new(Signed::new(spec.clone(), primitive, signer)?))
}

fn mqv_pattern(registry: &Registry, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
    let primitive = family_primitive(registry, spec)?;
    Ok(Box::new(Mqv::new(spec.clone(), primitive)?))
}

fn unified(registry: &Registry, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
    let primitive = family_primitive(registry, spec)?;
    Ok(Box::new(Unified::new(spec.clone(), primitive)?))
}

fn composite(registry: &Registry, spec: &AgreementSpec) -> Result<Box<dyn AgreementPattern>> {
    let components = spec
        .components()
        .iter()
        .map(|component| registry.pattern_for(component))
        .collect::<Result<Vec<_>>>()?;
    Ok(Box::new(Composite::new(spec.clone(), components)?))
}
