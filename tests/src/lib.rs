//! Shared fixtures for the kagree integration tests
//!
//! Every test drives complete attempts through the public `Handle` API with
//! seeded RNGs, so runs are reproducible.

use kagree_agreement::{negotiate, AgreementSpec, Handle, Pattern, Registry};
use kagree_api::{Family, KeyPair, Result, SessionSecret};
use once_cell::sync::OnceCell;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once; filter with `RUST_LOG`
pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn seeded(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// The signature family of the first Signed pattern in `spec`, if any
pub fn signer_of(spec: &AgreementSpec) -> Option<Family> {
    match &spec.pattern {
        Pattern::Signed { signer } => Some(*signer),
        Pattern::Composite(components) => components.iter().find_map(signer_of),
        _ => None,
    }
}

/// Static key material of both sides of an agreement
#[derive(Debug, Clone)]
pub struct Parties {
    pub initiator: KeyPair,
    pub responder: KeyPair,
    pub signing: Option<KeyPair>,
}

impl Parties {
    pub fn generate(spec: &AgreementSpec, seed: u64) -> Self {
        let registry = Registry::global();
        let mut rng = seeded(seed);
        let initiator = registry
            .generate_key_pair(&spec.key_spec, &mut rng)
            .expect("initiator key generation");
        let responder = registry
            .generate_key_pair(&spec.key_spec, &mut rng)
            .expect("responder key generation");
        let signing = signer_of(spec).map(|family| {
            registry
                .generate_key_pair(&family.into(), &mut rng)
                .expect("signing key generation")
        });
        Self {
            initiator,
            responder,
            signing,
        }
    }

    /// The same key material with the roles exchanged
    pub fn swapped(&self) -> Self {
        Self {
            initiator: self.responder.clone(),
            responder: self.initiator.clone(),
            signing: self.signing.clone(),
        }
    }

    pub fn initiator_handle(&self, spec: &AgreementSpec, seed: u64) -> Result<Handle> {
        let handle = negotiate(
            spec.clone(),
            Some(self.initiator.clone()),
            Some(self.responder.to_public()),
        )?
        .with_rng(seeded(seed));
        Ok(match &self.signing {
            Some(signing) => handle.with_signing_key(signing.clone()),
            None => handle,
        })
    }

    pub fn responder_handle(&self, spec: &AgreementSpec, seed: u64) -> Result<Handle> {
        let handle = negotiate(
            spec.clone(),
            Some(self.responder.clone()),
            Some(self.initiator.to_public()),
        )?
        .with_rng(seeded(seed));
        Ok(match &self.signing {
            Some(signing) => handle.with_peer_signing_key(signing.to_public()),
            None => handle,
        })
    }
}

/// Result of one complete attempt
#[derive(Debug)]
pub struct Outcome {
    pub offer: Vec<u8>,
    pub message: Vec<u8>,
    pub initiator: SessionSecret,
    pub responder: SessionSecret,
}

/// Run offer, initiator message and acceptance on fresh handles
pub fn handshake(
    spec: &AgreementSpec,
    parties: &Parties,
    initiator_seed: u64,
    responder_seed: u64,
) -> Result<Outcome> {
    let mut responder = parties.responder_handle(spec, responder_seed)?;
    let mut initiator = parties.initiator_handle(spec, initiator_seed)?;

    let offer = responder.create_responder_offer()?;
    initiator.accept_responder_offer(&offer)?;
    let initiation = initiator.create_initiator_message()?;
    let secret = responder.accept_initiator_message(&initiation.message)?;
    Ok(Outcome {
        offer,
        message: initiation.message,
        initiator: initiation.secret,
        responder: secret,
    })
}

/// Every supported family paired with every pattern it supports
pub fn compatible_specs() -> Vec<AgreementSpec> {
    let mut specs = Vec::new();
    for family in Family::ALL {
        let specs_for_family = match family {
            Family::X25519 => vec![
                AgreementSpec::anonymous(family),
                AgreementSpec::basic(family),
                AgreementSpec::signed(family, Family::Ed25519),
                AgreementSpec::unified(family),
            ],
            Family::EcdhP256 | Family::EcdhP384 => vec![
                AgreementSpec::anonymous(family),
                AgreementSpec::basic(family),
                AgreementSpec::signed(family, Family::Ed25519),
                AgreementSpec::mqv(family),
                AgreementSpec::unified(family),
            ],
            Family::MlKem512 | Family::MlKem768 | Family::MlKem1024 => vec![
                AgreementSpec::anonymous(family),
                AgreementSpec::signed(family, Family::Ed25519),
            ],
            Family::Ed25519 => Vec::new(),
        };
        specs.extend(specs_for_family);
    }
    specs
}
