use super::*;
use crate::registry::Registry;
use crate::spec::KdfSpec;
use kagree_api::{ErrorKind, Family};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn key_pair(family: Family, rng: &mut ChaCha20Rng) -> KeyPair {
    Registry::global()
        .generate_key_pair(&family.into(), rng)
        .unwrap()
}

struct Parties {
    initiator: KeyPair,
    responder: KeyPair,
    initiator_public: KeyPair,
    responder_public: KeyPair,
}

impl Parties {
    fn new(family: Family, rng: &mut ChaCha20Rng) -> Self {
        let initiator = key_pair(family, rng);
        let responder = key_pair(family, rng);
        Self {
            initiator_public: initiator.to_public(),
            responder_public: responder.to_public(),
            initiator,
            responder,
        }
    }

    fn initiator(&self) -> Credentials<'_> {
        Credentials {
            local: Some(&self.initiator),
            peer: Some(&self.responder_public),
            ..Credentials::default()
        }
    }

    fn responder(&self) -> Credentials<'_> {
        Credentials {
            local: Some(&self.responder),
            peer: Some(&self.initiator_public),
            ..Credentials::default()
        }
    }
}

/// Runs offer and initiator message; returns the message and both secrets
fn run(
    spec: &AgreementSpec,
    initiator: &Credentials<'_>,
    responder: &Credentials<'_>,
    rng: &mut ChaCha20Rng,
) -> Result<(HandshakeMessage, SessionSecret, SessionSecret)> {
    let registry = Registry::global();
    let mut responder_pattern = registry.pattern_for(spec)?;
    let mut initiator_pattern = registry.pattern_for(spec)?;
    let offer = responder_pattern.create_responder_offer(responder, rng)?;
    initiator_pattern.accept_responder_offer(initiator, &offer)?;
    let (message, ours) = initiator_pattern.create_initiator_message(initiator, rng)?;
    let theirs = responder_pattern.accept_initiator_message(responder, &message)?;
    Ok((message, ours, theirs))
}

#[test]
fn test_static_patterns_agree() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    for family in [Family::X25519, Family::EcdhP256, Family::EcdhP384] {
        let parties = Parties::new(family, &mut rng);
        for spec in [
            AgreementSpec::anonymous(family),
            AgreementSpec::basic(family),
            AgreementSpec::unified(family),
        ] {
            let (_, ours, theirs) =
                run(&spec, &parties.initiator(), &parties.responder(), &mut rng).unwrap();
            assert_eq!(ours, theirs, "{spec}");
            assert_eq!(ours.len(), 32);
        }
    }
}

#[test]
fn test_kem_anonymous_agrees() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    for family in [Family::MlKem512, Family::MlKem768, Family::MlKem1024] {
        let parties = Parties::new(family, &mut rng);
        let spec = AgreementSpec::anonymous(family);
        let initiator = Credentials {
            peer: Some(&parties.responder_public),
            ..Credentials::default()
        };
        let (message, ours, theirs) =
            run(&spec, &initiator, &parties.responder(), &mut rng).unwrap();
        assert_eq!(ours, theirs);
        assert!(matches!(message.fields(), [Field::Encapsulation(_)]));
    }
}

#[test]
fn test_mqv_agrees_and_shapes_messages() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let parties = Parties::new(Family::EcdhP256, &mut rng);
    let spec = AgreementSpec::mqv(Family::EcdhP256);
    let (message, ours, theirs) =
        run(&spec, &parties.initiator(), &parties.responder(), &mut rng).unwrap();
    assert_eq!(ours, theirs);
    assert!(matches!(
        message.fields(),
        [Field::PublicKey(a), Field::PublicKey(b)] if a.len() == 33 && b.len() == 33
    ));
}

#[test]
fn test_confirmation_tag_appended() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let parties = Parties::new(Family::X25519, &mut rng);
    let spec = AgreementSpec::basic(Family::X25519)
        .with_kdf(KdfSpec::default().with_confirmation(true).with_output_len(48));
    let (message, ours, theirs) =
        run(&spec, &parties.initiator(), &parties.responder(), &mut rng).unwrap();
    assert_eq!(ours, theirs);
    assert_eq!(ours.len(), 48);
    assert_eq!(message.confirmation_tag().map(<[u8]>::len), Some(32));
}

#[test]
fn test_unified_echo_mismatch() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let parties = Parties::new(Family::X25519, &mut rng);
    let spec = AgreementSpec::unified(Family::X25519);
    let registry = Registry::global();

    let mut responder = registry.pattern_for(&spec).unwrap();
    let mut initiator = registry.pattern_for(&spec).unwrap();
    let offer = responder
        .create_responder_offer(&parties.responder(), &mut rng)
        .unwrap();
    initiator
        .accept_responder_offer(&parties.initiator(), &offer)
        .unwrap();
    let (message, _) = initiator
        .create_initiator_message(&parties.initiator(), &mut rng)
        .unwrap();

    let stranger = key_pair(Family::X25519, &mut rng);
    let forged = initiator_message(&spec)
        .with_field(message.fields()[0].clone())
        .with_field(Field::PublicKey(
            stranger.public_key().unwrap().as_bytes().to_vec(),
        ));
    let err = responder
        .accept_initiator_message(&parties.responder(), &forged)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AgreementMismatch);
}

#[test]
fn test_mqv_initiator_needs_offer() {
    let mut rng = ChaCha20Rng::seed_from_u64(6);
    let parties = Parties::new(Family::EcdhP384, &mut rng);
    let mut initiator = Registry::global()
        .pattern_for(&AgreementSpec::mqv(Family::EcdhP384))
        .unwrap();
    let err = initiator
        .create_initiator_message(&parties.initiator(), &mut rng)
        .err()
        .map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::InvalidParameter));
}

#[test]
fn test_missing_credentials() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let parties = Parties::new(Family::X25519, &mut rng);
    let mut basic = Registry::global()
        .pattern_for(&AgreementSpec::basic(Family::X25519))
        .unwrap();
    let public_only = Credentials {
        local: Some(&parties.initiator_public),
        peer: Some(&parties.responder_public),
        ..Credentials::default()
    };
    let err = basic
        .create_initiator_message(&public_only, &mut rng)
        .err()
        .map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::InvalidParameter));
}

#[test]
fn test_signed_rejects_wrong_signing_family() {
    let mut rng = ChaCha20Rng::seed_from_u64(8);
    let parties = Parties::new(Family::X25519, &mut rng);
    let not_a_signer = key_pair(Family::X25519, &mut rng);
    let mut signed = Registry::global()
        .pattern_for(&AgreementSpec::signed(Family::X25519, Family::Ed25519))
        .unwrap();
    let credentials = Credentials {
        peer: Some(&parties.responder_public),
        signing: Some(&not_a_signer),
        ..Credentials::default()
    };
    let err = signed
        .create_initiator_message(&credentials, &mut rng)
        .err()
        .map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::TypeMismatch));
}

#[test]
fn test_signed_agrees_and_rejects_wrong_signer() {
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let parties = Parties::new(Family::MlKem768, &mut rng);
    let signing = key_pair(Family::Ed25519, &mut rng);
    let impostor = key_pair(Family::Ed25519, &mut rng).to_public();
    let spec = AgreementSpec::signed(Family::MlKem768, Family::Ed25519);

    let initiator = Credentials {
        peer: Some(&parties.responder_public),
        signing: Some(&signing),
        ..Credentials::default()
    };
    let signing_public = signing.to_public();
    let responder = Credentials {
        local: Some(&parties.responder),
        peer_signing: Some(&signing_public),
        ..Credentials::default()
    };
    let (message, ours, theirs) = run(&spec, &initiator, &responder, &mut rng).unwrap();
    assert_eq!(ours, theirs);

    let mut fresh = Registry::global().pattern_for(&spec).unwrap();
    let wrong = Credentials {
        peer_signing: Some(&impostor),
        ..responder
    };
    let err = fresh.accept_initiator_message(&wrong, &message).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}
