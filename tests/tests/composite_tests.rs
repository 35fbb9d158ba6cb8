//! Composite (hybrid) agreements

use kagree_agreement::codec::{Field, HandshakeMessage, MessageType};
use kagree_agreement::derive::context;
use kagree_agreement::{AgreementSpec, Credentials, KdfSpec, PatternKind, Registry};
use kagree_api::{ErrorKind, Family};
use kagree_params::utils::wire::COMPOSITE_ALGORITHM_ID;
use kagree_symmetric::kdf_for;
use kagree_tests::{handshake, init_tracing, seeded, Parties};

fn hybrid() -> AgreementSpec {
    AgreementSpec::composite(vec![
        AgreementSpec::anonymous(Family::X25519),
        AgreementSpec::anonymous(Family::MlKem768),
    ])
}

#[test]
fn test_hybrid_agrees() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 1);
    let outcome = handshake(&spec, &parties, 2, 3).unwrap();
    assert_eq!(outcome.initiator, outcome.responder);
}

#[test]
fn test_hybrid_secret_is_outer_kdf_of_component_secrets() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 4);
    let outcome = handshake(&spec, &parties, 5, 6).unwrap();

    // replay the components with the initiator's RNG stream
    let registry = Registry::global();
    let mut rng = seeded(5);
    let responder_public = parties.responder.to_public();
    let mut outer = HandshakeMessage::new(
        MessageType::Initiator,
        COMPOSITE_ALGORITHM_ID,
        PatternKind::Composite,
    );
    let mut concatenated = Vec::new();
    for (index, component) in spec.components().iter().enumerate() {
        let credentials = Credentials {
            local: parties.initiator.parts().get(index),
            peer: responder_public.parts().get(index),
            ..Credentials::default()
        };
        let mut pattern = registry.pattern_for(component).unwrap();
        let (message, secret) = pattern
            .create_initiator_message(&credentials, &mut rng)
            .unwrap();
        concatenated.extend_from_slice(secret.expose_secret());
        outer = outer.with_field(Field::Nested(message));
    }

    let transcript = outer.transcript();
    let tag = outcome.message[outcome.message.len() - 32..].to_vec();
    assert_eq!(
        outer.with_field(Field::ConfirmationTag(tag)).encode(),
        outcome.message
    );

    let ctx = context(
        COMPOSITE_ALGORITHM_ID,
        PatternKind::Composite,
        &transcript,
        &[],
        &[],
    );
    let expected = kdf_for(spec.kdf.algorithm)
        .derive(&concatenated, &ctx, 32)
        .unwrap();
    assert_eq!(outcome.initiator.expose_secret(), expected.as_slice());
}

#[test]
fn test_any_flipped_byte_fails() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 7);
    let outcome = handshake(&spec, &parties, 8, 9).unwrap();

    for position in 0..outcome.message.len() {
        let mut tampered = outcome.message.clone();
        tampered[position] ^= 0x01;
        let mut responder = parties.responder_handle(&spec, 10).unwrap();
        let err = responder
            .accept_initiator_message(&tampered)
            .expect_err("tampered message accepted");
        assert!(
            matches!(
                err.kind(),
                ErrorKind::AuthenticationFailed
                    | ErrorKind::MalformedMessage
                    | ErrorKind::AgreementMismatch
                    | ErrorKind::TypeMismatch
                    | ErrorKind::ComputationFailure
            ),
            "byte {position}: {err}"
        );
    }
}

#[test]
fn test_flipped_ciphertext_fails_confirmation() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 11);
    let outcome = handshake(&spec, &parties, 12, 13).unwrap();

    // outer header, then the X25519 component (6 + 5 + 32 bytes) in its field,
    // then the ML-KEM component; flip the middle of its encapsulation
    let mut tampered = outcome.message.clone();
    let position = 6 + 5 + 43 + 5 + 6 + 5 + 500;
    tampered[position] ^= 0x80;
    let mut responder = parties.responder_handle(&spec, 14).unwrap();
    let err = responder.accept_initiator_message(&tampered).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}

#[test]
fn test_composite_without_confirmation_is_refused() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 30);
    let outcome = handshake(&spec, &parties, 31, 32).unwrap();

    let mut tampered = outcome.message.clone();
    tampered[570] ^= 0x01;

    // a responder that dropped confirmation would accept this with a divergent
    // secret under ML-KEM implicit rejection; it never gets a handle
    let unconfirmed = hybrid().with_kdf(KdfSpec::default());
    assert_eq!(
        parties.responder_handle(&unconfirmed, 33).err().map(|e| e.kind()),
        Some(ErrorKind::InvalidParameter)
    );
    assert_eq!(
        Parties::generate(&unconfirmed, 34)
            .initiator_handle(&unconfirmed, 35)
            .err()
            .map(|e| e.kind()),
        Some(ErrorKind::InvalidParameter)
    );

    let mut responder = parties.responder_handle(&spec, 36).unwrap();
    let err = responder.accept_initiator_message(&tampered).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}

#[test]
fn test_arity_mismatch() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 15);
    let outcome = handshake(&spec, &parties, 16, 17).unwrap();

    let triple = AgreementSpec::composite(vec![
        AgreementSpec::anonymous(Family::X25519),
        AgreementSpec::anonymous(Family::MlKem768),
        AgreementSpec::anonymous(Family::EcdhP256),
    ]);
    let mut responder = Parties::generate(&triple, 18)
        .responder_handle(&triple, 19)
        .unwrap();
    let err = responder
        .accept_initiator_message(&outcome.message)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AgreementMismatch);
}

#[test]
fn test_component_order_mismatch() {
    init_tracing();
    let spec = hybrid();
    let parties = Parties::generate(&spec, 20);
    let outcome = handshake(&spec, &parties, 21, 22).unwrap();

    let reversed = AgreementSpec::composite(vec![
        AgreementSpec::anonymous(Family::MlKem768),
        AgreementSpec::anonymous(Family::X25519),
    ]);
    let mut responder = Parties::generate(&reversed, 23)
        .responder_handle(&reversed, 24)
        .unwrap();
    let err = responder
        .accept_initiator_message(&outcome.message)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AgreementMismatch);
}

#[test]
fn test_mixed_pattern_composite() {
    init_tracing();
    let spec = AgreementSpec::composite(vec![
        AgreementSpec::unified(Family::EcdhP256),
        AgreementSpec::signed(Family::MlKem1024, Family::Ed25519),
        AgreementSpec::composite(vec![
            AgreementSpec::basic(Family::X25519),
            AgreementSpec::mqv(Family::EcdhP384),
        ]),
    ])
    .with_kdf(
        KdfSpec::default()
            .with_confirmation(true)
            .with_output_len(64)
            .with_info(b"hybrid".to_vec()),
    );
    let parties = Parties::generate(&spec, 25);
    let outcome = handshake(&spec, &parties, 26, 27).unwrap();
    assert_eq!(outcome.initiator, outcome.responder);
    assert_eq!(outcome.initiator.len(), 64);
    assert!(!outcome.offer.is_empty());
}
