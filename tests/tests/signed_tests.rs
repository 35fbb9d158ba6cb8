//! Signed pattern authentication

use kagree_agreement::AgreementSpec;
use kagree_api::{ErrorKind, Family};
use kagree_tests::{handshake, init_tracing, Parties};

/// Offset of the signature value in a Signed initiator message
fn signature_offset(carrier_len: usize) -> usize {
    6 + 5 + carrier_len + 5
}

#[test]
fn test_corrupted_signature_is_rejected() {
    init_tracing();
    for (spec, carrier_len) in [
        (AgreementSpec::signed(Family::X25519, Family::Ed25519), 32),
        (AgreementSpec::signed(Family::EcdhP256, Family::Ed25519), 33),
        (AgreementSpec::signed(Family::MlKem512, Family::Ed25519), 768),
    ] {
        let parties = Parties::generate(&spec, 1);
        let outcome = handshake(&spec, &parties, 2, 3).unwrap();

        let mut tampered = outcome.message.clone();
        tampered[signature_offset(carrier_len) + 10] ^= 0x04;
        let mut responder = parties.responder_handle(&spec, 4).unwrap();
        let err = responder.accept_initiator_message(&tampered).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed, "{spec}");
        assert!(responder.is_spent());
        // no detail beyond the failing step
        assert_eq!(err.to_string(), "authentication failed: Signed pattern");
    }
}

#[test]
fn test_corrupted_carrier_breaks_signature() {
    init_tracing();
    let spec = AgreementSpec::signed(Family::X25519, Family::Ed25519);
    let parties = Parties::generate(&spec, 5);
    let outcome = handshake(&spec, &parties, 6, 7).unwrap();

    let mut tampered = outcome.message.clone();
    tampered[6 + 5 + 3] ^= 0x10;
    let mut responder = parties.responder_handle(&spec, 8).unwrap();
    assert_eq!(
        responder
            .accept_initiator_message(&tampered)
            .unwrap_err()
            .kind(),
        ErrorKind::AuthenticationFailed
    );
}

#[test]
fn test_signature_binds_responder_key() {
    init_tracing();
    let spec = AgreementSpec::signed(Family::MlKem768, Family::Ed25519);
    let parties = Parties::generate(&spec, 9);
    let outcome = handshake(&spec, &parties, 10, 11).unwrap();

    // another responder, same initiator signing key
    let mut elsewhere = Parties::generate(&spec, 12);
    elsewhere.signing = parties.signing.clone();
    let mut responder = elsewhere.responder_handle(&spec, 13).unwrap();
    assert_eq!(
        responder
            .accept_initiator_message(&outcome.message)
            .unwrap_err()
            .kind(),
        ErrorKind::AuthenticationFailed
    );
}

#[test]
fn test_missing_peer_signing_key() {
    init_tracing();
    let spec = AgreementSpec::signed(Family::X25519, Family::Ed25519);
    let parties = Parties::generate(&spec, 14);
    let outcome = handshake(&spec, &parties, 15, 16).unwrap();

    let mut responder = kagree_agreement::negotiate(
        spec,
        Some(parties.responder.clone()),
        None,
    )
    .unwrap();
    assert_eq!(
        responder
            .accept_initiator_message(&outcome.message)
            .unwrap_err()
            .kind(),
        ErrorKind::InvalidParameter
    );
}
