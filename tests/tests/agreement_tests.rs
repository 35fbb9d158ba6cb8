//! End-to-end agreement properties across every family and pattern

use kagree_agreement::{AgreementSpec, KdfSpec};
use kagree_api::{ErrorKind, Family, KdfAlgorithm};
use kagree_tests::{compatible_specs, handshake, init_tracing, Parties};

#[test]
fn test_every_compatible_pair_agrees() {
    init_tracing();
    for (index, spec) in compatible_specs().into_iter().enumerate() {
        let seed = index as u64;
        let parties = Parties::generate(&spec, seed);
        let outcome = handshake(&spec, &parties, 1000 + seed, 2000 + seed)
            .unwrap_or_else(|e| panic!("{spec}: {e}"));
        assert_eq!(outcome.initiator, outcome.responder, "{spec}");
        assert_eq!(outcome.initiator.len(), 32, "{spec}");
    }
}

#[test]
fn test_kdf_choices_agree() {
    init_tracing();
    let kdfs = [
        KdfSpec::new(KdfAlgorithm::HkdfSha384),
        KdfSpec::new(KdfAlgorithm::HkdfSha512).with_output_len(100),
        KdfSpec::new(KdfAlgorithm::ConcatSha256).with_confirmation(true),
        KdfSpec::new(KdfAlgorithm::ConcatSha512)
            .with_output_len(16)
            .with_info(b"session 7".to_vec()),
    ];
    for (index, kdf) in kdfs.into_iter().enumerate() {
        let spec = AgreementSpec::unified(Family::EcdhP256).with_kdf(kdf.clone());
        let parties = Parties::generate(&spec, 40 + index as u64);
        let outcome = handshake(&spec, &parties, 1, 2).unwrap();
        assert_eq!(outcome.initiator, outcome.responder);
        assert_eq!(outcome.initiator.len(), kdf.session_len());
    }
}

#[test]
fn test_fresh_runs_differ_and_seeded_runs_repeat() {
    init_tracing();
    for spec in [
        AgreementSpec::anonymous(Family::X25519),
        AgreementSpec::anonymous(Family::MlKem512),
        AgreementSpec::basic(Family::EcdhP384),
        AgreementSpec::signed(Family::EcdhP256, Family::Ed25519),
    ] {
        let parties = Parties::generate(&spec, 3);

        let first = handshake(&spec, &parties, 10, 20).unwrap();
        let second = handshake(&spec, &parties, 11, 21).unwrap();
        assert_ne!(first.message, second.message, "{spec}");
        assert_ne!(first.initiator, second.initiator, "{spec}");

        let repeat = handshake(&spec, &parties, 10, 20).unwrap();
        assert_eq!(first.message, repeat.message, "{spec}");
        assert_eq!(first.initiator, repeat.initiator, "{spec}");
    }
}

#[test]
fn test_swapped_roles_derive_different_secrets() {
    init_tracing();
    for spec in [
        AgreementSpec::mqv(Family::EcdhP256),
        AgreementSpec::mqv(Family::EcdhP384),
        AgreementSpec::unified(Family::X25519),
        AgreementSpec::unified(Family::EcdhP384),
    ] {
        let parties = Parties::generate(&spec, 5);
        let forward = handshake(&spec, &parties, 30, 40).unwrap();
        let backward = handshake(&spec, &parties.swapped(), 30, 40).unwrap();
        assert_eq!(backward.initiator, backward.responder, "{spec}");
        assert_ne!(forward.initiator, backward.initiator, "{spec}");
    }
}

#[test]
fn test_wrong_family_is_type_mismatch() {
    init_tracing();
    let x25519 = AgreementSpec::anonymous(Family::X25519);
    let p256 = AgreementSpec::anonymous(Family::EcdhP256);
    let outcome = handshake(&x25519, &Parties::generate(&x25519, 6), 1, 2).unwrap();

    let mut responder = Parties::generate(&p256, 7).responder_handle(&p256, 3).unwrap();
    let err = responder
        .accept_initiator_message(&outcome.message)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(responder.is_spent());
}

#[test]
fn test_wrong_pattern_is_agreement_mismatch() {
    init_tracing();
    let anonymous = AgreementSpec::anonymous(Family::X25519);
    let basic = AgreementSpec::basic(Family::X25519);
    let parties = Parties::generate(&anonymous, 8);
    let outcome = handshake(&anonymous, &parties, 1, 2).unwrap();

    let mut responder = parties.responder_handle(&basic, 3).unwrap();
    let err = responder
        .accept_initiator_message(&outcome.message)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AgreementMismatch);
}

#[test]
fn test_same_message_on_two_fresh_handles() {
    init_tracing();
    for spec in [
        AgreementSpec::anonymous(Family::MlKem1024),
        AgreementSpec::basic(Family::X25519),
        AgreementSpec::signed(Family::MlKem768, Family::Ed25519),
    ] {
        let parties = Parties::generate(&spec, 9);
        let outcome = handshake(&spec, &parties, 50, 60).unwrap();

        let mut first = parties.responder_handle(&spec, 61).unwrap();
        let mut second = parties.responder_handle(&spec, 62).unwrap();
        let a = first.accept_initiator_message(&outcome.message).unwrap();
        let b = second.accept_initiator_message(&outcome.message).unwrap();
        assert_eq!(a, b, "{spec}");
        assert_eq!(a, outcome.initiator, "{spec}");
    }
}

#[test]
fn test_offer_patterns_need_matching_responder() {
    init_tracing();
    let spec = AgreementSpec::mqv(Family::EcdhP256);
    let parties = Parties::generate(&spec, 10);
    let outcome = handshake(&spec, &parties, 70, 80).unwrap();
    assert!(!outcome.offer.is_empty());

    // a responder that published a different ephemeral key sees a foreign echo
    let mut other = parties.responder_handle(&spec, 81).unwrap();
    other.create_responder_offer().unwrap();
    let err = other.accept_initiator_message(&outcome.message).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AgreementMismatch);

    // a responder seeded like the original reproduces its offer
    let mut same = parties.responder_handle(&spec, 80).unwrap();
    assert_eq!(same.create_responder_offer().unwrap(), outcome.offer);
    assert_eq!(
        same.accept_initiator_message(&outcome.message).unwrap(),
        outcome.initiator
    );
}

#[test]
fn test_incompatible_specs_are_refused() {
    init_tracing();
    for spec in [
        AgreementSpec::basic(Family::MlKem768),
        AgreementSpec::mqv(Family::X25519),
        AgreementSpec::unified(Family::Ed25519),
        AgreementSpec::signed(Family::X25519, Family::EcdhP256),
    ] {
        let err = kagree_agreement::negotiate(spec.clone(), None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter, "{spec}");
    }
}

#[test]
fn test_non_contributory_peer_key() {
    init_tracing();
    let spec = AgreementSpec::anonymous(Family::X25519);
    let parties = Parties::generate(&spec, 11);
    let outcome = handshake(&spec, &parties, 1, 2).unwrap();

    // replace the initiator's ephemeral key with the all-zero point
    let mut message = outcome.message.clone();
    message[11..43].fill(0);
    let mut responder = parties.responder_handle(&spec, 3).unwrap();
    let err = responder.accept_initiator_message(&message).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComputationFailure);
}
