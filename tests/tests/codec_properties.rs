//! Property tests for the handshake codec

use kagree_agreement::codec::{interpret, parse, Field, HandshakeMessage, MessageType};
use kagree_agreement::{AgreementSpec, KdfSpec, PatternKind};
use kagree_api::Family;
use kagree_tests::{handshake, Parties};
use once_cell::sync::Lazy;
use proptest::prelude::*;

struct Sample {
    spec: AgreementSpec,
    parties: Parties,
    message: Vec<u8>,
}

static SAMPLE: Lazy<Sample> = Lazy::new(|| {
    let spec = AgreementSpec::basic(Family::X25519)
        .with_kdf(KdfSpec::default().with_confirmation(true));
    let parties = Parties::generate(&spec, 1);
    let message = handshake(&spec, &parties, 2, 3)
        .expect("sample handshake")
        .message;
    Sample {
        spec,
        parties,
        message,
    }
});

fn field_strategy() -> impl Strategy<Value = Field> {
    let bytes = prop::collection::vec(any::<u8>(), 0..64);
    prop_oneof![
        bytes.clone().prop_map(Field::PublicKey),
        bytes.clone().prop_map(Field::Encapsulation),
        bytes.clone().prop_map(Field::Signature),
        bytes.clone().prop_map(Field::Nonce),
        bytes.prop_map(Field::ConfirmationTag),
    ]
}

proptest! {
    #[test]
    fn parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = parse(&bytes);
    }

    #[test]
    fn encoding_parses_back(
        algorithm_id in any::<u16>(),
        fields in prop::collection::vec(field_strategy(), 0..8),
    ) {
        let message = fields.into_iter().fold(
            HandshakeMessage::new(MessageType::Initiator, algorithm_id, PatternKind::Signed),
            HandshakeMessage::with_field,
        );
        let encoded = message.encode();
        let raw = parse(&encoded).unwrap();
        prop_assert_eq!(raw.algorithm_id, algorithm_id);
        prop_assert_eq!(raw.fields.len(), message.fields().len());
        prop_assert_eq!(message.encode(), encoded);
    }

    #[test]
    fn interpret_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(raw) = parse(&bytes) {
            let _ = interpret(raw, &SAMPLE.spec, MessageType::Initiator);
        }
    }

    #[test]
    fn mutated_confirmed_message_is_rejected(
        position in 0usize..80,
        mask in 1u8..=255,
    ) {
        let sample = &*SAMPLE;
        prop_assert_eq!(sample.message.len(), 80);
        let mut tampered = sample.message.clone();
        tampered[position] ^= mask;

        let mut responder = sample.parties.responder_handle(&sample.spec, 4).unwrap();
        prop_assert!(responder.accept_initiator_message(&tampered).is_err());
    }
}
