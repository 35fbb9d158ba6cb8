//! Semantic checks of a parsed envelope against the negotiated agreement

use kagree_api::{Error, FamilyClass, Result};
use kagree_params::utils::labels::{BASIC_NONCE_SIZE, CONFIRMATION_TAG_SIZE};
use kagree_params::utils::wire::COMPOSITE_ALGORITHM_ID;

use super::{Field, FieldKind, HandshakeMessage, MessageType, RawEnvelope, RawField};
use crate::spec::{AgreementSpec, Pattern, PatternKind};

/// Check a parsed envelope against `spec` and type its fields
///
/// Error categories:
/// - message type, pattern or composite layout differs: `AgreementMismatch`
/// - algorithm family differs from the spec's family: `TypeMismatch`
/// - unknown pattern byte or fields that do not fit the pattern: `MalformedMessage`
pub fn interpret(
    raw: RawEnvelope,
    spec: &AgreementSpec,
    expected: MessageType,
) -> Result<HandshakeMessage> {
    if raw.message_type != expected {
        return Err(Error::mismatch(
            "codec::interpret",
            format!("expected {expected}, got {}", raw.message_type),
        ));
    }
    check_algorithm(raw.algorithm_id, spec)?;

    let pattern = PatternKind::from_code(raw.pattern).ok_or_else(|| {
        Error::malformed(
            "codec::interpret",
            format!("unknown pattern {}", raw.pattern),
        )
    })?;
    if pattern != spec.pattern.kind() {
        return Err(Error::mismatch(
            "codec::interpret",
            format!("expected {} pattern, got {pattern}", spec.pattern.kind()),
        ));
    }

    let mut message = HandshakeMessage::new(expected, raw.algorithm_id, pattern);
    match &spec.pattern {
        Pattern::Composite(components) => {
            interpret_composite(raw.fields, spec, components, expected, &mut message)?
        }
        _ => interpret_single(raw.fields, spec, expected, &mut message)?,
    }
    Ok(message)
}

fn check_algorithm(algorithm_id: u16, spec: &AgreementSpec) -> Result<()> {
    match spec.family() {
        _ if spec.is_composite() => {
            if algorithm_id != COMPOSITE_ALGORITHM_ID {
                return Err(Error::mismatch(
                    "codec::interpret",
                    "expected a composite agreement",
                ));
            }
        }
        Some(family) => {
            if algorithm_id == COMPOSITE_ALGORITHM_ID {
                return Err(Error::mismatch(
                    "codec::interpret",
                    format!("expected a {family} agreement, got a composite"),
                ));
            }
            if algorithm_id != family.code() {
                return Err(Error::type_mismatch(
                    "codec::interpret",
                    format!("expected {family}, got algorithm {algorithm_id:#06x}"),
                ));
            }
        }
        None => {
            return Err(Error::parameter(
                "codec::interpret",
                "agreement spec has no family",
            ))
        }
    }
    Ok(())
}

/// Field kinds a non-composite message must carry, in order
fn expected_shape(spec: &AgreementSpec, message_type: MessageType) -> Vec<FieldKind> {
    let class = spec.family().map(|f| f.class());
    let carrier = match class {
        Some(FamilyClass::Kem) => FieldKind::Encapsulation,
        _ => FieldKind::PublicKey,
    };

    let mut shape = match (message_type, &spec.pattern) {
        (MessageType::Offer, Pattern::Mqv | Pattern::Unified) => vec![FieldKind::PublicKey],
        (MessageType::Offer, _) => Vec::new(),
        (MessageType::Initiator, Pattern::Anonymous) => vec![carrier],
        (MessageType::Initiator, Pattern::Basic) => vec![FieldKind::Nonce],
        (MessageType::Initiator, Pattern::Signed { .. }) => vec![carrier, FieldKind::Signature],
        (MessageType::Initiator, Pattern::Mqv | Pattern::Unified) => {
            vec![FieldKind::PublicKey, FieldKind::PublicKey]
        }
        (MessageType::Initiator, Pattern::Composite(_)) => Vec::new(),
    };
    if message_type == MessageType::Initiator && spec.kdf.confirmation {
        shape.push(FieldKind::ConfirmationTag);
    }
    shape
}

fn interpret_single(
    fields: Vec<RawField>,
    spec: &AgreementSpec,
    message_type: MessageType,
    message: &mut HandshakeMessage,
) -> Result<()> {
    let shape = expected_shape(spec, message_type);
    let kinds: Vec<FieldKind> = fields.iter().map(RawField::kind).collect();
    if kinds != shape {
        return Err(Error::malformed(
            "codec::interpret",
            format!(
                "{} {message_type} carries {} fields of the wrong shape",
                spec.pattern.kind(),
                kinds.len()
            ),
        ));
    }

    for field in fields {
        let RawField::Bytes { kind, value } = field else {
            return Err(Error::malformed(
                "codec::interpret",
                "unexpected nested message",
            ));
        };
        let field = match kind {
            FieldKind::PublicKey => Field::PublicKey(value),
            FieldKind::Encapsulation => Field::Encapsulation(value),
            FieldKind::Signature => Field::Signature(value),
            FieldKind::Nonce => {
                expect_len("Basic nonce", &value, BASIC_NONCE_SIZE)?;
                Field::Nonce(value)
            }
            FieldKind::ConfirmationTag => {
                expect_len("confirmation tag", &value, CONFIRMATION_TAG_SIZE)?;
                Field::ConfirmationTag(value)
            }
            FieldKind::Nested => {
                return Err(Error::malformed(
                    "codec::interpret",
                    "unexpected nested message",
                ))
            }
        };
        message.push(field);
    }
    Ok(())
}

fn interpret_composite(
    mut fields: Vec<RawField>,
    spec: &AgreementSpec,
    components: &[AgreementSpec],
    message_type: MessageType,
    message: &mut HandshakeMessage,
) -> Result<()> {
    let tag = if message_type == MessageType::Initiator && spec.kdf.confirmation {
        match fields.pop() {
            Some(RawField::Bytes {
                kind: FieldKind::ConfirmationTag,
                value,
            }) => {
                expect_len("confirmation tag", &value, CONFIRMATION_TAG_SIZE)?;
                Some(value)
            }
            _ => {
                return Err(Error::malformed(
                    "codec::interpret",
                    "composite message lacks its confirmation tag",
                ))
            }
        }
    } else {
        None
    };

    let mut nested = Vec::with_capacity(fields.len());
    for field in fields {
        match field {
            RawField::Nested(envelope) => nested.push(envelope),
            RawField::Bytes { kind, .. } => {
                return Err(Error::malformed(
                    "codec::interpret",
                    format!("composite message carries a {kind:?} field"),
                ))
            }
        }
    }
    if nested.len() != components.len() {
        return Err(Error::mismatch(
            "codec::interpret",
            format!(
                "composite of {} components, got {}",
                components.len(),
                nested.len()
            ),
        ));
    }
    for (position, (envelope, component)) in nested.iter().zip(components).enumerate() {
        if envelope.algorithm_id != component.algorithm_id()
            || envelope.pattern != component.pattern.kind().code()
        {
            return Err(Error::mismatch(
                "codec::interpret",
                format!("composite component {position} does not match {component}"),
            ));
        }
    }

    for (envelope, component) in nested.into_iter().zip(components) {
        let inner = interpret(envelope, component, message_type)?;
        message.push(Field::Nested(inner));
    }
    if let Some(tag) = tag {
        message.push(Field::ConfirmationTag(tag));
    }
    Ok(())
}

fn expect_len(what: &str, value: &[u8], expected: usize) -> Result<()> {
    if value.len() != expected {
        return Err(Error::malformed(
            "codec::interpret",
            format!("{what} of {} bytes, expected {expected}", value.len()),
        ));
    }
    Ok(())
}
