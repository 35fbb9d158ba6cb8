//! Structural decoding of handshake envelopes

use kagree_api::{Error, Result};
use kagree_internal::endian::{u16_from_be_at, u32_from_be_at};
use kagree_params::utils::wire::{
    ENVELOPE_HEADER_SIZE, FIELD_HEADER_SIZE, MAX_FIELDS, MAX_FIELD_SIZE, MAX_NESTING_DEPTH,
    WIRE_VERSION,
};
use tracing::trace;

use super::{FieldKind, MessageType};

/// Structurally valid envelope whose contents have not been checked against
/// any agreement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub message_type: MessageType,
    pub algorithm_id: u16,
    /// Pattern byte as received; unknown values are rejected by `interpret`
    pub pattern: u8,
    pub fields: Vec<RawField>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawField {
    Bytes { kind: FieldKind, value: Vec<u8> },
    Nested(RawEnvelope),
}

impl RawField {
    pub fn kind(&self) -> FieldKind {
        match self {
            RawField::Bytes { kind, .. } => *kind,
            RawField::Nested(_) => FieldKind::Nested,
        }
    }
}

/// Decode an envelope, checking structure only
///
/// Rejects, as `MalformedMessage`: a short header, an unknown version,
/// message type or field kind, a field longer than the wire limit or than the
/// remaining input, a field count above the limit or different from the
/// fields present, trailing bytes, and nesting deeper than the limit.
pub fn parse(bytes: &[u8]) -> Result<RawEnvelope> {
    parse_at_depth(bytes, 1)
}

fn parse_at_depth(bytes: &[u8], depth: usize) -> Result<RawEnvelope> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::malformed(
            "codec::parse",
            format!("nesting deeper than {MAX_NESTING_DEPTH}"),
        ));
    }
    if bytes.len() < ENVELOPE_HEADER_SIZE {
        return Err(Error::malformed("codec::parse", "truncated envelope header"));
    }
    if bytes[0] != WIRE_VERSION {
        return Err(Error::malformed(
            "codec::parse",
            format!("unsupported version {}", bytes[0]),
        ));
    }
    let message_type = MessageType::from_code(bytes[1]).ok_or_else(|| {
        Error::malformed("codec::parse", format!("unknown message type {}", bytes[1]))
    })?;
    let algorithm_id = u16_from_be_at(bytes, 2)
        .ok_or_else(|| Error::malformed("codec::parse", "truncated envelope header"))?;
    let pattern = bytes[4];
    let field_count = bytes[5] as usize;
    if field_count > MAX_FIELDS {
        return Err(Error::malformed(
            "codec::parse",
            format!("{field_count} fields exceed the limit of {MAX_FIELDS}"),
        ));
    }

    let mut fields = Vec::with_capacity(field_count);
    let mut offset = ENVELOPE_HEADER_SIZE;
    for _ in 0..field_count {
        if bytes.len() - offset < FIELD_HEADER_SIZE {
            return Err(Error::malformed("codec::parse", "truncated field header"));
        }
        let kind = FieldKind::from_code(bytes[offset]).ok_or_else(|| {
            Error::malformed(
                "codec::parse",
                format!("unknown field kind {}", bytes[offset]),
            )
        })?;
        let length = u32_from_be_at(bytes, offset + 1)
            .ok_or_else(|| Error::malformed("codec::parse", "truncated field header"))?
            as usize;
        offset += FIELD_HEADER_SIZE;
        if length > MAX_FIELD_SIZE {
            return Err(Error::malformed(
                "codec::parse",
                format!("field of {length} bytes exceeds the limit of {MAX_FIELD_SIZE}"),
            ));
        }
        if bytes.len() - offset < length {
            return Err(Error::malformed("codec::parse", "field runs past end of input"));
        }
        let value = &bytes[offset..offset + length];
        offset += length;

        let field = match kind {
            FieldKind::Nested => RawField::Nested(parse_at_depth(value, depth + 1)?),
            kind => RawField::Bytes {
                kind,
                value: value.to_vec(),
            },
        };
        fields.push(field);
    }

    if offset != bytes.len() {
        return Err(Error::malformed(
            "codec::parse",
            format!("{} trailing bytes", bytes.len() - offset),
        ));
    }

    trace!(
        depth,
        algorithm_id,
        pattern,
        fields = fields.len(),
        "parsed handshake envelope"
    );
    Ok(RawEnvelope {
        message_type,
        algorithm_id,
        pattern,
        fields,
    })
}
