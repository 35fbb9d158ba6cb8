//! Handshake message codec
//!
//! Wire layout, all integers big endian:
//!
//! ```text
//! envelope := version:u8 | message_type:u8 | algorithm_id:u16
//!             | pattern:u8 | field_count:u8 | field*
//! field    := kind:u8 | length:u32 | value[length]
//! ```
//!
//! A `Nested` field carries a complete envelope. Decoding is split in two:
//! [`parse`] checks structure only and [`interpret`] checks the envelope
//! against the agreement the receiver negotiated. Neither step performs any
//! cryptographic operation.

mod interpret;
mod parse;

pub use self::interpret::interpret;
pub use self::parse::{parse, RawEnvelope, RawField};

use core::fmt;

use kagree_internal::endian::{put_u16_be, put_u32_be};
use kagree_params::utils::wire::{MESSAGE_TYPE_INITIATOR, MESSAGE_TYPE_OFFER, WIRE_VERSION};

use crate::spec::PatternKind;

/// Direction of a handshake message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Responder pre-message publishing its ephemeral key
    Offer,
    /// Initiator message completing the agreement
    Initiator,
}

impl MessageType {
    pub const fn code(self) -> u8 {
        match self {
            MessageType::Offer => MESSAGE_TYPE_OFFER,
            MessageType::Initiator => MESSAGE_TYPE_INITIATOR,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            MESSAGE_TYPE_OFFER => Some(MessageType::Offer),
            MESSAGE_TYPE_INITIATOR => Some(MessageType::Initiator),
            _ => None,
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Offer => f.write_str("offer"),
            MessageType::Initiator => f.write_str("initiator message"),
        }
    }
}

/// Field tag on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    PublicKey,
    Encapsulation,
    Signature,
    Nonce,
    ConfirmationTag,
    Nested,
}

impl FieldKind {
    pub const fn code(self) -> u8 {
        match self {
            FieldKind::PublicKey => 1,
            FieldKind::Encapsulation => 2,
            FieldKind::Signature => 3,
            FieldKind::Nonce => 4,
            FieldKind::ConfirmationTag => 5,
            FieldKind::Nested => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => FieldKind::PublicKey,
            2 => FieldKind::Encapsulation,
            3 => FieldKind::Signature,
            4 => FieldKind::Nonce,
            5 => FieldKind::ConfirmationTag,
            6 => FieldKind::Nested,
            _ => return None,
        })
    }
}

/// One typed field of a handshake message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    PublicKey(Vec<u8>),
    Encapsulation(Vec<u8>),
    Signature(Vec<u8>),
    Nonce(Vec<u8>),
    ConfirmationTag(Vec<u8>),
    Nested(HandshakeMessage),
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::PublicKey(_) => FieldKind::PublicKey,
            Field::Encapsulation(_) => FieldKind::Encapsulation,
            Field::Signature(_) => FieldKind::Signature,
            Field::Nonce(_) => FieldKind::Nonce,
            Field::ConfirmationTag(_) => FieldKind::ConfirmationTag,
            Field::Nested(_) => FieldKind::Nested,
        }
    }

    /// Value of a byte-string field; `None` for `Nested`
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Field::PublicKey(v)
            | Field::Encapsulation(v)
            | Field::Signature(v)
            | Field::Nonce(v)
            | Field::ConfirmationTag(v) => Some(v),
            Field::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&HandshakeMessage> {
        match self {
            Field::Nested(message) => Some(message),
            _ => None,
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.kind().code());
        match self {
            Field::Nested(message) => {
                let value = message.encode();
                put_u32_be(out, value.len() as u32);
                out.extend_from_slice(&value);
            }
            _ => {
                let value = self.as_bytes().unwrap_or_default();
                put_u32_be(out, value.len() as u32);
                out.extend_from_slice(value);
            }
        }
    }
}

/// Typed handshake message under an envelope header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeMessage {
    message_type: MessageType,
    algorithm_id: u16,
    pattern: PatternKind,
    fields: Vec<Field>,
}

impl HandshakeMessage {
    pub fn new(message_type: MessageType, algorithm_id: u16, pattern: PatternKind) -> Self {
        Self {
            message_type,
            algorithm_id,
            pattern,
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub(crate) fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn algorithm_id(&self) -> u16 {
        self.algorithm_id
    }

    pub fn pattern(&self) -> PatternKind {
        self.pattern
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The trailing confirmation tag, if the message carries one
    pub fn confirmation_tag(&self) -> Option<&[u8]> {
        match self.fields.last() {
            Some(Field::ConfirmationTag(tag)) => Some(tag),
            _ => None,
        }
    }

    /// Nested component messages, in order
    pub fn nested(&self) -> impl Iterator<Item = &HandshakeMessage> {
        self.fields.iter().filter_map(Field::as_nested)
    }

    /// Canonical encoding
    pub fn encode(&self) -> Vec<u8> {
        self.encode_filtered(|_| true)
    }

    /// Canonical encoding without the outer confirmation tag
    ///
    /// This is the byte string bound into derivation and confirmation.
    /// Confirmation tags inside nested messages stay in place.
    pub fn transcript(&self) -> Vec<u8> {
        self.encode_filtered(|field| field.kind() != FieldKind::ConfirmationTag)
    }

    fn encode_filtered(&self, keep: impl Fn(&Field) -> bool) -> Vec<u8> {
        let kept: Vec<&Field> = self.fields.iter().filter(|f| keep(f)).collect();
        let mut out = Vec::with_capacity(64);
        out.push(WIRE_VERSION);
        out.push(self.message_type.code());
        put_u16_be(&mut out, self.algorithm_id);
        out.push(self.pattern.code());
        out.push(kept.len() as u8);
        for field in kept {
            field.encode_into(&mut out);
        }
        out
    }
}
