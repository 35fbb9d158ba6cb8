//! Handshake envelope layout and limits

/// Envelope format version
pub const WIRE_VERSION: u8 = 1;

/// Header: version, message type, algorithm id (2), pattern, field count
pub const ENVELOPE_HEADER_SIZE: usize = 6;

/// Field header: kind plus a 32-bit length
pub const FIELD_HEADER_SIZE: usize = 5;

/// Largest single field value accepted by the parser
pub const MAX_FIELD_SIZE: usize = 1 << 20;

/// Largest number of fields in one envelope
pub const MAX_FIELDS: usize = 64;

/// Deepest nesting of composite envelopes accepted by the parser
pub const MAX_NESTING_DEPTH: usize = 4;

/// Algorithm identifier carried by composite envelopes
pub const COMPOSITE_ALGORITHM_ID: u16 = 0xFF00;

/// Message type of a responder offer
pub const MESSAGE_TYPE_OFFER: u8 = 1;

/// Message type of an initiator message
pub const MESSAGE_TYPE_INITIATOR: u8 = 2;
