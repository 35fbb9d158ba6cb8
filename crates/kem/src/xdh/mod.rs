//! X25519 key agreement (RFC 7748)

mod x25519;

pub use x25519::X25519;
