//! Constants for X25519 (RFC 7748)

/// Size of an X25519 public key in bytes
pub const X25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of an X25519 private scalar in bytes
pub const X25519_PRIVATE_KEY_SIZE: usize = 32;

/// Size of an X25519 shared value in bytes
pub const X25519_SHARED_SECRET_SIZE: usize = 32;
