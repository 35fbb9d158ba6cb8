//! Constants for Ed25519 signatures

/// Size of an Ed25519 verifying key in bytes
pub const ED25519_PUBLIC_KEY_SIZE: usize = 32;

/// Size of an Ed25519 signing key seed in bytes
pub const ED25519_SECRET_KEY_SIZE: usize = 32;

/// Size of an Ed25519 signature in bytes
pub const ED25519_SIGNATURE_SIZE: usize = 64;
