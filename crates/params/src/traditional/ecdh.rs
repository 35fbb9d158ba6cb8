//! Constants for Elliptic Curve Diffie-Hellman over the NIST prime curves
//!
//! Public keys travel in SEC1 compressed form.

/// Size of shared secret for ECDH using P-256 in bytes (x-coordinate)
pub const ECDH_P256_SHARED_SECRET_SIZE: usize = 32;

/// Size of shared secret for ECDH using P-384 in bytes (x-coordinate)
pub const ECDH_P384_SHARED_SECRET_SIZE: usize = 48;

/// Size of public key for ECDH using P-256 in bytes (compressed format)
pub const ECDH_P256_PUBLIC_KEY_SIZE: usize = 33;

/// Size of public key for ECDH using P-384 in bytes (compressed format)
pub const ECDH_P384_PUBLIC_KEY_SIZE: usize = 49;

/// Size of private key for ECDH using P-256 in bytes
pub const ECDH_P256_PRIVATE_KEY_SIZE: usize = 32;

/// Size of private key for ECDH using P-384 in bytes
pub const ECDH_P384_PRIVATE_KEY_SIZE: usize = 48;

/// Bits kept by the MQV associate value function on P-256, ceil(f/2) with f = 256
pub const MQV_P256_AVF_BITS: usize = 128;

/// Bits kept by the MQV associate value function on P-384, ceil(f/2) with f = 384
pub const MQV_P384_AVF_BITS: usize = 192;
