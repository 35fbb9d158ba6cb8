//! Constants for hash functions used as KDF and MAC building blocks

/// Output size of SHA-256 in bytes
pub const SHA256_OUTPUT_SIZE: usize = 32;

/// Output size of SHA-384 in bytes
pub const SHA384_OUTPUT_SIZE: usize = 48;

/// Output size of SHA-512 in bytes
pub const SHA512_OUTPUT_SIZE: usize = 64;

/// HKDF can expand to at most 255 blocks of the underlying hash
pub const HKDF_MAX_BLOCKS: usize = 255;

/// Upper bound on concatenation KDF blocks (the counter is 32 bits, we cap lower)
pub const CONCAT_KDF_MAX_BLOCKS: usize = 1 << 16;
