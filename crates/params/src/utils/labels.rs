//! Domain-separation labels
//!
//! Changing any of these changes every derived secret; they are part of the
//! wire contract.

/// Prefix of every key-derivation context
pub const KDF_LABEL: &[u8] = b"kagree/v1/derive";

/// Prefix of the message signed in the Signed pattern
pub const SIGN_LABEL: &[u8] = b"kagree/v1/sign";

/// Prefix of the data covered by the key-confirmation tag
pub const CONFIRM_LABEL: &[u8] = b"kagree/v1/confirm";

/// Length of the key-confirmation MAC key, derived under `CONFIRM_LABEL`
pub const CONFIRMATION_KEY_SIZE: usize = 32;

/// Length of the key-confirmation tag (HMAC-SHA256)
pub const CONFIRMATION_TAG_SIZE: usize = 32;

/// Length of the fresh nonce carried by the Basic pattern
pub const BASIC_NONCE_SIZE: usize = 32;
