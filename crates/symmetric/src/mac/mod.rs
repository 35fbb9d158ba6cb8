//! Key confirmation tags
//!
//! `tag = HMAC-SHA256(confirmation_key, CONFIRM_LABEL || transcript)`

use hmac::{Hmac, Mac};
use kagree_api::{Error, Result};
use kagree_params::utils::labels::{CONFIRMATION_TAG_SIZE, CONFIRM_LABEL};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8], transcript: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| Error::parameter("confirmation tag", "invalid MAC key length"))?;
    mac.update(CONFIRM_LABEL);
    mac.update(transcript);
    Ok(mac)
}

/// Compute the confirmation tag over a transcript
pub fn confirmation_tag(key: &[u8], transcript: &[u8]) -> Result<[u8; CONFIRMATION_TAG_SIZE]> {
    let tag = keyed(key, transcript)?.finalize().into_bytes();
    let mut out = [0u8; CONFIRMATION_TAG_SIZE];
    out.copy_from_slice(&tag);
    Ok(out)
}

/// Check a received tag in constant time
pub fn verify_confirmation_tag(key: &[u8], transcript: &[u8], tag: &[u8]) -> Result<()> {
    keyed(key, transcript)?
        .verify_slice(tag)
        .map_err(|_| Error::AuthenticationFailed {
            context: "key confirmation",
        })
}
