//! Key derivation functions
//!
//! Both constructions take the concatenated shared values as the secret and
//! the agreement context as fixed info, and refuse a zero or oversized
//! output length.

mod concat;
mod hkdf;

pub use self::concat::ConcatKdf;
pub use self::hkdf::HkdfKdf;

use kagree_api::{Error, KdfAlgorithm, KeyDerivation, Result};

/// The derivation function for an algorithm identifier
pub fn kdf_for(algorithm: KdfAlgorithm) -> Box<dyn KeyDerivation> {
    match algorithm {
        KdfAlgorithm::HkdfSha256 | KdfAlgorithm::HkdfSha384 | KdfAlgorithm::HkdfSha512 => {
            Box::new(HkdfKdf::new(algorithm))
        }
        KdfAlgorithm::ConcatSha256 | KdfAlgorithm::ConcatSha512 => {
            Box::new(ConcatKdf::new(algorithm))
        }
    }
}

pub(crate) fn check_output_len(
    context: &'static str,
    output_len: usize,
    max_output_len: usize,
) -> Result<()> {
    if output_len == 0 {
        return Err(Error::parameter(context, "output length must be non-zero"));
    }
    if output_len > max_output_len {
        return Err(Error::parameter(
            context,
            format!("output length {output_len} exceeds maximum {max_output_len}"),
        ));
    }
    Ok(())
}
