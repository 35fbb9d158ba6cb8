use ::hkdf::Hkdf;
use kagree_api::{Error, KdfAlgorithm, KeyDerivation, Result};
use kagree_params::utils::hash::HKDF_MAX_BLOCKS;
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

use super::check_output_len;

/// HKDF (RFC 5869) with an empty salt
///
/// The shared values are the input keying material and the agreement
/// context is the `info` string.
#[derive(Debug, Clone, Copy)]
pub struct HkdfKdf {
    algorithm: KdfAlgorithm,
}

impl HkdfKdf {
    /// Non-HKDF identifiers fall back to SHA-256
    pub fn new(algorithm: KdfAlgorithm) -> Self {
        let algorithm = match algorithm {
            KdfAlgorithm::HkdfSha384 | KdfAlgorithm::HkdfSha512 => algorithm,
            _ => KdfAlgorithm::HkdfSha256,
        };
        Self { algorithm }
    }
}

impl KeyDerivation for HkdfKdf {
    fn algorithm(&self) -> KdfAlgorithm {
        self.algorithm
    }

    fn max_output_len(&self) -> usize {
        HKDF_MAX_BLOCKS * self.algorithm.digest_len()
    }

    fn derive(
        &self,
        secret: &[u8],
        context: &[u8],
        output_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        check_output_len("HKDF", output_len, self.max_output_len())?;
        let mut okm = Zeroizing::new(vec![0u8; output_len]);
        let expanded = match self.algorithm {
            KdfAlgorithm::HkdfSha384 => Hkdf::<Sha384>::new(None, secret).expand(context, &mut okm),
            KdfAlgorithm::HkdfSha512 => Hkdf::<Sha512>::new(None, secret).expand(context, &mut okm),
            _ => Hkdf::<Sha256>::new(None, secret).expand(context, &mut okm),
        };
        expanded.map_err(|_| Error::computation("HKDF", "expand failed"))?;
        Ok(okm)
    }
}
