use kagree_api::{KdfAlgorithm, KeyDerivation, Result};
use kagree_params::utils::hash::CONCAT_KDF_MAX_BLOCKS;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

use super::check_output_len;

/// One-step key derivation of SP 800-56C (concatenation KDF)
///
/// `K(i) = H(counter_i || Z || FixedInfo)` with a 32-bit big-endian counter
/// starting at 1; the output is the leading bytes of `K(1) || K(2) || ...`.
#[derive(Debug, Clone, Copy)]
pub struct ConcatKdf {
    algorithm: KdfAlgorithm,
}

impl ConcatKdf {
    /// Non-concatenation identifiers fall back to SHA-256
    pub fn new(algorithm: KdfAlgorithm) -> Self {
        let algorithm = match algorithm {
            KdfAlgorithm::ConcatSha512 => algorithm,
            _ => KdfAlgorithm::ConcatSha256,
        };
        Self { algorithm }
    }
}

fn one_step<D: Digest>(secret: &[u8], fixed_info: &[u8], out: &mut [u8]) {
    let block_len = <D as Digest>::output_size();
    for (i, chunk) in out.chunks_mut(block_len).enumerate() {
        let counter = (i as u32) + 1;
        let mut hasher = D::new();
        hasher.update(counter.to_be_bytes());
        hasher.update(secret);
        hasher.update(fixed_info);
        let block = hasher.finalize();
        chunk.copy_from_slice(&block[..chunk.len()]);
    }
}

impl KeyDerivation for ConcatKdf {
    fn algorithm(&self) -> KdfAlgorithm {
        self.algorithm
    }

    fn max_output_len(&self) -> usize {
        CONCAT_KDF_MAX_BLOCKS * self.algorithm.digest_len()
    }

    fn derive(
        &self,
        secret: &[u8],
        context: &[u8],
        output_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        check_output_len("ConcatKDF", output_len, self.max_output_len())?;
        let mut okm = Zeroizing::new(vec![0u8; output_len]);
        match self.algorithm {
            KdfAlgorithm::ConcatSha512 => one_step::<Sha512>(secret, context, &mut okm),
            _ => one_step::<Sha256>(secret, context, &mut okm),
        }
        Ok(okm)
    }
}
