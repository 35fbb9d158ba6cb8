//! Key derivation collaborator contract

use zeroize::Zeroizing;

use crate::error::Result;
use crate::types::KdfAlgorithm;

/// A key derivation function bound to one [`KdfAlgorithm`]
pub trait KeyDerivation: Send + Sync {
    fn algorithm(&self) -> KdfAlgorithm;

    /// Largest output this function can produce
    fn max_output_len(&self) -> usize;

    /// Derive `output_len` bytes from `secret` under `context`
    ///
    /// A zero or oversized `output_len` is `InvalidParameter`.
    fn derive(
        &self,
        secret: &[u8],
        context: &[u8],
        output_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>>;
}
