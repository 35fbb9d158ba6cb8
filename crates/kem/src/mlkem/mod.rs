//! ML-KEM key encapsulation (FIPS 203)
//!
//! One generic primitive over the three parameter sets of the `ml-kem` crate.
//! Decapsulation uses implicit rejection: a well-sized but tampered
//! encapsulation yields an unrelated shared value rather than an error.

use core::marker::PhantomData;

use kagree_api::error::validate;
use kagree_api::{
    Error, Family, KemPrimitive, KeyPair, PrivateKey, PublicKey, Result, SharedSecret,
};
use kagree_internal::constant_time::ct_eq;
use kagree_params::pqc::mlkem::{MlKemParams, MLKEM1024, MLKEM512, MLKEM768};
use ml_kem::kem::{Decapsulate, Encapsulate};
use ml_kem::{Ciphertext, Encoded, EncodedSizeUser, KemCore};
use rand_core::CryptoRngCore;

/// Binds an `ml-kem` parameter set to its family tag and sizes
pub trait ParameterSet: KemCore + 'static {
    const FAMILY: Family;
    const PARAMS: &'static MlKemParams;
}

impl ParameterSet for ml_kem::MlKem512 {
    const FAMILY: Family = Family::MlKem512;
    const PARAMS: &'static MlKemParams = &MLKEM512;
}

impl ParameterSet for ml_kem::MlKem768 {
    const FAMILY: Family = Family::MlKem768;
    const PARAMS: &'static MlKemParams = &MLKEM768;
}

impl ParameterSet for ml_kem::MlKem1024 {
    const FAMILY: Family = Family::MlKem1024;
    const PARAMS: &'static MlKemParams = &MLKEM1024;
}

/// ML-KEM primitive for parameter set `K`
pub struct MlKem<K: ParameterSet>(PhantomData<fn() -> K>);

/// ML-KEM-512 (NIST security category 1)
pub type MlKem512 = MlKem<ml_kem::MlKem512>;

/// ML-KEM-768 (NIST security category 3)
pub type MlKem768 = MlKem<ml_kem::MlKem768>;

/// ML-KEM-1024 (NIST security category 5)
pub type MlKem1024 = MlKem<ml_kem::MlKem1024>;

impl<K: ParameterSet> MlKem<K> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    fn check_public(public: &PublicKey) -> Result<()> {
        validate::family("ML-KEM public key", K::FAMILY, public.family())?;
        if public.len() != K::PARAMS.public_key_size {
            return Err(Error::computation(
                "ML-KEM public key",
                format!(
                    "expected {} bytes, got {}",
                    K::PARAMS.public_key_size,
                    public.len()
                ),
            ));
        }
        Ok(())
    }

    fn check_private(private: &PrivateKey) -> Result<()> {
        validate::family("ML-KEM private key", K::FAMILY, private.family())?;
        validate::length(
            "ML-KEM private key",
            private.len(),
            K::PARAMS.secret_key_size,
        )
    }

    fn encapsulation_key(public: &PublicKey) -> Result<K::EncapsulationKey> {
        Self::check_public(public)?;
        let encoded: Encoded<K::EncapsulationKey> = public
            .as_bytes()
            .try_into()
            .map_err(|_| Error::computation("ML-KEM public key", "cannot decode key"))?;
        Ok(<K::EncapsulationKey as EncodedSizeUser>::from_bytes(&encoded))
    }

    fn decapsulation_key(private: &PrivateKey) -> Result<K::DecapsulationKey> {
        Self::check_private(private)?;
        let encoded: Encoded<K::DecapsulationKey> = private
            .as_bytes()
            .try_into()
            .map_err(|_| Error::invalid_key("ML-KEM private key", "cannot decode key"))?;
        Ok(<K::DecapsulationKey as EncodedSizeUser>::from_bytes(&encoded))
    }
}

impl<K: ParameterSet> Default for MlKem<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ParameterSet> KemPrimitive for MlKem<K> {
    fn family(&self) -> Family {
        K::FAMILY
    }

    fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair> {
        let mut rng = rng;
        let (dk, ek) = K::generate(&mut rng);
        KeyPair::from_parts(
            PublicKey::new(K::FAMILY, ek.as_bytes().to_vec()),
            Some(PrivateKey::new(K::FAMILY, dk.as_bytes().to_vec())),
        )
    }

    fn validate_public(&self, public: &PublicKey) -> Result<()> {
        Self::check_public(public)
    }

    fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()> {
        Self::check_public(public)?;
        Self::check_private(private)?;
        // The decapsulation key embeds its encapsulation key after the
        // K-PKE secret key.
        let offset = K::PARAMS.embedded_public_key_offset;
        let embedded = &private.as_bytes()[offset..offset + K::PARAMS.public_key_size];
        if !ct_eq(embedded, public.as_bytes()) {
            return Err(Error::invalid_key(
                "ML-KEM key pair",
                "private key does not match public key",
            ));
        }
        Ok(())
    }

    fn encapsulation_len(&self) -> usize {
        K::PARAMS.ciphertext_size
    }

    fn encapsulate(
        &self,
        peer: &PublicKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(Vec<u8>, SharedSecret)> {
        let ek = Self::encapsulation_key(peer)?;
        let mut rng = rng;
        let (ciphertext, shared) = ek
            .encapsulate(&mut rng)
            .map_err(|_| Error::computation("ML-KEM encapsulate", "encapsulation failed"))?;
        Ok((ciphertext.to_vec(), SharedSecret::from_slice(&shared[..])))
    }

    fn decapsulate(&self, local: &PrivateKey, encapsulation: &[u8]) -> Result<SharedSecret> {
        let dk = Self::decapsulation_key(local)?;
        let ciphertext: Ciphertext<K> = encapsulation.try_into().map_err(|_| {
            Error::computation(
                "ML-KEM decapsulate",
                format!(
                    "expected {} byte encapsulation, got {}",
                    K::PARAMS.ciphertext_size,
                    encapsulation.len()
                ),
            )
        })?;
        let shared = dk
            .decapsulate(&ciphertext)
            .map_err(|_| Error::computation("ML-KEM decapsulate", "decapsulation failed"))?;
        Ok(SharedSecret::from_slice(&shared[..]))
    }
}
