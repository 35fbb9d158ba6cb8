use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use kagree_api::error::validate;
use kagree_api::{
    Error, Family, KeyPair, PrivateKey, PublicKey, Result, SignaturePrimitive,
};
use kagree_common::SecretBuffer;
use kagree_params::traditional::ed25519::{ED25519_PUBLIC_KEY_SIZE, ED25519_SECRET_KEY_SIZE};
use rand_core::CryptoRngCore;

/// Ed25519 signatures (RFC 8032)
///
/// Private keys are the 32-byte seed. Verification is strict: small-order
/// keys and non-canonical encodings are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519;

impl Ed25519 {
    fn signing_key(private: &PrivateKey) -> Result<SigningKey> {
        validate::family("Ed25519 private key", Family::Ed25519, private.family())?;
        let seed = SecretBuffer::<ED25519_SECRET_KEY_SIZE>::from_slice(private.as_bytes())
            .ok_or(Error::InvalidLength {
                context: "Ed25519 private key",
                expected: ED25519_SECRET_KEY_SIZE,
                actual: private.len(),
            })?;
        Ok(SigningKey::from_bytes(seed.as_array()))
    }

    fn verifying_key(public: &PublicKey) -> Result<VerifyingKey> {
        validate::family("Ed25519 public key", Family::Ed25519, public.family())?;
        let bytes: [u8; ED25519_PUBLIC_KEY_SIZE] = public.as_bytes().try_into().map_err(|_| {
            Error::invalid_key(
                "Ed25519 public key",
                format!("expected {ED25519_PUBLIC_KEY_SIZE} bytes, got {}", public.len()),
            )
        })?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|_| Error::invalid_key("Ed25519 public key", "not a valid curve point"))
    }
}

impl SignaturePrimitive for Ed25519 {
    fn family(&self) -> Family {
        Family::Ed25519
    }

    fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair> {
        let seed = SecretBuffer::<ED25519_SECRET_KEY_SIZE>::random(rng);
        let signing = SigningKey::from_bytes(seed.as_array());
        KeyPair::from_parts(
            PublicKey::new(Family::Ed25519, signing.verifying_key().to_bytes().to_vec()),
            Some(PrivateKey::new(Family::Ed25519, seed.as_slice().to_vec())),
        )
    }

    fn validate_public(&self, public: &PublicKey) -> Result<()> {
        Self::verifying_key(public).map(|_| ())
    }

    fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()> {
        let signing = Self::signing_key(private)?;
        let claimed = Self::verifying_key(public)?;
        if signing.verifying_key() != claimed {
            return Err(Error::invalid_key(
                "Ed25519 key pair",
                "private key does not match public key",
            ));
        }
        Ok(())
    }

    fn sign(&self, private: &PrivateKey, message: &[u8]) -> Result<Vec<u8>> {
        let signing = Self::signing_key(private)?;
        Ok(signing.sign(message).to_bytes().to_vec())
    }

    fn verify(&self, public: &PublicKey, message: &[u8], signature: &[u8]) -> Result<()> {
        let failed = || Error::AuthenticationFailed {
            context: "Ed25519 verify",
        };
        let verifying = Self::verifying_key(public).map_err(|_| failed())?;
        let signature = Signature::from_slice(signature).map_err(|_| failed())?;
        verifying
            .verify_strict(message, &signature)
            .map_err(|_| failed())
    }
}
