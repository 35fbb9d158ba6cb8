use kagree_api::error::validate;
use kagree_api::{
    DhPrimitive, Error, Family, KeyPair, PrivateKey, PublicKey, Result, SharedSecret,
};
use kagree_common::SecretBuffer;
use kagree_params::traditional::xdh::{X25519_PRIVATE_KEY_SIZE, X25519_PUBLIC_KEY_SIZE};
use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as DalekPublic, StaticSecret};

/// X25519 Diffie-Hellman over Curve25519
///
/// Private keys are the 32-byte scalar seed; clamping happens inside
/// `x25519-dalek`. A non-contributory result (peer key of small order) is
/// rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct X25519;

impl X25519 {
    fn secret(private: &PrivateKey) -> Result<StaticSecret> {
        validate::family("X25519 private key", Family::X25519, private.family())?;
        let seed = SecretBuffer::<X25519_PRIVATE_KEY_SIZE>::from_slice(private.as_bytes())
            .ok_or(Error::InvalidLength {
                context: "X25519 private key",
                expected: X25519_PRIVATE_KEY_SIZE,
                actual: private.len(),
            })?;
        Ok(StaticSecret::from(*seed.as_array()))
    }

    fn public(public: &PublicKey) -> Result<DalekPublic> {
        validate::family("X25519 public key", Family::X25519, public.family())?;
        let bytes: [u8; X25519_PUBLIC_KEY_SIZE] = public.as_bytes().try_into().map_err(|_| {
            Error::computation(
                "X25519 public key",
                format!("expected {X25519_PUBLIC_KEY_SIZE} bytes, got {}", public.len()),
            )
        })?;
        Ok(DalekPublic::from(bytes))
    }
}

impl DhPrimitive for X25519 {
    fn family(&self) -> Family {
        Family::X25519
    }

    fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair> {
        let seed = SecretBuffer::<X25519_PRIVATE_KEY_SIZE>::random(rng);
        let secret = StaticSecret::from(*seed.as_array());
        let public = DalekPublic::from(&secret);
        KeyPair::from_parts(
            PublicKey::new(Family::X25519, public.as_bytes().to_vec()),
            Some(PrivateKey::new(Family::X25519, secret.to_bytes().to_vec())),
        )
    }

    fn validate_public(&self, public: &PublicKey) -> Result<()> {
        Self::public(public).map(|_| ())
    }

    fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()> {
        let secret = Self::secret(private)?;
        let claimed = Self::public(public)?;
        let derived = DalekPublic::from(&secret);
        if !bool::from(derived.as_bytes().ct_eq(claimed.as_bytes())) {
            return Err(Error::invalid_key(
                "X25519 key pair",
                "private key does not match public key",
            ));
        }
        Ok(())
    }

    fn compute_shared_value(&self, local: &PrivateKey, peer: &PublicKey) -> Result<SharedSecret> {
        let secret = Self::secret(local)?;
        let peer = Self::public(peer)?;
        let shared = secret.diffie_hellman(&peer);
        if !shared.was_contributory() {
            return Err(Error::computation(
                "X25519",
                "peer public key yields a non-contributory result",
            ));
        }
        Ok(SharedSecret::from_slice(shared.as_bytes()))
    }
}
