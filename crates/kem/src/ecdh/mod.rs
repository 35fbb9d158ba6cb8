//! ECDH and ECMQV over the NIST prime curves
//!
//! Public keys are SEC1 compressed points, private keys big-endian scalars,
//! and the raw shared value is the affine x-coordinate. Both curves also
//! provide the MQV combination of SEC 1 section 3.4 (SP 800-56A ECMQV).

pub mod p256;
pub mod p384;

pub use p256::EcdhP256;
pub use p384::EcdhP384;

/// Associate value function of SEC 1 section 3.4
///
/// Keeps the low `half_bytes * 8` bits of the x-coordinate and sets the next
/// bit, producing `(x mod 2^h) + 2^h` as a big-endian integer of `x.len()`
/// bytes. The result is always below the group order.
pub(crate) fn associate_value(x: &[u8], half_bytes: usize) -> Vec<u8> {
    let len = x.len();
    let mut out = vec![0u8; len];
    out[len - half_bytes..].copy_from_slice(&x[len - half_bytes..]);
    out[len - half_bytes - 1] |= 0x01;
    out
}

/// Implements `DhPrimitive` for a NIST curve backed by a RustCrypto crate
macro_rules! nist_curve_primitive {
    (
        $name:ident,
        $curve:ident,
        $family:expr,
        $label:literal,
        $public_size:expr,
        $private_size:expr,
        $avf_bits:expr
    ) => {
        use kagree_api::error::validate;
        use kagree_api::{
            DhPrimitive, Error, Family, KeyPair, MqvInputs, PrivateKey, PublicKey, Result,
            SharedSecret,
        };
        use kagree_internal::constant_time::ct_eq;
        use rand_core::CryptoRngCore;
        use $curve::elliptic_curve::ff::PrimeField;
        use $curve::elliptic_curve::group::Group;
        use $curve::elliptic_curve::point::AffineCoordinates;
        use $curve::elliptic_curve::sec1::ToEncodedPoint;
        use $curve::{AffinePoint, FieldBytes, ProjectivePoint, Scalar};

        #[doc = concat!("ECDH and ECMQV over ", $label)]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $name {
            fn secret(private: &PrivateKey) -> Result<$curve::SecretKey> {
                validate::family(concat!($label, " private key"), $family, private.family())?;
                validate::length(concat!($label, " private key"), private.len(), $private_size)?;
                $curve::SecretKey::from_slice(private.as_bytes()).map_err(|_| {
                    Error::invalid_key(
                        concat!($label, " private key"),
                        "scalar is zero or not below the group order",
                    )
                })
            }

            fn public(public: &PublicKey) -> Result<$curve::PublicKey> {
                validate::family(concat!($label, " public key"), $family, public.family())?;
                if public.len() != $public_size {
                    return Err(Error::computation(
                        concat!($label, " public key"),
                        format!("expected {} compressed bytes, got {}", $public_size, public.len()),
                    ));
                }
                $curve::PublicKey::from_sec1_bytes(public.as_bytes()).map_err(|_| {
                    Error::computation(concat!($label, " public key"), "point is not on the curve")
                })
            }

            fn encode(public: &$curve::PublicKey) -> Vec<u8> {
                public.to_encoded_point(true).as_bytes().to_vec()
            }

            fn avf(point: &AffinePoint) -> Result<Scalar> {
                let x = point.x();
                let bytes = crate::ecdh::associate_value(&x, $avf_bits / 8);
                Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(&bytes)))
                    .ok_or_else(|| {
                        Error::computation(concat!($label, " MQV"), "associate value out of range")
                    })
            }
        }

        impl DhPrimitive for $name {
            fn family(&self) -> Family {
                $family
            }

            fn generate(&self, rng: &mut dyn CryptoRngCore) -> Result<KeyPair> {
                let mut rng = rng;
                let secret = $curve::SecretKey::random(&mut rng);
                KeyPair::from_parts(
                    PublicKey::new($family, Self::encode(&secret.public_key())),
                    Some(PrivateKey::new($family, secret.to_bytes().to_vec())),
                )
            }

            fn validate_public(&self, public: &PublicKey) -> Result<()> {
                Self::public(public).map(|_| ())
            }

            fn validate_pair(&self, public: &PublicKey, private: &PrivateKey) -> Result<()> {
                let secret = Self::secret(private)?;
                Self::public(public)?;
                if !ct_eq(Self::encode(&secret.public_key()), public.as_bytes()) {
                    return Err(Error::invalid_key(
                        concat!($label, " key pair"),
                        "private key does not match public key",
                    ));
                }
                Ok(())
            }

            fn compute_shared_value(
                &self,
                local: &PrivateKey,
                peer: &PublicKey,
            ) -> Result<SharedSecret> {
                let secret = Self::secret(local)?;
                let peer = Self::public(peer)?;
                let shared =
                    $curve::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
                Ok(SharedSecret::from_slice(shared.raw_secret_bytes()))
            }

            fn supports_mqv(&self) -> bool {
                true
            }

            fn mqv_shared_value(&self, inputs: MqvInputs<'_>) -> Result<SharedSecret> {
                let d = Self::secret(inputs.static_private)?;
                let e = Self::secret(inputs.ephemeral_private)?;
                let own_ephemeral = Self::public(inputs.ephemeral_public)?;
                let peer_static = Self::public(inputs.peer_static_public)?;
                let peer_ephemeral = Self::public(inputs.peer_ephemeral_public)?;

                // s = e + avf(E) * d mod n
                let s = *e.to_nonzero_scalar()
                    + Self::avf(own_ephemeral.as_affine())? * *d.to_nonzero_scalar();

                // P = s * (E' + avf(E') * Q')
                let peer_combined = ProjectivePoint::from(*peer_ephemeral.as_affine())
                    + ProjectivePoint::from(*peer_static.as_affine())
                        * Self::avf(peer_ephemeral.as_affine())?;
                let shared = peer_combined * s;

                if bool::from(shared.is_identity()) {
                    return Err(Error::computation(
                        concat!($label, " MQV"),
                        "shared point is the identity",
                    ));
                }
                Ok(SharedSecret::from_slice(&shared.to_affine().x()))
            }
        }
    };
}

pub(crate) use nist_curve_primitive;
