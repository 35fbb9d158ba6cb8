//! ECDH and ECMQV with NIST P-256

use kagree_params::traditional::ecdh::{
    ECDH_P256_PRIVATE_KEY_SIZE, ECDH_P256_PUBLIC_KEY_SIZE, MQV_P256_AVF_BITS,
};

super::nist_curve_primitive!(
    EcdhP256,
    p256,
    Family::EcdhP256,
    "P-256",
    ECDH_P256_PUBLIC_KEY_SIZE,
    ECDH_P256_PRIVATE_KEY_SIZE,
    MQV_P256_AVF_BITS
);
