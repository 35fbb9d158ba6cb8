//! ECDH and ECMQV with NIST P-384

use kagree_params::traditional::ecdh::{
    ECDH_P384_PRIVATE_KEY_SIZE, ECDH_P384_PUBLIC_KEY_SIZE, MQV_P384_AVF_BITS,
};

super::nist_curve_primitive!(
    EcdhP384,
    p384,
    Family::EcdhP384,
    "P-384",
    ECDH_P384_PUBLIC_KEY_SIZE,
    ECDH_P384_PRIVATE_KEY_SIZE,
    MQV_P384_AVF_BITS
);
