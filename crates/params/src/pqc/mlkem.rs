//! Constants for the ML-KEM key encapsulation mechanism (FIPS 203)

/// Shared secret size for every ML-KEM parameter set
pub const MLKEM_SHARED_SECRET_SIZE: usize = 32;

/// Bytes of the encoded K-PKE decryption key per module rank
const MLKEM_PKE_SECRET_BYTES_PER_RANK: usize = 384;

/// Structure containing the sizes of one ML-KEM parameter set
pub struct MlKemParams {
    /// Module rank k
    pub k: usize,

    /// Size of the encapsulation (public) key in bytes
    pub public_key_size: usize,

    /// Size of the decapsulation (secret) key in bytes
    pub secret_key_size: usize,

    /// Size of the ciphertext in bytes
    pub ciphertext_size: usize,

    /// Offset of the embedded encapsulation key inside the decapsulation key
    pub embedded_public_key_offset: usize,
}

/// ML-KEM-512 parameters
pub const MLKEM512: MlKemParams = MlKemParams {
    k: 2,
    public_key_size: 800,
    secret_key_size: 1632,
    ciphertext_size: 768,
    embedded_public_key_offset: 2 * MLKEM_PKE_SECRET_BYTES_PER_RANK,
};

/// ML-KEM-768 parameters
pub const MLKEM768: MlKemParams = MlKemParams {
    k: 3,
    public_key_size: 1184,
    secret_key_size: 2400,
    ciphertext_size: 1088,
    embedded_public_key_offset: 3 * MLKEM_PKE_SECRET_BYTES_PER_RANK,
};

/// ML-KEM-1024 parameters
pub const MLKEM1024: MlKemParams = MlKemParams {
    k: 4,
    public_key_size: 1568,
    secret_key_size: 3168,
    ciphertext_size: 1568,
    embedded_public_key_offset: 4 * MLKEM_PKE_SECRET_BYTES_PER_RANK,
};
