//! Secret data types with guaranteed zeroization
//!
//! This module provides type-safe wrappers for sensitive data that ensure
//! proper cleanup and zeroization when the data is no longer needed.

use core::fmt;
use core::ops::{Deref, DerefMut};

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fixed-size secret buffer that guarantees zeroization
///
/// Used for key seeds: the buffer is filled from the RNG, handed to the
/// family's key constructor and wiped when it goes out of scope.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBuffer<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> SecretBuffer<N> {
    /// Create a new secret buffer with the given data
    pub fn new(data: [u8; N]) -> Self {
        Self { data }
    }

    /// Create a zeroed secret buffer
    pub fn zeroed() -> Self {
        Self { data: [0u8; N] }
    }

    /// Fill a fresh buffer from a CSPRNG
    pub fn random(rng: &mut dyn CryptoRngCore) -> Self {
        let mut buffer = Self::zeroed();
        rng.fill_bytes(&mut buffer.data);
        buffer
    }

    /// Copy from a slice of exactly `N` bytes
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let data: [u8; N] = slice.try_into().ok()?;
        Some(Self { data })
    }

    /// Get the length of the buffer
    pub fn len(&self) -> usize {
        N
    }

    /// Check if the buffer is empty (always false for non-zero N)
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Get a reference to the inner array
    pub fn as_array(&self) -> &[u8; N] {
        &self.data
    }

    /// Get a reference to the inner data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the inner data
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> AsRef<[u8]> for SecretBuffer<N> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> AsMut<[u8]> for SecretBuffer<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> fmt::Debug for SecretBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer<{}>([REDACTED])", N)
    }
}

/// Variable-size secret vector that guarantees zeroization
///
/// Growth goes through [`SecretVec::extend_from_slice`], which reserves up
/// front when it can so the old allocation is not left behind unwiped.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretVec {
    data: Vec<u8>,
}

impl SecretVec {
    /// Create a new secret vector with the given data
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Create a secret vector from a slice
    pub fn from_slice(slice: &[u8]) -> Self {
        Self {
            data: slice.to_vec(),
        }
    }

    /// Create an empty secret vector
    pub fn empty() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a secret vector with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Concatenate secret parts in order into one buffer
    pub fn concat<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let parts: Vec<S> = parts.into_iter().collect();
        let total = parts.iter().map(|p| p.as_ref().len()).sum();
        let mut out = Self::with_capacity(total);
        for part in &parts {
            out.data.extend_from_slice(part.as_ref());
        }
        out
    }

    /// Get the length of the vector
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the vector is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a reference to the inner data
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get a mutable reference to the inner data
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Extend the vector with additional data
    pub fn extend_from_slice(&mut self, slice: &[u8]) {
        if self.data.capacity() - self.data.len() < slice.len() {
            let mut grown = Vec::with_capacity(self.data.len() + slice.len());
            grown.extend_from_slice(&self.data);
            self.data.zeroize();
            self.data = grown;
        }
        self.data.extend_from_slice(slice);
    }

    /// Split off the first `at` bytes into a new secret vector
    pub fn split_front(&mut self, at: usize) -> Option<SecretVec> {
        if at > self.data.len() {
            return None;
        }
        let front = SecretVec::from_slice(&self.data[..at]);
        let rest = self.data[at..].to_vec();
        self.data.zeroize();
        self.data = rest;
        Some(front)
    }
}

impl AsRef<[u8]> for SecretVec {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl AsMut<[u8]> for SecretVec {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl From<Vec<u8>> for SecretVec {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for SecretVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretVec(len={}, [REDACTED])", self.data.len())
    }
}

/// Guard type that ensures a value is zeroized when dropped
///
/// Covers early returns through `?` as well as the normal path.
pub struct ZeroizeGuard<'a, T: Zeroize> {
    value: &'a mut T,
}

impl<'a, T: Zeroize> ZeroizeGuard<'a, T> {
    /// Create a new zeroize guard for the given value
    pub fn new(value: &'a mut T) -> Self {
        Self { value }
    }
}

impl<T: Zeroize> Drop for ZeroizeGuard<'_, T> {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl<T: Zeroize> Deref for ZeroizeGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value
    }
}

impl<T: Zeroize> DerefMut for ZeroizeGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_secret_buffer_random_is_seeded() {
        let mut a = ChaCha20Rng::seed_from_u64(7);
        let mut b = ChaCha20Rng::seed_from_u64(7);
        let x = SecretBuffer::<32>::random(&mut a);
        let y = SecretBuffer::<32>::random(&mut b);
        assert_eq!(x.as_slice(), y.as_slice());
        assert_ne!(x.as_slice(), &[0u8; 32]);
    }

    #[test]
    fn test_secret_buffer_from_slice() {
        assert!(SecretBuffer::<4>::from_slice(&[1, 2, 3]).is_none());
        let buffer = SecretBuffer::<4>::from_slice(&[1, 2, 3, 4]).unwrap();
        assert_eq!(buffer.as_array(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_secret_vec_concat() {
        let joined = SecretVec::concat([&[1u8, 2][..], &[][..], &[3u8][..]]);
        assert_eq!(joined.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_secret_vec_extend_and_split() {
        let mut vec = SecretVec::from_slice(&[1, 2, 3, 4]);
        vec.extend_from_slice(&[5, 6]);
        assert_eq!(vec.as_slice(), &[1, 2, 3, 4, 5, 6]);

        let front = vec.split_front(2).unwrap();
        assert_eq!(front.as_slice(), &[1, 2]);
        assert_eq!(vec.as_slice(), &[3, 4, 5, 6]);
        assert!(vec.split_front(5).is_none());
    }

    #[test]
    fn test_zeroize_guard() {
        let mut value = vec![1u8, 2, 3, 4];
        {
            let mut guard = ZeroizeGuard::new(&mut value);
            guard[0] = 9;
        }
        assert!(value.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_debug_is_redacted() {
        let vec = SecretVec::from_slice(&[0xAA; 8]);
        assert_eq!(format!("{vec:?}"), "SecretVec(len=8, [REDACTED])");
    }
}
