//! Secret derivation
//!
//! Every pattern feeds its raw shared values, in a fixed order, through one
//! pipeline:
//!
//! ```text
//! context = KDF_LABEL || algorithm_id:u16 || pattern:u8
//!           || len32 || transcript || len32 || party_info || len32 || info
//! session = KDF(Z_1 || ... || Z_n, context, output_len)
//! confirm = KDF(Z_1 || ... || Z_n, CONFIRM_LABEL || context, 32)
//! ```
//!
//! The confirmation key is only derived when confirmation is enabled. It never
//! shares output bytes with the session secret.

use kagree_api::{Result, SessionSecret, SharedSecret};
use kagree_common::SecretVec;
use kagree_internal::endian::{put_len_prefixed, put_u16_be};
use kagree_params::utils::labels::{
    CONFIRMATION_KEY_SIZE, CONFIRMATION_TAG_SIZE, CONFIRM_LABEL, KDF_LABEL,
};
use kagree_symmetric::{confirmation_tag, kdf_for, verify_confirmation_tag};
use zeroize::Zeroizing;

use crate::spec::{KdfSpec, PatternKind};

/// Build the derivation context
pub fn context(
    algorithm_id: u16,
    pattern: PatternKind,
    transcript: &[u8],
    party_info: &[u8],
    info: &[u8],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        KDF_LABEL.len() + 3 + 12 + transcript.len() + party_info.len() + info.len(),
    );
    out.extend_from_slice(KDF_LABEL);
    put_u16_be(&mut out, algorithm_id);
    out.push(pattern.code());
    put_len_prefixed(&mut out, transcript);
    put_len_prefixed(&mut out, party_info);
    put_len_prefixed(&mut out, info);
    out
}

/// Output of one derivation
pub struct DerivedKeys {
    session: SessionSecret,
    confirmation_key: Option<Zeroizing<Vec<u8>>>,
}

impl DerivedKeys {
    /// Tag over `transcript`, when confirmation is enabled
    pub fn confirmation_tag(
        &self,
        transcript: &[u8],
    ) -> Result<Option<[u8; CONFIRMATION_TAG_SIZE]>> {
        self.confirmation_key
            .as_ref()
            .map(|key| confirmation_tag(key, transcript))
            .transpose()
    }

    /// Check a received tag; a no-op when confirmation is disabled
    pub fn verify_confirmation(&self, transcript: &[u8], tag: &[u8]) -> Result<()> {
        match &self.confirmation_key {
            Some(key) => verify_confirmation_tag(key, transcript, tag),
            None => Ok(()),
        }
    }

    pub fn has_confirmation(&self) -> bool {
        self.confirmation_key.is_some()
    }

    pub fn into_session(self) -> SessionSecret {
        self.session
    }
}

/// Derive the session secret and confirmation key from ordered shared values
///
/// The shared values are consumed; they and their concatenation are zeroized
/// whether or not derivation succeeds.
pub fn derive(kdf: &KdfSpec, shared: Vec<SharedSecret>, context: &[u8]) -> Result<DerivedKeys> {
    let secret = SecretVec::concat(shared.iter().map(SharedSecret::expose_secret));
    drop(shared);

    let function = kdf_for(kdf.algorithm);
    let session = function.derive(secret.as_slice(), context, kdf.session_len())?;

    let confirmation_key = if kdf.confirmation {
        let mut confirm_context = Vec::with_capacity(CONFIRM_LABEL.len() + context.len());
        confirm_context.extend_from_slice(CONFIRM_LABEL);
        confirm_context.extend_from_slice(context);
        Some(function.derive(secret.as_slice(), &confirm_context, CONFIRMATION_KEY_SIZE)?)
    } else {
        None
    };

    Ok(DerivedKeys {
        session: SessionSecret::new(session.to_vec()),
        confirmation_key,
    })
}
