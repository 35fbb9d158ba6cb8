//! Handshake pattern state machines
//!
//! A pattern instance serves exactly one attempt and owns whatever ephemeral
//! key material that attempt needs; dropping it zeroizes that material.
//!
//! | Pattern   | initiator message                      | responder offer |
//! |-----------|----------------------------------------|-----------------|
//! | Anonymous | `PublicKey` (DH) or `Encapsulation`     | empty           |
//! | Basic     | `Nonce`                                | empty           |
//! | Signed    | carrier as Anonymous, then `Signature` | empty           |
//! | MQV       | `PublicKey` (ours), `PublicKey` (echo) | `PublicKey`     |
//! | Unified   | `PublicKey` (ours), `PublicKey` (echo) | `PublicKey`     |
//!
//! A `ConfirmationTag` follows the initiator fields when the KDF spec asks
//! for key confirmation.

mod anonymous;
mod basic;
mod mqv;
mod signed;
mod unified;

pub use self::anonymous::Anonymous;
pub use self::basic::Basic;
pub use self::mqv::Mqv;
pub use self::signed::Signed;
pub use self::unified::Unified;

use kagree_api::{
    DhPrimitive, Error, KeyPair, PrivateKey, PublicKey, Result, SessionSecret, SharedSecret,
};
use kagree_internal::ct_eq;
use kagree_internal::endian::put_len_prefixed;
use rand_core::CryptoRngCore;
use tracing::warn;

use crate::codec::{Field, HandshakeMessage, MessageType};
use crate::derive;
use crate::spec::AgreementSpec;

/// Key material available to one side of an attempt
///
/// `local` is our static key pair, `peer` the other side's static public key.
/// The signing pairs are only consulted by the Signed pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Credentials<'a> {
    pub local: Option<&'a KeyPair>,
    pub peer: Option<&'a KeyPair>,
    pub signing: Option<&'a KeyPair>,
    pub peer_signing: Option<&'a KeyPair>,
}

impl<'a> Credentials<'a> {
    /// Credentials of composite component `index`
    ///
    /// Static pairs are split by position; signing pairs are shared.
    pub fn component(&self, index: usize) -> Credentials<'a> {
        Credentials {
            local: self.local.and_then(|k| k.parts().get(index)),
            peer: self.peer.and_then(|k| k.parts().get(index)),
            signing: self.signing,
            peer_signing: self.peer_signing,
        }
    }

    /// Our static public and private key
    pub(crate) fn local_pair(
        &self,
        context: &'static str,
    ) -> Result<(&'a PublicKey, &'a PrivateKey)> {
        let pair = self
            .local
            .ok_or_else(|| Error::parameter(context, "local static key pair required"))?;
        match (pair.public_key(), pair.private_key()) {
            (Some(public), Some(private)) => Ok((public, private)),
            _ => Err(Error::parameter(
                context,
                "local static key pair lacks its private key",
            )),
        }
    }

    /// The peer's static public key
    pub(crate) fn peer_public(&self, context: &'static str) -> Result<&'a PublicKey> {
        self.peer
            .and_then(KeyPair::public_key)
            .ok_or_else(|| Error::parameter(context, "peer static public key required"))
    }
}

/// One side of one agreement attempt
pub trait AgreementPattern: Send {
    fn spec(&self) -> &AgreementSpec;

    /// Responder pre-message; empty unless the pattern needs a responder
    /// ephemeral key
    fn create_responder_offer(
        &mut self,
        _credentials: &Credentials<'_>,
        _rng: &mut dyn CryptoRngCore,
    ) -> Result<HandshakeMessage> {
        let spec = self.spec();
        Ok(HandshakeMessage::new(
            MessageType::Offer,
            spec.algorithm_id(),
            spec.pattern.kind(),
        ))
    }

    /// Take in the responder's offer; the codec has already checked its shape
    fn accept_responder_offer(
        &mut self,
        _credentials: &Credentials<'_>,
        _offer: &HandshakeMessage,
    ) -> Result<()> {
        Ok(())
    }

    /// Build the initiator message and derive our session secret
    fn create_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(HandshakeMessage, SessionSecret)>;

    /// Consume the initiator message and derive our session secret
    fn accept_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        message: &HandshakeMessage,
    ) -> Result<SessionSecret>;
}

/// Empty initiator message for `spec`, ready for its fields
pub(crate) fn initiator_message(spec: &AgreementSpec) -> HandshakeMessage {
    HandshakeMessage::new(
        MessageType::Initiator,
        spec.algorithm_id(),
        spec.pattern.kind(),
    )
}

/// Derive the initiator's secret and append the confirmation tag
pub(crate) fn seal(
    spec: &AgreementSpec,
    mut message: HandshakeMessage,
    shared: Vec<SharedSecret>,
    party_info: &[u8],
) -> Result<(HandshakeMessage, SessionSecret)> {
    let transcript = message.transcript();
    let context = derive::context(
        spec.algorithm_id(),
        spec.pattern.kind(),
        &transcript,
        party_info,
        &spec.kdf.info,
    );
    let keys = derive::derive(&spec.kdf, shared, &context)?;
    if let Some(tag) = keys.confirmation_tag(&transcript)? {
        message.push(Field::ConfirmationTag(tag.to_vec()));
    }
    Ok((message, keys.into_session()))
}

/// Derive the responder's secret and check the confirmation tag
pub(crate) fn open(
    spec: &AgreementSpec,
    message: &HandshakeMessage,
    shared: Vec<SharedSecret>,
    party_info: &[u8],
) -> Result<SessionSecret> {
    let transcript = message.transcript();
    let context = derive::context(
        spec.algorithm_id(),
        spec.pattern.kind(),
        &transcript,
        party_info,
        &spec.kdf.info,
    );
    let keys = derive::derive(&spec.kdf, shared, &context)?;
    if keys.has_confirmation() {
        let tag = message.confirmation_tag().ok_or_else(|| {
            Error::malformed("pattern::open", "missing confirmation tag")
        })?;
        if let Err(err) = keys.verify_confirmation(&transcript, tag) {
            warn!(pattern = %spec.pattern.kind(), "key confirmation failed");
            return Err(err);
        }
    }
    Ok(keys.into_session())
}

/// Initiator static public key followed by responder static public key
pub(crate) fn role_ordered(initiator: &PublicKey, responder: &PublicKey) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + initiator.len() + responder.len());
    put_len_prefixed(&mut out, initiator.as_bytes());
    put_len_prefixed(&mut out, responder.as_bytes());
    out
}

/// Byte value of the field at `index`
pub(crate) fn field_bytes<'m>(
    message: &'m HandshakeMessage,
    index: usize,
    context: &'static str,
) -> Result<&'m [u8]> {
    message
        .fields()
        .get(index)
        .and_then(Field::as_bytes)
        .ok_or_else(|| Error::malformed(context, format!("missing field {index}")))
}

/// Responder ephemeral key pair published through the offer
///
/// Shared by MQV and Unified: the responder mints it, the initiator echoes it
/// and the responder checks the echo before any agreement math.
#[derive(Default)]
pub(crate) struct ResponderEphemeral {
    /// Responder side: our ephemeral pair
    own: Option<KeyPair>,
    /// Initiator side: the responder's ephemeral public key
    peer: Option<PublicKey>,
}

impl ResponderEphemeral {
    pub(crate) fn offer(
        &mut self,
        spec: &AgreementSpec,
        dh: &dyn DhPrimitive,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<HandshakeMessage> {
        let pair = dh.generate(rng)?;
        let public = pair
            .public_key()
            .ok_or_else(|| Error::computation("ResponderEphemeral::offer", "no public key"))?
            .as_bytes()
            .to_vec();
        self.own = Some(pair);
        Ok(HandshakeMessage::new(
            MessageType::Offer,
            spec.algorithm_id(),
            spec.pattern.kind(),
        )
        .with_field(Field::PublicKey(public)))
    }

    pub(crate) fn accept(&mut self, dh: &dyn DhPrimitive, offer: &HandshakeMessage) -> Result<()> {
        let bytes = field_bytes(offer, 0, "ResponderEphemeral::accept")?;
        let public = PublicKey::new(dh.family(), bytes);
        dh.validate_public(&public)?;
        self.peer = Some(public);
        Ok(())
    }

    /// Initiator side: the accepted responder ephemeral key
    pub(crate) fn take_peer(&mut self, context: &'static str) -> Result<PublicKey> {
        self.peer
            .take()
            .ok_or_else(|| Error::parameter(context, "responder offer has not been accepted"))
    }

    /// Responder side: our ephemeral pair, after checking the initiator's echo
    pub(crate) fn take_own(&mut self, echo: &[u8], context: &'static str) -> Result<KeyPair> {
        let pair = self
            .own
            .take()
            .ok_or_else(|| Error::parameter(context, "no responder offer was created"))?;
        let matches = pair
            .public_key()
            .map(|public| ct_eq(public.as_bytes(), echo))
            .unwrap_or(false);
        if !matches {
            return Err(Error::mismatch(
                context,
                "initiator answered a different responder offer",
            ));
        }
        Ok(pair)
    }
}

/// Public and private halves of a freshly generated pair
pub(crate) fn halves<'k>(
    pair: &'k KeyPair,
    context: &'static str,
) -> Result<(&'k PublicKey, &'k PrivateKey)> {
    match (pair.public_key(), pair.private_key()) {
        (Some(public), Some(private)) => Ok((public, private)),
        _ => Err(Error::computation(context, "generated key pair is incomplete")),
    }
}

#[cfg(test)]
mod tests;
