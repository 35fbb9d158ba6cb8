//! Signed pattern: Anonymous plus an initiator signature
//!
//! The initiator signs
//!
//! ```text
//! SIGN_LABEL || algorithm_id:u16 || pattern:u8
//!            || len32 || carrier || len32 || responder static public key
//! ```
//!
//! and the responder checks the signature before touching the carrier.

use std::sync::Arc;

use kagree_api::{Error, KeyPair, Primitive, PublicKey, Result, SessionSecret, SignaturePrimitive};
use kagree_internal::endian::{put_len_prefixed, put_u16_be};
use kagree_params::utils::labels::SIGN_LABEL;
use rand_core::CryptoRngCore;
use tracing::warn;

use super::anonymous::Carrier;
use super::{
    field_bytes, initiator_message, open, role_ordered, seal, AgreementPattern, Credentials,
};
use crate::codec::{Field, HandshakeMessage};
use crate::spec::AgreementSpec;

pub struct Signed {
    spec: AgreementSpec,
    carrier: Carrier,
    signer: Arc<dyn SignaturePrimitive>,
}

impl Signed {
    pub fn new(spec: AgreementSpec, primitive: &Primitive, signer: &Primitive) -> Result<Self> {
        Ok(Self {
            carrier: Carrier::new(primitive, "Signed::new")?,
            signer: signer.as_signature()?.clone(),
            spec,
        })
    }

    fn signed_data(&self, carrier: &[u8], responder: &PublicKey) -> Vec<u8> {
        let mut out = Vec::with_capacity(SIGN_LABEL.len() + 11 + carrier.len() + responder.len());
        out.extend_from_slice(SIGN_LABEL);
        put_u16_be(&mut out, self.spec.algorithm_id());
        out.push(self.spec.pattern.kind().code());
        put_len_prefixed(&mut out, carrier);
        put_len_prefixed(&mut out, responder.as_bytes());
        out
    }

    fn signing_public<'k>(
        &self,
        pair: Option<&'k KeyPair>,
        context: &'static str,
    ) -> Result<&'k PublicKey> {
        let public = pair
            .and_then(KeyPair::public_key)
            .ok_or_else(|| Error::parameter(context, "signing key required"))?;
        kagree_api::error::validate::family(context, self.signer.family(), public.family())?;
        Ok(public)
    }
}

impl AgreementPattern for Signed {
    fn spec(&self) -> &AgreementSpec {
        &self.spec
    }

    fn create_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(HandshakeMessage, SessionSecret)> {
        const CONTEXT: &str = "Signed::create_initiator_message";
        let responder = credentials.peer_public(CONTEXT)?;
        let signing_public = self.signing_public(credentials.signing, CONTEXT)?;
        let signing_private = credentials
            .signing
            .and_then(KeyPair::private_key)
            .ok_or_else(|| Error::parameter(CONTEXT, "signing key lacks its private key"))?;

        let (field, shared) = self.carrier.initiate(responder, rng)?;
        let carrier = field.as_bytes().unwrap_or_default();
        let signature = self
            .signer
            .sign(signing_private, &self.signed_data(carrier, responder))?;

        let message = initiator_message(&self.spec)
            .with_field(field)
            .with_field(Field::Signature(signature));
        seal(
            &self.spec,
            message,
            vec![shared],
            &role_ordered(signing_public, responder),
        )
    }

    fn accept_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        message: &HandshakeMessage,
    ) -> Result<SessionSecret> {
        const CONTEXT: &str = "Signed::accept_initiator_message";
        let (public, private) = credentials.local_pair(CONTEXT)?;
        let signing_public = self.signing_public(credentials.peer_signing, CONTEXT)?;
        let carrier = field_bytes(message, 0, CONTEXT)?;
        let signature = field_bytes(message, 1, CONTEXT)?;

        if self
            .signer
            .verify(signing_public, &self.signed_data(carrier, public), signature)
            .is_err()
        {
            warn!(algorithm = self.spec.algorithm_id(), "initiator signature rejected");
            return Err(Error::AuthenticationFailed {
                context: "Signed pattern",
            });
        }

        let shared = self.carrier.accept(private, carrier)?;
        open(
            &self.spec,
            message,
            vec![shared],
            &role_ordered(signing_public, public),
        )
    }
}
