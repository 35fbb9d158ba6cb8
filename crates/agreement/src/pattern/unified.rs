//! Full unified model
//!
//! With U the initiator and V the responder, the shared values are fed to the
//! KDF in the fixed order
//!
//! ```text
//! Z(eU, eV) || Z(sU, sV) || Z(sU, eV) || Z(eU, sV)
//! ```
//!
//! Both sides must follow this order; it is part of the wire contract.

use std::sync::Arc;

use kagree_api::{DhPrimitive, Primitive, PublicKey, Result, SessionSecret};
use rand_core::CryptoRngCore;

use super::{
    field_bytes, halves, initiator_message, open, role_ordered, seal, AgreementPattern,
    Credentials, ResponderEphemeral,
};
use crate::codec::{Field, HandshakeMessage};
use crate::spec::AgreementSpec;

pub struct Unified {
    spec: AgreementSpec,
    dh: Arc<dyn DhPrimitive>,
    ephemeral: ResponderEphemeral,
}

impl Unified {
    pub fn new(spec: AgreementSpec, primitive: &Primitive) -> Result<Self> {
        Ok(Self {
            dh: primitive.as_dh()?.clone(),
            spec,
            ephemeral: ResponderEphemeral::default(),
        })
    }
}

impl AgreementPattern for Unified {
    fn spec(&self) -> &AgreementSpec {
        &self.spec
    }

    fn create_responder_offer(
        &mut self,
        _credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<HandshakeMessage> {
        self.ephemeral.offer(&self.spec, self.dh.as_ref(), rng)
    }

    fn accept_responder_offer(
        &mut self,
        _credentials: &Credentials<'_>,
        offer: &HandshakeMessage,
    ) -> Result<()> {
        self.ephemeral.accept(self.dh.as_ref(), offer)
    }

    fn create_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(HandshakeMessage, SessionSecret)> {
        const CONTEXT: &str = "Unified::create_initiator_message";
        let (s_u_public, s_u) = credentials.local_pair(CONTEXT)?;
        let s_v = credentials.peer_public(CONTEXT)?;
        let e_v = self.ephemeral.take_peer(CONTEXT)?;

        let ephemeral = self.dh.generate(rng)?;
        let (e_u_public, e_u) = halves(&ephemeral, CONTEXT)?;
        let shared = vec![
            self.dh.compute_shared_value(e_u, &e_v)?,
            self.dh.compute_shared_value(s_u, s_v)?,
            self.dh.compute_shared_value(s_u, &e_v)?,
            self.dh.compute_shared_value(e_u, s_v)?,
        ];

        let message = initiator_message(&self.spec)
            .with_field(Field::PublicKey(e_u_public.as_bytes().to_vec()))
            .with_field(Field::PublicKey(e_v.as_bytes().to_vec()));
        seal(&self.spec, message, shared, &role_ordered(s_u_public, s_v))
    }

    fn accept_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        message: &HandshakeMessage,
    ) -> Result<SessionSecret> {
        const CONTEXT: &str = "Unified::accept_initiator_message";
        let (s_v_public, s_v) = credentials.local_pair(CONTEXT)?;
        let s_u = credentials.peer_public(CONTEXT)?;
        let echo = field_bytes(message, 1, CONTEXT)?;
        let ephemeral = self.ephemeral.take_own(echo, CONTEXT)?;
        let (_, e_v) = halves(&ephemeral, CONTEXT)?;
        let e_u = PublicKey::new(self.dh.family(), field_bytes(message, 0, CONTEXT)?);

        let shared = vec![
            self.dh.compute_shared_value(e_v, &e_u)?,
            self.dh.compute_shared_value(s_v, s_u)?,
            self.dh.compute_shared_value(e_v, s_u)?,
            self.dh.compute_shared_value(s_v, &e_u)?,
        ];
        open(&self.spec, message, shared, &role_ordered(s_u, s_v_public))
    }
}
