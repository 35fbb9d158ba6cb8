//! MQV pattern
//!
//! Both sides contribute a static and an ephemeral pair. The responder's
//! ephemeral key travels in the offer and comes back as an echo in the
//! initiator message; the raw value comes from the family's MQV rule.

use std::sync::Arc;

use kagree_api::{DhPrimitive, Error, MqvInputs, Primitive, PublicKey, Result, SessionSecret};
use rand_core::CryptoRngCore;

use super::{
    field_bytes, halves, initiator_message, open, role_ordered, seal, AgreementPattern,
    Credentials, ResponderEphemeral,
};
use crate::codec::{Field, HandshakeMessage};
use crate::spec::AgreementSpec;

pub struct Mqv {
    spec: AgreementSpec,
    dh: Arc<dyn DhPrimitive>,
    ephemeral: ResponderEphemeral,
}

impl Mqv {
    pub fn new(spec: AgreementSpec, primitive: &Primitive) -> Result<Self> {
        let dh = primitive.as_dh()?.clone();
        if !dh.supports_mqv() {
            return Err(Error::parameter(
                "Mqv::new",
                format!("{} does not support MQV", dh.family()),
            ));
        }
        Ok(Self {
            spec,
            dh,
            ephemeral: ResponderEphemeral::default(),
        })
    }
}

impl AgreementPattern for Mqv {
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
        const CONTEXT: &str = "Mqv::create_initiator_message";
        let (public, private) = credentials.local_pair(CONTEXT)?;
        let responder = credentials.peer_public(CONTEXT)?;
        let responder_ephemeral = self.ephemeral.take_peer(CONTEXT)?;

        let ephemeral = self.dh.generate(rng)?;
        let (ephemeral_public, ephemeral_private) = halves(&ephemeral, CONTEXT)?;
        let shared = self.dh.mqv_shared_value(MqvInputs {
            static_private: private,
            ephemeral_private,
            ephemeral_public,
            peer_static_public: responder,
            peer_ephemeral_public: &responder_ephemeral,
        })?;

        let message = initiator_message(&self.spec)
            .with_field(Field::PublicKey(ephemeral_public.as_bytes().to_vec()))
            .with_field(Field::PublicKey(responder_ephemeral.as_bytes().to_vec()));
        seal(
            &self.spec,
            message,
            vec![shared],
            &role_ordered(public, responder),
        )
    }

    fn accept_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        message: &HandshakeMessage,
    ) -> Result<SessionSecret> {
        const CONTEXT: &str = "Mqv::accept_initiator_message";
        let (public, private) = credentials.local_pair(CONTEXT)?;
        let initiator = credentials.peer_public(CONTEXT)?;
        let echo = field_bytes(message, 1, CONTEXT)?;
        let ephemeral = self.ephemeral.take_own(echo, CONTEXT)?;
        let (ephemeral_public, ephemeral_private) = halves(&ephemeral, CONTEXT)?;
        let initiator_ephemeral =
            PublicKey::new(self.dh.family(), field_bytes(message, 0, CONTEXT)?);

        let shared = self.dh.mqv_shared_value(MqvInputs {
            static_private: private,
            ephemeral_private,
            ephemeral_public,
            peer_static_public: initiator,
            peer_ephemeral_public: &initiator_ephemeral,
        })?;
        open(
            &self.spec,
            message,
            vec![shared],
            &role_ordered(initiator, public),
        )
    }
}
