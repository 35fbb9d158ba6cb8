//! Basic pattern: static-static Diffie-Hellman
//!
//! No ephemeral key material is involved. A fresh nonce in the message lands
//! in the transcript, so every run derives a different secret from the same
//! static pairs.

use std::sync::Arc;

use kagree_api::{DhPrimitive, Primitive, Result, SessionSecret};
use kagree_params::utils::labels::BASIC_NONCE_SIZE;
use rand_core::CryptoRngCore;

use super::{initiator_message, open, role_ordered, seal, AgreementPattern, Credentials};
use crate::codec::{Field, HandshakeMessage};
use crate::spec::AgreementSpec;

pub struct Basic {
    spec: AgreementSpec,
    dh: Arc<dyn DhPrimitive>,
}

impl Basic {
    pub fn new(spec: AgreementSpec, primitive: &Primitive) -> Result<Self> {
        Ok(Self {
            dh: primitive.as_dh()?.clone(),
            spec,
        })
    }
}

impl AgreementPattern for Basic {
    fn spec(&self) -> &AgreementSpec {
        &self.spec
    }

    fn create_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(HandshakeMessage, SessionSecret)> {
        let (public, private) = credentials.local_pair("Basic::create_initiator_message")?;
        let responder = credentials.peer_public("Basic::create_initiator_message")?;

        let mut nonce = [0u8; BASIC_NONCE_SIZE];
        rng.fill_bytes(&mut nonce);
        let shared = self.dh.compute_shared_value(private, responder)?;

        let message = initiator_message(&self.spec).with_field(Field::Nonce(nonce.to_vec()));
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
        let (public, private) = credentials.local_pair("Basic::accept_initiator_message")?;
        let initiator = credentials.peer_public("Basic::accept_initiator_message")?;
        let shared = self.dh.compute_shared_value(private, initiator)?;
        open(
            &self.spec,
            message,
            vec![shared],
            &role_ordered(initiator, public),
        )
    }
}
