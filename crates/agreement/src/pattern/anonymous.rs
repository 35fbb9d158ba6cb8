//! Anonymous pattern: only the responder holds a static key

use std::sync::Arc;

use kagree_api::{
    DhPrimitive, Error, KemPrimitive, Primitive, PrivateKey, PublicKey, Result, SessionSecret,
    SharedSecret,
};
use rand_core::CryptoRngCore;

use super::{field_bytes, halves, initiator_message, open, seal, AgreementPattern, Credentials};
use crate::codec::{Field, HandshakeMessage};
use crate::spec::AgreementSpec;

/// How the initiator reaches the responder's static key: a fresh ephemeral
/// DH key or a KEM encapsulation
#[derive(Clone)]
pub(super) enum Carrier {
    Dh(Arc<dyn DhPrimitive>),
    Kem(Arc<dyn KemPrimitive>),
}

impl Carrier {
    pub(super) fn new(primitive: &Primitive, context: &'static str) -> Result<Self> {
        match primitive {
            Primitive::DiffieHellman(dh) => Ok(Carrier::Dh(dh.clone())),
            Primitive::Kem(kem) => Ok(Carrier::Kem(kem.clone())),
            Primitive::Signature(_) => Err(Error::parameter(
                context,
                format!("{} cannot carry an agreement", primitive.family()),
            )),
        }
    }

    /// Initiator side: the carrier field and the raw shared value
    pub(super) fn initiate(
        &self,
        responder: &PublicKey,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(Field, SharedSecret)> {
        match self {
            Carrier::Dh(dh) => {
                let ephemeral = dh.generate(rng)?;
                let (public, private) = halves(&ephemeral, "Carrier::initiate")?;
                let shared = dh.compute_shared_value(private, responder)?;
                Ok((Field::PublicKey(public.as_bytes().to_vec()), shared))
            }
            Carrier::Kem(kem) => {
                let (encapsulation, shared) = kem.encapsulate(responder, rng)?;
                Ok((Field::Encapsulation(encapsulation), shared))
            }
        }
    }

    /// Responder side: recover the raw shared value from the carrier field
    pub(super) fn accept(&self, responder: &PrivateKey, value: &[u8]) -> Result<SharedSecret> {
        match self {
            Carrier::Dh(dh) => {
                let peer = PublicKey::new(dh.family(), value);
                dh.compute_shared_value(responder, &peer)
            }
            Carrier::Kem(kem) => kem.decapsulate(responder, value),
        }
    }
}

/// Unauthenticated initiator, authenticated responder
pub struct Anonymous {
    spec: AgreementSpec,
    carrier: Carrier,
}

impl Anonymous {
    pub fn new(spec: AgreementSpec, primitive: &Primitive) -> Result<Self> {
        Ok(Self {
            carrier: Carrier::new(primitive, "Anonymous::new")?,
            spec,
        })
    }
}

impl AgreementPattern for Anonymous {
    fn spec(&self) -> &AgreementSpec {
        &self.spec
    }

    fn create_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(HandshakeMessage, SessionSecret)> {
        let responder = credentials.peer_public("Anonymous::create_initiator_message")?;
        let (field, shared) = self.carrier.initiate(responder, rng)?;
        let message = initiator_message(&self.spec).with_field(field);
        seal(&self.spec, message, vec![shared], responder.as_bytes())
    }

    fn accept_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        message: &HandshakeMessage,
    ) -> Result<SessionSecret> {
        let (public, private) = credentials.local_pair("Anonymous::accept_initiator_message")?;
        let value = field_bytes(message, 0, "Anonymous::accept_initiator_message")?;
        let shared = self.carrier.accept(private, value)?;
        open(&self.spec, message, vec![shared], public.as_bytes())
    }
}
