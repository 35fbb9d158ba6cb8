//! Composite (hybrid) agreements
//!
//! Runs an ordered list of component agreements side by side and merges their
//! secrets:
//!
//! ```text
//! secret = KDF_outer(secret_1 || ... || secret_N, context(outer transcript))
//! ```
//!
//! where `secret_i` is component i's own derived session secret. Component
//! messages travel as `Nested` fields of one outer message, in list order.

use kagree_api::{Error, Result, SessionSecret, SharedSecret};
use rand_core::CryptoRngCore;

use crate::codec::{Field, HandshakeMessage, MessageType};
use crate::pattern::{initiator_message, open, seal, AgreementPattern, Credentials};
use crate::spec::AgreementSpec;

pub struct Composite {
    spec: AgreementSpec,
    components: Vec<Box<dyn AgreementPattern>>,
}

impl Composite {
    /// Combine component patterns built for `spec`'s components, in order
    pub fn new(spec: AgreementSpec, components: Vec<Box<dyn AgreementPattern>>) -> Result<Self> {
        if components.len() != spec.components().len() {
            return Err(Error::parameter(
                "Composite::new",
                format!(
                    "{} component patterns for {} component specs",
                    components.len(),
                    spec.components().len()
                ),
            ));
        }
        Ok(Self { spec, components })
    }

    fn check_arity(&self, message: &HandshakeMessage) -> Result<()> {
        let received = message.nested().count();
        if received != self.components.len() {
            return Err(Error::mismatch(
                "Composite",
                format!(
                    "composite of {} components, got {received}",
                    self.components.len()
                ),
            ));
        }
        Ok(())
    }
}

impl AgreementPattern for Composite {
    fn spec(&self) -> &AgreementSpec {
        &self.spec
    }

    fn create_responder_offer(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<HandshakeMessage> {
        let mut offer = HandshakeMessage::new(
            MessageType::Offer,
            self.spec.algorithm_id(),
            self.spec.pattern.kind(),
        );
        for (index, component) in self.components.iter_mut().enumerate() {
            let nested = component.create_responder_offer(&credentials.component(index), rng)?;
            offer.push(Field::Nested(nested));
        }
        Ok(offer)
    }

    fn accept_responder_offer(
        &mut self,
        credentials: &Credentials<'_>,
        offer: &HandshakeMessage,
    ) -> Result<()> {
        self.check_arity(offer)?;
        let pairs = self.components.iter_mut().zip(offer.nested());
        for (index, (component, nested)) in pairs.enumerate() {
            component.accept_responder_offer(&credentials.component(index), nested)?;
        }
        Ok(())
    }

    fn create_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        rng: &mut dyn CryptoRngCore,
    ) -> Result<(HandshakeMessage, SessionSecret)> {
        let mut message = initiator_message(&self.spec);
        let mut secrets = Vec::with_capacity(self.components.len());
        for (index, component) in self.components.iter_mut().enumerate() {
            let (nested, secret) =
                component.create_initiator_message(&credentials.component(index), rng)?;
            message.push(Field::Nested(nested));
            secrets.push(SharedSecret::from_slice(secret.expose_secret()));
        }
        seal(&self.spec, message, secrets, &[])
    }

    fn accept_initiator_message(
        &mut self,
        credentials: &Credentials<'_>,
        message: &HandshakeMessage,
    ) -> Result<SessionSecret> {
        self.check_arity(message)?;
        let mut secrets = Vec::with_capacity(self.components.len());
        let pairs = self.components.iter_mut().zip(message.nested());
        for (index, (component, nested)) in pairs.enumerate() {
            let secret =
                component.accept_initiator_message(&credentials.component(index), nested)?;
            secrets.push(SharedSecret::from_slice(secret.expose_secret()));
        }
        open(&self.spec, message, secrets, &[])
    }
}
