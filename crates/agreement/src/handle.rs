//! Single-use agreement handle
//!
//! A [`Handle`] binds an agreement spec, the static key material of both
//! sides and a fresh pattern instance for one attempt. The initiator calls
//! [`Handle::create_initiator_message`]; the responder calls
//! [`Handle::accept_initiator_message`]. MQV and Unified additionally need
//! the responder's offer to reach the initiator first.
//!
//! Terminal calls spend the handle whatever their outcome. Retrying means a
//! fresh handle, which also means fresh ephemeral material.

use kagree_api::{Error, KeyPair, Result, SessionSecret};
use rand_core::{CryptoRngCore, OsRng};
use tracing::debug;

use crate::codec::{interpret, parse, MessageType};
use crate::pattern::{AgreementPattern, Credentials};
use crate::registry::Registry;
use crate::spec::AgreementSpec;

/// The initiator's outgoing message and its session secret
#[derive(Debug)]
pub struct Initiation {
    pub message: Vec<u8>,
    pub secret: SessionSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    /// Responder that published an offer
    Offered,
    /// Initiator that took in an offer
    OfferAccepted,
    Spent,
}

/// One agreement attempt
pub struct Handle {
    spec: AgreementSpec,
    pattern: Box<dyn AgreementPattern>,
    local: Option<KeyPair>,
    peer: Option<KeyPair>,
    signing: Option<KeyPair>,
    peer_signing: Option<KeyPair>,
    rng: Box<dyn CryptoRngCore + Send>,
    state: State,
}

/// Start an attempt with the default registry
///
/// `local` is our static key pair and `peer` the other side's static public
/// key. Which of the two are needed depends on the pattern and on our role:
/// an Anonymous initiator needs only `peer`, its responder only `local`.
pub fn negotiate(
    spec: AgreementSpec,
    local: Option<KeyPair>,
    peer: Option<KeyPair>,
) -> Result<Handle> {
    negotiate_with(Registry::global(), spec, local, peer)
}

/// Start an attempt with an explicit registry
pub fn negotiate_with(
    registry: &Registry,
    spec: AgreementSpec,
    local: Option<KeyPair>,
    peer: Option<KeyPair>,
) -> Result<Handle> {
    for (role, pair) in [("local", &local), ("peer", &peer)] {
        if let Some(pair) = pair {
            if pair.spec() != &spec.key_spec {
                return Err(Error::type_mismatch(
                    "negotiate",
                    format!(
                        "{role} key pair is {}, agreement needs {}",
                        pair.spec(),
                        spec.key_spec
                    ),
                ));
            }
        }
    }
    let pattern = registry.pattern_for(&spec)?;
    debug!(agreement = %spec, "negotiated");
    Ok(Handle {
        spec,
        pattern,
        local,
        peer,
        signing: None,
        peer_signing: None,
        rng: Box::new(OsRng),
        state: State::Fresh,
    })
}

impl Handle {
    /// Our signing key pair, for a Signed initiator
    pub fn with_signing_key(mut self, signing: KeyPair) -> Self {
        self.signing = Some(signing);
        self
    }

    /// The initiator's signing public key, for a Signed responder
    pub fn with_peer_signing_key(mut self, peer_signing: KeyPair) -> Self {
        self.peer_signing = Some(peer_signing);
        self
    }

    /// Replace the operating-system RNG, e.g. with a seeded one in tests
    pub fn with_rng(mut self, rng: impl CryptoRngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn spec(&self) -> &AgreementSpec {
        &self.spec
    }

    /// Whether a terminal call has been made
    pub fn is_spent(&self) -> bool {
        self.state == State::Spent
    }

    fn enter(&mut self, allowed: &[State], next: State, operation: &'static str) -> Result<()> {
        if !allowed.contains(&self.state) {
            let reason = if self.state == State::Spent {
                "handle already used"
            } else {
                "call out of order for this handle"
            };
            self.state = State::Spent;
            return Err(Error::parameter(operation, reason));
        }
        self.state = next;
        Ok(())
    }

    /// Responder: publish the offer (empty for patterns without one)
    pub fn create_responder_offer(&mut self) -> Result<Vec<u8>> {
        self.enter(&[State::Fresh], State::Offered, "Handle::create_responder_offer")?;
        let credentials = Credentials {
            local: self.local.as_ref(),
            peer: self.peer.as_ref(),
            signing: self.signing.as_ref(),
            peer_signing: self.peer_signing.as_ref(),
        };
        let offer = self
            .pattern
            .create_responder_offer(&credentials, self.rng.as_mut())
            .map(|offer| offer.encode());
        self.finish_step(offer, "responder offer")
    }

    /// Initiator: take in the responder's offer
    pub fn accept_responder_offer(&mut self, offer: &[u8]) -> Result<()> {
        self.enter(&[State::Fresh], State::OfferAccepted, "Handle::accept_responder_offer")?;
        let credentials = Credentials {
            local: self.local.as_ref(),
            peer: self.peer.as_ref(),
            signing: self.signing.as_ref(),
            peer_signing: self.peer_signing.as_ref(),
        };
        let spec = &self.spec;
        let pattern = &mut self.pattern;
        let outcome = parse(offer)
            .and_then(|raw| interpret(raw, spec, MessageType::Offer))
            .and_then(|typed| pattern.accept_responder_offer(&credentials, &typed));
        self.finish_step(outcome, "offer accepted")
    }

    /// Initiator: build the handshake message and derive the session secret
    pub fn create_initiator_message(&mut self) -> Result<Initiation> {
        self.enter(
            &[State::Fresh, State::OfferAccepted],
            State::Spent,
            "Handle::create_initiator_message",
        )?;
        debug!(agreement = %self.spec, "creating initiator message");
        let credentials = Credentials {
            local: self.local.as_ref(),
            peer: self.peer.as_ref(),
            signing: self.signing.as_ref(),
            peer_signing: self.peer_signing.as_ref(),
        };
        let (message, secret) = self
            .pattern
            .create_initiator_message(&credentials, self.rng.as_mut())?;
        let message = message.encode();
        debug!(agreement = %self.spec, len = message.len(), "initiator message created");
        Ok(Initiation { message, secret })
    }

    /// Responder: consume the initiator's message and derive the session secret
    pub fn accept_initiator_message(&mut self, message: &[u8]) -> Result<SessionSecret> {
        self.enter(
            &[State::Fresh, State::Offered],
            State::Spent,
            "Handle::accept_initiator_message",
        )?;
        debug!(agreement = %self.spec, len = message.len(), "accepting initiator message");
        let credentials = Credentials {
            local: self.local.as_ref(),
            peer: self.peer.as_ref(),
            signing: self.signing.as_ref(),
            peer_signing: self.peer_signing.as_ref(),
        };
        let raw = parse(message)?;
        let message = interpret(raw, &self.spec, MessageType::Initiator)?;
        let secret = self.pattern.accept_initiator_message(&credentials, &message)?;
        debug!(agreement = %self.spec, "initiator message accepted");
        Ok(secret)
    }

    /// Spend the handle when a non-terminal step fails
    fn finish_step<T>(&mut self, outcome: Result<T>, what: &'static str) -> Result<T> {
        match outcome {
            Ok(value) => {
                debug!(agreement = %self.spec, step = what, "handshake step done");
                Ok(value)
            }
            Err(err) => {
                self.state = State::Spent;
                debug!(agreement = %self.spec, kind = ?err.kind(), "attempt aborted");
                Err(err)
            }
        }
    }
}

impl core::fmt::Debug for Handle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handle")
            .field("spec", &self.spec)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
