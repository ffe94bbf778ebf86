//! Handshake with the embedded backup partner.
//!
//! # States
//!
//! ```text
//! Disconnected --mount--> Connecting --READY--> Ready <--> Exporting
//!                             |
//!                             +--timeout--> TimedOut --mount--> Connecting
//! ```
//!
//! Every inbound message is checked against the partner origin before it is
//! parsed; anything from another origin is dropped without a transition.

mod messages;

pub use messages::{BackupInitPayload, BackupSnapshot, InboundMessage, OutboundMessage, RestorePayload};

use std::time::Duration;

use chrono::Utc;
use ecofeira_core::UserProfile;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::{Origin, Url};

use crate::config::BackupConfig;

/// Errors raised by the backup bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The backup view needs a signed-in user.
    #[error("sign in to use backup")]
    NotSignedIn,

    /// A partner message could not be decoded.
    #[error("malformed partner message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// The event is not valid in the current state.
    #[error("{event} is not valid while {state}")]
    InvalidState {
        state: &'static str,
        event: &'static str,
    },

    /// The outbound message could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Where the bridge is in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Disconnected,
    Connecting { since: Instant },
    Ready,
    Exporting,
    TimedOut,
}

impl BridgeState {
    /// Short label for logs and the UI.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting { .. } => "connecting",
            Self::Ready => "ready",
            Self::Exporting => "exporting",
            Self::TimedOut => "timed out",
        }
    }
}

/// What the caller should do after a message was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// Nothing happened (foreign origin or a message with no effect).
    Ignored,
    /// Local data was sent to the partner.
    Exported,
    /// Overwrite local slots with this payload.
    Restore(RestorePayload),
}

/// Delivers outbound messages to the partner frame.
pub trait BackupTransport {
    /// Post `message` to the frame, restricted to `target_origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is gone or rejects the message.
    fn post_message(&self, target_origin: &str, message: &OutboundMessage)
    -> Result<(), BridgeError>;
}

/// Transport that forwards messages to an in-process receiver.
///
/// Used when the partner is driven from the same process, such as in tests
/// or a desktop shell hosting the frame.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<(String, OutboundMessage)>,
}

impl ChannelTransport {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(String, OutboundMessage)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl BackupTransport for ChannelTransport {
    fn post_message(
        &self,
        target_origin: &str,
        message: &OutboundMessage,
    ) -> Result<(), BridgeError> {
        self.tx
            .send((target_origin.to_owned(), message.clone()))
            .map_err(|_| BridgeError::Transport("partner frame closed".to_owned()))
    }
}

/// The handshake state machine.
#[derive(Debug, Clone)]
pub struct BackupBridge {
    partner_url: Url,
    partner: Origin,
    handshake_timeout: Duration,
    state: BridgeState,
    user: Option<UserProfile>,
}

impl BackupBridge {
    #[must_use]
    pub fn new(config: &BackupConfig) -> Self {
        Self {
            partner: config.partner_origin.origin(),
            partner_url: config.partner_origin.clone(),
            handshake_timeout: config.handshake_timeout,
            state: BridgeState::Disconnected,
            user: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> BridgeState {
        self.state
    }

    /// URL the partner frame should load.
    #[must_use]
    pub const fn partner_url(&self) -> &Url {
        &self.partner_url
    }

    /// Partner origin as sent with outbound messages.
    #[must_use]
    pub fn partner_origin(&self) -> String {
        self.partner.ascii_serialization()
    }

    /// The backup view was opened.
    ///
    /// # Errors
    ///
    /// Returns `NotSignedIn` without a user, or `InvalidState` if the bridge
    /// is already mounted.
    pub fn mount(&mut self, user: Option<&UserProfile>, now: Instant) -> Result<(), BridgeError> {
        let user = user.ok_or(BridgeError::NotSignedIn)?;
        if !matches!(self.state, BridgeState::Disconnected | BridgeState::TimedOut) {
            return Err(self.invalid("mount"));
        }

        info!(partner = %self.partner_origin(), "Connecting to backup partner");
        self.user = Some(user.clone());
        self.state = BridgeState::Connecting { since: now };
        Ok(())
    }

    /// The backup view was closed.
    pub fn unmount(&mut self) {
        if self.state != BridgeState::Disconnected {
            debug!(from = self.state.label(), "Backup bridge disconnected");
        }
        self.state = BridgeState::Disconnected;
        self.user = None;
    }

    /// Give up on a partner that never said `READY`. Returns whether the
    /// bridge just timed out.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        let BridgeState::Connecting { since } = self.state else {
            return false;
        };
        if now.saturating_duration_since(since) < self.handshake_timeout {
            return false;
        }

        warn!(
            timeout_secs = self.handshake_timeout.as_secs(),
            "Backup partner did not respond"
        );
        self.state = BridgeState::TimedOut;
        true
    }

    /// When a pending handshake gives up, if one is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            BridgeState::Connecting { since } => Some(since + self.handshake_timeout),
            _ => None,
        }
    }

    /// Handle one message received from the embedded frame.
    ///
    /// # Errors
    ///
    /// Returns an error for undecodable partner messages, messages that do
    /// not fit the current state, or a failed export. Foreign origins are
    /// never an error.
    pub fn handle_message(
        &mut self,
        origin: &str,
        body: &str,
        snapshot: &BackupSnapshot,
        transport: &impl BackupTransport,
    ) -> Result<BridgeEvent, BridgeError> {
        if !self.is_partner(origin) {
            debug!(origin = %origin, "Dropping message from foreign origin");
            return Ok(BridgeEvent::Ignored);
        }

        match serde_json::from_str::<InboundMessage>(body)? {
            InboundMessage::Ready => self.on_ready(snapshot, transport),
            InboundMessage::RestoreData { payload } => {
                if self.state != BridgeState::Ready {
                    return Err(self.invalid("RESTORE_DATA"));
                }
                info!(
                    favorites = payload.favorites.as_ref().map(Vec::len),
                    list_items = payload.shopping_list.as_ref().map(Vec::len),
                    "Restoring backup"
                );
                Ok(BridgeEvent::Restore(payload))
            }
        }
    }

    fn on_ready(
        &mut self,
        snapshot: &BackupSnapshot,
        transport: &impl BackupTransport,
    ) -> Result<BridgeEvent, BridgeError> {
        match self.state {
            BridgeState::Connecting { .. } => {}
            BridgeState::TimedOut => {
                debug!("Ignoring READY after handshake timeout");
                return Ok(BridgeEvent::Ignored);
            }
            _ => return Err(self.invalid("READY")),
        }
        let Some(user) = self.user.clone() else {
            return Err(BridgeError::NotSignedIn);
        };

        self.state = BridgeState::Ready;
        let message = OutboundMessage::BackupInit(BackupInitPayload {
            user,
            timestamp: Utc::now(),
            favorites: snapshot.favorites.clone(),
            shopping_list: snapshot.shopping_list.clone(),
        });

        self.state = BridgeState::Exporting;
        let result = transport.post_message(&self.partner_origin(), &message);
        self.state = BridgeState::Ready;
        result?;

        info!(
            favorites = snapshot.favorites.len(),
            list_items = snapshot.shopping_list.len(),
            "Sent backup context to partner"
        );
        Ok(BridgeEvent::Exported)
    }

    fn is_partner(&self, origin: &str) -> bool {
        Url::parse(origin).is_ok_and(|url| url.origin() == self.partner)
    }

    const fn invalid(&self, event: &'static str) -> BridgeError {
        BridgeError::InvalidState {
            state: self.state.label(),
            event,
        }
    }
}
