//! Consent UI capability.
//!
//! The session never renders anything itself. It hands an [`AuthorizationRequest`]
//! to a [`ConsentUi`] and consumes the navigation events the UI reports back.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use super::AuthorizationRequest;
use crate::error::Error;

/// Something that happened in the consent UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentEvent {
    /// The UI is about to load this URL.
    Navigated(String),
    /// The user dismissed the UI.
    Cancelled,
}

/// Browser-like surface showing the consent page.
#[async_trait]
pub trait ConsentUi: Send + Sync {
    /// Show the consent page.
    async fn open(&self, request: &AuthorizationRequest) -> Result<(), Error>;

    /// Wait for the next navigation or cancellation.
    async fn next_event(&self) -> ConsentEvent;

    /// Called once the flow reached a terminal state.
    async fn dismiss(&self) {}
}

/// Consent UI driven through a channel, for headless front ends and tests.
pub struct ChannelConsent {
    events: AsyncMutex<mpsc::UnboundedReceiver<ConsentEvent>>,
    shared: Arc<Shared>,
}

/// Feeds events into a [`ChannelConsent`] and observes what it was asked to show.
#[derive(Clone)]
pub struct ConsentHandle {
    sender: mpsc::UnboundedSender<ConsentEvent>,
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    presented: Mutex<Option<AuthorizationRequest>>,
    dismissed: Mutex<bool>,
}

impl ChannelConsent {
    pub fn new() -> (Self, ConsentHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::default());
        (
            Self {
                events: AsyncMutex::new(receiver),
                shared: shared.clone(),
            },
            ConsentHandle { sender, shared },
        )
    }
}

#[async_trait]
impl ConsentUi for ChannelConsent {
    async fn open(&self, request: &AuthorizationRequest) -> Result<(), Error> {
        *self
            .shared
            .presented
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());
        Ok(())
    }

    async fn next_event(&self) -> ConsentEvent {
        // A dropped handle means nobody can finish the flow.
        self.events
            .lock()
            .await
            .recv()
            .await
            .unwrap_or(ConsentEvent::Cancelled)
    }

    async fn dismiss(&self) {
        *self
            .shared
            .dismissed
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }
}

impl ConsentHandle {
    /// Report a navigation. Returns false once the consent UI is gone.
    pub fn navigate(&self, url: impl Into<String>) -> bool {
        self.sender.send(ConsentEvent::Navigated(url.into())).is_ok()
    }

    /// Report that the user closed the consent UI.
    pub fn cancel(&self) -> bool {
        self.sender.send(ConsentEvent::Cancelled).is_ok()
    }

    /// The request the consent UI was opened with, if any.
    pub fn presented(&self) -> Option<AuthorizationRequest> {
        self.shared
            .presented
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_dismissed(&self) -> bool {
        *self
            .shared
            .dismissed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
