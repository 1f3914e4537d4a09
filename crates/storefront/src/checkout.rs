//! Checkout submission flow.
//!
//! A [`CheckoutFlow`] is one checkout session. It moves
//! `Editing -> Submitting -> Complete`, falling back to `Editing` whenever a
//! submission fails, is cancelled, or its future is dropped before it
//! finishes. `Complete` is terminal; the next checkout is a new flow.
//!
//! There is no order backend. Submission waits a fixed delay standing in for
//! the round trip, then clears the cart and issues a cosmetic reference. The
//! cart is locked for the whole submission, so the confirmation and the
//! cleared cart always agree.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use pbs_core::{
    CheckoutDetails, CheckoutStatus, DetailsError, OrderConfirmation, OrderReference, summarize,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::CartRepository;

/// Simulated round trip used when nothing else is configured.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(800);

/// Upper bound on a submission used when nothing else is configured.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a submission did not produce an order.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A submission is already running for this session.
    #[error("order is already being placed")]
    InProgress,

    /// The session already produced an order.
    #[error("order was already placed")]
    AlreadyComplete,

    /// The form is incomplete or the email is malformed.
    #[error(transparent)]
    InvalidDetails(#[from] DetailsError),

    /// The round trip took longer than allowed.
    #[error("order submission timed out after {0:?}")]
    Timeout(Duration),

    /// The caller gave up before the order was placed.
    #[error("order submission was cancelled")]
    Cancelled,
}

/// State of a checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    #[default]
    Editing,
    Submitting,
    Complete(Box<OrderConfirmation>),
}

impl CheckoutState {
    /// The state without its payload.
    #[must_use]
    pub const fn status(&self) -> CheckoutStatus {
        match self {
            Self::Editing => CheckoutStatus::Editing,
            Self::Submitting => CheckoutStatus::Submitting,
            Self::Complete(_) => CheckoutStatus::Complete,
        }
    }
}

/// Timing of the simulated submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSettings {
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            delay: DEFAULT_SUBMIT_DELAY,
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }
}

/// One checkout session.
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    state: Mutex<CheckoutState>,
    settings: CheckoutSettings,
}

impl CheckoutFlow {
    /// Start a session in `Editing`.
    #[must_use]
    pub fn new(settings: CheckoutSettings) -> Self {
        Self {
            state: Mutex::new(CheckoutState::Editing),
            settings,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> CheckoutStatus {
        self.lock().status()
    }

    /// The placed order, once the session is complete.
    #[must_use]
    pub fn confirmation(&self) -> Option<OrderConfirmation> {
        match &*self.lock() {
            CheckoutState::Complete(confirmation) => Some((**confirmation).clone()),
            _ => None,
        }
    }

    /// Place the order for everything in `cart`.
    ///
    /// Resolves `cancel` against the simulated round trip: if it completes
    /// first the submission is abandoned. On success the cart is cleared and
    /// the session becomes `Complete`. On any failure the cart is left as it
    /// was and the session is back in `Editing`.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::InProgress`] / [`SubmissionError::AlreadyComplete`]
    ///   if the session is not in `Editing` (nothing changes)
    /// - [`SubmissionError::InvalidDetails`] if the form is incomplete
    /// - [`SubmissionError::EmptyCart`] if there is nothing to order
    /// - [`SubmissionError::Timeout`] / [`SubmissionError::Cancelled`]
    #[instrument(skip_all, fields(item_count))]
    pub async fn submit<R, C>(
        &self,
        cart: &R,
        details: CheckoutDetails,
        cancel: C,
    ) -> Result<OrderConfirmation, SubmissionError>
    where
        R: CartRepository + ?Sized,
        C: Future<Output = ()>,
    {
        let (items, email) = {
            let mut state = self.lock();
            match *state {
                CheckoutState::Editing => {}
                CheckoutState::Submitting => return Err(SubmissionError::InProgress),
                CheckoutState::Complete(_) => return Err(SubmissionError::AlreadyComplete),
            }

            let email = details.validate()?;
            let items = cart.lock().map_err(|_| SubmissionError::InProgress)?;
            if items.is_empty() {
                cart.unlock();
                return Err(SubmissionError::EmptyCart);
            }

            *state = CheckoutState::Submitting;
            (items, email)
        };
        tracing::Span::current().record("item_count", items.len());

        let _guard = SubmittingGuard { flow: self, cart };

        let settings = self.settings;
        let round_trip = tokio::time::timeout(settings.timeout, async {
            tokio::select! {
                () = tokio::time::sleep(settings.delay) => Ok(()),
                () = cancel => Err(SubmissionError::Cancelled),
            }
        })
        .await;

        if let Err(e) = round_trip.unwrap_or(Err(SubmissionError::Timeout(settings.timeout))) {
            warn!(error = %e, "Order submission failed");
            return Err(e);
        }

        let confirmation = OrderConfirmation {
            reference: OrderReference::generate(),
            summary: summarize(&items),
            items,
            details,
            email,
            placed_at: Utc::now(),
        };

        {
            let mut state = self.lock();
            cart.clear_and_unlock();
            *state = CheckoutState::Complete(Box::new(confirmation.clone()));
        }

        info!(
            reference = %confirmation.reference,
            total = %confirmation.summary.total,
            "Order placed"
        );
        Ok(confirmation)
    }
}

/// Returns an unfinished submission to `Editing` and unlocks its cart,
/// including when the submitting future is dropped.
struct SubmittingGuard<'a, R: CartRepository + ?Sized> {
    flow: &'a CheckoutFlow,
    cart: &'a R,
}

impl<R: CartRepository + ?Sized> Drop for SubmittingGuard<'_, R> {
    fn drop(&mut self) {
        let mut state = self.flow.lock();
        if matches!(*state, CheckoutState::Submitting) {
            *state = CheckoutState::Editing;
            self.cart.unlock();
        }
    }
}
