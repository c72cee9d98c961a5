//! Form state and submission pipeline for the remote cell-type prediction service.
//!
//! [`SubmissionController`] owns the raw field values of one form session and
//! the lifecycle of its submissions. Values are converted permissively into a
//! [`MeasurementVector`](shared::protocol::MeasurementVector), posted through a
//! [`PredictionTransport`], and every failure is reduced to a
//! [`SubmissionError`] whose `Display` text is safe to show to the user.

use std::sync::Arc;

use anyhow::Result;
use shared::{
    domain::{DefaultFill, Field},
    protocol::PredictionLabel,
};
use tokio::{runtime::Handle, sync::Mutex};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;
pub mod form;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use error::SubmissionError;
pub use form::{parse_measurement, FieldSet};
pub use transport::{HttpTransport, PredictionTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(PredictionLabel),
    Failed(SubmissionError),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn label(&self) -> Option<&PredictionLabel> {
        match self {
            Self::Succeeded(label) => Some(label),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Failed(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

struct FormState {
    fields: FieldSet,
    submission: SubmissionState,
}

pub struct SubmissionController {
    transport: Arc<dyn PredictionTransport>,
    inner: Arc<Mutex<FormState>>,
}

/// Returns the controller to `Idle` if a `submit` future is dropped before it
/// records an outcome.
struct InFlight {
    state: Arc<Mutex<FormState>>,
    settled: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        fn reset(form: &mut FormState) {
            if form.submission.is_submitting() {
                form.submission = SubmissionState::Idle;
            }
        }

        debug!("submission abandoned before completion; returning to idle");
        match self.state.try_lock() {
            Ok(mut guard) => reset(&mut guard),
            Err(_) => {
                // Only this submission can leave `Submitting`, so a deferred reset is safe.
                if let Ok(handle) = Handle::try_current() {
                    let state = self.state.clone();
                    handle.spawn(async move { reset(&mut *state.lock().await) });
                }
            }
        }
    }
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn PredictionTransport>, fill: DefaultFill) -> Arc<Self> {
        Arc::new(Self {
            transport,
            inner: Arc::new(Mutex::new(FormState {
                fields: FieldSet::new(fill),
                submission: SubmissionState::Idle,
            })),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Arc<Self>> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::new(Arc::new(transport), settings.default_fill))
    }

    pub fn endpoint(&self) -> &Url {
        self.transport.endpoint()
    }

    /// Replaces one raw value. Any displayed error is cleared; no validation happens here.
    pub async fn set_field(&self, field: Field, raw: impl Into<String>) {
        let raw = raw.into();
        let mut guard = self.inner.lock().await;
        guard.fields.set(field, raw);
        if matches!(guard.submission, SubmissionState::Failed(_)) {
            guard.submission = SubmissionState::Idle;
        }
    }

    pub async fn field_value(&self, field: Field) -> String {
        self.inner.lock().await.fields.get(field).to_string()
    }

    pub async fn fields(&self) -> FieldSet {
        self.inner.lock().await.fields.clone()
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.submission.clone()
    }

    /// Sends the current values once and records the outcome.
    ///
    /// Returns the state after the attempt. While another submission is in
    /// flight this is a no-op that returns [`SubmissionState::Submitting`].
    /// Dropping the returned future mid-flight leaves the controller `Idle`.
    pub async fn submit(&self) -> SubmissionState {
        let snapshot = {
            let mut guard = self.inner.lock().await;
            if guard.submission.is_submitting() {
                debug!("submission already in flight; ignoring submit");
                return SubmissionState::Submitting;
            }
            guard.submission = SubmissionState::Submitting;
            guard.fields.clone()
        };
        let mut in_flight = InFlight {
            state: self.inner.clone(),
            settled: false,
        };

        let vector = snapshot.to_measurement_vector();
        let endpoint = self.transport.endpoint();
        info!(%endpoint, "submitting measurements for prediction");

        let outcome = match self.transport.predict(&vector).await {
            Ok(response) => {
                let label = PredictionLabel::from(response);
                info!(%label, "prediction received");
                SubmissionState::Succeeded(label)
            }
            Err(err) => {
                let classified = SubmissionError::classify(&err, endpoint);
                warn!(
                    kind = classified.kind(),
                    error = %err,
                    %endpoint,
                    "prediction request failed"
                );
                SubmissionState::Failed(classified)
            }
        };

        let mut guard = self.inner.lock().await;
        guard.submission = outcome.clone();
        in_flight.settled = true;
        outcome
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
