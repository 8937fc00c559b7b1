//! One-shot geolocation on top of the shell's location sensor.
//!
//! The shell streams raw sensor and authorization updates after
//! [`LocationOperation::StartUpdates`]. The core reduces them to a single
//! `Result<Coordinate, LocationError>` and tells the shell to stop sensing as
//! soon as that decision is reached.

use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Coordinate;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    #[default]
    Best,
    NearestTenMeters,
    HundredMeters,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedAlways,
    AuthorizedWhenInUse,
}

impl AuthorizationStatus {
    pub const fn is_refused(self) -> bool {
        matches!(self, Self::Restricted | Self::Denied)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationOperation {
    StartUpdates { accuracy: Accuracy },
    StopUpdates,
}

impl Operation for LocationOperation {
    type Output = LocationUpdate;
}

/// What the shell reports while updates are running.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LocationUpdate {
    /// Location services are switched off for the whole device.
    ServicesDisabled,
    Authorization(AuthorizationStatus),
    /// Fixes in chronological order; the last one is the most recent.
    Positions(Vec<Coordinate>),
    Failed {
        status: AuthorizationStatus,
        cause: Option<String>,
    },
}

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    #[error("location acquisition failed{}", .cause.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    AcquisitionFailed { cause: Option<String> },

    #[error("location permission refused ({0:?})")]
    AppPermissionDenied(AuthorizationStatus),

    #[error("location services are disabled on the device")]
    DeviceLocationDisabled,
}

pub type LocationResult = Result<Coordinate, LocationError>;

impl LocationUpdate {
    /// Reduces one update to a decision, or `None` to keep waiting.
    pub fn resolve(self) -> Option<LocationResult> {
        match self {
            Self::ServicesDisabled => Some(Err(LocationError::DeviceLocationDisabled)),
            Self::Authorization(status) if status.is_refused() => {
                Some(Err(LocationError::AppPermissionDenied(status)))
            }
            // the user may still be answering the permission prompt
            Self::Authorization(_) => None,
            Self::Positions(fixes) => Some(
                fixes
                    .last()
                    .copied()
                    .ok_or(LocationError::AcquisitionFailed { cause: None }),
            ),
            Self::Failed {
                status: AuthorizationStatus::NotDetermined,
                ..
            } => None,
            Self::Failed { cause, .. } => Some(Err(LocationError::AcquisitionFailed { cause })),
        }
    }
}

#[derive(Capability)]
pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Location<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }

    /// Requests the current position. `callback` is invoked exactly once.
    pub fn current_position<F>(&self, accuracy: Accuracy, callback: F)
    where
        F: FnOnce(LocationResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = {
                let mut updates = std::pin::pin!(
                    ctx.stream_from_shell(LocationOperation::StartUpdates { accuracy })
                );
                let mut decision = None;
                while let Some(update) = updates.next().await {
                    tracing::trace!(?update, "location update");
                    if let Some(result) = update.resolve() {
                        decision = Some(result);
                        break;
                    }
                }
                decision.unwrap_or_else(|| {
                    Err(LocationError::AcquisitionFailed {
                        cause: Some("location updates ended without a fix".to_string()),
                    })
                })
            };

            ctx.notify_shell(LocationOperation::StopUpdates).await;
            ctx.update_app(callback(result));
        });
    }
}
