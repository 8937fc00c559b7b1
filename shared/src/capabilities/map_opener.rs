use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

/// Asks the shell to show a point in the platform's map application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MapOpenerOperation {
    Open { coordinate: Coordinate, label: String },
}

impl Operation for MapOpenerOperation {
    type Output = ();
}

#[derive(Capability)]
pub struct MapOpener<Ev> {
    context: CapabilityContext<MapOpenerOperation, Ev>,
}

impl<Ev> MapOpener<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<MapOpenerOperation, Ev>) -> Self {
        Self { context }
    }

    /// Fire and forget; the shell does not report back.
    pub fn open(&self, coordinate: Coordinate, label: impl Into<String>) {
        let label = label.into();
        tracing::debug!(%coordinate, label = %label, "opening map");
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(MapOpenerOperation::Open { coordinate, label })
                .await;
        });
    }
}
