use crate::workflow::runner::WorkflowResult;
use scancore::session::SessionState;
use scancore::tally::TallyRow;
use scancore::telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Snapshot of a scan session served to the result view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub state: Option<SessionState>,
    pub results: Vec<String>,
    pub hints: Vec<String>,
    pub errors: Vec<String>,
    pub rows: Vec<TallyRow>,
    pub csv: String,
    pub metrics: MetricsSnapshot,
}

impl VisualizationModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        Self {
            state: Some(result.state),
            results: result.results.clone(),
            hints: result.hints.clone(),
            errors: result.errors.clone(),
            rows: result.rows.clone(),
            csv: result.csv.clone(),
            metrics: result.metrics,
        }
    }
}
