//! Projection event publication.
//!
//! The engine publishes a `ProjectionGenerated` event after each successful
//! run through an injected sink; the asynchronous analysis pipeline
//! subscribes on the other side. Emission is fire-and-forget: the engine
//! neither blocks on nor observes the outcome.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::LifeStatus;
use crate::projection::YearResult;

/// Summary fields carried alongside the results for downstream consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMetadata {
    pub name: String,

    /// Annual real rate as a plain number, for prompts and charts only
    pub base_tax: f64,

    /// Status actually used for the run (override or stored value)
    pub status: LifeStatus,
}

/// Event emitted after every successful projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionGenerated {
    pub simulation_id: Uuid,
    pub advisor_id: Uuid,
    pub results: Vec<YearResult>,
    pub metadata: ProjectionMetadata,
}

/// Sink for projection events.
///
/// `publish` must be fast and non-blocking; implementations queue or forward
/// the event, and delivery failures stay on the sink side.
pub trait ProjectionNotifier: Send + Sync {
    fn publish(&self, event: ProjectionGenerated);
}

/// Discards events; for contexts that don't feed the analysis pipeline.
#[derive(Clone, Default)]
pub struct NoOpNotifier;

impl ProjectionNotifier for NoOpNotifier {
    fn publish(&self, _event: ProjectionGenerated) {}
}

/// Collects published events for inspection in tests.
#[derive(Clone, Default)]
pub struct CollectingNotifier {
    events: Arc<Mutex<Vec<ProjectionGenerated>>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProjectionGenerated> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl ProjectionNotifier for CollectingNotifier {
    fn publish(&self, event: ProjectionGenerated) {
        self.events.lock().unwrap().push(event);
    }
}

/// Logs a one-line record per event; stands in for the queue producer in the
/// CLI binaries.
#[derive(Clone, Default)]
pub struct LogNotifier;

impl ProjectionNotifier for LogNotifier {
    fn publish(&self, event: ProjectionGenerated) {
        log::info!(
            "projection generated for simulation {} ({} years, status {})",
            event.simulation_id,
            event.results.len(),
            event.metadata.status.as_str(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> ProjectionGenerated {
        ProjectionGenerated {
            simulation_id: Uuid::new_v4(),
            advisor_id: Uuid::new_v4(),
            results: Vec::new(),
            metadata: ProjectionMetadata {
                name: "Estate plan".to_string(),
                base_tax: 0.04,
                status: LifeStatus::Alive,
            },
        }
    }

    #[test]
    fn test_noop_notifier_does_not_panic() {
        NoOpNotifier.publish(sample_event());
    }

    #[test]
    fn test_collecting_notifier() {
        let notifier = CollectingNotifier::new();
        assert!(notifier.is_empty());

        notifier.publish(sample_event());
        notifier.publish(sample_event());

        assert_eq!(notifier.len(), 2);
        assert_eq!(notifier.events()[0].metadata.name, "Estate plan");
    }

    #[test]
    fn test_event_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample_event()).unwrap();
        assert!(json.get("simulationId").is_some());
        assert!(json.get("advisorId").is_some());
        assert_eq!(json["metadata"]["baseTax"], 0.04);
        assert_eq!(json["metadata"]["status"], "ALIVE");
    }
}
