//! Run export
//!
//! Serializes a finished run (config, daily states, counters) to JSON for
//! external consumers. Writing the string anywhere is the caller's job.

use crate::error::SimulationError;
use crate::metrics::RunMetrics;
use crate::state::MarketState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::config::MarketConfig;
use types::ids::RunId;

/// Combined export containing all simulation outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub config: MarketConfig,
    pub states: Vec<MarketState>,
    pub metrics: RunMetrics,
}

pub fn build_export(config: &MarketConfig, states: &[MarketState], metrics: &RunMetrics) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        run_id: RunId::new(),
        generated_at: Utc::now(),
        config: config.clone(),
        states: states.to_vec(),
        metrics: metrics.clone(),
    }
}

/// Pretty-printed JSON.
pub fn export_json(export: &SimulationExport) -> Result<String, SimulationError> {
    serde_json::to_string_pretty(export).map_err(|e| SimulationError::Export(e.to_string()))
}

pub fn import_json(json: &str) -> Result<SimulationExport, SimulationError> {
    serde_json::from_str(json).map_err(|e| SimulationError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_export() {
        let config = MarketConfig::default();
        let states = vec![MarketState::new(0, 100.0, 2.0, 0.0)];
        let export = build_export(&config, &states, &RunMetrics::new());
        assert_eq!(export.version, crate::VERSION);
        assert_eq!(export.states.len(), 1);
        assert_eq!(export.run_id.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn test_export_json_roundtrip() {
        let mut metrics = RunMetrics::new();
        metrics.record_day(&MarketState::new(0, 100.0, 2.0, 0.0));
        let export = build_export(&MarketConfig::default().with_seed(3), &[], &metrics);
        let json = export_json(&export).unwrap();
        assert!(json.contains("\"wealth_mode\": \"unlimited\""));
        let parsed = import_json(&json).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(import_json("not json"), Err(SimulationError::Export(_))));
    }
}
