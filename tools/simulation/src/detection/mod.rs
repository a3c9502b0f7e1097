//! Post-hoc manipulation detection
//!
//! Pure functions over a finished run's [`MarketState`](crate::state::MarketState)
//! sequence. Nothing here feeds back into the simulation.

pub mod anomaly;
pub mod detectors;
pub mod stats;

pub use anomaly::{attach_anomaly_scores, compute_price_volume_anomaly, curve_imbalance_score, DEFAULT_WINDOW};
pub use detectors::{
    ensemble_detection, AnomalyDetector, DetectionResult, StandardizedDistanceDetector, ZScoreDetector,
};
pub use stats::{band_distance, rolling_zscore, DetectionError};
