//! # driftguard-core: Feature Drift Detection & Retrain Gating
//!
//! Quantifies how far a deployed model's input data has drifted from the data
//! it was trained on, and turns that into a retrain/no-retrain decision.
//!
//! - [`drift`] - PSI and two-sample KS per feature, aggregated into a [`DriftReport`]
//! - [`data`] - loading reference/current snapshots and picking numeric columns
//! - [`pipeline`] - the load → evaluate → aggregate sequence used by every caller
//! - [`server`] - the HTTP drift service
//! - [`config`] - layered configuration

pub mod config;
pub mod data;
pub mod drift;
pub mod error;
pub mod pipeline;
pub mod server;

// Re-exports
pub use config::{DriftGuardConfig, load_config};
pub use data::Dataset;
pub use drift::{
    DEFAULT_BUCKETS, DriftMetrics, DriftReport, DriftStatus, MAX_BUCKETS, RETRAIN_PSI_THRESHOLD,
    Sample, evaluate, ks_test, psi,
};
pub use error::DriftError;
pub use pipeline::{check_datasets, check_files};
