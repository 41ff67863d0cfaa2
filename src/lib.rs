//! jetsub - Boosted jet clustering and substructure
//!
//! This library reconstructs Cambridge/Aachen jets (with ghost-based active
//! areas) from particle four-momenta, prunes soft wide-angle radiation,
//! computes N-subjettiness, and matches jets to trigger objects. Events are
//! processed independently and can be run on a worker pool.

pub mod accumulator;
pub mod analysis;
pub mod cli;
pub mod cluster;
pub mod collector;
pub mod config;
pub mod csv_output;
pub mod event;
pub mod json_output;
pub mod kinematics;
pub mod nsubjettiness;
pub mod pruner;
pub mod runner;
pub mod trigger;

pub use analysis::{AnalysisRecord, JetAnalysis, JetRecord, SkipReason, Summary};
pub use config::AnalysisConfig;
pub use event::EventInput;
pub use kinematics::FourMomentum;
