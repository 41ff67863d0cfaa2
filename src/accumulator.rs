//! Per-worker run accumulation
//!
//! Every worker owns one `Accumulator`. Nothing is shared while events are
//! processed; worker accumulators are merged once at the end of a run.

use crate::analysis::SkipReason;
use serde::{Deserialize, Serialize};

/// Fixed binning of a histogram axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

impl Binning {
    pub fn new(bins: usize, min: f64, max: f64) -> Self {
        Self { bins, min, max }
    }
}

/// Histogram binnings
///
/// # Example TOML
/// ```toml
/// [histograms]
/// pt = { bins = 100, min = 0.0, max = 300.0 }
/// eta = { bins = 100, min = -3.0, max = 3.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub pt: Binning,
    pub eta: Binning,
    pub tau: Binning,
    pub tau_ratio: Binning,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            pt: Binning::new(100, 0.0, 300.0),
            eta: Binning::new(100, -3.0, 3.0),
            tau: Binning::new(100, 0.0, 3.0),
            tau_ratio: Binning::new(100, 0.0, 3.0),
        }
    }
}

/// One-dimensional fixed-bin histogram with under/overflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub name: String,
    pub binning: Binning,
    pub counts: Vec<u64>,
    pub underflow: u64,
    pub overflow: u64,
    pub entries: u64,
    /// Sum of in-range values, for the mean
    pub sum: f64,
}

impl Histogram {
    pub fn new(name: &str, binning: Binning) -> Self {
        Self {
            name: name.to_string(),
            binning,
            counts: vec![0; binning.bins],
            underflow: 0,
            overflow: 0,
            entries: 0,
            sum: 0.0,
        }
    }

    pub fn fill(&mut self, value: f64) {
        self.entries += 1;
        let Binning { bins, min, max } = self.binning;

        if value < min {
            self.underflow += 1;
        } else if value.is_nan() || value >= max || bins == 0 {
            self.overflow += 1;
        } else {
            let index = (((value - min) / (max - min)) * bins as f64) as usize;
            self.counts[index.min(bins - 1)] += 1;
            self.sum += value;
        }
    }

    /// Entries inside the axis range
    pub fn in_range(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Mean of the in-range entries
    pub fn mean(&self) -> Option<f64> {
        let n = self.in_range();
        if n == 0 {
            None
        } else {
            Some(self.sum / n as f64)
        }
    }

    pub fn merge(&mut self, other: &Histogram) {
        debug_assert_eq!(self.binning, other.binning, "merging {} with different binning", self.name);
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.entries += other.entries;
        self.sum += other.sum;
    }
}

/// Count of skipped events per reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    pub input_type: u64,
    pub no_jets: u64,
    pub below_threshold: u64,
    pub too_many_particles: u64,
    pub missing_collection: u64,
    pub malformed: u64,
}

impl SkipCounts {
    pub fn record(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::InputType(_) => self.input_type += 1,
            SkipReason::NoJets => self.no_jets += 1,
            SkipReason::BelowThreshold { .. } => self.below_threshold += 1,
            SkipReason::TooManyParticles { .. } => self.too_many_particles += 1,
            SkipReason::MissingCollection(_) => self.missing_collection += 1,
            SkipReason::Malformed(_) => self.malformed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_type
            + self.no_jets
            + self.below_threshold
            + self.too_many_particles
            + self.missing_collection
            + self.malformed
    }

    pub fn merge(&mut self, other: &SkipCounts) {
        self.input_type += other.input_type;
        self.no_jets += other.no_jets;
        self.below_threshold += other.below_threshold;
        self.too_many_particles += other.too_many_particles;
        self.missing_collection += other.missing_collection;
        self.malformed += other.malformed;
    }
}

/// Histograms filled by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histograms {
    pub candidate_pt: Histogram,
    pub candidate_eta: Histogram,
    pub jet_pt: Histogram,
    pub jet_eta: Histogram,
    pub tau1: Histogram,
    pub tau2: Histogram,
    pub tau3: Histogram,
    pub tau2_over_tau1: Histogram,
    pub tau3_over_tau2: Histogram,
}

impl Histograms {
    pub fn new(config: &HistogramConfig) -> Self {
        Self {
            candidate_pt: Histogram::new("candidate_pt", config.pt),
            candidate_eta: Histogram::new("candidate_eta", config.eta),
            jet_pt: Histogram::new("jet_pt", config.pt),
            jet_eta: Histogram::new("jet_eta", config.eta),
            tau1: Histogram::new("tau1", config.tau),
            tau2: Histogram::new("tau2", config.tau),
            tau3: Histogram::new("tau3", config.tau),
            tau2_over_tau1: Histogram::new("tau2_over_tau1", config.tau_ratio),
            tau3_over_tau2: Histogram::new("tau3_over_tau2", config.tau_ratio),
        }
    }

    fn all_mut(&mut self) -> [&mut Histogram; 9] {
        [
            &mut self.candidate_pt,
            &mut self.candidate_eta,
            &mut self.jet_pt,
            &mut self.jet_eta,
            &mut self.tau1,
            &mut self.tau2,
            &mut self.tau3,
            &mut self.tau2_over_tau1,
            &mut self.tau3_over_tau2,
        ]
    }

    fn all(&self) -> [&Histogram; 9] {
        [
            &self.candidate_pt,
            &self.candidate_eta,
            &self.jet_pt,
            &self.jet_eta,
            &self.tau1,
            &self.tau2,
            &self.tau3,
            &self.tau2_over_tau1,
            &self.tau3_over_tau2,
        ]
    }

    pub fn merge(&mut self, other: &Histograms) {
        for (mine, theirs) in self.all_mut().into_iter().zip(other.all()) {
            mine.merge(theirs);
        }
    }
}

/// Counters and histograms of one worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    /// Events handed to the pipeline
    pub events_analyzed: u64,
    /// Records emitted
    pub records: u64,
    /// Reconstructed-level skips
    pub skipped: SkipCounts,
    /// Generator-level skips (simulated runs only)
    pub gen_skipped: SkipCounts,
    /// Events without a trigger collection
    pub missing_triggers: u64,
    pub histograms: Histograms,
}

impl Accumulator {
    pub fn new(config: &HistogramConfig) -> Self {
        Self {
            events_analyzed: 0,
            records: 0,
            skipped: SkipCounts::default(),
            gen_skipped: SkipCounts::default(),
            missing_triggers: 0,
            histograms: Histograms::new(config),
        }
    }

    /// Fold another worker's accumulator into this one
    pub fn merge(&mut self, other: &Accumulator) {
        self.events_analyzed += other.events_analyzed;
        self.records += other.records;
        self.skipped.merge(&other.skipped);
        self.gen_skipped.merge(&other.gen_skipped);
        self.missing_triggers += other.missing_triggers;
        self.histograms.merge(&other.histograms);
    }
}
