//! Per-event jet substructure pipeline
//!
//! `JetAnalysis` is built once from a validated configuration and then shared
//! immutably by every worker. Each call to `process_event` runs one event
//! end to end:
//!
//! 1. trigger bitmask and jet-trigger object subset
//! 2. generator-level branch (simulated runs only)
//! 3. particle collection, clustering, pruning of the two leading jets
//! 4. leading-jet threshold
//! 5. τ1..τ3 and trigger matching per retained jet
//!
//! Everything the run accumulates goes into the caller's `Accumulator`.

use crate::accumulator::{Accumulator, Histograms, SkipCounts};
use crate::cluster::{ClusterSequence, Jet, JetDefinition};
use crate::collector::{collect_candidates, collect_generator, CollectError, Particle};
use crate::config::{AnalysisConfig, ConfigError};
use crate::event::EventInput;
use crate::kinematics::{Direction, FourMomentum};
use crate::nsubjettiness::{tau_ratio, Nsubjettiness};
use crate::pruner::{PrunedJet, Pruner};
use crate::trigger::{min_delta_r, TriggerMatcher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an event (or its generator branch) produced no record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error(transparent)]
    InputType(#[from] CollectError),

    #[error("no jets found")]
    NoJets,

    #[error("leading jet pt {pt:.1} below threshold {threshold:.1}")]
    BelowThreshold { pt: f64, threshold: f64 },

    #[error("{count} particles exceed the limit of {limit}")]
    TooManyParticles { count: usize, limit: usize },

    #[error("{0} collection is missing")]
    MissingCollection(&'static str),

    #[error("malformed event: {0}")]
    Malformed(String),
}

/// Kinematics and substructure of one pruned jet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JetRecord {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub mass: f64,
    /// Catchment area of the jet before pruning, when ghosts were used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    pub n_constituents: usize,
    pub tau1: f64,
    pub tau2: f64,
    pub tau3: f64,
    /// ΔR to the nearest jet-trigger object, 999 without one
    pub min_trigger_dr: f64,
}

/// Kinematics of the first collected constituent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstituentRecord {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
}

/// Generator-level block of a simulated event
///
/// Counts are kept even when the generator jets fail the cuts; only the
/// jet records are dropped then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenRecord {
    /// Final-state particles that entered the clustering
    pub n_gen_parts: usize,
    pub n_gen_jets: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jet1: Option<JetRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jet2: Option<JetRecord>,
}

/// Everything recorded for one accepted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Size of the event's particle-flow candidate collection
    pub n_parts: usize,
    /// Jets found by the clustering
    pub n_jets: usize,
    /// Trigger bitmask
    pub trigger: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_constituent: Option<ConstituentRecord>,
    pub jet1: JetRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jet2: Option<JetRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gen: Option<GenRecord>,
}

/// End-of-run totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub events_analyzed: u64,
    pub records: u64,
    pub skipped: SkipCounts,
    pub gen_skipped: SkipCounts,
    pub missing_triggers: u64,
    pub histograms: Histograms,
}

/// Leading and sub-leading jet records of one particle list
type LeadingJets = (JetRecord, Option<JetRecord>);

/// Outcome of clustering one particle list
struct Reconstruction {
    n_jets: usize,
    /// The leading jets, or why the list yields none
    leading: Result<LeadingJets, SkipReason>,
}

/// The configured pipeline
#[derive(Debug, Clone)]
pub struct JetAnalysis {
    config: AnalysisConfig,
    definition: JetDefinition,
    pruner: Pruner,
    nsubjettiness: Nsubjettiness,
    trigger: TriggerMatcher,
}

impl JetAnalysis {
    /// Validate `config` and build every stage of the pipeline
    pub fn prepare(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let definition = JetDefinition::new(config.cone_size, config.area.clone());
        let nsubjettiness = Nsubjettiness {
            kappa: config.nsubjettiness.kappa,
            r0: config.cone_size,
            max_iterations: config.nsubjettiness.max_iterations,
            r_cutoff: config.nsubjettiness.r_cutoff,
        };
        let trigger = TriggerMatcher::new(config.trigger.clone());

        tracing::debug!(
            cone_size = config.cone_size,
            ghosts = config.area.enabled,
            z_cut = config.pruning.z_cut,
            r_cut_factor = config.pruning.r_cut_factor,
            "prepared jet analysis"
        );

        Ok(Self {
            pruner: config.pruning,
            config,
            definition,
            nsubjettiness,
            trigger,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Fresh accumulator with this run's histogram binning
    pub fn new_accumulator(&self) -> Accumulator {
        Accumulator::new(&self.config.histograms)
    }

    /// Run the pipeline over one event
    ///
    /// Returns `None` when the event is skipped; the reason is counted in
    /// `acc`.
    pub fn process_event(&self, event: &EventInput, acc: &mut Accumulator) -> Option<AnalysisRecord> {
        acc.events_analyzed += 1;

        let triggers = event.trigger_objects.as_deref();
        if triggers.is_none() {
            acc.missing_triggers += 1;
            tracing::warn!("{}", SkipReason::MissingCollection("trigger object"));
        }
        let trigger_mask = self.trigger.bitmask(triggers);
        let jet_triggers = self.trigger.jet_objects(triggers);

        let gen = if self.config.simulated {
            self.generator_branch(event, &jet_triggers, &mut acc.gen_skipped)
        } else {
            None
        };

        match self.reconstructed_branch(event, &jet_triggers, &mut acc.histograms) {
            Ok(mut record) => {
                acc.records += 1;
                record.trigger = trigger_mask;
                record.gen = gen;
                Some(record)
            }
            Err(reason) => {
                match &reason {
                    SkipReason::InputType(_) | SkipReason::TooManyParticles { .. } => {
                        tracing::warn!(%reason, "event skipped")
                    }
                    _ => tracing::debug!(%reason, "event skipped"),
                }
                acc.skipped.record(&reason);
                None
            }
        }
    }

    /// Close the run and report its totals
    pub fn finalize(&self, acc: Accumulator) -> Summary {
        tracing::info!(
            events = acc.events_analyzed,
            records = acc.records,
            skipped = acc.skipped.total(),
            "Analyzed {} events",
            acc.events_analyzed
        );

        Summary {
            events_analyzed: acc.events_analyzed,
            records: acc.records,
            skipped: acc.skipped,
            gen_skipped: acc.gen_skipped,
            missing_triggers: acc.missing_triggers,
            histograms: acc.histograms,
        }
    }

    /// Record of the reconstructed jets, without trigger mask or gen block
    fn reconstructed_branch(
        &self,
        event: &EventInput,
        jet_triggers: &[Direction],
        histograms: &mut Histograms,
    ) -> Result<AnalysisRecord, SkipReason> {
        let particles = collect_candidates(&event.jets, self.config.max_jets_considered)?;

        for particle in &particles {
            histograms.candidate_pt.fill(particle.momentum.pt());
            histograms.candidate_eta.fill(particle.momentum.eta());
        }
        let first_constituent = particles.first().map(|p| ConstituentRecord {
            pt: p.momentum.pt(),
            eta: p.momentum.eta(),
            phi: p.momentum.phi(),
        });

        let reco = self.reconstruct(&particles, jet_triggers, Some(histograms));
        let (jet1, jet2) = reco.leading?;

        Ok(AnalysisRecord {
            n_parts: event.pf_candidates.len(),
            n_jets: reco.n_jets,
            trigger: 0,
            first_constituent,
            jet1,
            jet2,
            gen: None,
        })
    }

    /// Generator block, `None` only when there is nothing to cluster
    ///
    /// Failures are counted in `skipped` and never reach the reconstructed
    /// record.
    fn generator_branch(
        &self,
        event: &EventInput,
        jet_triggers: &[Direction],
        skipped: &mut SkipCounts,
    ) -> Option<GenRecord> {
        let collected = event
            .gen_particles
            .as_deref()
            .ok_or(SkipReason::MissingCollection("generator particle"))
            .and_then(|gen| collect_generator(gen).map_err(SkipReason::from));
        let particles = match collected {
            Ok(particles) => particles,
            Err(reason) => {
                skip_generator(skipped, &reason);
                return None;
            }
        };

        let reco = self.reconstruct(&particles, jet_triggers, None);
        let (jet1, jet2) = match reco.leading {
            Ok((jet1, jet2)) => (Some(jet1), jet2),
            Err(reason) => {
                skip_generator(skipped, &reason);
                (None, None)
            }
        };

        Some(GenRecord {
            n_gen_parts: particles.len(),
            n_gen_jets: reco.n_jets,
            jet1,
            jet2,
        })
    }

    /// Cluster `particles` and build records for the leading jets
    fn reconstruct(
        &self,
        particles: &[Particle],
        jet_triggers: &[Direction],
        histograms: Option<&mut Histograms>,
    ) -> Reconstruction {
        if particles.len() > self.config.max_particles {
            return Reconstruction {
                n_jets: 0,
                leading: Err(SkipReason::TooManyParticles {
                    count: particles.len(),
                    limit: self.config.max_particles,
                }),
            };
        }

        let (sequence, jets) = self.definition.cluster(particles);
        Reconstruction {
            n_jets: jets.len(),
            leading: self.leading_jets(particles, &sequence, &jets, jet_triggers, histograms),
        }
    }

    /// Prune the two leading jets and apply the threshold
    fn leading_jets(
        &self,
        particles: &[Particle],
        sequence: &ClusterSequence,
        jets: &[Jet],
        jet_triggers: &[Direction],
        mut histograms: Option<&mut Histograms>,
    ) -> Result<LeadingJets, SkipReason> {
        let leading = jets.first().ok_or(SkipReason::NoJets)?;

        let pruned1 = self.prune(sequence, leading);
        if let Some(h) = histograms.as_deref_mut() {
            h.jet_pt.fill(pruned1.pt());
            h.jet_eta.fill(pruned1.momentum.eta());
        }

        if pruned1.pt() < self.config.min_leading_pt {
            return Err(SkipReason::BelowThreshold {
                pt: pruned1.pt(),
                threshold: self.config.min_leading_pt,
            });
        }

        let jet1 = self.jet_record(particles, leading, &pruned1, jet_triggers);
        if let Some(h) = histograms {
            h.tau1.fill(jet1.tau1);
            h.tau2.fill(jet1.tau2);
            h.tau3.fill(jet1.tau3);
            h.tau2_over_tau1.fill(tau_ratio(jet1.tau2, jet1.tau1));
            h.tau3_over_tau2.fill(tau_ratio(jet1.tau3, jet1.tau2));
        }

        let jet2 = jets.get(1).map(|jet| {
            let pruned = self.prune(sequence, jet);
            self.jet_record(particles, jet, &pruned, jet_triggers)
        });

        Ok((jet1, jet2))
    }

    fn prune(&self, sequence: &ClusterSequence, jet: &Jet) -> PrunedJet {
        let pruned = self.pruner.prune(sequence, jet, &self.config.area);
        tracing::trace!(
            pt = jet.pt(),
            pruned_pt = pruned.pt(),
            branches = pruned.pruned_branches,
            "pruned jet"
        );
        pruned
    }

    fn jet_record(
        &self,
        particles: &[Particle],
        jet: &Jet,
        pruned: &PrunedJet,
        jet_triggers: &[Direction],
    ) -> JetRecord {
        let constituents: Vec<FourMomentum> = pruned
            .constituents
            .iter()
            .map(|&i| particles[i].momentum)
            .collect();
        let p = pruned.momentum;

        JetRecord {
            px: p.px,
            py: p.py,
            pz: p.pz,
            e: p.e,
            pt: p.pt(),
            eta: p.eta(),
            phi: p.phi(),
            mass: p.m(),
            area: jet.area,
            n_constituents: constituents.len(),
            tau1: self.nsubjettiness.tau(&constituents, 1),
            tau2: self.nsubjettiness.tau(&constituents, 2),
            tau3: self.nsubjettiness.tau(&constituents, 3),
            min_trigger_dr: min_delta_r(&p.direction(), jet_triggers),
        }
    }
}

fn skip_generator(skipped: &mut SkipCounts, reason: &SkipReason) {
    tracing::debug!(%reason, "generator jets skipped");
    skipped.record(reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::GhostAreaSpec;
    use crate::event::{Candidate, GenParticle, InputJet, TriggerObject};
    use crate::trigger::NO_MATCH_DELTA_R;

    fn candidate(pt: f64, eta: f64, phi: f64) -> Candidate {
        let p = FourMomentum::from_pt_eta_phi(pt, eta, phi);
        Candidate {
            px: p.px,
            py: p.py,
            pz: p.pz,
            e: p.e,
        }
    }

    fn pf_event(constituents: Vec<Candidate>) -> EventInput {
        EventInput {
            pf_candidates: constituents.clone(),
            jets: vec![InputJet::Pf { constituents }],
            trigger_objects: Some(Vec::new()),
            gen_particles: None,
        }
    }

    fn analysis() -> JetAnalysis {
        JetAnalysis::prepare(AnalysisConfig {
            area: GhostAreaSpec::disabled(),
            ..AnalysisConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_prepare_rejects_invalid_config() {
        let config = AnalysisConfig {
            cone_size: 0.0,
            ..AnalysisConfig::default()
        };
        assert!(JetAnalysis::prepare(config).is_err());
    }

    #[test]
    fn test_empty_event_emits_no_record() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        assert!(analysis.process_event(&pf_event(vec![]), &mut acc).is_none());
        assert_eq!(acc.events_analyzed, 1);
        assert_eq!(acc.skipped.no_jets, 1);
        assert_eq!(acc.records, 0);
    }

    #[test]
    fn test_soft_leading_jet_is_below_threshold() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        let event = pf_event(vec![candidate(50.0, 0.0, 1.0), candidate(30.0, 0.05, 1.02)]);

        assert!(analysis.process_event(&event, &mut acc).is_none());
        assert_eq!(acc.skipped.below_threshold, 1);
        // The leading jet is histogrammed before the cut
        assert_eq!(acc.histograms.jet_pt.entries, 1);
        assert_eq!(acc.histograms.tau1.entries, 0);
        assert_eq!(acc.histograms.candidate_pt.entries, 2);
    }

    #[test]
    fn test_collimated_jet_record() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        let event = pf_event(vec![
            candidate(80.0, 0.5, 2.0),
            candidate(50.0, 0.5, 2.0),
            candidate(20.0, 0.5, 2.0),
        ]);

        let record = analysis.process_event(&event, &mut acc).unwrap();
        assert_eq!(record.n_parts, 3);
        assert_eq!(record.n_jets, 1);
        assert!((record.jet1.pt - 150.0).abs() < 1e-9);
        assert!((record.jet1.eta - 0.5).abs() < 1e-9);
        assert!((record.jet1.phi - 2.0).abs() < 1e-9);
        assert!(record.jet1.tau1.abs() < 1e-9);
        assert_eq!(record.jet1.n_constituents, 3);
        assert_eq!(record.jet1.area, None);
        assert!(record.jet2.is_none());
        assert_eq!(record.trigger, 0);
        assert_eq!(record.jet1.min_trigger_dr, NO_MATCH_DELTA_R);

        let first = record.first_constituent.unwrap();
        assert!((first.pt - 80.0).abs() < 1e-9);
        assert_eq!(acc.records, 1);
        assert_eq!(acc.histograms.tau1.entries, 1);
    }

    #[test]
    fn test_two_jets_and_trigger_match() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        let mut event = pf_event(vec![
            candidate(150.0, 0.0, 0.0),
            candidate(60.0, 0.02, 0.01),
            candidate(90.0, 1.0, 3.0),
        ]);
        event.trigger_objects = Some(vec![
            TriggerObject {
                name: "HLT_MonoCentralPFJet80_PFMETnoMu95_v1".to_string(),
                eta: 0.0,
                phi: 0.3,
            },
            TriggerObject {
                name: "HLT_MET120_HBHENoiseCleaned_v2".to_string(),
                eta: 0.0,
                phi: 0.0,
            },
        ]);

        let record = analysis.process_event(&event, &mut acc).unwrap();
        assert_eq!(record.n_jets, 2);
        assert_eq!(record.trigger, 0b11);
        assert!(record.jet1.pt > record.jet2.as_ref().unwrap().pt);
        assert!((record.jet1.min_trigger_dr - 0.3).abs() < 0.01);
        assert!(record.jet2.unwrap().min_trigger_dr > 2.0);
    }

    #[test]
    fn test_non_pf_input_is_skipped() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        let event = EventInput {
            jets: vec![InputJet::Calo {
                px: 200.0,
                py: 0.0,
                pz: 0.0,
                e: 200.0,
            }],
            ..EventInput::default()
        };
        assert!(analysis.process_event(&event, &mut acc).is_none());
        assert_eq!(acc.skipped.input_type, 1);
        assert_eq!(acc.missing_triggers, 1);
    }

    #[test]
    fn test_missing_triggers_degrade_to_sentinel() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        let mut event = pf_event(vec![candidate(200.0, 0.0, 0.0)]);
        event.trigger_objects = None;

        let record = analysis.process_event(&event, &mut acc).unwrap();
        assert_eq!(record.jet1.min_trigger_dr, 999.0);
        assert_eq!(record.trigger, 0);
        assert_eq!(acc.missing_triggers, 1);
        assert_eq!(acc.skipped.total(), 0);
    }

    #[test]
    fn test_particle_cap() {
        let analysis = JetAnalysis::prepare(AnalysisConfig {
            area: GhostAreaSpec::disabled(),
            max_particles: 2,
            ..AnalysisConfig::default()
        })
        .unwrap();
        let mut acc = analysis.new_accumulator();
        let event = pf_event(vec![
            candidate(100.0, 0.0, 0.0),
            candidate(100.0, 0.1, 0.0),
            candidate(100.0, 0.2, 0.0),
        ]);
        assert!(analysis.process_event(&event, &mut acc).is_none());
        assert_eq!(acc.skipped.too_many_particles, 1);
    }

    #[test]
    fn test_generator_branch() {
        let analysis = JetAnalysis::prepare(AnalysisConfig {
            area: GhostAreaSpec::disabled(),
            simulated: true,
            ..AnalysisConfig::default()
        })
        .unwrap();
        let mut acc = analysis.new_accumulator();

        let gen_momentum = FourMomentum::from_pt_eta_phi(180.0, 0.1, 0.2);
        let mut event = pf_event(vec![candidate(170.0, 0.1, 0.2)]);
        event.gen_particles = Some(vec![
            GenParticle {
                status: 3,
                px: 1.0,
                py: 0.0,
                pz: 0.0,
                e: 1.0,
            },
            GenParticle {
                status: 1,
                px: gen_momentum.px,
                py: gen_momentum.py,
                pz: gen_momentum.pz,
                e: gen_momentum.e,
            },
        ]);

        let record = analysis.process_event(&event, &mut acc).unwrap();
        let gen = record.gen.unwrap();
        // The status-3 particle never enters the clustering
        assert_eq!(gen.n_gen_parts, 1);
        assert_eq!(gen.n_gen_jets, 1);
        assert!((gen.jet1.unwrap().pt - 180.0).abs() < 1e-9);

        // Missing generator particles never cost the reconstructed record
        event.gen_particles = None;
        let record = analysis.process_event(&event, &mut acc).unwrap();
        assert!(record.gen.is_none());
        assert_eq!(acc.gen_skipped.missing_collection, 1);
        assert_eq!(acc.records, 2);
    }

    #[test]
    fn test_generator_counts_survive_failed_cuts() {
        let analysis = JetAnalysis::prepare(AnalysisConfig {
            area: GhostAreaSpec::disabled(),
            simulated: true,
            ..AnalysisConfig::default()
        })
        .unwrap();
        let mut acc = analysis.new_accumulator();

        let intermediate = |px: f64| GenParticle {
            status: 3,
            px,
            py: 0.0,
            pz: 0.0,
            e: px,
        };
        let soft = FourMomentum::from_pt_eta_phi(30.0, 0.0, 0.5);
        let mut gen_particles: Vec<GenParticle> =
            (1..=5).map(|i| intermediate(i as f64 * 10.0)).collect();
        gen_particles.push(GenParticle {
            status: 1,
            px: soft.px,
            py: soft.py,
            pz: soft.pz,
            e: soft.e,
        });
        let mut event = pf_event(vec![candidate(200.0, 0.0, 0.5)]);
        event.gen_particles = Some(gen_particles);

        let record = analysis.process_event(&event, &mut acc).unwrap();
        let gen = record.gen.unwrap();
        assert_eq!(gen.n_gen_parts, 1);
        assert_eq!(gen.n_gen_jets, 1);
        assert!(gen.jet1.is_none());
        assert!(gen.jet2.is_none());
        assert_eq!(acc.gen_skipped.below_threshold, 1);

        // Only intermediate particles: nothing to cluster, counts are zero
        event.gen_particles = Some(vec![intermediate(50.0)]);
        let gen = analysis.process_event(&event, &mut acc).unwrap().gen.unwrap();
        assert_eq!(gen.n_gen_parts, 0);
        assert_eq!(gen.n_gen_jets, 0);
        assert_eq!(acc.gen_skipped.no_jets, 1);
    }

    #[test]
    fn test_overflowing_momenta_skip_the_event() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        let event = EventInput::from_json(
            r#"{"jets":[{"kind":"pf","constituents":[
                {"px":1e200,"py":0,"pz":0,"e":1e200},
                {"px":1e200,"py":1e199,"pz":0,"e":1.01e200}]}]}"#,
        )
        .unwrap();

        assert!(analysis.process_event(&event, &mut acc).is_none());
        assert_eq!(acc.skipped.input_type, 1);
        assert_eq!(acc.events_analyzed, 1);

        // Later events are unaffected
        let tame = pf_event(vec![candidate(150.0, 0.0, 0.0), candidate(120.0, 0.1, 0.0)]);
        assert!(analysis.process_event(&tame, &mut acc).is_some());
    }

    #[test]
    fn test_area_is_recorded_with_ghosts() {
        let analysis = JetAnalysis::prepare(AnalysisConfig {
            area: GhostAreaSpec {
                ghost_eta_max: 2.0,
                ..GhostAreaSpec::default()
            },
            ..AnalysisConfig::default()
        })
        .unwrap();
        let mut acc = analysis.new_accumulator();
        let event = pf_event(vec![candidate(200.0, 0.0, 1.0)]);

        let record = analysis.process_event(&event, &mut acc).unwrap();
        let area = record.jet1.area.unwrap();
        assert!(area > 0.0 && area < 4.0, "area = {}", area);
        assert_eq!(record.n_jets, 1);
    }

    #[test]
    fn test_finalize_reports_totals() {
        let analysis = analysis();
        let mut acc = analysis.new_accumulator();
        analysis.process_event(&pf_event(vec![candidate(200.0, 0.0, 0.0)]), &mut acc);
        analysis.process_event(&pf_event(vec![]), &mut acc);

        let summary = analysis.finalize(acc);
        assert_eq!(summary.events_analyzed, 2);
        assert_eq!(summary.records, 1);
        assert_eq!(summary.skipped.no_jets, 1);
    }

    #[test]
    fn test_skip_reason_messages() {
        let reason = SkipReason::BelowThreshold {
            pt: 80.0,
            threshold: 100.0,
        };
        assert_eq!(reason.to_string(), "leading jet pt 80.0 below threshold 100.0");
        assert_eq!(
            SkipReason::MissingCollection("trigger object").to_string(),
            "trigger object collection is missing"
        );
    }
}
