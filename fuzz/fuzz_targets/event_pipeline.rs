#![no_main]

use jetsub::cluster::GhostAreaSpec;
use jetsub::{AnalysisConfig, EventInput, JetAnalysis};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|event: EventInput| {
    let config = AnalysisConfig {
        area: GhostAreaSpec::disabled(),
        max_particles: 256,
        simulated: true,
        ..AnalysisConfig::default()
    };
    let Ok(analysis) = JetAnalysis::prepare(config) else {
        return;
    };

    let mut acc = analysis.new_accumulator();
    let _ = analysis.process_event(&event, &mut acc);
    assert_eq!(acc.events_analyzed, 1);
});
