//! JSON output for records and run summaries
//!
//! Records are written as JSON Lines, one accepted event per line, tagged
//! with the zero-based input line they came from. The run summary is a
//! single pretty-printed JSON document.

use crate::analysis::{AnalysisRecord, Summary};
use crate::runner::RecordSink;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

/// One line of the record stream
#[derive(Debug, Serialize)]
pub struct JsonRecord<'a> {
    /// Input line the record was built from
    pub event: usize,
    #[serde(flatten)]
    pub record: &'a AnalysisRecord,
}

/// Root of the summary document
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    #[serde(flatten)]
    pub summary: &'a Summary,
}

impl<'a> JsonSummary<'a> {
    pub fn new(summary: &'a Summary) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "jetsub-summary-v1".to_string(),
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run summary")
    }
}

/// Streams records as JSON Lines
pub struct JsonLinesWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesWriter<W> {
    fn write_record(&mut self, event: usize, record: &AnalysisRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &JsonRecord { event, record })
            .context("Failed to serialize record")?;
        self.writer
            .write_all(b"\n")
            .context("Failed to write record")
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush records")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{Accumulator, HistogramConfig};
    use crate::analysis::JetRecord;

    fn jet(pt: f64) -> JetRecord {
        JetRecord {
            px: pt,
            py: 0.0,
            pz: 0.0,
            e: pt,
            pt,
            eta: 0.0,
            phi: 0.0,
            mass: 0.0,
            area: None,
            n_constituents: 1,
            tau1: 0.0,
            tau2: 0.0,
            tau3: 0.0,
            min_trigger_dr: 999.0,
        }
    }

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            n_parts: 12,
            n_jets: 2,
            trigger: 0b01,
            first_constituent: None,
            jet1: jet(150.0),
            jet2: None,
            gen: None,
        }
    }

    #[test]
    fn test_record_line_is_flat() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write_record(4, &record()).unwrap();
        writer.finish().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(text.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["event"], 4);
        assert_eq!(value["n_parts"], 12);
        assert_eq!(value["trigger"], 1);
        assert_eq!(value["jet1"]["pt"], 150.0);
        assert_eq!(value["jet1"]["min_trigger_dr"], 999.0);
        // Optional blocks are omitted, not null
        assert!(value.get("jet2").is_none());
        assert!(value.get("gen").is_none());
        assert!(value["jet1"].get("area").is_none());
    }

    #[test]
    fn test_one_line_per_record() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.write_record(0, &record()).unwrap();
        writer.write_record(3, &record()).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_summary_document() {
        let acc = Accumulator::new(&HistogramConfig::default());
        let summary = Summary {
            events_analyzed: 10,
            records: 7,
            skipped: acc.skipped.clone(),
            gen_skipped: acc.gen_skipped.clone(),
            missing_triggers: 1,
            histograms: acc.histograms.clone(),
        };

        let json = JsonSummary::new(&summary).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["format"], "jetsub-summary-v1");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["events_analyzed"], 10);
        assert_eq!(value["records"], 7);
        assert_eq!(value["histograms"]["jet_pt"]["counts"].as_array().unwrap().len(), 100);
    }
}
