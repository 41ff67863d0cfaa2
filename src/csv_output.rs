//! CSV output for records
//!
//! One row per accepted event. Jet blocks are flattened into prefixed
//! columns (`jet1_pt`, `jet2_tau3`, `gen_jet1_mass`, ...); values that are
//! absent for an event are left empty.

use crate::analysis::{AnalysisRecord, JetRecord};
use crate::runner::RecordSink;
use anyhow::{Context, Result};
use std::io::Write;

const JET_FIELDS: [&str; 14] = [
    "px",
    "py",
    "pz",
    "e",
    "pt",
    "eta",
    "phi",
    "mass",
    "area",
    "n_constituents",
    "tau1",
    "tau2",
    "tau3",
    "min_trigger_dr",
];

/// Streams records as CSV rows
pub struct CsvWriter<W: Write> {
    writer: W,
    include_gen: bool,
    header_written: bool,
}

impl<W: Write> CsvWriter<W> {
    /// `include_gen` adds the generator-level columns
    pub fn new(writer: W, include_gen: bool) -> Self {
        Self {
            writer,
            include_gen,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Header row for the enabled column groups
    pub fn header(&self) -> String {
        let mut headers: Vec<String> = ["event", "n_parts", "n_jets", "trigger"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        headers.extend(
            ["first_pt", "first_eta", "first_phi"]
                .iter()
                .map(|h| h.to_string()),
        );
        headers.extend(jet_headers("jet1"));
        headers.extend(jet_headers("jet2"));

        if self.include_gen {
            headers.push("n_gen_parts".to_string());
            headers.push("n_gen_jets".to_string());
            headers.extend(jet_headers("gen_jet1"));
            headers.extend(jet_headers("gen_jet2"));
        }

        headers.join(",")
    }

    fn format_record(&self, event: usize, record: &AnalysisRecord) -> String {
        let mut fields = vec![
            event.to_string(),
            record.n_parts.to_string(),
            record.n_jets.to_string(),
            record.trigger.to_string(),
        ];

        match &record.first_constituent {
            Some(first) => {
                fields.push(first.pt.to_string());
                fields.push(first.eta.to_string());
                fields.push(first.phi.to_string());
            }
            None => fields.extend(std::iter::repeat(String::new()).take(3)),
        }

        push_jet(&mut fields, Some(&record.jet1));
        push_jet(&mut fields, record.jet2.as_ref());

        if self.include_gen {
            match &record.gen {
                Some(gen) => {
                    fields.push(gen.n_gen_parts.to_string());
                    fields.push(gen.n_gen_jets.to_string());
                    push_jet(&mut fields, gen.jet1.as_ref());
                    push_jet(&mut fields, gen.jet2.as_ref());
                }
                None => fields.extend(
                    std::iter::repeat(String::new()).take(2 + 2 * JET_FIELDS.len()),
                ),
            }
        }

        fields.join(",")
    }
}

fn jet_headers(prefix: &str) -> impl Iterator<Item = String> + '_ {
    JET_FIELDS
        .iter()
        .map(move |field| format!("{}_{}", prefix, field))
}

fn push_jet(fields: &mut Vec<String>, jet: Option<&JetRecord>) {
    let Some(jet) = jet else {
        fields.extend(std::iter::repeat(String::new()).take(JET_FIELDS.len()));
        return;
    };

    fields.extend([
        jet.px.to_string(),
        jet.py.to_string(),
        jet.pz.to_string(),
        jet.e.to_string(),
        jet.pt.to_string(),
        jet.eta.to_string(),
        jet.phi.to_string(),
        jet.mass.to_string(),
        jet.area.map(|a| a.to_string()).unwrap_or_default(),
        jet.n_constituents.to_string(),
        jet.tau1.to_string(),
        jet.tau2.to_string(),
        jet.tau3.to_string(),
        jet.min_trigger_dr.to_string(),
    ]);
}

impl<W: Write> RecordSink for CsvWriter<W> {
    fn write_record(&mut self, event: usize, record: &AnalysisRecord) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", self.header()).context("Failed to write CSV header")?;
            self.header_written = true;
        }
        let row = self.format_record(event, record);
        writeln!(self.writer, "{}", row).context("Failed to write CSV row")
    }

    fn finish(&mut self) -> Result<()> {
        // An empty run still gets a header
        if !self.header_written {
            writeln!(self.writer, "{}", self.header()).context("Failed to write CSV header")?;
            self.header_written = true;
        }
        self.writer.flush().context("Failed to flush CSV output")
    }
}
