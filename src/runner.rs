//! Multi-threaded event runner
//!
//! Events are read as JSON Lines by a reader thread, analyzed by a pool of
//! workers that each own an `Accumulator`, and handed back to the calling
//! thread, which writes records in input order. Worker accumulators are
//! merged once every event has been processed.

use crate::accumulator::Accumulator;
use crate::analysis::{AnalysisRecord, JetAnalysis, SkipReason, Summary};
use crate::event::EventInput;
use anyhow::{anyhow, Context, Result};
use crossbeam::channel;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Events buffered per worker before the reader blocks
const QUEUE_DEPTH_PER_WORKER: usize = 16;

/// Destination of accepted records
pub trait RecordSink {
    /// Called in input order; `event` is the zero-based input line
    fn write_record(&mut self, event: usize, record: &AnalysisRecord) -> Result<()>;

    /// Called once after the last record
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<(usize, AnalysisRecord)> {
    fn write_record(&mut self, event: usize, record: &AnalysisRecord) -> Result<()> {
        self.push((event, record.clone()));
        Ok(())
    }
}

/// Runs a prepared analysis over a stream of events
pub struct Runner<'a> {
    analysis: &'a JetAnalysis,
    workers: usize,
}

impl<'a> Runner<'a> {
    pub fn new(analysis: &'a JetAnalysis, workers: usize) -> Self {
        Self {
            analysis,
            workers: workers.max(1),
        }
    }

    /// Number of workers matching the available parallelism
    pub fn default_workers() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Analyze every event of `input`, writing accepted records to `sink`
    pub fn run<R, S>(&self, input: R, sink: &mut S) -> Result<Summary>
    where
        R: BufRead + Send,
        S: RecordSink,
    {
        let analysis = self.analysis;
        let capacity = self.workers * QUEUE_DEPTH_PER_WORKER;
        let (job_tx, job_rx) = channel::bounded::<(usize, String)>(capacity);
        let (out_tx, out_rx) = channel::bounded::<(usize, Option<AnalysisRecord>)>(capacity);

        let merged = crossbeam::scope(|scope| -> Result<Accumulator> {
            let reader = scope.spawn(move |_| -> Result<usize> {
                let mut lines = 0;
                for (index, line) in input.lines().enumerate() {
                    let line =
                        line.with_context(|| format!("Failed to read event line {}", index + 1))?;
                    if job_tx.send((index, line)).is_err() {
                        break;
                    }
                    lines += 1;
                }
                Ok(lines)
            });

            let workers: Vec<_> = (0..self.workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let out_tx = out_tx.clone();
                    scope.spawn(move |_| {
                        let mut acc = analysis.new_accumulator();
                        for (index, line) in job_rx {
                            let record = process_line(analysis, index, &line, &mut acc);
                            if out_tx.send((index, record)).is_err() {
                                break;
                            }
                        }
                        acc
                    })
                })
                .collect();
            drop(job_rx);
            drop(out_tx);

            // Records arrive in completion order; release them in input order
            let mut pending = BTreeMap::new();
            let mut next = 0usize;
            for (index, record) in out_rx {
                pending.insert(index, record);
                while let Some(record) = pending.remove(&next) {
                    if let Some(record) = record {
                        sink.write_record(next, &record)?;
                    }
                    next += 1;
                }
            }

            let lines = reader
                .join()
                .map_err(|_| anyhow!("Event reader thread panicked"))??;
            tracing::debug!(lines, workers = self.workers, "input exhausted");

            let mut merged = analysis.new_accumulator();
            for worker in workers {
                let acc = worker
                    .join()
                    .map_err(|_| anyhow!("Analysis worker thread panicked"))?;
                merged.merge(&acc);
            }
            Ok(merged)
        })
        .map_err(|_| anyhow!("Event processing aborted by a panicking thread"))??;

        sink.finish()?;
        Ok(analysis.finalize(merged))
    }
}

/// Decode and analyze one input line
///
/// Blank lines are ignored; lines that do not decode are counted as
/// malformed and skipped.
fn process_line(
    analysis: &JetAnalysis,
    index: usize,
    line: &str,
    acc: &mut Accumulator,
) -> Option<AnalysisRecord> {
    if line.trim().is_empty() {
        return None;
    }

    match EventInput::from_json(line) {
        Ok(event) => analysis.process_event(&event, acc),
        Err(err) => {
            let reason = SkipReason::Malformed(format!("{:#}", err));
            tracing::warn!(line = index + 1, %reason, "skipping event");
            acc.skipped.record(&reason);
            None
        }
    }
}
