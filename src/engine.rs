//! Round engine: worker pool, first-success cancellation, mask escalation
//!
//! Each round streams the template's candidates to a fixed pool of OS
//! threads, one outstanding test per worker. The first successful result
//! ends the search immediately; a fully exhausted stream either ends the
//! search or grows the template with the escalation slots and runs again.

use crate::charset::CharsetTable;
use crate::config::SearchConfig;
use crate::error::{Result, VerifierError};
use crate::mask::{parse_mask, Slot, Template};
use crate::monitor::SearchMonitor;
use crate::verifier::Verify;
use crossbeam_channel::{bounded, unbounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Terminal outcome of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A candidate unlocked the resource
    Success {
        passphrase: String,
        attempts: u64,
        round: u32,
    },
    /// The candidate space was fully tried across all permitted rounds
    Exhausted { attempts: u64, rounds: u32 },
}

/// A candidate paired inline with its verifier result
type TestResult = (String, std::result::Result<bool, VerifierError>);

/// Drives rounds of candidate generation and parallel verification
pub struct SearchEngine<V: Verify + 'static> {
    verifier: Arc<V>,
    workers: usize,
    monitor: Option<Arc<SearchMonitor>>,
}

impl<V: Verify + 'static> SearchEngine<V> {
    pub fn new(verifier: V, workers: usize) -> Self {
        Self {
            verifier: Arc::new(verifier),
            workers: workers.max(1),
            monitor: None,
        }
    }

    pub fn with_monitor(mut self, monitor: Arc<SearchMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Run rounds until success, exhaustion, or a verifier fault.
    ///
    /// `escalation` slots are appended cumulatively after every unsuccessful
    /// round: round 1 adds one copy, round 2 a second, and so on, up to
    /// `max_rounds` escalations.
    pub fn run(
        &self,
        mut template: Template,
        escalation: Option<&[Slot]>,
        max_rounds: u32,
    ) -> Result<Outcome> {
        let mut attempts = 0u64;
        let mut round = 0u32;

        loop {
            if let Some(monitor) = &self.monitor {
                monitor.begin_round(round, template.combination_count());
            }
            info!(round, slots = template.slot_count(), "starting round");

            if let Some(passphrase) = self.run_round(&template, &mut attempts)? {
                info!(round, attempts, "passphrase found");
                return Ok(Outcome::Success {
                    passphrase,
                    attempts,
                    round,
                });
            }

            let Some(extra) = escalation else {
                return Ok(Outcome::Exhausted {
                    attempts,
                    rounds: round + 1,
                });
            };
            if round + 1 > max_rounds {
                return Ok(Outcome::Exhausted {
                    attempts,
                    rounds: round + 1,
                });
            }

            template.append(extra);
            round += 1;
        }
    }

    /// Test every candidate of the current template. Returns the successful
    /// candidate, `None` on exhaustion, or the first verifier fault.
    fn run_round(&self, template: &Template, attempts: &mut u64) -> Result<Option<String>> {
        // rendezvous channel: a candidate is handed directly to an idle
        // worker, so at most `workers` tests are ever outstanding
        let (job_tx, job_rx) = bounded::<String>(0);
        let (result_tx, result_rx) = unbounded::<TestResult>();
        let stop = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::with_capacity(self.workers);
        for _ in 0..self.workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let stop = Arc::clone(&stop);
            let verifier = Arc::clone(&self.verifier);

            handles.push(thread::spawn(move || {
                while let Ok(candidate) = job_rx.recv() {
                    // once cancelled, drain without testing so the
                    // dispatcher is never left blocked in a send
                    if stop.load(Ordering::Relaxed) {
                        continue;
                    }
                    let result = verifier.test(&candidate);
                    if matches!(result, Ok(true)) || result.is_err() {
                        stop.store(true, Ordering::Relaxed);
                    }
                    if result_tx.send((candidate, result)).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(job_rx);
        drop(result_tx);

        let mut answer: Option<String> = None;
        let mut fault: Option<VerifierError> = None;
        let mut pending = 0usize;

        for candidate in template.candidates() {
            // collect whatever already finished before issuing more work
            while let Ok(result) = result_rx.try_recv() {
                pending -= 1;
                self.note_result(result, attempts, &mut answer, &mut fault);
            }
            if answer.is_some() || fault.is_some() {
                break;
            }
            if job_tx.send(candidate).is_err() {
                // all workers gone; their results explain why
                break;
            }
            pending += 1;
        }
        // closing the job channel lets idle workers exit
        drop(job_tx);

        // in-flight results still matter on the exhaustion path: one of
        // them may be the success
        while answer.is_none() && fault.is_none() && pending > 0 {
            match result_rx.recv() {
                Ok(result) => {
                    pending -= 1;
                    self.note_result(result, attempts, &mut answer, &mut fault);
                }
                Err(_) => break,
            }
        }

        if answer.is_some() || fault.is_some() {
            stop.store(true, Ordering::Relaxed);
            // non-blocking teardown: irrelevant in-flight tests finish on
            // their own once they see the closed channels
            drop(handles);
            return match fault {
                Some(err) => Err(err.into()),
                None => Ok(answer),
            };
        }

        for handle in handles {
            let _ = handle.join();
        }
        debug!(attempts = *attempts, "round exhausted");
        Ok(None)
    }

    fn note_result(
        &self,
        result: TestResult,
        attempts: &mut u64,
        answer: &mut Option<String>,
        fault: &mut Option<VerifierError>,
    ) {
        let (candidate, outcome) = result;
        *attempts += 1;
        if let Some(monitor) = &self.monitor {
            monitor.record_attempt();
        }

        match outcome {
            Ok(true) => {
                if let Some(monitor) = &self.monitor {
                    monitor.record_match();
                }
                if answer.is_none() {
                    *answer = Some(candidate);
                }
            }
            Ok(false) => {}
            Err(err) => {
                if fault.is_none() {
                    *fault = Some(err);
                }
            }
        }
    }
}

/// High-level entry point: validate the config, parse its masks, and run
/// the engine with the given verifier.
pub fn run_search<V: Verify + 'static>(
    config: &SearchConfig,
    verifier: V,
    monitor: Option<Arc<SearchMonitor>>,
) -> Result<Outcome> {
    config.validate()?;

    let table = CharsetTable::new(config.custom_charsets.clone());
    let template = Template::parse(&table, &config.mask)?;
    // parsing the escalation mask up front surfaces a malformed one before
    // any verification work starts
    let escalation = config
        .increment_mask
        .as_deref()
        .map(|mask| parse_mask(&table, mask))
        .transpose()?;

    let mut engine = SearchEngine::new(verifier, config.workers);
    if let Some(monitor) = monitor {
        engine = engine.with_monitor(monitor);
    }
    engine.run(template, escalation.as_deref(), config.increment_count)
}
