//! Background thread that runs analysis requests off the UI loop.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::analyzer::{AnalyzerClientTrait, AnalyzerError};
use crate::models::AnalysisResponse;

struct Job {
    generation: u64,
    text: String,
}

/// Result of one request, tagged with the input generation it answers.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub generation: u64,
    pub result: Result<AnalysisResponse, AnalyzerError>,
    pub completed_at: OffsetDateTime,
}

/// Handle to the analysis thread.
///
/// Jobs that queue up while a request is in flight are coalesced so only the
/// newest text is sent. Dropping the handle closes the job channel and the
/// thread exits after its current request.
pub struct AnalysisWorker {
    jobs: Sender<Job>,
    outcomes: Receiver<AnalysisOutcome>,
    thread: JoinHandle<()>,
}

impl AnalysisWorker {
    pub fn spawn(client: Arc<dyn AnalyzerClientTrait>) -> Self {
        let (jobs, job_rx) = mpsc::channel::<Job>();
        let (outcome_tx, outcomes) = mpsc::channel();

        let thread = thread::spawn(move || run(client.as_ref(), &job_rx, &outcome_tx));

        Self {
            jobs,
            outcomes,
            thread,
        }
    }

    /// False once the thread has exited, for example after a panic in the client.
    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Queues `text` for analysis. Returns `false` if the thread is gone.
    pub fn submit(&self, generation: u64, text: impl Into<String>) -> bool {
        self.jobs
            .send(Job {
                generation,
                text: text.into(),
            })
            .is_ok()
    }

    /// Returns a finished outcome without blocking.
    pub fn try_recv(&self) -> Option<AnalysisOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for a finished outcome.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AnalysisOutcome> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn run(client: &dyn AnalyzerClientTrait, jobs: &Receiver<Job>, outcomes: &Sender<AnalysisOutcome>) {
    while let Ok(mut job) = jobs.recv() {
        // Skip anything superseded while we were busy.
        while let Ok(newer) = jobs.try_recv() {
            debug!(
                skipped = job.generation,
                next = newer.generation,
                "coalescing queued analysis job"
            );
            job = newer;
        }

        let result = client.analyze(&job.text);
        match &result {
            Ok(_) => info!(generation = job.generation, "analysis completed"),
            Err(e) => info!(generation = job.generation, error = %e, "analysis failed"),
        }

        let outcome = AnalysisOutcome {
            generation: job.generation,
            result,
            completed_at: OffsetDateTime::now_utc(),
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
    debug!("analysis worker stopped");
}
