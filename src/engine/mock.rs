//! Mock executor for testing
//!
//! Reports scripted latencies without touching the filesystem, which makes worker,
//! pool and aggregation tests fast and deterministic.
//!
//! # Features
//!
//! - Latencies cycle through a caller-provided script
//! - A failure can be injected at a given iteration and step
//! - Executed iterations are recorded; clones share the record
//!
//! # Example
//!
//! ```
//! use fsbench::engine::{OperationExecutor, OperationKind, Step, StepLatencies};
//! use fsbench::engine::mock::MockExecutor;
//!
//! let mut executor = MockExecutor::new(OperationKind::Mix, vec![StepLatencies::mix(1, 2, 3)]);
//! executor.fail_at(2, Step::Unlink);
//!
//! assert!(executor.execute(0).is_ok());
//! assert!(executor.execute(1).is_ok());
//! assert_eq!(executor.execute(2).unwrap_err().step, Step::Unlink);
//! assert_eq!(executor.executed(), vec![0, 1, 2]);
//! ```

use super::{OperationError, OperationExecutor, OperationKind, Step, StepLatencies};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Scripted executor
#[derive(Clone)]
pub struct MockExecutor {
    kind: OperationKind,

    /// Latencies returned per call, cycled by call count
    script: Vec<StepLatencies>,

    /// Iteration and step at which to fail
    failure: Option<(u64, Step)>,

    /// Iterations passed to `execute`, shared between clones
    executed: Arc<Mutex<Vec<u64>>>,
}

impl MockExecutor {
    /// Create a mock that cycles through `script`
    ///
    /// An empty script yields zero latencies.
    pub fn new(kind: OperationKind, script: Vec<StepLatencies>) -> Self {
        Self {
            kind,
            script,
            failure: None,
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock returning the same latencies on every call
    pub fn constant(kind: OperationKind, latencies: StepLatencies) -> Self {
        Self::new(kind, vec![latencies])
    }

    /// Fail the given iteration at `step`
    pub fn fail_at(&mut self, iteration: u64, step: Step) {
        self.failure = Some((iteration, step));
    }

    /// Iterations executed so far (including a failed one)
    pub fn executed(&self) -> Vec<u64> {
        self.executed.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn zero(&self) -> StepLatencies {
        match self.kind {
            OperationKind::Mix => StepLatencies::mix(0, 0, 0),
            OperationKind::Stat => StepLatencies::single(0),
        }
    }
}

impl OperationExecutor for MockExecutor {
    fn kind(&self) -> OperationKind {
        self.kind
    }

    fn execute(&mut self, iteration: u64) -> Result<StepLatencies, OperationError> {
        let call = {
            let mut executed = self
                .executed
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            executed.push(iteration);
            executed.len() - 1
        };

        if let Some((fail_iteration, step)) = self.failure {
            if fail_iteration == iteration {
                return Err(OperationError {
                    step,
                    path: PathBuf::from(format!("mock-{}", iteration)),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "injected failure"),
                });
            }
        }

        if self.script.is_empty() {
            return Ok(self.zero());
        }
        Ok(self.script[call % self.script.len()])
    }
}
