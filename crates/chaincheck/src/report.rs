//! Human-readable run report.

use std::fmt;

use crate::oracle::{Assessment, Verdict};

/// Metrics of one run together with their assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<M> {
    pub metrics: M,
    pub assessment: Assessment,
}

impl<M> Report<M> {
    pub fn verdict(&self) -> Verdict {
        self.assessment.verdict()
    }
}

/// Prints the metric lines followed by `test = PASS` or `test = FAIL`.
impl<M: fmt::Display> fmt::Display for Report<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metrics)?;
        writeln!(f, "test = {}", self.verdict())
    }
}
