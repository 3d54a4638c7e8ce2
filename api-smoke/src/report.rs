use crate::{
    error::Error,
    suite::{Outcome, SmokeCase},
};
use std::{fmt::Display, time::Duration};

/// How one case ended and how long it took.
#[derive(Debug)]
pub struct CaseReport {
    pub case: SmokeCase,
    pub result: Result<Outcome, Error>,
    pub elapsed: Duration,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug)]
pub struct SuiteReport {
    cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn new(cases: Vec<CaseReport>) -> Self {
        Self { cases }
    }

    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    pub fn case(&self, case: SmokeCase) -> Option<&CaseReport> {
        self.cases.iter().find(|report| report.case == case)
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|report| report.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.len() - self.passed_count()
    }

    /// Tolerated cases count as passed.
    pub fn passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

impl Display for SuiteReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "running {} tests", self.cases.len())?;

        for report in &self.cases {
            let seconds = report.elapsed.as_secs_f64();
            match &report.result {
                Ok(Outcome::Passed) => writeln!(f, "test {} ... ok <{:.2}s>", report.case, seconds)?,
                Ok(Outcome::Tolerated(reason)) => writeln!(
                    f,
                    "test {} ... ok (tolerated: {}) <{:.2}s>",
                    report.case, reason, seconds
                )?,
                Err(_) => writeln!(f, "test {} ... FAILED <{:.2}s>", report.case, seconds)?,
            }
        }

        if !self.passed() {
            writeln!(f)?;
            writeln!(f, "failures:")?;
            for report in &self.cases {
                if let Err(error) = &report.result {
                    writeln!(f, "    {}: {}", report.case, error)?;
                }
            }
        }

        writeln!(f)?;
        write!(
            f,
            "test result: {}. {} passed; {} failed",
            if self.passed() { "ok" } else { "FAILED" },
            self.passed_count(),
            self.failed_count()
        )
    }
}
