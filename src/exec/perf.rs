// src/exec/perf.rs

//! Interpreting the performance checker's exit code.
//!
//! phantomas exits 0 when every assertion holds, 1 when at least one fails,
//! and anything else when it could not run the check at all.

use crate::errors::SitebuildError;
use crate::logging::{fail_tag, ok_tag, severe_tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfOutcome {
    Pass,
    Fail,
    /// The check itself broke; carries the exit code (`-1` for a signal).
    Error(i32),
}

/// Map a process exit code onto a [`PerfOutcome`].
pub fn classify_perf_exit(code: Option<i32>) -> PerfOutcome {
    match code {
        Some(0) => PerfOutcome::Pass,
        Some(1) => PerfOutcome::Fail,
        Some(other) => PerfOutcome::Error(other),
        None => PerfOutcome::Error(-1),
    }
}

impl PerfOutcome {
    /// Plain message for this outcome.
    pub fn message(&self, limit: u32) -> String {
        match self {
            PerfOutcome::Pass => format!("✔︎ Yay! The site makes {limit} or fewer HTTP requests."),
            PerfOutcome::Fail => format!("✘ Rats! The site makes more than {limit} HTTP requests."),
            PerfOutcome::Error(code) => format!("Something went wrong. Exit code {code}"),
        }
    }

    /// Styled message for the terminal.
    pub fn describe(&self, limit: u32) -> String {
        let msg = self.message(limit);
        match self {
            PerfOutcome::Pass => ok_tag(msg).to_string(),
            PerfOutcome::Fail => fail_tag(msg).to_string(),
            PerfOutcome::Error(_) => severe_tag(msg).to_string(),
        }
    }

    /// The error a failing outcome turns into when failures propagate.
    pub fn into_error(self, limit: u32) -> Option<SitebuildError> {
        match self {
            PerfOutcome::Pass => None,
            PerfOutcome::Fail => Some(SitebuildError::PerfBudgetExceeded { limit }),
            PerfOutcome::Error(code) => Some(SitebuildError::PerfCheckErrored { code }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_to_outcomes() {
        assert_eq!(classify_perf_exit(Some(0)), PerfOutcome::Pass);
        assert_eq!(classify_perf_exit(Some(1)), PerfOutcome::Fail);
        assert_eq!(classify_perf_exit(Some(2)), PerfOutcome::Error(2));
        assert_eq!(classify_perf_exit(Some(255)), PerfOutcome::Error(255));
        assert_eq!(classify_perf_exit(None), PerfOutcome::Error(-1));
    }

    #[test]
    fn messages_mention_the_limit_or_code() {
        assert_eq!(
            PerfOutcome::Pass.message(5),
            "✔︎ Yay! The site makes 5 or fewer HTTP requests."
        );
        assert_eq!(
            PerfOutcome::Fail.message(5),
            "✘ Rats! The site makes more than 5 HTTP requests."
        );
        assert_eq!(
            PerfOutcome::Error(3).message(5),
            "Something went wrong. Exit code 3"
        );
    }

    #[test]
    fn only_pass_has_no_error() {
        assert!(PerfOutcome::Pass.into_error(5).is_none());
        assert!(matches!(
            PerfOutcome::Fail.into_error(5),
            Some(SitebuildError::PerfBudgetExceeded { limit: 5 })
        ));
        assert!(matches!(
            PerfOutcome::Error(7).into_error(5),
            Some(SitebuildError::PerfCheckErrored { code: 7 })
        ));
    }
}
