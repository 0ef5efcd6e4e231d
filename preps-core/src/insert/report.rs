//! Per-row outcomes and the summary of a synthetic run.

use crate::PrepsError;

/// What a synthetic run does after a row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and move on to the next id
    #[default]
    ContinueOnError,
    /// Stop the run at the first failed row
    AbortOnError,
}

/// Result of one insert attempt.
///
/// Not `#[must_use]`: dropping it is the fire-and-forget mode.
#[derive(Debug)]
pub enum RowOutcome {
    /// The store accepted the row
    Inserted {
        /// Id of the row
        id: i32,
    },
    /// The store rejected the row or the round trip failed
    Failed {
        /// Id of the row
        id: i32,
        /// Driver diagnostic
        error: PrepsError,
    },
}

impl RowOutcome {
    /// Id of the row this outcome belongs to.
    pub fn id(&self) -> i32 {
        match self {
            Self::Inserted { id } | Self::Failed { id, .. } => *id,
        }
    }

    /// Returns true if the row was written.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }

    /// Returns true if the row was rejected.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Converts into a `Result` for callers that want `?` semantics.
    ///
    /// # Errors
    /// Returns the insert error of a failed row.
    pub fn into_result(self) -> crate::Result<i32> {
        match self {
            Self::Inserted { id } => Ok(id),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Upper bound on outcomes reserved up front; larger runs grow on demand.
const PREALLOCATED_OUTCOMES: u32 = 4096;

/// Outcomes of a synthetic run, in id order.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<RowOutcome>,
    aborted: bool,
}

impl BatchReport {
    pub(crate) fn with_capacity(count: u32) -> Self {
        let capacity = usize::try_from(count.min(PREALLOCATED_OUTCOMES)).unwrap_or_default();
        Self {
            outcomes: Vec::with_capacity(capacity),
            aborted: false,
        }
    }

    pub(crate) fn push(&mut self, outcome: RowOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn mark_aborted(&mut self) {
        self.aborted = true;
    }

    /// All outcomes, in the order the rows were attempted.
    pub fn outcomes(&self) -> &[RowOutcome] {
        &self.outcomes
    }

    /// Number of rows attempted.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if no row was attempted.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of rows written.
    pub fn inserted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_inserted()).count()
    }

    /// Number of rows rejected.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Ids of the rejected rows.
    pub fn failed_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(RowOutcome::id)
    }

    /// Returns true if the run stopped early under [`FailurePolicy::AbortOnError`].
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_outcome_accessors() {
        let ok = RowOutcome::Inserted { id: 1 };
        assert_eq!(ok.id(), 1);
        assert!(ok.is_inserted());
        assert_eq!(ok.into_result().unwrap(), 1);

        let failed = RowOutcome::Failed {
            id: 2,
            error: PrepsError::insert_failed(2, std::io::Error::other("duplicate")),
        };
        assert_eq!(failed.id(), 2);
        assert!(failed.is_failed());
        assert!(failed.into_result().is_err());
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::with_capacity(3);
        report.push(RowOutcome::Inserted { id: 1 });
        report.push(RowOutcome::Failed {
            id: 2,
            error: PrepsError::insert_failed(2, std::io::Error::other("duplicate")),
        });
        report.push(RowOutcome::Inserted { id: 3 });

        assert_eq!(report.len(), 3);
        assert_eq!(report.inserted(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_ids().collect::<Vec<_>>(), vec![2]);
        assert!(!report.aborted());

        report.mark_aborted();
        assert!(report.aborted());
    }

    #[test]
    fn test_default_policy_continues() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::ContinueOnError);
    }
}
