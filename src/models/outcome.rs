//! Reconciliation outcome models.
//!
//! This module contains the [`ReconciliationReport`] type and the
//! per-request [`OutcomeRecord`] entries it is made of.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a single request's processing result.
///
/// # Example
///
/// ```
/// use leave_reconciler::models::RequestOutcome;
///
/// assert_eq!(RequestOutcome::NotFound.to_string(), "NOT_FOUND");
/// assert!(RequestOutcome::Approved.is_approved());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestOutcome {
    /// The balance covered the request and was debited.
    Approved,
    /// The balance was insufficient.
    Denied,
    /// No balance record exists for the employee.
    NotFound,
    /// The request itself is malformed (negative amount).
    InvalidRequest,
}

impl RequestOutcome {
    /// All outcomes, in reporting order.
    pub const ALL: [RequestOutcome; 4] = [
        RequestOutcome::Approved,
        RequestOutcome::Denied,
        RequestOutcome::NotFound,
        RequestOutcome::InvalidRequest,
    ];

    /// Returns the wire name of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Approved => "APPROVED",
            RequestOutcome::Denied => "DENIED",
            RequestOutcome::NotFound => "NOT_FOUND",
            RequestOutcome::InvalidRequest => "INVALID_REQUEST",
        }
    }

    /// Returns true if the request mutated a balance.
    pub fn is_approved(&self) -> bool {
        matches!(self, RequestOutcome::Approved)
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one request, as recorded in the cycle's outcome log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// 1-based position of the request in the request file.
    pub sequence: usize,
    /// The employee the request was for.
    pub employee_id: i64,
    /// The amount applied for.
    pub applied_leaves: i64,
    /// Available balance before the request was evaluated, if a balance exists.
    pub available_before: Option<i64>,
    /// Available balance after evaluation, if a balance exists.
    pub available_after: Option<i64>,
    /// The classification of the request.
    pub outcome: RequestOutcome,
}

/// Result of reconciling one batch of requests against the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// False when matching was skipped because either dataset was empty.
    pub processed: bool,
    /// Per-request outcomes in request order.
    pub outcomes: Vec<OutcomeRecord>,
}

impl ReconciliationReport {
    /// A report for a batch where no matching took place.
    pub fn skipped() -> Self {
        Self::default()
    }

    /// Number of requests classified as `outcome`.
    pub fn count(&self, outcome: RequestOutcome) -> usize {
        self.outcomes
            .iter()
            .filter(|record| record.outcome == outcome)
            .count()
    }

    /// Number of approved requests.
    pub fn approved(&self) -> usize {
        self.count(RequestOutcome::Approved)
    }

    /// Returns true if at least one balance was changed.
    pub fn has_mutations(&self) -> bool {
        self.outcomes.iter().any(|record| record.outcome.is_approved())
    }

    /// Renders the report as JSON for diagnostic logging.
    pub fn to_json(&self) -> serde_json::Value {
        let counts: serde_json::Map<String, serde_json::Value> = RequestOutcome::ALL
            .iter()
            .map(|outcome| (outcome.as_str().to_string(), self.count(*outcome).into()))
            .collect();

        serde_json::json!({
            "processed": self.processed,
            "counts": counts,
            "outcomes": self.outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sequence: usize, outcome: RequestOutcome) -> OutcomeRecord {
        OutcomeRecord {
            sequence,
            employee_id: 1,
            applied_leaves: 1,
            available_before: Some(5),
            available_after: Some(5),
            outcome,
        }
    }

    #[test]
    fn test_outcome_serialization() {
        assert_eq!(
            serde_json::to_string(&RequestOutcome::Approved).unwrap(),
            "\"APPROVED\""
        );
        assert_eq!(
            serde_json::to_string(&RequestOutcome::InvalidRequest).unwrap(),
            "\"INVALID_REQUEST\""
        );
        let parsed: RequestOutcome = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(parsed, RequestOutcome::NotFound);
    }

    #[test]
    fn test_display_matches_wire_name() {
        for outcome in RequestOutcome::ALL {
            let wire = serde_json::to_string(&outcome).unwrap();
            assert_eq!(wire.trim_matches('"'), outcome.to_string());
        }
    }

    #[test]
    fn test_report_counts() {
        let report = ReconciliationReport {
            processed: true,
            outcomes: vec![
                record(1, RequestOutcome::Approved),
                record(2, RequestOutcome::Denied),
                record(3, RequestOutcome::Approved),
            ],
        };

        assert_eq!(report.approved(), 2);
        assert_eq!(report.count(RequestOutcome::Denied), 1);
        assert_eq!(report.count(RequestOutcome::NotFound), 0);
        assert!(report.has_mutations());
    }

    #[test]
    fn test_skipped_report_is_empty() {
        let report = ReconciliationReport::skipped();
        assert!(!report.processed);
        assert!(report.outcomes.is_empty());
        assert!(!report.has_mutations());
    }

    #[test]
    fn test_report_json_contains_counts() {
        let report = ReconciliationReport {
            processed: true,
            outcomes: vec![record(1, RequestOutcome::Denied)],
        };
        let json = report.to_json();
        assert_eq!(json["processed"], true);
        assert_eq!(json["counts"]["DENIED"], 1);
        assert_eq!(json["counts"]["APPROVED"], 0);
        assert_eq!(json["outcomes"][0]["outcome"], "DENIED");
    }
}
