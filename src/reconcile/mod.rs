//! Leave request reconciliation.
//!
//! This module applies pending leave requests to the balance ledger. Each
//! request is classified as approved, denied, not found, or invalid, and
//! approved requests debit the matching balance in place.

use tracing::{debug, info};

use crate::models::{
    LeaveBalance, LeaveRequest, OutcomeRecord, ReconciliationReport, RequestOutcome,
};

/// Reconciles `requests` against `balances`, mutating balances in place.
///
/// Requests are applied sequentially in list order, so an approval earlier
/// in the batch reduces the balance seen by a later request for the same
/// employee. Each request is matched to the first balance with the same
/// employee id.
///
/// Classification, in order of precedence:
/// 1. no matching balance → [`RequestOutcome::NotFound`]
/// 2. `applied_leaves < 0` → [`RequestOutcome::InvalidRequest`]
/// 3. `available_leaves >= applied_leaves` → [`RequestOutcome::Approved`]
/// 4. otherwise → [`RequestOutcome::Denied`]
///
/// If either collection is empty nothing is matched and the report has
/// `processed == false`.
///
/// # Example
///
/// ```
/// use leave_reconciler::models::{LeaveBalance, LeaveRequest, RequestOutcome};
/// use leave_reconciler::reconcile::reconcile;
///
/// let mut balances = vec![LeaveBalance::new(1, "Alice", 2, 10)];
/// let requests = vec![LeaveRequest::new(1, 5)];
///
/// let report = reconcile(&mut balances, &requests);
///
/// assert_eq!(report.outcomes[0].outcome, RequestOutcome::Approved);
/// assert_eq!(balances[0], LeaveBalance::new(1, "Alice", 7, 5));
/// ```
pub fn reconcile(balances: &mut [LeaveBalance], requests: &[LeaveRequest]) -> ReconciliationReport {
    if balances.is_empty() || requests.is_empty() {
        info!(
            balances = balances.len(),
            requests = requests.len(),
            "Either employee balances or leave requests are empty"
        );
        return ReconciliationReport::skipped();
    }

    let outcomes = requests
        .iter()
        .enumerate()
        .map(|(index, request)| apply_request(balances, request, index + 1))
        .collect();

    ReconciliationReport {
        processed: true,
        outcomes,
    }
}

/// Evaluates one request and applies it if approved.
fn apply_request(
    balances: &mut [LeaveBalance],
    request: &LeaveRequest,
    sequence: usize,
) -> OutcomeRecord {
    let employee_id = request.employee_id;
    let applied_leaves = request.applied_leaves;
    let balance = balances
        .iter_mut()
        .find(|balance| balance.employee_id == employee_id);

    let available_before = balance.as_ref().map(|balance| balance.available_leaves);

    let (outcome, available_after) = match balance {
        None => {
            info!(employee_id, "Employee not found in leave balances");
            (RequestOutcome::NotFound, None)
        }
        Some(_) if request.is_negative() => {
            info!(employee_id, applied_leaves, "Applied leave is a negative value");
            (RequestOutcome::InvalidRequest, available_before)
        }
        Some(balance) => {
            debug!(
                employee_id,
                available_leaves = balance.available_leaves,
                applied_leaves,
                "Evaluating leave request"
            );
            if !balance.can_cover(applied_leaves) {
                info!(employee_id, "Employee is not eligible to take leave");
                (RequestOutcome::Denied, Some(balance.available_leaves))
            } else if balance.debit(applied_leaves) {
                info!(
                    employee_id,
                    applied_leaves,
                    available_leaves = balance.available_leaves,
                    "Employee is eligible to take leave"
                );
                (RequestOutcome::Approved, Some(balance.available_leaves))
            } else {
                info!(
                    employee_id,
                    applied_leaves,
                    leaves_taken = balance.leaves_taken,
                    "Leave request would overflow leaves taken"
                );
                (RequestOutcome::InvalidRequest, Some(balance.available_leaves))
            }
        }
    };

    OutcomeRecord {
        sequence,
        employee_id,
        applied_leaves,
        available_before,
        available_after,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn alice() -> LeaveBalance {
        LeaveBalance::new(1, "Alice", 2, 10)
    }

    fn outcomes(report: &ReconciliationReport) -> Vec<RequestOutcome> {
        report.outcomes.iter().map(|record| record.outcome).collect()
    }

    #[test]
    fn test_request_within_balance_is_approved() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 5)]);

        assert!(report.processed);
        assert_eq!(outcomes(&report), vec![RequestOutcome::Approved]);
        assert_eq!(balances, vec![LeaveBalance::new(1, "Alice", 7, 5)]);
        assert_eq!(report.outcomes[0].available_before, Some(10));
        assert_eq!(report.outcomes[0].available_after, Some(5));
    }

    #[test]
    fn test_request_equal_to_balance_is_approved() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 10)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::Approved]);
        assert_eq!(balances, vec![LeaveBalance::new(1, "Alice", 12, 0)]);
    }

    #[test]
    fn test_request_beyond_balance_is_denied() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 15)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::Denied]);
        assert_eq!(balances, vec![alice()]);
    }

    #[test]
    fn test_unknown_employee_is_not_found() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(2, 3)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::NotFound]);
        assert_eq!(report.outcomes[0].available_before, None);
        assert_eq!(balances, vec![alice()]);
    }

    #[test]
    fn test_negative_request_is_invalid() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, -3)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::InvalidRequest]);
        assert_eq!(balances, vec![alice()]);
    }

    #[test]
    fn test_negative_request_for_unknown_employee_is_not_found() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(9, -1)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::NotFound]);
        assert_eq!(report.outcomes[0].available_before, None);
        assert_eq!(balances, vec![alice()]);
    }

    #[test]
    fn test_zero_day_request_is_approved_without_change() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 0)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::Approved]);
        assert_eq!(balances, vec![alice()]);
    }

    #[test]
    fn test_sequential_requests_see_earlier_debits() {
        let mut balances = vec![alice()];
        let requests = [
            LeaveRequest::new(1, 6),
            LeaveRequest::new(1, 6),
            LeaveRequest::new(1, 4),
        ];
        let report = reconcile(&mut balances, &requests);

        assert_eq!(
            outcomes(&report),
            vec![
                RequestOutcome::Approved,
                RequestOutcome::Denied,
                RequestOutcome::Approved
            ]
        );
        assert_eq!(balances, vec![LeaveBalance::new(1, "Alice", 12, 0)]);
        assert_eq!(report.outcomes[1].available_before, Some(4));
    }

    #[test]
    fn test_first_matching_balance_wins() {
        let mut balances = vec![
            LeaveBalance::new(1, "Alice", 0, 5),
            LeaveBalance::new(1, "Alice (duplicate)", 0, 50),
        ];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 3)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::Approved]);
        assert_eq!(balances[0].available_leaves, 2);
        assert_eq!(balances[1].available_leaves, 50);
    }

    #[test]
    fn test_empty_requests_skip_matching() {
        let mut balances = vec![alice()];
        let report = reconcile(&mut balances, &[]);

        assert!(!report.processed);
        assert!(report.outcomes.is_empty());
        assert_eq!(balances, vec![alice()]);
    }

    #[test]
    fn test_empty_balances_skip_matching() {
        let mut balances: Vec<LeaveBalance> = Vec::new();
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 1)]);

        assert!(!report.processed);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_overflowing_request_is_invalid_and_unapplied() {
        let mut balances = vec![LeaveBalance::new(1, "Alice", i64::MAX - 1, 10)];
        let report = reconcile(&mut balances, &[LeaveRequest::new(1, 5)]);

        assert_eq!(outcomes(&report), vec![RequestOutcome::InvalidRequest]);
        assert_eq!(balances[0].available_leaves, 10);
    }

    #[test]
    fn test_sequence_numbers_follow_request_order() {
        let mut balances = vec![alice()];
        let requests = [LeaveRequest::new(2, 1), LeaveRequest::new(1, 1)];
        let report = reconcile(&mut balances, &requests);

        let sequences: Vec<_> = report.outcomes.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    fn balance_strategy() -> impl Strategy<Value = LeaveBalance> {
        (0i64..5, 0i64..1_000, -50i64..1_000).prop_map(|(id, taken, available)| {
            LeaveBalance::new(id, format!("emp{id}"), taken, available)
        })
    }

    proptest! {
        #[test]
        fn prop_covered_request_debits_exactly(
            taken in 0i64..10_000,
            available in 0i64..10_000,
            percent in 0i64..=100,
        ) {
            let applied = available * percent / 100;
            let mut balances = vec![LeaveBalance::new(1, "Alice", taken, available)];
            let report = reconcile(&mut balances, &[LeaveRequest::new(1, applied)]);

            prop_assert_eq!(report.outcomes[0].outcome, RequestOutcome::Approved);
            prop_assert_eq!(
                &balances[0],
                &LeaveBalance::new(1, "Alice", taken + applied, available - applied)
            );
        }

        #[test]
        fn prop_negative_request_never_mutates(
            balance in balance_strategy(),
            applied in i64::MIN..0,
        ) {
            let mut balances = vec![balance.clone()];
            let report = reconcile(&mut balances, &[LeaveRequest::new(balance.employee_id, applied)]);

            prop_assert_eq!(report.outcomes[0].outcome, RequestOutcome::InvalidRequest);
            prop_assert_eq!(&balances[0], &balance);
        }

        #[test]
        fn prop_request_beyond_balance_is_denied(
            balance in balance_strategy(),
            excess in 1i64..1_000,
        ) {
            let applied = balance.available_leaves.max(0) + excess;
            let mut balances = vec![balance.clone()];
            let report = reconcile(&mut balances, &[LeaveRequest::new(balance.employee_id, applied)]);

            prop_assert_eq!(report.outcomes[0].outcome, RequestOutcome::Denied);
            prop_assert_eq!(&balances[0], &balance);
        }

        #[test]
        fn prop_unknown_employee_is_not_found(
            balances in prop::collection::vec(balance_strategy(), 1..8),
            applied in 0i64..100,
        ) {
            let mut mutated = balances.clone();
            let report = reconcile(&mut mutated, &[LeaveRequest::new(99, applied)]);

            prop_assert_eq!(report.outcomes[0].outcome, RequestOutcome::NotFound);
            prop_assert_eq!(mutated, balances);
        }

        #[test]
        fn prop_engine_never_drives_balance_negative(
            balances in prop::collection::vec(balance_strategy(), 1..8),
            requests in prop::collection::vec((0i64..6, -5i64..200), 1..20),
        ) {
            let requests: Vec<_> = requests
                .into_iter()
                .map(|(id, applied)| LeaveRequest::new(id, applied))
                .collect();
            let mut mutated = balances.clone();
            let report = reconcile(&mut mutated, &requests);

            prop_assert_eq!(report.outcomes.len(), requests.len());
            for (before, after) in balances.iter().zip(&mutated) {
                prop_assert_eq!(before.employee_id, after.employee_id);
                prop_assert_eq!(&before.employee_name, &after.employee_name);
                prop_assert_eq!(
                    before.leaves_taken + before.available_leaves,
                    after.leaves_taken + after.available_leaves
                );
                if after.available_leaves != before.available_leaves {
                    prop_assert!(after.available_leaves >= 0);
                }
            }
        }
    }
}
