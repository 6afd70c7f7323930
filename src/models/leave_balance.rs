//! Leave balance model.
//!
//! A [`LeaveBalance`] is one row of the balance ledger, the authoritative
//! per-employee record of leave taken and leave still available.

use serde::{Deserialize, Serialize};

use crate::codec::TabularRecord;

/// One employee's entry in the balance ledger.
///
/// Field names are camelCase on the wire, which is what the configured
/// field mapping refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    /// Unique identifier for the employee.
    pub employee_id: i64,
    /// The employee's display name.
    pub employee_name: String,
    /// Leave days already consumed.
    pub leaves_taken: i64,
    /// Leave days still available.
    pub available_leaves: i64,
}

impl LeaveBalance {
    /// Creates a new balance record.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_reconciler::models::LeaveBalance;
    ///
    /// let balance = LeaveBalance::new(1, "Alice", 2, 10);
    /// assert_eq!(balance.employee_name, "Alice");
    /// assert!(balance.can_cover(10));
    /// assert!(!balance.can_cover(11));
    /// ```
    pub fn new(
        employee_id: i64,
        employee_name: impl Into<String>,
        leaves_taken: i64,
        available_leaves: i64,
    ) -> Self {
        Self {
            employee_id,
            employee_name: employee_name.into(),
            leaves_taken,
            available_leaves,
        }
    }

    /// Returns true if the available balance covers `applied_leaves`.
    pub fn can_cover(&self, applied_leaves: i64) -> bool {
        self.available_leaves >= applied_leaves
    }

    /// Moves `applied_leaves` from available to taken.
    ///
    /// Returns `false` and leaves the record untouched if the balance does
    /// not cover the request or the taken counter would overflow.
    pub fn debit(&mut self, applied_leaves: i64) -> bool {
        if applied_leaves < 0 || !self.can_cover(applied_leaves) {
            return false;
        }
        match self.leaves_taken.checked_add(applied_leaves) {
            Some(taken) => {
                self.leaves_taken = taken;
                self.available_leaves -= applied_leaves;
                true
            }
            None => false,
        }
    }
}

impl TabularRecord for LeaveBalance {
    const DATASET: &'static str = "employee_leave_data";
    const FIELDS: &'static [&'static str] = &[
        "employeeId",
        "employeeName",
        "leavesTaken",
        "availableLeaves",
    ];

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "employeeId" => Some(self.employee_id.to_string()),
            "employeeName" => Some(self.employee_name.clone()),
            "leavesTaken" => Some(self.leaves_taken.to_string()),
            "availableLeaves" => Some(self.available_leaves.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_balance_uses_camel_case_fields() {
        let json = r#"{
            "employeeId": 7,
            "employeeName": "Priya",
            "leavesTaken": 3,
            "availableLeaves": 12
        }"#;

        let balance: LeaveBalance = serde_json::from_str(json).unwrap();
        assert_eq!(balance, LeaveBalance::new(7, "Priya", 3, 12));
    }

    #[test]
    fn test_debit_moves_leave_from_available_to_taken() {
        let mut balance = LeaveBalance::new(1, "Alice", 2, 10);
        assert!(balance.debit(5));
        assert_eq!(balance, LeaveBalance::new(1, "Alice", 7, 5));
    }

    #[test]
    fn test_debit_of_entire_balance_leaves_zero() {
        let mut balance = LeaveBalance::new(1, "Alice", 2, 10);
        assert!(balance.debit(10));
        assert_eq!(balance.available_leaves, 0);
        assert_eq!(balance.leaves_taken, 12);
    }

    #[test]
    fn test_debit_beyond_balance_is_refused() {
        let mut balance = LeaveBalance::new(1, "Alice", 2, 10);
        assert!(!balance.debit(11));
        assert_eq!(balance, LeaveBalance::new(1, "Alice", 2, 10));
    }

    #[test]
    fn test_debit_negative_is_refused() {
        let mut balance = LeaveBalance::new(1, "Alice", 2, 10);
        assert!(!balance.debit(-1));
        assert_eq!(balance, LeaveBalance::new(1, "Alice", 2, 10));
    }

    #[test]
    fn test_debit_refuses_overflowing_taken_counter() {
        let mut balance = LeaveBalance::new(1, "Alice", i64::MAX, 10);
        assert!(!balance.debit(1));
        assert_eq!(balance.available_leaves, 10);
    }

    #[test]
    fn test_field_value_covers_every_field() {
        let balance = LeaveBalance::new(1, "Alice", 2, 10);
        let values: Vec<_> = LeaveBalance::FIELDS
            .iter()
            .map(|field| balance.field_value(field).unwrap())
            .collect();
        assert_eq!(values, vec!["1", "Alice", "2", "10"]);
        assert_eq!(balance.field_value("unknown"), None);
    }
}
