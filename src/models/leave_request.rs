//! Leave request model.

use serde::{Deserialize, Serialize};

use crate::codec::TabularRecord;

/// A pending leave application read from the request file.
///
/// Requests are never mutated; the request file is truncated once a cycle
/// has processed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// The employee applying for leave.
    pub employee_id: i64,
    /// Number of leave days applied for. Negative values are invalid.
    pub applied_leaves: i64,
}

impl LeaveRequest {
    /// Creates a new leave request.
    pub fn new(employee_id: i64, applied_leaves: i64) -> Self {
        Self {
            employee_id,
            applied_leaves,
        }
    }

    /// Returns true if the applied amount is negative.
    pub fn is_negative(&self) -> bool {
        self.applied_leaves < 0
    }
}

impl TabularRecord for LeaveRequest {
    const DATASET: &'static str = "employee_leave_request";
    const FIELDS: &'static [&'static str] = &["employeeId", "appliedLeaves"];

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "employeeId" => Some(self.employee_id.to_string()),
            "appliedLeaves" => Some(self.applied_leaves.to_string()),
            _ => None,
        }
    }
}
