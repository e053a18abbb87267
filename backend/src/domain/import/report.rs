//! Aggregated result of one bulk import run.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::import::row::RowError;

/// Errors beyond this count are dropped from the report; the counter keeps
/// counting and `truncated` flips on.
pub const MAX_REPORTED_ERRORS: usize = 100;

/// The payload returned to the admin after an upload completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<RowError>,
    pub truncated: bool,
    pub warnings: Vec<String>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self {
            success: true,
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
            truncated: false,
            warnings: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_error(&mut self, error: RowError) {
        self.error_count += 1;
        self.success = false;
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(error);
        } else {
            self.truncated = true;
        }
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ImportReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_run_reports_success() {
        let mut report = ImportReport::new();
        report.record_success();
        report.record_success();
        assert!(report.success);
        assert_eq!(report.success_count, 2);
        assert!(!report.truncated);
    }

    #[test]
    fn any_error_clears_the_success_flag() {
        let mut report = ImportReport::new();
        report.record_success();
        report.record_error(RowError::new(2, "prices", "prices is required"));
        assert!(!report.success);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn error_list_caps_but_counter_keeps_counting() {
        let mut report = ImportReport::new();
        for row in 0..MAX_REPORTED_ERRORS + 5 {
            report.record_error(RowError::new(row + 2, "name", "name is required"));
        }
        assert_eq!(report.errors.len(), MAX_REPORTED_ERRORS);
        assert_eq!(report.error_count, MAX_REPORTED_ERRORS + 5);
        assert!(report.truncated);
    }

    #[test]
    fn serializes_camel_case() {
        let mut report = ImportReport::new();
        report.record_error(RowError::new(3, "prices", "bad"));
        let value = serde_json::to_value(&report).expect("serialize");
        assert_eq!(value["successCount"], 0);
        assert_eq!(value["errors"][0]["row"], 3);
        assert_eq!(value["truncated"], false);
    }
}
