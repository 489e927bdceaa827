use serde::Serialize;

/// Raw cell text for one spreadsheet data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub inserted_count: u32,
    pub updated_count: u32,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        let mut message = format!(
            "Import complete. Inserted: {}, Updated: {}.",
            self.inserted_count, self.updated_count
        );
        if !self.errors.is_empty() {
            message.push_str(&format!(" {} errors found.", self.errors.len()));
        }
        message
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: ImportReport,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            message: report.summary(),
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_without_errors_has_no_suffix() {
        let report = ImportReport {
            inserted_count: 3,
            updated_count: 1,
            errors: Vec::new(),
        };
        assert_eq!(report.summary(), "Import complete. Inserted: 3, Updated: 1.");
    }

    #[test]
    fn summary_counts_errors() {
        let report = ImportReport {
            inserted_count: 0,
            updated_count: 2,
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            report.summary(),
            "Import complete. Inserted: 0, Updated: 2. 2 errors found."
        );
    }

    #[test]
    fn response_flattens_report_fields() {
        let response = ImportResponse::from(ImportReport {
            inserted_count: 1,
            updated_count: 0,
            errors: Vec::new(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Import complete. Inserted: 1, Updated: 0.");
        assert_eq!(json["insertedCount"], 1);
        assert_eq!(json["updatedCount"], 0);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
