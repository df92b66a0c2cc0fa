use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder stored in any column the source line did not supply.
pub const MISSING_FIELD: &str = "## MISSING FIELD ##";

/// Number of positional columns in an inventory export line.
pub const REPORT_COLUMNS: usize = 7;

/// One line of the inventory export.
///
/// Fields are declared in alphabetical order so the structured form comes out
/// with sorted keys without a post-processing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub category: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extraneous: Vec<String>,
    pub last_updated: String,
    pub manufacturer: String,
    pub price: String,
    pub quantity: String,
    pub row_number: u64,
    pub size: String,
    pub style: String,
}

impl ReportRow {
    /// Builds a row from positional values, padding short lines with
    /// [`MISSING_FIELD`] and keeping surplus values as extraneous.
    pub fn from_fields<I, S>(row_number: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = fields.into_iter().map(Into::<String>::into);
        let mut next = || values.next().unwrap_or_else(|| MISSING_FIELD.to_string());

        let manufacturer = next();
        let style = next();
        let category = next();
        let size = next();
        let price = next();
        let quantity = next();
        let last_updated = next();

        Self {
            category,
            extraneous: values.collect(),
            last_updated,
            manufacturer,
            price,
            quantity,
            row_number,
            size,
            style,
        }
    }

    /// The seven named columns, in source order.
    pub fn named_fields(&self) -> [(&'static str, &str); REPORT_COLUMNS] {
        [
            ("manufacturer", &self.manufacturer),
            ("style", &self.style),
            ("category", &self.category),
            ("size", &self.size),
            ("price", &self.price),
            ("quantity", &self.quantity),
            ("last_updated", &self.last_updated),
        ]
    }

    pub fn has_missing_field(&self) -> bool {
        self.named_fields()
            .iter()
            .any(|(_, value)| *value == MISSING_FIELD)
    }

    pub fn is_extraneous(&self) -> bool {
        !self.extraneous.is_empty()
    }
}

/// Raw rows read from one export, before any filtering.
#[derive(Debug, Clone)]
pub struct ReportExtract {
    pub source: PathBuf,
    pub rows: Vec<ReportRow>,
}

/// The published inventory snapshot. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    inventory: Vec<ReportRow>,
    report_run_date: String,
}

impl InventoryDocument {
    pub fn new(report_run_date: String, inventory: Vec<ReportRow>) -> Self {
        Self {
            inventory,
            report_run_date,
        }
    }

    pub fn report_run_date(&self) -> &str {
        &self.report_run_date
    }

    pub fn inventory(&self) -> &[ReportRow] {
        &self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_is_padded_with_sentinel() {
        let row = ReportRow::from_fields(3, ["Acme", "IPA", "BEER"]);

        assert_eq!(row.row_number, 3);
        assert_eq!(row.category, "BEER");
        assert_eq!(row.size, MISSING_FIELD);
        assert_eq!(row.last_updated, MISSING_FIELD);
        assert!(row.has_missing_field());
        assert!(!row.is_extraneous());
    }

    #[test]
    fn test_long_line_keeps_surplus_values() {
        let row = ReportRow::from_fields(
            1,
            ["Acme", "IPA", "BEER", "6PK", "1099", "4", "20200401", "x", "y"],
        );

        assert!(!row.has_missing_field());
        assert_eq!(row.extraneous, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(row.last_updated, "20200401");
    }
}
