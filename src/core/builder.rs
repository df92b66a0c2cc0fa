use crate::domain::model::{InventoryDocument, ReportRow};
use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

/// Length of the `YYYYMMDDHHMM` prefix a report file name may carry.
pub const RUN_STAMP_LEN: usize = 12;

/// Long-form rendering, e.g. `Tuesday April 28 2020 02:45PM`.
pub const RUN_DATE_DISPLAY_FORMAT: &str = "%A %B %d %Y %I:%M%p";

/// Derives the human-readable run date from the report's file name.
///
/// Names whose stem is shorter than twelve characters have no run date. A
/// twelve-character prefix that is not a valid timestamp is an error.
pub fn extract_run_date(report: &Path) -> Result<String> {
    let stem = report
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let stamp: String = stem.chars().take(RUN_STAMP_LEN).collect();

    if stamp.chars().count() != RUN_STAMP_LEN {
        return Ok(String::new());
    }

    let run_at = parse_run_stamp(&stamp)?;
    Ok(run_at.format(RUN_DATE_DISPLAY_FORMAT).to_string())
}

fn parse_run_stamp(stamp: &str) -> Result<NaiveDateTime> {
    let malformed = |reason: &str| EtlError::MalformedRunDate {
        value: stamp.to_string(),
        reason: reason.to_string(),
    };

    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed("expected YYYYMMDDHHMM digits"));
    }

    let part = |range: std::ops::Range<usize>| -> u32 {
        stamp[range].parse().unwrap_or_default()
    };

    NaiveDate::from_ymd_opt(part(0..4) as i32, part(4..6), part(6..8))
        .ok_or_else(|| malformed("not a calendar date"))?
        .and_hms_opt(part(8..10), part(10..12), 0)
        .ok_or_else(|| malformed("not a time of day"))
}

/// Folds accepted rows into an [`InventoryDocument`] for one report.
#[derive(Debug, Clone)]
pub struct InventoryBuilder {
    report_run_date: String,
    rows: Vec<ReportRow>,
}

impl InventoryBuilder {
    /// Fails fast on a malformed run-date prefix, before any row is read.
    pub fn for_report(report: &Path) -> Result<Self> {
        Ok(Self {
            report_run_date: extract_run_date(report)?,
            rows: Vec::new(),
        })
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn build(self) -> InventoryDocument {
        InventoryDocument::new(self.report_run_date, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_date_from_prefixed_name() {
        let date = extract_run_date(Path::new("/exports/202004281445_report.csv")).unwrap();
        assert_eq!(date, "Tuesday April 28 2020 02:45PM");
    }

    #[test]
    fn test_run_date_from_bare_stamp() {
        let date = extract_run_date(Path::new("202001010005.csv")).unwrap();
        assert_eq!(date, "Wednesday January 01 2020 12:05AM");
    }

    #[test]
    fn test_short_name_has_no_run_date() {
        assert_eq!(extract_run_date(Path::new("report.csv")).unwrap(), "");
        assert_eq!(extract_run_date(Path::new("20200428.csv")).unwrap(), "");
    }

    #[test]
    fn test_malformed_stamp_is_an_error() {
        for name in ["202013281445.csv", "202004281475.csv", "inventory_report.csv"] {
            let result = extract_run_date(Path::new(name));
            assert!(
                matches!(result, Err(EtlError::MalformedRunDate { .. })),
                "{} should not parse",
                name
            );
        }
    }

    #[test]
    fn test_rows_keep_source_order() {
        let rows = vec![
            ReportRow::from_fields(3, ["Zeta", "Lager", "BEER", "6PK", "999", "5", "20200420"]),
            ReportRow::from_fields(1, ["Acme", "IPA", "BEER", "6PK", "1099", "4", "20200420"]),
        ];

        let mut builder = InventoryBuilder::for_report(Path::new("202004281445.csv")).unwrap();
        assert!(builder.is_empty());
        rows.iter().cloned().for_each(|row| builder.push(row));
        assert_eq!(builder.len(), 2);

        let document = builder.build();
        assert_eq!(document.report_run_date(), "Tuesday April 28 2020 02:45PM");
        assert_eq!(document.inventory(), rows.as_slice());
    }
}
