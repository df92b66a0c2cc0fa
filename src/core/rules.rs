//! Row validation and retention.
//!
//! A row goes through a structural check (no sentinel-filled column) and then
//! through an ordered list of [`RetentionRule`]s. The first rule that drops the
//! row decides the outcome.

use crate::config::toml_config::RetentionConfig;
use crate::domain::model::ReportRow;
use crate::utils::error::{EtlError, Result};
use chrono::{NaiveDate, TimeDelta};

/// Date layout of the `last_updated` column.
pub const LAST_UPDATED_FORMAT: &str = "%Y%m%d";

/// What a single retention rule thinks of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Drop,
    /// Dropped, with a message worth showing to the operator.
    DropWithDiagnostic(String),
}

pub trait RetentionRule {
    fn name(&self) -> &'static str;
    fn evaluate(&self, row: &ReportRow) -> Verdict;
}

/// Outcome of running a row through the [`RowFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub keep: bool,
    pub diagnostic: Option<String>,
}

impl Decision {
    fn keep(diagnostic: Option<String>) -> Self {
        Self {
            keep: true,
            diagnostic,
        }
    }

    fn drop(diagnostic: Option<String>) -> Self {
        Self {
            keep: false,
            diagnostic,
        }
    }
}

/// Keeps rows updated strictly after the cutoff day.
///
/// Both sides are `YYYYMMDD` strings, so lexicographic order is date order.
pub struct UpdatedAfter {
    cutoff: String,
}

impl UpdatedAfter {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self {
            cutoff: cutoff.format(LAST_UPDATED_FORMAT).to_string(),
        }
    }

    /// Fails instead of overflowing when `days` reaches outside chrono's range.
    pub fn days_before(today: NaiveDate, days: i64) -> Result<Self> {
        TimeDelta::try_days(days)
            .and_then(|delta| today.checked_sub_signed(delta))
            .map(Self::new)
            .ok_or_else(|| EtlError::InvalidConfigValueError {
                field: "retention.max_age_days".to_string(),
                value: days.to_string(),
                reason: format!("cutoff before {} is out of range", today),
            })
    }

    pub fn cutoff(&self) -> &str {
        &self.cutoff
    }
}

impl RetentionRule for UpdatedAfter {
    fn name(&self) -> &'static str {
        "updated-after"
    }

    fn evaluate(&self, row: &ReportRow) -> Verdict {
        if row.last_updated.as_str() > self.cutoff.as_str() {
            Verdict::Keep
        } else {
            Verdict::Drop
        }
    }
}

/// Drops rows whose column contains any of the given substrings.
pub struct ExcludeSubstrings {
    name: &'static str,
    column: fn(&ReportRow) -> &str,
    patterns: Vec<String>,
}

impl ExcludeSubstrings {
    pub fn sizes(patterns: Vec<String>) -> Self {
        Self {
            name: "excluded-size",
            column: |row| row.size.as_str(),
            patterns,
        }
    }

    pub fn categories(patterns: Vec<String>) -> Self {
        Self {
            name: "excluded-category",
            column: |row| row.category.as_str(),
            patterns,
        }
    }
}

impl RetentionRule for ExcludeSubstrings {
    fn name(&self) -> &'static str {
        self.name
    }

    fn evaluate(&self, row: &ReportRow) -> Verdict {
        let value = (self.column)(row);
        if self.patterns.iter().any(|pattern| value.contains(pattern.as_str())) {
            Verdict::Drop
        } else {
            Verdict::Keep
        }
    }
}

/// Keeps rows whose quantity parses and is strictly above the floor.
pub struct QuantityAbove {
    floor: i64,
}

impl QuantityAbove {
    pub fn new(floor: i64) -> Self {
        Self { floor }
    }
}

impl RetentionRule for QuantityAbove {
    fn name(&self) -> &'static str {
        "quantity-above"
    }

    fn evaluate(&self, row: &ReportRow) -> Verdict {
        match row.quantity.trim().parse::<i64>() {
            Ok(quantity) if quantity > self.floor => Verdict::Keep,
            Ok(_) => Verdict::Drop,
            Err(_) => Verdict::DropWithDiagnostic(format!(
                "line #{} quantity is not a valid number: {}",
                row.row_number, row.quantity
            )),
        }
    }
}

/// Structural validation followed by the retention rules, in order.
pub struct RowFilter {
    rules: Vec<Box<dyn RetentionRule>>,
}

impl RowFilter {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl RetentionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// The standard retention policy, with the age cutoff measured from `today`.
    pub fn from_config(config: &RetentionConfig, today: NaiveDate) -> Result<Self> {
        Ok(Self::new()
            .with_rule(UpdatedAfter::days_before(today, config.max_age_days)?)
            .with_rule(ExcludeSubstrings::sizes(config.excluded_sizes.clone()))
            .with_rule(ExcludeSubstrings::categories(config.excluded_categories.clone()))
            .with_rule(QuantityAbove::new(config.min_quantity_exclusive)))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn evaluate(&self, row: &ReportRow) -> Decision {
        if row.has_missing_field() {
            return Decision::drop(Some(format!("line #{} is missing fields", row.row_number)));
        }

        let note = row.is_extraneous().then(|| {
            format!(
                "line #{} had too many fields or one of the field values in the line contains a \" character in the value",
                row.row_number
            )
        });

        for rule in &self.rules {
            match rule.evaluate(row) {
                Verdict::Keep => continue,
                Verdict::Drop => {
                    tracing::trace!(row = row.row_number, rule = rule.name(), "row dropped");
                    return Decision::drop(note);
                }
                Verdict::DropWithDiagnostic(message) => {
                    tracing::trace!(row = row.row_number, rule = rule.name(), "row dropped");
                    let diagnostic = match note {
                        Some(note) => format!("{}\n{}", note, message),
                        None => message,
                    };
                    return Decision::drop(Some(diagnostic));
                }
            }
        }

        Decision::keep(note)
    }
}

impl Default for RowFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MISSING_FIELD;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 5, 1).unwrap()
    }

    fn standard_filter() -> RowFilter {
        RowFilter::from_config(&RetentionConfig::default(), today()).unwrap()
    }

    fn row(category: &str, size: &str, quantity: &str, last_updated: &str) -> ReportRow {
        ReportRow::from_fields(
            7,
            ["Acme", "Pale Ale", category, size, "1299", quantity, last_updated],
        )
    }

    #[test]
    fn test_cutoff_is_180_days_before_today() {
        let rule = UpdatedAfter::days_before(today(), 180).unwrap();
        assert_eq!(rule.cutoff(), "20191103");
    }

    #[test]
    fn test_out_of_range_age_is_an_error() {
        let config = RetentionConfig {
            max_age_days: 10_000_000_000,
            ..RetentionConfig::default()
        };

        assert!(matches!(
            RowFilter::from_config(&config, today()),
            Err(EtlError::InvalidConfigValueError { field, .. }) if field == "retention.max_age_days"
        ));
        assert!(UpdatedAfter::days_before(today(), i64::MAX).is_err());
    }

    #[test]
    fn test_recent_row_is_kept() {
        let decision = standard_filter().evaluate(&row("BEER", "6PK", "12", "20200420"));
        assert_eq!(decision, Decision::keep(None));
    }

    #[test]
    fn test_stale_row_is_dropped() {
        let filter = standard_filter();
        assert!(!filter.evaluate(&row("BEER", "6PK", "12", "20191103")).keep);
        assert!(!filter.evaluate(&row("BEER", "6PK", "12", "20190101")).keep);
        assert!(filter.evaluate(&row("BEER", "6PK", "12", "20191104")).keep);
    }

    #[test]
    fn test_excluded_sizes_are_dropped() {
        let filter = standard_filter();
        for size in ["12/.355L", "4PK .473L", "32OZ", "64OZ GROWLER", "64 OZ"] {
            let decision = filter.evaluate(&row("BEER", size, "24", "20200420"));
            assert!(!decision.keep, "size {} should be excluded", size);
            assert_eq!(decision.diagnostic, None);
        }
        assert!(filter.evaluate(&row("BEER", "750ML", "24", "20200420")).keep);
    }

    #[test]
    fn test_accessories_are_dropped() {
        let filter = standard_filter();
        assert!(!filter.evaluate(&row("ACCESSORIES", "EACH", "5", "20200420")).keep);
        assert!(!filter.evaluate(&row("BAR ACCESS", "EACH", "5", "20200420")).keep);
    }

    #[test]
    fn test_quantity_must_exceed_one() {
        let filter = standard_filter();
        assert!(!filter.evaluate(&row("WINE", "750ML", "1", "20200420")).keep);
        assert!(!filter.evaluate(&row("WINE", "750ML", "0", "20200420")).keep);
        assert!(!filter.evaluate(&row("WINE", "750ML", "-3", "20200420")).keep);
        assert!(filter.evaluate(&row("WINE", "750ML", "2", "20200420")).keep);
    }

    #[test]
    fn test_non_numeric_quantity_names_value_and_row() {
        let decision = standard_filter().evaluate(&row("WINE", "750ML", "abc", "20200420"));

        assert!(!decision.keep);
        assert_eq!(
            decision.diagnostic.as_deref(),
            Some("line #7 quantity is not a valid number: abc")
        );
    }

    #[test]
    fn test_missing_field_is_rejected_in_any_position() {
        let filter = standard_filter();
        let complete = ["Acme", "IPA", "BEER", "6PK", "1299", "12", "20200420"];

        for position in 0..complete.len() {
            let mut fields = complete.map(|s| s.to_string());
            fields[position] = MISSING_FIELD.to_string();
            let decision = filter.evaluate(&ReportRow::from_fields(4, fields));

            assert!(!decision.keep);
            assert_eq!(decision.diagnostic.as_deref(), Some("line #4 is missing fields"));
        }
    }

    #[test]
    fn test_extraneous_row_is_flagged_but_kept() {
        let extra = ReportRow::from_fields(
            9,
            ["Acme", "IPA", "BEER", "6PK", "1299", "12", "20200420", "oops"],
        );
        let decision = standard_filter().evaluate(&extra);

        assert!(decision.keep);
        assert!(decision
            .diagnostic
            .unwrap()
            .starts_with("line #9 had too many fields"));
    }

    #[test]
    fn test_rules_compose_in_order() {
        let filter = RowFilter::new()
            .with_rule(ExcludeSubstrings::categories(vec!["SPIRITS".to_string()]))
            .with_rule(QuantityAbove::new(10));

        assert_eq!(filter.rule_names(), vec!["excluded-category", "quantity-above"]);
        assert!(!filter.evaluate(&row("SPIRITS", "750ML", "50", "20000101")).keep);
        assert!(!filter.evaluate(&row("BEER", "6PK", "5", "20000101")).keep);
        assert!(filter.evaluate(&row("BEER", "6PK", "11", "20000101")).keep);
    }
}
