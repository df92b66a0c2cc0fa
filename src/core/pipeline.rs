use crate::config::toml_config::PublishConfig;
use crate::core::builder::InventoryBuilder;
use crate::core::rules::RowFilter;
use crate::core::serializer::{render_listing, to_structured_string};
use crate::core::{InventoryDocument, Pipeline, ReportExtract, ReportRow, Storage};
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::path::PathBuf;

/// Converts one inventory export into the structured snapshot and the
/// categorized listing.
pub struct InventoryPipeline<S: Storage> {
    storage: S,
    config: PublishConfig,
    report: String,
    listing: String,
    today: NaiveDate,
}

impl<S: Storage> InventoryPipeline<S> {
    /// `today` anchors the retention age cutoff for this run.
    pub fn new(
        storage: S,
        config: PublishConfig,
        report: impl Into<String>,
        listing: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            storage,
            config,
            report: report.into(),
            listing: listing.into(),
            today,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn decode_rows(&self, data: &[u8]) -> Result<Vec<ReportRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|source| EtlError::ReportDecodeError {
                file: self.report.clone(),
                line: source
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(index as u64 + 1),
                source,
            })?;

            if is_blank(&record) {
                continue;
            }

            let row_number = record
                .position()
                .map(|pos| pos.line())
                .unwrap_or(index as u64 + 1);
            rows.push(ReportRow::from_fields(row_number, record.iter()));
        }

        Ok(rows)
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record[0].is_empty())
}

/// Row diagnostics are part of the tool's stdout contract.
fn report_diagnostic(message: &str) {
    tracing::debug!("{}", message);
    println!("{}", message);
}

impl<S: Storage> Pipeline for InventoryPipeline<S> {
    fn extract(&self) -> Result<ReportExtract> {
        if !self.storage.exists(&self.report) {
            return Err(EtlError::InvalidInputFile {
                path: self.report.clone(),
            });
        }

        tracing::debug!("Reading inventory report {}", self.report);
        let data = self.storage.read_file(&self.report)?;
        let rows = self.decode_rows(&data)?;

        Ok(ReportExtract {
            source: PathBuf::from(&self.report),
            rows,
        })
    }

    fn transform(&self, extract: ReportExtract) -> Result<InventoryDocument> {
        let mut builder = InventoryBuilder::for_report(&extract.source)?;
        let filter = RowFilter::from_config(&self.config.retention, self.today)?;
        tracing::debug!(
            "Applying retention rules {:?} as of {}",
            filter.rule_names(),
            self.today
        );

        for row in extract.rows {
            let decision = filter.evaluate(&row);
            if let Some(diagnostic) = &decision.diagnostic {
                report_diagnostic(diagnostic);
            }
            if decision.keep {
                builder.push(row);
            }
        }

        if builder.is_empty() {
            tracing::warn!("No rows in {} passed the retention rules", self.report);
        } else {
            tracing::debug!("{} rows retained", builder.len());
        }
        Ok(builder.build())
    }

    fn load(&self, document: &InventoryDocument) -> Result<Vec<String>> {
        let structured_path = self.config.output.structured_file.clone();
        let structured = to_structured_string(document)?;
        tracing::debug!(
            "Writing structured inventory ({} bytes) to {}",
            structured.len(),
            structured_path
        );
        self.storage
            .write_file(&structured_path, structured.as_bytes())?;

        let listing = render_listing(document, &self.config.listing);
        tracing::debug!(
            "Writing categorized listing ({} bytes) to {}",
            listing.len(),
            self.listing
        );
        self.storage.write_file(&self.listing, listing.as_bytes())?;

        Ok(vec![structured_path, self.listing.clone()])
    }
}
