use crate::core::transfer::{deliver, TransferOutcome};
use crate::core::{Pipeline, TransferSession};
use crate::utils::error::Result;
use std::path::Path;

/// Counts and outputs of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub report_run_date: String,
    pub written: Vec<String>,
}

impl RunReport {
    /// The categorized listing is always the last file written.
    pub fn listing_path(&self) -> Option<&str> {
        self.written.last().map(String::as_str)
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting inventory conversion");

        let extract = self.pipeline.extract()?;
        let rows_read = extract.rows.len();
        tracing::info!("Extracted {} report rows", rows_read);

        let document = self.pipeline.transform(extract)?;
        let rows_kept = document.inventory().len();
        tracing::info!(
            "Kept {} of {} rows (run date: '{}')",
            rows_kept,
            rows_read,
            document.report_run_date()
        );

        let written = self.pipeline.load(&document)?;
        tracing::info!("Output saved to: {}", written.join(", "));

        Ok(RunReport {
            rows_read,
            rows_kept,
            report_run_date: document.report_run_date().to_string(),
            written,
        })
    }

    /// Runs the conversion, then hands the listing under `root` to `session`.
    ///
    /// Only conversion errors are returned. The upload happens after both files
    /// are written, so missing credentials or an unreachable server show up in
    /// the outcome and never undo the local output.
    pub fn run_and_deliver<T: TransferSession>(
        &self,
        session: Option<&mut T>,
        root: &Path,
    ) -> Result<(RunReport, Option<TransferOutcome>)> {
        let report = self.run()?;

        let Some(session) = session else {
            tracing::info!("Upload skipped");
            return Ok((report, None));
        };

        let listing = match report.listing_path() {
            Some(path) => root.join(path),
            None => return Ok((report, None)),
        };
        let outcome = deliver(session, &listing);
        tracing::info!("Upload outcome: {:?}", outcome);

        Ok((report, Some(outcome)))
    }
}
