use crate::core::TransferSession;
use std::path::Path;

/// How a delivery attempt ended. Failures are reported, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Delivered { remote_name: String, bytes: u64 },
    SizeMismatch { warning: String },
    Failed { stage: &'static str, message: String },
}

impl TransferOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, TransferOutcome::Delivered { .. })
    }
}

/// Connects, uploads `local_file` and disconnects.
///
/// Every failure is printed and logged, then folded into the outcome, so a
/// failed upload never aborts a run whose local files are already written.
/// The session is disconnected on every path once `connect` was attempted.
pub fn deliver<T: TransferSession>(session: &mut T, local_file: &Path) -> TransferOutcome {
    if let Err(e) = session.connect() {
        let outcome = failed("connect", e.to_string());
        close(session);
        return outcome;
    }

    let outcome = match session.upload(local_file) {
        Ok(report) if report.size_matches() => {
            tracing::info!(
                "Uploaded {} ({} bytes)",
                report.remote_name,
                report.local_size
            );
            TransferOutcome::Delivered {
                remote_name: report.remote_name,
                bytes: report.local_size,
            }
        }
        Ok(report) => {
            let warning = format!("WARNING! {} failed to upload", report.remote_name);
            tracing::warn!(
                local_size = report.local_size,
                remote_size = report.remote_size,
                "{}",
                warning
            );
            println!("{}", warning);
            TransferOutcome::SizeMismatch { warning }
        }
        Err(e) => failed("upload", e.to_string()),
    };

    close(session);
    outcome
}

fn failed(stage: &'static str, message: String) -> TransferOutcome {
    tracing::warn!(stage, "transfer failed: {}", message);
    println!("{}", message);
    TransferOutcome::Failed { stage, message }
}

fn close<T: TransferSession>(session: &mut T) {
    if let Err(e) = session.disconnect() {
        tracing::warn!("disconnect failed: {}", e);
        println!("{}", e);
    }
}
