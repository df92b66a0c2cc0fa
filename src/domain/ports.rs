use crate::domain::model::{InventoryDocument, ReportExtract};
use crate::utils::error::Result;
use std::path::Path;

pub trait Storage {
    fn exists(&self, path: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<ReportExtract>;
    fn transform(&self, extract: ReportExtract) -> Result<InventoryDocument>;
    /// Writes every rendering and returns the paths written, listing last.
    fn load(&self, document: &InventoryDocument) -> Result<Vec<String>>;
}

/// Result of storing one file on the remote side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub remote_name: String,
    pub local_size: u64,
    pub remote_size: u64,
}

impl UploadReport {
    pub fn size_matches(&self) -> bool {
        self.local_size == self.remote_size
    }
}

/// A file-transfer session: connect, store files, disconnect.
pub trait TransferSession {
    fn connect(&mut self) -> Result<()>;
    fn upload(&mut self, local_file: &Path) -> Result<UploadReport>;
    fn disconnect(&mut self) -> Result<()>;
}
