pub mod builder;
pub mod etl;
pub mod pipeline;
pub mod rules;
pub mod serializer;
pub mod transfer;

pub use crate::domain::model::{InventoryDocument, ReportExtract, ReportRow};
pub use crate::domain::ports::{Pipeline, Storage, TransferSession};
pub use crate::utils::error::Result;
