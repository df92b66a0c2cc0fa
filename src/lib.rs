pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ftp::FtpUploader;
pub use config::cli::LocalStorage;
pub use config::toml_config::PublishConfig;
pub use core::{
    etl::{EtlEngine, RunReport},
    pipeline::InventoryPipeline,
    transfer::{deliver, TransferOutcome},
};
pub use utils::error::{EtlError, Result};
