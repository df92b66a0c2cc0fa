use clap::{CommandFactory, Parser};
use inventory_publish::utils::{logger, validation::Validate};
use inventory_publish::{
    CliConfig, EtlEngine, EtlError, FtpUploader, InventoryPipeline, LocalStorage, PublishConfig,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting inventory-publish");
    tracing::debug!("CLI config: {:?}", config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("❌ Inventory conversion failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());

            println!("{}", e);
            println!();
            println!("{}", CliConfig::command().render_help());
            ExitCode::from(2)
        }
    }
}

fn run(config: &CliConfig) -> Result<(), EtlError> {
    config.validate()?;

    let mut settings = PublishConfig::load(config.config.as_deref())?;
    settings.validate()?;
    settings.transfer.apply_env();
    if config.upload_enabled() {
        if let Err(e) = settings.transfer.validate_credentials() {
            tracing::warn!("Upload credentials incomplete: {}", e);
        }
    }

    let mut uploader = FtpUploader::new(settings.transfer.clone());
    let today = chrono::Local::now().date_naive();
    let pipeline = InventoryPipeline::new(
        LocalStorage::new("."),
        settings,
        config.input.to_string_lossy(),
        config.output.to_string_lossy(),
        today,
    );

    let engine = EtlEngine::new(pipeline);
    let session = config.upload_enabled().then_some(&mut uploader);
    let root = engine.pipeline().storage().root();
    let (report, _outcome) = engine.run_and_deliver(session, root)?;
    tracing::info!(
        "✅ Converted {} of {} rows",
        report.rows_kept,
        report.rows_read
    );

    Ok(())
}
