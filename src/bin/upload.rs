use anyhow::Context;
use clap::{CommandFactory, Parser};
use inventory_publish::config::toml_config::DEFAULT_STRUCTURED_FILE;
use inventory_publish::utils::{logger, validation::Validate};
use inventory_publish::{deliver, FtpUploader, PublishConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "inventory-upload")]
#[command(about = "Upload a file to the web site over FTP/FTPS")]
#[command(after_help = "Credentials fall back to INVENTORY_FTP_SERVER, INVENTORY_FTP_USER and \
INVENTORY_FTP_PASSWORD, then to the [transfer] section of the config file.\n\n\
Examples:\n  inventory-upload -f inventory.html -u auto -s ftp.example.com")]
struct Args {
    /// The file to upload to the web site
    #[arg(short = 'f', long = "file", default_value = DEFAULT_STRUCTURED_FILE)]
    file: PathBuf,

    /// The web server to upload the file to
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// The username of the ftp account
    #[arg(short = 'u', long = "username")]
    username: Option<String>,

    /// The password for the ftp account
    #[arg(short = 'p', long = "password")]
    password: Option<String>,

    /// Use the insecure method (plain FTP, no AUTH TLS). Try not to do this
    #[arg(short = 'x', long = "insecure")]
    insecure: bool,

    /// Override the control port (default 21)
    #[arg(long)]
    port: Option<u16>,

    /// TOML configuration file (defaults to inventory-publish.toml when present)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("❌ Upload setup failed: {:#}", e);
            println!("{:#}", e);
            println!();
            println!("{}", Args::command().render_help());
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = PublishConfig::load(args.config.as_deref()).context("loading configuration")?;
    settings.validate()?;

    let mut transfer = settings.transfer;
    transfer.apply_env();

    if let Some(server) = &args.server {
        transfer.server = Some(server.clone());
    }
    if let Some(username) = &args.username {
        transfer.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        transfer.password = Some(password.clone());
    }
    if args.insecure {
        transfer.use_tls = false;
    }
    if let Some(port) = args.port {
        transfer.port = Some(port);
    }

    transfer
        .validate_credentials()
        .context("incomplete transfer settings")?;

    tracing::info!(
        "Uploading {} to {}",
        args.file.display(),
        transfer.server.as_deref().unwrap_or_default()
    );
    let mut uploader = FtpUploader::new(transfer);
    let outcome = deliver(&mut uploader, &args.file);
    tracing::info!("Upload outcome: {:?}", outcome);

    Ok(())
}
