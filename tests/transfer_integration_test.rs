use anyhow::Result;
use inventory_publish::config::toml_config::TransferConfig;
use inventory_publish::{deliver, FtpUploader, TransferOutcome};
use std::io::Write;
use tempfile::NamedTempFile;

fn unreachable_server() -> TransferConfig {
    TransferConfig {
        server: Some("127.0.0.1".to_string()),
        username: Some("auto".to_string()),
        password: Some("not-a-real-password".to_string()),
        use_tls: false,
        port: Some(1),
        ..TransferConfig::default()
    }
}

/// A refused connection is reported in the outcome and never panics or errors.
#[test]
fn test_refused_connection_is_swallowed() -> Result<()> {
    let mut listing = NamedTempFile::new()?;
    listing.write_all(b"<HTML></HTML>")?;

    let mut uploader = FtpUploader::new(unreachable_server());
    let outcome = deliver(&mut uploader, listing.path());

    assert!(matches!(outcome, TransferOutcome::Failed { stage: "connect", .. }));
    assert!(!uploader.is_connected());
    Ok(())
}

#[test]
fn test_missing_credentials_fail_at_connect() -> Result<()> {
    let listing = NamedTempFile::new()?;
    let config = TransferConfig {
        password: None,
        ..unreachable_server()
    };

    let mut uploader = FtpUploader::new(config);
    let outcome = deliver(&mut uploader, listing.path());

    match outcome {
        TransferOutcome::Failed { stage, message } => {
            assert_eq!(stage, "connect");
            assert!(message.contains("transfer.password"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}
