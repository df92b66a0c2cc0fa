use crate::config::toml_config::{FtpSecurity, TransferConfig};
use crate::domain::ports::{TransferSession, UploadReport};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::validate_required_field;
use native_tls::TlsConnector;
use std::fs::File;
use std::path::Path;
use suppaftp::types::FileType;
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};

/// FTP session with optional explicit TLS (`AUTH TLS`).
pub struct FtpUploader {
    config: TransferConfig,
    stream: Option<NativeTlsFtpStream>,
}

impl FtpUploader {
    pub fn new(config: TransferConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn tls_connector(&self) -> Result<NativeTlsConnector> {
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .danger_accept_invalid_hostnames(self.config.accept_invalid_certs)
            .build()?;
        Ok(NativeTlsConnector::from(connector))
    }

    fn stream(&mut self) -> Result<&mut NativeTlsFtpStream> {
        self.stream.as_mut().ok_or_else(|| EtlError::ValidationError {
            message: "not connected to a file server".to_string(),
        })
    }
}

/// Name a local file is stored under on the server: its base name.
pub fn remote_name(local_file: &Path) -> Result<String> {
    local_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| EtlError::InvalidConfigValueError {
            field: "file".to_string(),
            value: local_file.to_string_lossy().into_owned(),
            reason: "not a file name".to_string(),
        })
}

impl TransferSession for FtpUploader {
    fn connect(&mut self) -> Result<()> {
        let server = validate_required_field("transfer.server", &self.config.server)?.clone();
        let username = validate_required_field("transfer.username", &self.config.username)?;
        let password = validate_required_field("transfer.password", &self.config.password)?;
        let port = self.config.effective_port();
        let security = self.config.security();

        tracing::debug!("Connecting to {}:{} ({:?})", server, port, security);
        let mut stream = NativeTlsFtpStream::connect((server.as_str(), port))?;
        if security == FtpSecurity::ExplicitTls {
            stream = stream.into_secure(self.tls_connector()?, &server)?;
        }

        stream.login(username, password)?;
        if let Some(welcome) = stream.get_welcome_msg() {
            tracing::debug!("Server welcome: {}", welcome.trim());
        }
        stream.transfer_type(FileType::Binary)?;

        if let Some(remote_dir) = &self.config.remote_dir {
            stream.cwd(remote_dir)?;
        }

        self.stream = Some(stream);
        Ok(())
    }

    fn upload(&mut self, local_file: &Path) -> Result<UploadReport> {
        let remote_name = remote_name(local_file)?;
        let local_size = std::fs::metadata(local_file)?.len();
        let mut reader = File::open(local_file)?;

        let stream = self.stream()?;
        stream.put_file(&remote_name, &mut reader)?;
        let remote_size = stream.size(&remote_name)? as u64;

        Ok(UploadReport {
            remote_name,
            local_size,
            remote_size,
        })
    }

    fn disconnect(&mut self) -> Result<()> {
        match self.stream.take() {
            Some(mut stream) => {
                stream.quit()?;
                tracing::debug!("Disconnected from file server");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_name_is_base_name() {
        assert_eq!(
            remote_name(Path::new("site/out/inventory.html")).unwrap(),
            "inventory.html"
        );
        assert!(remote_name(Path::new("..")).is_err());
    }

    #[test]
    fn test_connect_requires_server() {
        let mut uploader = FtpUploader::new(TransferConfig::default());

        assert!(matches!(
            uploader.connect(),
            Err(EtlError::MissingConfigError { field }) if field == "transfer.server"
        ));
        assert!(!uploader.is_connected());
    }

    #[test]
    fn test_upload_without_session_fails_and_disconnect_is_noop() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let mut uploader = FtpUploader::new(TransferConfig::default());

        assert!(uploader.upload(temp_file.path()).is_err());
        assert!(uploader.disconnect().is_ok());
    }
}
