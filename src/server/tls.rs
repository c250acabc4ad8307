//! Builds the rustls server configuration from PEM certificate and key
//! files.

use rustls::{Certificate, PrivateKey, ServerConfig};
use std::{fs::File, io::BufReader, path::Path, sync::Arc};
use thiserror::Error;

/// Error raised while loading the TLS certificate or private key.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The certificate or key file could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        /// The offending file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The certificate file contained no certificates.
    #[error("no certificates found in {0}")]
    EmptyCertFile(String),
    /// The key file contained no usable private key.
    #[error("no PKCS#8 or RSA private key found in {0}")]
    EmptyKeyFile(String),
    /// rustls rejected the certificate/key pair.
    #[error("invalid certificate/key pair: {0}")]
    Tls(#[from] rustls::Error),
}

pub(crate) fn new_config<P: AsRef<Path>>(certs_file: P, key_file: P) -> Result<Arc<ServerConfig>, ConfigError> {
    let certs = load_certs(certs_file.as_ref())?;
    let key = load_private_key(key_file.as_ref())?;

    let config = ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(certs, key)?;

    Ok(Arc::new(config))
}

fn open(path: &Path) -> Result<BufReader<File>, ConfigError> {
    File::open(path).map(BufReader::new).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn load_certs(path: &Path) -> Result<Vec<Certificate>, ConfigError> {
    let mut reader = open(path)?;
    let certs = rustls_pemfile::certs(&mut reader).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if certs.is_empty() {
        return Err(ConfigError::EmptyCertFile(path.display().to_string()));
    }
    Ok(certs.into_iter().map(Certificate).collect())
}

fn load_private_key(path: &Path) -> Result<PrivateKey, ConfigError> {
    let mut reader = open(path)?;
    let pkcs8 = rustls_pemfile::pkcs8_private_keys(&mut reader).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    if let Some(key) = pkcs8.into_iter().next() {
        return Ok(PrivateKey(key));
    }

    // Fall back to the legacy RSA format.
    let mut reader = open(path)?;
    let rsa = rustls_pemfile::rsa_private_keys(&mut reader).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    match rsa.into_iter().next() {
        Some(key) => Ok(PrivateKey(key)),
        None => Err(ConfigError::EmptyKeyFile(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_reported() {
        let err = new_config("/nonexistent/cert.pem", "/nonexistent/key.pem").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
