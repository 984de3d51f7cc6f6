//! Command line and environment configuration.
//!
//! ```bash
//! wire-http-app --directory /tmp/files --port 4221
//! HTTP_FILE_DIR=/tmp/files HTTP_HOST=127.0.0.1 wire-http-app
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "wire-http-app")]
#[command(about = "HTTP/1.1 server with echo, user-agent and file storage routes")]
#[command(version)]
pub struct Config {
    /// Directory where the files are stored and read from
    #[arg(long, default_value = ".", env = "HTTP_FILE_DIR")]
    pub directory: PathBuf,

    /// Host/IP to listen on
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 4221, env = "HTTP_PORT")]
    pub port: u16,
}

impl Config {
    /// A config serving files out of `directory`, listening on the defaults.
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into(), host: "0.0.0.0".to_string(), port: 4221 }
    }

    pub fn address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}
