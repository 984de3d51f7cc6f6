//! Route handlers.
//!
//! Failures are reported the way every handler reports them: through the response
//! status and a plain text body.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};
use wire_http::handler::Handler;
use wire_http::protocol::headers::{CONTENT_TYPE, USER_AGENT};
use wire_http::protocol::{FileLength, HttpRequest, HttpResponse, status};

use crate::config::Config;

pub const ECHO_PREFIX: &str = "/echo/";
pub const FILES_PREFIX: &str = "/files/";

/// `200 OK` with no body.
#[derive(Debug, Clone, Copy, Default)]
pub struct RootHandler;

#[async_trait]
impl Handler for RootHandler {
    async fn handle(&self, _request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        response.set_status(status::OK);
    }
}

/// Answers with the part of the target after `/echo/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        let echo = request.target().strip_prefix(ECHO_PREFIX).unwrap_or_default();
        response.set_status(status::OK).write_str(echo);
    }
}

/// Answers with the request's `User-Agent`, empty when absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentHandler;

#[async_trait]
impl Handler for UserAgentHandler {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        let user_agent = request.header(USER_AGENT).unwrap_or_default();
        response.set_status(status::OK).write_str(user_agent);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundHandler;

#[async_trait]
impl Handler for NotFoundHandler {
    async fn handle(&self, _request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        response.set_status(status::NOT_FOUND);
    }
}

/// Streams `<directory>/<name>` for `GET /files/<name>`.
///
/// The file length is only looked up when the response is written.
#[derive(Debug, Clone)]
pub struct ReadFileHandler {
    config: Arc<Config>,
}

impl ReadFileHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Handler for ReadFileHandler {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        let file_name = match request.target().strip_prefix(FILES_PREFIX) {
            Some(name) if !name.is_empty() => name,
            _ => {
                response.set_status(status::BAD_REQUEST);
                return;
            }
        };

        let path = self.config.directory().join(file_name);
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                response.set_status(status::NOT_FOUND);
                return;
            }
            Err(e) => return load_failed(response, &path, &e),
        };

        match file.metadata().await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                response.set_status(status::NOT_FOUND).write_str(format!("Not a file: {file_name}"));
                return;
            }
            Err(e) => return load_failed(response, &path, &e),
        }

        let length = match FileLength::of(&file).await {
            Ok(length) => length,
            Err(e) => return load_failed(response, &path, &e),
        };

        response.set_status(status::OK).set_body(file).set_body_length(length);
        response.headers_mut().insert(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref());
    }
}

fn load_failed(response: &mut HttpResponse, path: &Path, e: &io::Error) {
    warn!(path = %path.display(), cause = %e, "could not load file");
    response.set_status(status::INTERNAL_SERVER_ERROR).write_str(format!("Could not load file: {e}"));
}

/// Stores the request body as `<directory>/<name>` for `POST /files/<name>`.
#[derive(Debug, Clone)]
pub struct CreateFileHandler {
    config: Arc<Config>,
}

impl CreateFileHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    async fn store(&self, path: &Path, request: &mut HttpRequest<'_>) -> Result<u64, String> {
        let dir = path.parent().unwrap_or(self.config.directory());
        fs::create_dir_all(dir).await.map_err(|e| format!("Could not create dirs: {e}"))?;

        let file = File::create(path).await.map_err(|e| format!("Could not create file: {e}"))?;

        let mut writer = BufWriter::new(file);
        let written = tokio::io::copy(request.body_mut(), &mut writer)
            .await
            .map_err(|e| format!("Could not write data to file: {e}"))?;
        writer.flush().await.map_err(|e| format!("Could not write data to file: {e}"))?;
        Ok(written)
    }
}

#[async_trait]
impl Handler for CreateFileHandler {
    async fn handle(&self, request: &mut HttpRequest<'_>, response: &mut HttpResponse) {
        let file_name = request.target().strip_prefix(FILES_PREFIX).unwrap_or_default().to_string();
        let path = self.config.directory().join(&file_name);

        match self.store(&path, request).await {
            Ok(bytes) => {
                info!(file_name = file_name.as_str(), bytes, "written file contents");
                response.set_status(status::CREATED);
            }
            Err(message) => {
                warn!(file_name = file_name.as_str(), cause = message.as_str(), "could not store file");
                response.set_status(status::INTERNAL_SERVER_ERROR).write_str(message);
            }
        }
    }
}
