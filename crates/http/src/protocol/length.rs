//! Lazy body length providers.
//!
//! A response body is a stream, so its length is not known from the body itself. The
//! handler that sets the body also sets a [`BodyLength`], and the writer resolves it
//! exactly once, right before the headers go out.

use std::io;

use async_trait::async_trait;
use tokio::fs::File;

#[async_trait]
pub trait BodyLength: Send + Sync {
    async fn resolve_length(&self) -> io::Result<u64>;
}

/// A length known up front, e.g. an in-memory body.
#[async_trait]
impl BodyLength for u64 {
    async fn resolve_length(&self) -> io::Result<u64> {
        Ok(*self)
    }
}

/// Length of an opened file, read from the handle's metadata when resolved.
///
/// The length follows the same file the body is streamed from, even if its path is
/// replaced in between.
#[derive(Debug)]
pub struct FileLength {
    file: File,
}

impl FileLength {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Duplicates the handle of `file`, which stays free to be used as the body.
    pub async fn of(file: &File) -> io::Result<Self> {
        Ok(Self::new(file.try_clone().await?))
    }
}

#[async_trait]
impl BodyLength for FileLength {
    async fn resolve_length(&self) -> io::Result<u64> {
        let metadata = self.file.metadata().await?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_length() {
        assert_eq!(13u64.resolve_length().await.unwrap(), 13);
    }

    #[tokio::test]
    async fn file_length_reads_metadata() {
        let path = std::env::temp_dir().join(format!("wire-http-length-{}", std::process::id()));
        tokio::fs::write(&path, b"Hello, World!").await.unwrap();

        let file = File::open(&path).await.unwrap();
        let length = FileLength::of(&file).await.unwrap().resolve_length().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(length.unwrap(), 13);
    }

    #[tokio::test]
    async fn length_follows_opened_file_not_path() {
        let path = std::env::temp_dir().join(format!("wire-http-length-replaced-{}", std::process::id()));
        tokio::fs::write(&path, b"Hello, World!").await.unwrap();

        let file = File::open(&path).await.unwrap();
        let length = FileLength::of(&file).await.unwrap();

        tokio::fs::remove_file(&path).await.unwrap();
        tokio::fs::write(&path, b"replaced with something much longer").await.unwrap();

        let resolved = length.resolve_length().await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(resolved.unwrap(), 13);
    }
}
