use crate::{AcquisitionError, PipelineResult, SourceImage};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Provides the raw bytes of a picked photo.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn acquire(&self) -> Result<Vec<u8>, AcquisitionError>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for FileSource {
    async fn acquire(&self) -> Result<Vec<u8>, AcquisitionError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|error| AcquisitionError::Read {
                path: self.path.clone(),
                error,
            })
    }
}

/// Bytes already in memory. An empty source behaves like a cancelled picker.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Option<Vec<u8>>,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes: Some(bytes) }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageSource for MemorySource {
    async fn acquire(&self) -> Result<Vec<u8>, AcquisitionError> {
        self.bytes.clone().ok_or(AcquisitionError::NothingSelected)
    }
}

/// Permission to deliver one loaded image to the pipeline that issued it.
///
/// Only the most recently issued ticket is honoured, so a slow load that
/// finishes after a newer one is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Acquires and decodes the image. Dropping the returned future cancels
    /// the load.
    pub async fn load<S: ImageSource + ?Sized>(self, source: &S) -> LoadedImage {
        LoadedImage {
            generation: self.generation,
            result: acquire_and_decode(source).await,
        }
    }
}

async fn acquire_and_decode<S: ImageSource + ?Sized>(source: &S) -> PipelineResult<SourceImage> {
    let bytes = source.acquire().await?;

    let image = tokio::task::spawn_blocking(move || SourceImage::decode(&bytes))
        .await
        .map_err(|e| AcquisitionError::Task(e.to_string()))??;

    Ok(image)
}

/// Result of a finished load, tagged with the ticket it was started with.
#[derive(Debug)]
pub struct LoadedImage {
    pub(crate) generation: u64,
    pub(crate) result: PipelineResult<SourceImage>,
}

impl LoadedImage {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
