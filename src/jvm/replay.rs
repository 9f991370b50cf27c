use crate::error::{AppError, Result};
use crate::jvm::source::SampleSource;
use crate::jvm::types::MonitoredSample;
use async_trait::async_trait;
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Replays recorded samples from JSON lines, one `MonitoredSample` per line.
pub struct ReplaySource<R> {
    lines: Lines<R>,
    line_number: usize,
    exhausted: bool,
    max_heap_size: Option<i64>,
}

impl ReplaySource<BufReader<File>> {
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).await.map_err(|e| {
            AppError::Source(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl ReplaySource<Cursor<Vec<u8>>> {
    pub fn from_string(contents: impl Into<String>) -> Self {
        Self::new(Cursor::new(contents.into().into_bytes()))
    }
}

impl<R> ReplaySource<R>
where
    R: AsyncBufRead + Unpin + Send + Sync,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            exhausted: false,
            max_heap_size: None,
        }
    }

    pub fn with_max_heap_size(mut self, bytes: i64) -> Self {
        self.max_heap_size = Some(bytes);
        self
    }
}

#[async_trait]
impl<R> SampleSource for ReplaySource<R>
where
    R: AsyncBufRead + Unpin + Send + Sync,
{
    async fn next_sample(&mut self) -> Result<Option<MonitoredSample>> {
        if self.exhausted {
            return Ok(None);
        }

        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => {
                    self.line_number += 1;
                    line
                }
                Ok(None) => break,
                // Invalid UTF-8 still consumes its line.
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    self.line_number += 1;
                    return Err(e.into());
                }
                Err(e) => {
                    self.exhausted = true;
                    return Err(e.into());
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let sample = serde_json::from_str(line).map_err(|source| AppError::Parse {
                line: self.line_number,
                source,
            })?;
            return Ok(Some(sample));
        }

        self.exhausted = true;
        Ok(None)
    }

    async fn is_connected(&self) -> bool {
        !self.exhausted
    }

    async fn max_heap_size(&self) -> Option<i64> {
        self.max_heap_size
    }
}
