use crate::domain::Record;
use crate::error::RelayError;
use crate::port::RecordSink;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only local log file. Opened once at startup, created if absent;
/// the handle lives for the process. Each record is written as one line and
/// flushed; there is no fsync per write.
#[derive(Debug)]
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    pub async fn open(path: &Path) -> Result<Self, RelayError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|source| RelayError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    async fn append(&self, line: &str) -> Result<(), RelayError> {
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(RelayError::FileWrite)?;
        file.write_all(b"\n").await.map_err(RelayError::FileWrite)?;
        file.flush().await.map_err(RelayError::FileWrite)?;
        Ok(())
    }
}

impl RecordSink for FileSink {
    fn deliver<'a>(
        &'a self,
        record: &'a Record,
    ) -> Pin<Box<dyn Future<Output = Result<(), RelayError>> + Send + 'a>> {
        Box::pin(self.append(record.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_file_and_appends_lines_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");

        let sink = FileSink::open(&path).await.unwrap();
        sink.deliver(&Record::new("first")).await.unwrap();
        sink.deliver(&Record::new("second")).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[tokio::test]
    async fn reopening_appends_instead_of_truncating() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");

        {
            let sink = FileSink::open(&path).await.unwrap();
            sink.deliver(&Record::new("old")).await.unwrap();
        }
        let sink = FileSink::open(&path).await.unwrap();
        sink.deliver(&Record::new("new")).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "old\nnew\n");
    }

    #[tokio::test]
    async fn unwritable_path_is_a_startup_error() {
        let err = FileSink::open(Path::new("/nonexistent-dir/out.log"))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::FileOpen { .. }));
    }
}
