use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::{Result, TrawlError};
use crate::domain::Item;
use crate::sink::OutputSink;

/// Plain UTF-8 text output, one item per line.
///
/// The file is created (and truncated) on the first append or on close,
/// whichever comes first.
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    written: usize,
    closed: bool,
}

impl FileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
            written: 0,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        if self.closed {
            return Err(TrawlError::Sink(std::io::Error::other(format!(
                "{} is already closed",
                self.path.display()
            ))));
        }

        if self.writer.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(TrawlError::Sink)?;
            }
            let file = File::create(&self.path).map_err(TrawlError::Sink)?;
            debug!("Opened output file {}", self.path.display());
            self.writer = Some(BufWriter::new(file));
        }

        // Populated above.
        self.writer
            .as_mut()
            .ok_or_else(|| TrawlError::Other("output writer missing".into()))
    }
}

impl OutputSink for FileSink {
    fn append(&mut self, item: &Item) -> Result<()> {
        let record = item.record();
        let writer = self.writer()?;
        writeln!(writer, "{}", record).map_err(TrawlError::Sink)?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let writer = self.writer()?;
        writer.flush().map_err(TrawlError::Sink)?;
        writer.get_ref().sync_all().map_err(TrawlError::Sink)?;

        self.writer = None;
        self.closed = true;
        debug!("Closed {} after {} records", self.path.display(), self.written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.txt");

        let mut sink = FileSink::new(&path);
        sink.append(&Item::new("1", "good")).unwrap();
        sink.append(&Item::anonymous("spans\ntwo lines")).unwrap();
        sink.close().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "good\nspans two lines\n");
        assert_eq!(sink.written(), 2);
    }

    #[test]
    fn test_nothing_created_until_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.txt");
        fs::write(&path, "previous run\n").unwrap();

        let sink = FileSink::new(&path);
        drop(sink);

        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");
    }

    #[test]
    fn test_close_without_items_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("reviews.txt");

        let mut sink = FileSink::new(&path);
        sink.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_close_is_idempotent_and_blocks_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.txt");

        let mut sink = FileSink::new(&path);
        sink.append(&Item::new("1", "a")).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();

        assert!(matches!(
            sink.append(&Item::new("2", "b")),
            Err(TrawlError::Sink(_))
        ));
    }

    #[test]
    fn test_unwritable_destination_is_a_sink_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as the output file.
        let mut sink = FileSink::new(dir.path());

        assert!(matches!(
            sink.append(&Item::new("1", "a")),
            Err(TrawlError::Sink(_))
        ));
    }
}
