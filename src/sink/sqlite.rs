use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection};
use rusqlite_migration::{Migrations, M};
use tracing::debug;

use crate::app::{Result, TrawlError};
use crate::domain::Item;
use crate::sink::OutputSink;

/// SQLite output. Each run gets a row in `runs`; its items are written in
/// one transaction that is committed on close.
pub struct SqliteSink {
    path: PathBuf,
    source: String,
    conn: Option<Connection>,
    run_id: i64,
    seq: i64,
    closed: bool,
}

impl SqliteSink {
    pub fn new<P: AsRef<Path>>(path: P, source: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            source: source.to_string(),
            conn: None,
            run_id: 0,
            seq: 0,
            closed: false,
        }
    }

    /// Id of the `runs` row for this sink, once opened.
    pub fn run_id(&self) -> Option<i64> {
        self.conn.as_ref().map(|_| self.run_id)
    }

    fn open(&mut self) -> Result<()> {
        if self.closed {
            return Err(TrawlError::Sink(std::io::Error::other(format!(
                "{} is already closed",
                self.path.display()
            ))));
        }

        if self.conn.is_none() {
            let mut conn = Connection::open(&self.path)?;
            conn.execute("PRAGMA foreign_keys = ON", [])?;
            Self::migrations()
                .to_latest(&mut conn)
                .map_err(|e| TrawlError::Other(format!("Migration failed: {}", e)))?;

            conn.execute_batch("BEGIN IMMEDIATE")?;
            conn.execute(
                "INSERT INTO runs (source, started_at) VALUES (?1, ?2)",
                params![self.source, Utc::now().to_rfc3339()],
            )?;
            self.run_id = conn.last_insert_rowid();
            debug!("Opened {} as run {}", self.path.display(), self.run_id);
            self.conn = Some(conn);
        }
        Ok(())
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| TrawlError::Other("database connection missing".into()))
    }

    fn migrations() -> Migrations<'static> {
        Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))])
    }
}

impl OutputSink for SqliteSink {
    fn append(&mut self, item: &Item) -> Result<()> {
        self.open()?;
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO items (run_id, seq, item_id, content, collected_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.run_id,
                self.seq,
                item.id,
                item.text.trim(),
                Utc::now().to_rfc3339()
            ],
        )?;

        self.seq += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.open()?;
        let run_id = self.run_id;
        let conn = self.connection()?;
        conn.execute(
            "UPDATE runs SET finished_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), run_id],
        )?;
        conn.execute_batch("COMMIT")?;

        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| TrawlError::Database(e))?;
        }
        self.closed = true;
        debug!("Committed run {} with {} items", run_id, self.seq);
        Ok(())
    }
}
