//! In-memory ring of log lines.
//!
//! While the shell owns the terminal, log output cannot go to stderr without
//! corrupting the screen. Lines are kept here instead and flushed once the
//! terminal is restored.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crate::constants::LOG_BUFFER_LINES;

static GLOBAL_LOG: OnceLock<LogHandle> = OnceLock::new();

pub fn global() -> Option<LogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Install a ring of the default capacity unless one exists, returning it.
pub fn install_default() -> LogHandle {
    GLOBAL_LOG.get_or_init(|| LogHandle::new(LOG_BUFFER_LINES)).clone()
}

#[derive(Debug)]
struct LogRing {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogRing {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogHandle {
    inner: Arc<Mutex<LogRing>>,
}

impl LogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogRing {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut ring) = self.inner.lock() {
            ring.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|r| r.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return every buffered line, oldest first.
    pub fn drain(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(mut ring) => ring.lines.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Write out and clear the buffered lines.
    pub fn flush_to(&self, out: &mut dyn Write) -> io::Result<()> {
        for line in self.drain() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter {
            handle: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// Splits written bytes into lines. A trailing partial line waits for its
/// newline unless the writer is flushed.
#[derive(Debug)]
pub struct LogWriter {
    handle: LogHandle,
    pending: Vec<u8>,
}

impl LogWriter {
    fn push_text(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            self.handle.push(line);
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') {
            let complete: Vec<u8> = self.pending.drain(..=pos).collect();
            self.push_text(&complete);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let rest = std::mem::take(&mut self.pending);
        self.push_text(&rest);
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
