use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::log_buffer::{self, LogHandle, LogWriter};

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    Ring(LogWriter),
    File(Arc<Mutex<File>>),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::Ring(w) => w.write(buf),
            DelegatingInner::File(f) => match f.lock() {
                Ok(mut file) => file.write(buf),
                Err(_) => Ok(buf.len()),
            },
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::Ring(w) => w.flush(),
            DelegatingInner::File(f) => match f.lock() {
                Ok(mut file) => file.flush(),
                Err(_) => Ok(()),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub enum SubscriberMakeWriter {
    Ring(LogHandle),
    File(Arc<Mutex<File>>),
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match self {
            SubscriberMakeWriter::Ring(h) => DelegatingInner::Ring(h.writer()),
            SubscriberMakeWriter::File(f) => DelegatingInner::File(Arc::clone(f)),
        };
        DelegatingWriter { inner }
    }
}

/// Parse a level name, falling back to `info` for anything unrecognised.
pub fn parse_level(name: &str) -> Level {
    Level::from_str(name.trim()).unwrap_or(Level::INFO)
}

/// Route tracing output to `log_file` when given, otherwise into the global
/// log ring. Later calls leave the first subscriber in place.
pub fn init(level: &str, log_file: Option<&Path>) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            SubscriberMakeWriter::File(Arc::new(Mutex::new(file)))
        }
        None => SubscriberMakeWriter::Ring(log_buffer::install_default()),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(false)
        .compact()
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn ring_writer_collects_lines() {
        use tracing_subscriber::fmt::MakeWriter;
        let handle = LogHandle::new(8);
        let make = SubscriberMakeWriter::Ring(handle.clone());
        let mut w = make.make_writer();
        w.write_all(b"hello\n").unwrap();
        assert_eq!(handle.drain(), vec!["hello"]);
    }
}
