use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;

static LOG_FILE: OnceLock<Arc<Mutex<File>>> = OnceLock::new();

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Stderr(io::Stderr),
}

impl DelegatingWriter {
    fn new() -> Self {
        if let Some(file) = LOG_FILE.get() {
            DelegatingWriter {
                inner: DelegatingInner::File(Arc::clone(file)),
            }
        } else {
            DelegatingWriter {
                inner: DelegatingInner::Stderr(io::stderr()),
            }
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .unwrap_or_else(|err| err.into_inner())
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .unwrap_or_else(|err| err.into_inner())
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new()
    }
}

/// Route tracing output to `path`, truncating any previous log. Without a
/// registered file the subscriber writes to stderr, which the alternate
/// screen hides until exit.
pub fn init_with_log_file(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let _ = LOG_FILE.set(Arc::new(Mutex::new(file)));
    init_default();
    Ok(())
}

/// Initialize the tracing subscriber. Safe to call multiple times; subsequent
/// calls are no-ops for the global subscriber.
pub fn init_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_writer_lands_bytes_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let file = Arc::new(Mutex::new(File::create(&path).unwrap()));
        let mut writer = DelegatingWriter {
            inner: DelegatingInner::File(Arc::clone(&file)),
        };
        writer.write_all(b"window opened\n").unwrap();
        writer.flush().unwrap();
        let logged = std::fs::read_to_string(&path).unwrap();
        assert_eq!(logged, "window opened\n");
    }
}
