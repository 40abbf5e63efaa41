//! Opt-in timing and a debug event log.
//!
//! `--perf` prints how long each named [`Scope`] took to stderr. A debug log
//! path (`--render-debug-log` or `TIEBAPAD_RENDER_DEBUG_LOG`) records editor
//! events such as applied commands, resizes and frames, plus every finished
//! scope, with milliseconds since the log was opened.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static TIMING: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<EventLog>> = LazyLock::new(|| Mutex::new(EventLog::closed()));

/// Times the enclosing block until dropped.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        let timing = is_enabled();
        let mut log = event_log();
        if !timing && !log.is_open() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if timing {
            eprintln!("[perf] {}: {elapsed_ms:.2} ms", self.name);
        }
        log.write("scope", &format!("{} took {elapsed_ms:.3} ms", self.name));
    }
}

#[derive(Debug)]
struct EventLog {
    opened: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLog {
    fn closed() -> Self {
        Self {
            opened: Instant::now(),
            writer: None,
        }
    }

    const fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn open(&mut self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "tiebapad event log, pid {}", std::process::id())?;
        writer.flush()?;
        self.opened = Instant::now();
        self.writer = Some(writer);
        Ok(())
    }

    fn write(&mut self, name: &str, detail: &str) {
        let elapsed_ms = self.opened.elapsed().as_secs_f64() * 1000.0;
        if let Some(writer) = self.writer.as_mut() {
            // Write errors are ignored.
            let _ = writeln!(writer, "[{elapsed_ms:>10.3} ms] {name}: {detail}");
            let _ = writer.flush();
        }
    }
}

fn event_log() -> MutexGuard<'static, EventLog> {
    EVENT_LOG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turn stderr timing output on or off.
pub fn set_enabled(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

/// Start timing `name`; the measurement is reported when the scope drops.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Open (truncating) the event log at `path`, or close it with `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be created; the current log is
/// left as it was.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = event_log();
    match path {
        Some(path) => log.open(path),
        None => {
            log.writer = None;
            Ok(())
        }
    }
}

pub fn is_debug_log_enabled() -> bool {
    event_log().is_open()
}

/// Append one event line to the log, if it is open.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = event_log();
    if log.is_open() {
        log.write(name, detail.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Editor, FormatCommand};
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_event_log_records_events_scopes_and_commands() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());

        log_event("event.resize.apply", "width=80 height=24");
        drop(scope("test.scope"));
        let mut editor = Editor::default();
        editor.initialize("hi", "");
        editor.surface_mut().select_all();
        editor.apply(FormatCommand::Underline).unwrap();

        set_debug_log_path(None).unwrap();
        assert!(!is_debug_log_enabled());
        log_event("after.close", "dropped");

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.starts_with("tiebapad event log, pid "));
        assert!(content.contains("event.resize.apply: width=80 height=24"));
        assert!(content.contains("scope: test.scope took "));
        assert!(content.contains("editor.command: name=underline state=--U characters=2"));
        assert!(content.contains("scope: editor.apply took "));
        assert!(content.contains("scope: markup.serialize took "));
        assert!(!content.contains("after.close"));
    }

    #[test]
    fn test_unwritable_log_path_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("events.log");
        assert!(set_debug_log_path(Some(&missing)).is_err());
        log_event("ignored", "nothing to write to");
    }
}
