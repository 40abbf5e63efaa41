use std::io::{Write, stdout};

use base64::Engine;

use crate::app::{App, ExitReport, Message, Model, ToastLevel};

impl App {
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: &Message) {
        match msg {
            Message::CopyMarkup => match copy_to_clipboard(model.editor.document()) {
                Ok(()) => model.show_toast(ToastLevel::Info, "Copied markup to clipboard"),
                Err(err) => {
                    tracing::warn!(%err, "Clipboard copy failed");
                    model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
                }
            },
            Message::EmitSnapshot => self.emit_snapshot(model),
            _ => {}
        }
    }

    fn emit_snapshot(&self, model: &mut Model) {
        let Some(path) = self.output.as_deref() else {
            model.show_toast(
                ToastLevel::Warning,
                "No --output file; the markup is printed on exit",
            );
            return;
        };
        let report = ExitReport::from_model(model);
        match report.write_to(self.json, Some(path)) {
            Ok(()) => {
                crate::perf::log_event(
                    "output.snapshot",
                    format!("path={} chars={}", path.display(), report.characters),
                );
                model.show_toast(ToastLevel::Info, format!("Wrote {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "Snapshot failed");
                model.show_toast(ToastLevel::Error, format!("Write failed: {err}"));
            }
        }
    }
}

fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        if copy_to_pbcopy(text).is_ok() {
            return Ok(());
        }
    }
    copy_to_clipboard_osc52(text)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let osc = osc52_sequence(text);
    let mut out = stdout();
    out.write_all(osc.as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
