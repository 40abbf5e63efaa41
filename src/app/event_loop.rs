use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, ExitReport, Message, Model, update};

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the editor until the user quits.
    ///
    /// Returns the final report, or `None` when the user discarded the
    /// session. With an output file configured the report is also written
    /// there.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, the event loop, or
    /// writing the output file fails.
    pub fn run(&mut self) -> Result<Option<ExitReport>> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; tiebapad requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = Model::new(&self.value, &self.placeholder, (size.width, size.height))
            .with_source_label(self.source_label.clone());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        crate::perf::log_event(
            "init.model",
            format!(
                "terminal={}x{} chars={}",
                size.width,
                size.height,
                model.editor.character_count()
            ),
        );

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model));

        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();
        result?;

        let report = Self::finish(&model);
        if let Some(report) = &report
            && let Some(path) = self.output.as_deref()
        {
            report.write_to(self.json, Some(path))?;
        }
        Ok(report)
    }

    /// The report for a finished session.
    pub fn finish(model: &Model) -> Option<ExitReport> {
        if model.discard {
            None
        } else {
            Some(ExitReport::from_model(model))
        }
    }

    fn dispatch(&self, model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat and paste bursts into a single render.
                let mut handled = 0_u32;
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        crate::perf::log_event(
                            "event.message",
                            format!("frame={frame_idx} msg={msg:?}"),
                        );
                        self.dispatch(model, msg);
                        handled += 1;
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
                if handled > 1 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} handled={handled}"),
                    );
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ResizeDebouncer;

    #[test]
    fn test_resize_debouncer_waits_for_delay() {
        let mut debouncer = ResizeDebouncer::new(100);
        debouncer.queue(80, 24, 1_000);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(1_050), None);
        debouncer.queue(100, 30, 1_060);
        assert_eq!(debouncer.take_ready(1_120), None);
        assert_eq!(debouncer.take_ready(1_160), Some((100, 30)));
        assert!(!debouncer.is_pending());
    }
}
