use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

use graphup_core::events::{Event, EventObserver};

/// Resolution of the bar; fractions are scaled onto this range.
const BAR_STEPS: u64 = 1000;

/// Renders transfer events as an indicatif bar.
///
/// One bar per transfer: created on `transfer-started`, driven by
/// `transfer-progress`, labelled by `transfer-state-changed`, and finished or
/// abandoned on `transfer-completed` / `transfer-failed`.
pub struct TerminalObserver {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalObserver {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn new_bar() -> ProgressBar {
        let bar = ProgressBar::new(BAR_STEPS);
        if let Ok(style) = ProgressStyle::with_template("[{bar:30.cyan/blue}] {percent:>3}% {msg}") {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar
    }
}

impl EventObserver for TerminalObserver {
    fn on_event(&self, event: &Event) {
        let mut slot = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        match event {
            Event::TransferStarted { kind, object } => {
                let bar = Self::new_bar();
                bar.set_message(format!("{} {:?}", kind, object));
                *slot = Some(bar);
            }
            Event::TransferProgress { fraction, .. } => {
                if let Some(bar) = slot.as_ref() {
                    bar.set_position((fraction * BAR_STEPS as f64) as u64);
                }
            }
            Event::TransferStateChanged(state) => {
                if let Some(bar) = slot.as_ref() {
                    bar.set_message(state.clone());
                }
            }
            Event::TransferCompleted { kind, .. } => {
                if let Some(bar) = slot.take() {
                    bar.set_position(BAR_STEPS);
                    bar.finish_with_message(format!("{} completed", kind));
                }
            }
            Event::TransferFailed { kind, reason, .. } => {
                if let Some(bar) = slot.take() {
                    bar.abandon_with_message(format!("{} failed: {}", kind, reason));
                }
            }
            _ => {}
        }
    }
}
