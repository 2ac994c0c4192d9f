use crate::events::{Event, EventBus};
use crate::types::{ObjectKind, TransferKind};

/// Turns raw byte counters into transfer lifecycle events for one transfer.
///
/// Counters arrive as `(download_total, download_done, upload_total,
/// upload_done)`; only one pair is active per request and the active pair is
/// the one with a non-zero total. When neither total is known the sampler
/// falls back to the kind of request it was created for.
///
/// Guarantees, per sampler:
/// - `TransferStarted` at most once.
/// - exactly one of `TransferCompleted` / `TransferFailed`, at most once,
///   provided the owner calls `complete` or `fail` when the exchange ends.
/// - `TransferProgress` fractions never decrease and stay below `1.0`.
pub struct ProgressSampler<'a> {
    bus: &'a EventBus,
    object: ObjectKind,
    kind: TransferKind,
    started: bool,
    finished: bool,
    last_fraction: f64,
}

impl<'a> ProgressSampler<'a> {
    pub fn new(bus: &'a EventBus, object: ObjectKind, request_kind: TransferKind) -> Self {
        Self {
            bus,
            object,
            kind: request_kind,
            started: false,
            finished: false,
            last_fraction: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one sample of transport counters.
    pub fn sample(
        &mut self,
        download_total: u64,
        download_done: u64,
        upload_total: u64,
        upload_done: u64,
    ) {
        if self.finished {
            return;
        }

        let (total, done) = if download_total != 0 {
            self.kind = TransferKind::Download;
            (download_total, download_done)
        } else if upload_total != 0 {
            self.kind = TransferKind::Upload;
            (upload_total, upload_done)
        } else {
            match self.kind {
                TransferKind::Download => (download_total, download_done),
                TransferKind::Upload => (upload_total, upload_done),
            }
        };

        if done == 0 {
            self.start();
        } else if done == total {
            // total != 0 here, otherwise done == 0 above
            self.complete();
        } else if total != 0 && done < total {
            let fraction = done as f64 / total as f64;
            if fraction < self.last_fraction {
                log::trace!(
                    "[sampler] dropping out-of-order sample {}/{} for {:?}",
                    done, total, self.object
                );
                return;
            }
            self.start();
            self.last_fraction = fraction;
            self.bus.emit(&Event::TransferProgress {
                object: self.object,
                kind: self.kind,
                fraction,
            });
            let percent = (fraction * 100.0).floor() as u32;
            self.state_changed(format!("{} {}% done", self.kind, percent));
        } else {
            log::trace!(
                "[sampler] {} without usable total ({} of {} bytes)",
                self.kind, done, total
            );
        }
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.bus.emit(&Event::TransferStarted {
            object: self.object,
            kind: self.kind,
        });
        self.state_changed(format!("{} started", self.kind));
    }

    /// Report successful completion. No-op if the transfer already ended.
    pub fn complete(&mut self) {
        if self.finished {
            return;
        }
        self.start();
        self.finished = true;
        self.bus.emit(&Event::TransferCompleted {
            object: self.object,
            kind: self.kind,
        });
        self.state_changed(format!("{} completed", self.kind));
    }

    /// Report failure. No-op if the transfer already ended.
    pub fn fail(&mut self, reason: &str) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.bus.emit(&Event::TransferFailed {
            object: self.object,
            kind: self.kind,
            reason: reason.to_string(),
        });
        self.state_changed(format!("{} failed: {}", self.kind, reason));
    }

    fn state_changed(&self, state: String) {
        log::debug!("[sampler] {:?}: {}", self.object, state);
        self.bus.emit(&Event::TransferStateChanged(state));
    }
}
