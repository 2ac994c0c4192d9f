use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

enum Message {
    Run(Task),
    Quit,
}

/// Single-consumer task queue standing in for a GUI main loop.
///
/// Operations on graph objects are queued through a `LoopHandle` and only run
/// when the loop is driven. Tasks run strictly one after another: a task that
/// performs a transfer occupies the loop until the transfer is finished, so
/// at most one transfer is in flight per loop.
pub struct EventLoop {
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
}

/// Cloneable scheduling side of an `EventLoop`.
#[derive(Clone)]
pub struct LoopHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run queued tasks, including ones queued while draining, until the
    /// queue is empty or `quit` is requested. Returns how many tasks ran.
    pub async fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(message) = self.rx.try_recv() {
            match message {
                Message::Run(task) => {
                    task.await;
                    ran += 1;
                }
                Message::Quit => {
                    log::debug!("[event_loop] quit requested after {} task(s)", ran);
                    break;
                }
            }
        }
        ran
    }

    /// Run tasks as they arrive until `LoopHandle::quit` is called.
    pub async fn run(&mut self) {
        while let Some(message) = self.rx.recv().await {
            match message {
                Message::Run(task) => task.await,
                Message::Quit => break,
            }
        }
    }
}

impl LoopHandle {
    /// Queue `task` to run on the next loop iteration.
    ///
    /// Returns `false` if the loop has been dropped and the task was discarded.
    pub fn defer<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.tx.send(Message::Run(Box::pin(task))).is_err() {
            log::warn!("[event_loop] loop is gone, dropping deferred task");
            return false;
        }
        true
    }

    /// Ask the loop to stop once the tasks queued before this call have run.
    pub fn quit(&self) {
        let _ = self.tx.send(Message::Quit);
    }
}
