use super::event::Event;

/// Anything that wants to receive events from an `EventBus`.
///
/// Called synchronously on the task that emitted the event. A panic inside
/// `on_event` is caught by the bus and logged; it never reaches the transfer
/// that produced the event.
pub trait EventObserver: Send + Sync + 'static {
    fn on_event(&self, event: &Event);
}

/// Adapter so plain closures can be registered as observers.
pub(crate) struct FnObserver<F>(pub(crate) F);

impl<F> EventObserver for FnObserver<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event) {
        (self.0)(event)
    }
}
