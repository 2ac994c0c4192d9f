pub mod bus;
pub mod event;
pub mod observer;

pub use bus::{EventBus, SubscriptionId};
pub use event::{Event, EventChannel};
pub use observer::EventObserver;
