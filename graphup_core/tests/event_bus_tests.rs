use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use graphup_core::events::{Event, EventBus, EventChannel, EventObserver};

#[test]
fn test_delivery_is_fifo_within_a_channel() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    bus.subscribe(EventChannel::CommentAdded, move |e| {
        if let Event::CommentAdded(id) = e {
            sink.lock().unwrap().push(id.clone());
        }
    });

    for id in ["1", "2", "3"] {
        bus.emit(&Event::CommentAdded(id.to_string()));
    }

    assert_eq!(*seen.lock().unwrap(), vec!["1", "2", "3"]);
}

#[test]
fn test_subscribers_run_in_subscription_order() {
    let bus = EventBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        bus.subscribe(EventChannel::PhotoCreated, move |_| order.lock().unwrap().push(tag));
    }

    bus.emit(&Event::PhotoCreated("42".into()));

    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn test_only_matching_channel_is_notified() {
    let bus = EventBus::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    bus.subscribe(EventChannel::PhotoCreateFailed, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    bus.emit(&Event::PhotoCreated("1".into()));
    bus.emit(&Event::TransferStateChanged("Upload started".into()));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    bus.emit(&Event::PhotoCreateFailed("nope".into()));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let bus = EventBus::new();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let id = bus.subscribe(EventChannel::CommentAdded, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(bus.subscriber_count(EventChannel::CommentAdded), 1);

    bus.emit(&Event::CommentAdded("a".into()));
    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id), "second unsubscribe should report unknown id");
    bus.emit(&Event::CommentAdded("b".into()));

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(bus.subscriber_count(EventChannel::CommentAdded), 0);
}

#[test]
fn test_panicking_subscriber_does_not_stop_delivery() {
    let bus = EventBus::new();
    let hits = Arc::new(AtomicUsize::new(0));
    bus.subscribe(EventChannel::TransferProgress, |_| panic!("subscriber bug"));
    let counter = Arc::clone(&hits);
    bus.subscribe(EventChannel::TransferProgress, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let event = Event::TransferProgress {
        object: graphup_core::types::ObjectKind::Photo,
        kind: graphup_core::types::TransferKind::Upload,
        fraction: 0.5,
    };
    bus.emit(&event);
    bus.emit(&event);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_subscribe_from_inside_a_callback() {
    let bus = Arc::new(EventBus::new());
    let late_hits = Arc::new(AtomicUsize::new(0));

    let bus_cb = Arc::clone(&bus);
    let late = Arc::clone(&late_hits);
    bus.subscribe(EventChannel::PhotoCreated, move |_| {
        let late = Arc::clone(&late);
        bus_cb.subscribe(EventChannel::CommentAdded, move |_| {
            late.fetch_add(1, Ordering::SeqCst);
        });
    });

    bus.emit(&Event::PhotoCreated("1".into()));
    bus.emit(&Event::CommentAdded("2".into()));

    assert_eq!(late_hits.load(Ordering::SeqCst), 1);
}

struct Counting(AtomicUsize);

impl EventObserver for Counting {
    fn on_event(&self, _event: &Event) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_shared_observer_on_several_channels() {
    let bus = EventBus::new();
    let observer = Arc::new(Counting(AtomicUsize::new(0)));
    bus.subscribe_observer(EventChannel::TransferStarted, observer.clone());
    bus.subscribe_observer(EventChannel::TransferCompleted, observer.clone());

    bus.emit(&Event::TransferStarted {
        object: graphup_core::types::ObjectKind::Comment,
        kind: graphup_core::types::TransferKind::Download,
    });
    bus.emit(&Event::TransferCompleted {
        object: graphup_core::types::ObjectKind::Comment,
        kind: graphup_core::types::TransferKind::Download,
    });
    bus.emit(&Event::CommentAdded("x".into()));

    assert_eq!(observer.0.load(Ordering::SeqCst), 2);
}

#[test]
fn test_channel_names() {
    assert_eq!(EventChannel::TransferStateChanged.as_str(), "transfer-state-changed");
    assert_eq!(EventChannel::CommentsDownloadFailed.to_string(), "comments-download-failed");
    for channel in EventChannel::ALL {
        assert_eq!(EventChannel::from_name(channel.as_str()), Some(channel));
    }
    assert_eq!(EventChannel::from_name("no-such-channel"), None);
}

#[test]
fn test_nested_emit_keeps_fifo_order() {
    let bus = Arc::new(EventBus::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let relay = Arc::clone(&bus);
    bus.subscribe(EventChannel::TransferStateChanged, move |e| {
        if let Event::TransferStateChanged(state) = e {
            if state == "first" {
                relay.emit(&Event::TransferStateChanged("second".into()));
            }
        }
    });
    let sink = Arc::clone(&seen);
    bus.subscribe(EventChannel::TransferStateChanged, move |e| {
        if let Event::TransferStateChanged(state) = e {
            sink.lock().unwrap().push(state.clone());
        }
    });

    bus.emit(&Event::TransferStateChanged("first".into()));

    assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
}
