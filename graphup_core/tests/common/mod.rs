#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use graphup_core::events::{Event, EventBus, EventChannel};

pub const TOKEN: &str = "test-token";

/// Collects every event delivered on the given channels, in delivery order.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Recorder {
    pub fn attach(bus: &EventBus, channels: &[EventChannel]) -> Self {
        let recorder = Self::default();
        for &channel in channels {
            let events = Arc::clone(&recorder.events);
            bus.subscribe(channel, move |event| events.lock().unwrap().push(event.clone()));
        }
        recorder
    }

    pub fn attach_all(bus: &EventBus) -> Self {
        Self::attach(bus, &EventChannel::ALL)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn on(&self, channel: EventChannel) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.channel() == channel)
            .collect()
    }

    pub fn count(&self, channel: EventChannel) -> usize {
        self.on(channel).len()
    }

    pub fn states(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::TransferStateChanged(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn fractions(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::TransferProgress { fraction, .. } => Some(fraction),
                _ => None,
            })
            .collect()
    }
}

/// Writes `size` bytes of deterministic data to a temporary `.png` file.
pub fn photo_file(size: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("photo")
        .suffix(".png")
        .tempfile()
        .unwrap();
    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    file.write_all(&data).unwrap();
    file.flush().unwrap();
    file
}
