mod common;

use common::Recorder;
use graphup_core::events::{Event, EventBus, EventChannel};
use graphup_core::transfer::ProgressSampler;
use graphup_core::types::{ObjectKind, TransferKind};

#[test]
fn test_upload_lifecycle() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Photo, TransferKind::Upload);

    sampler.sample(0, 0, 200, 0);
    sampler.sample(0, 0, 200, 0);
    sampler.sample(0, 0, 200, 50);
    sampler.sample(0, 0, 200, 150);
    sampler.sample(0, 0, 200, 200);
    sampler.sample(0, 0, 200, 200);

    assert_eq!(
        rec.events(),
        vec![
            Event::TransferStarted { object: ObjectKind::Photo, kind: TransferKind::Upload },
            Event::TransferStateChanged("Upload started".into()),
            Event::TransferProgress { object: ObjectKind::Photo, kind: TransferKind::Upload, fraction: 0.25 },
            Event::TransferStateChanged("Upload 25% done".into()),
            Event::TransferProgress { object: ObjectKind::Photo, kind: TransferKind::Upload, fraction: 0.75 },
            Event::TransferStateChanged("Upload 75% done".into()),
            Event::TransferCompleted { object: ObjectKind::Photo, kind: TransferKind::Upload },
            Event::TransferStateChanged("Upload completed".into()),
        ]
    );
    assert!(sampler.is_finished());
}

#[test]
fn test_download_counters_take_precedence() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    // Created for an upload, but the transport reports download counters.
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Comment, TransferKind::Upload);

    sampler.sample(10, 0, 0, 0);
    sampler.sample(10, 5, 0, 0);

    assert_eq!(rec.states(), vec!["Download started", "Download 50% done"]);
}

#[test]
fn test_fraction_keeps_full_precision() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Photo, TransferKind::Download);

    sampler.sample(3, 0, 0, 0);
    sampler.sample(3, 1, 0, 0);
    sampler.sample(3, 2, 0, 0);

    assert_eq!(rec.fractions(), vec![1.0 / 3.0, 2.0 / 3.0]);
    assert_eq!(&rec.states()[1..], &["Download 33% done", "Download 66% done"]);
}

#[test]
fn test_out_of_order_samples_are_dropped() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Photo, TransferKind::Upload);

    sampler.sample(0, 0, 100, 0);
    sampler.sample(0, 0, 100, 60);
    sampler.sample(0, 0, 100, 40);
    sampler.sample(0, 0, 100, 80);

    assert_eq!(rec.fractions(), vec![0.6, 0.8]);
}

#[test]
fn test_unknown_total_emits_no_progress() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Like, TransferKind::Download);

    sampler.sample(0, 0, 0, 0);
    sampler.sample(0, 512, 0, 0);
    sampler.sample(0, 1024, 0, 0);

    assert_eq!(rec.count(EventChannel::TransferStarted), 1);
    assert_eq!(rec.count(EventChannel::TransferProgress), 0);
    assert_eq!(rec.count(EventChannel::TransferCompleted), 0);

    sampler.complete();
    assert_eq!(rec.count(EventChannel::TransferCompleted), 1);
    assert_eq!(rec.states(), vec!["Download started", "Download completed"]);
}

#[test]
fn test_overshooting_sample_is_ignored() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Photo, TransferKind::Download);

    sampler.sample(100, 0, 0, 0);
    sampler.sample(100, 120, 0, 0);

    assert!(rec.fractions().is_empty());
    assert!(!sampler.is_finished());
}

#[test]
fn test_terminal_event_only_once() {
    let bus = EventBus::new();
    let rec = Recorder::attach_all(&bus);
    let mut sampler = ProgressSampler::new(&bus, ObjectKind::Photo, TransferKind::Upload);

    sampler.sample(0, 0, 10, 0);
    sampler.fail("HTTP Code 500");
    sampler.complete();
    sampler.fail("again");
    sampler.sample(0, 0, 10, 5);

    assert_eq!(rec.count(EventChannel::TransferFailed), 1);
    assert_eq!(rec.count(EventChannel::TransferCompleted), 0);
    assert_eq!(rec.count(EventChannel::TransferProgress), 0);
    assert_eq!(
        rec.on(EventChannel::TransferFailed),
        vec![Event::TransferFailed {
            object: ObjectKind::Photo,
            kind: TransferKind::Upload,
            reason: "HTTP Code 500".into(),
        }]
    );
    assert_eq!(rec.states().last().unwrap(), "Upload failed: HTTP Code 500");
}
