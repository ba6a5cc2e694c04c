//! Notification log bounds/dedup and the presentation-side toast tracker.
use fleetwatch::notifications::{NotificationLog, NOTIFICATION_CAPACITY};
use fleetwatch::toasts::PresentedIds;
use fleetwatch::types::Notification;

fn note(id: u64, timestamp_ms: u64) -> Notification {
    Notification {
        id,
        kind: "prime".into(),
        title: format!("event {id}"),
        details: vec![],
        timestamp_ms,
    }
}

fn ids(log: &NotificationLog) -> Vec<u64> {
    log.iter().map(|n| n.id).collect()
}

#[test]
fn same_id_twice_is_stored_once() {
    let mut log = NotificationLog::new();
    assert!(log.append(note(1, 10)));
    assert!(!log.append(note(1, 99)));
    assert_eq!(log.len(), 1);
    // first delivery wins
    assert_eq!(log.get(1).unwrap().timestamp_ms, 10);
}

#[test]
fn order_is_prepend_order_not_timestamp() {
    let mut log = NotificationLog::new();
    log.append(note(1, 300));
    log.append(note(2, 100));
    log.append(note(3, 200));
    assert_eq!(ids(&log), vec![3, 2, 1]);
}

#[test]
fn capped_at_fifty_evicting_the_oldest() {
    let mut log = NotificationLog::new();
    for id in 1..=50 {
        log.append(note(id, id));
    }
    assert_eq!(log.len(), NOTIFICATION_CAPACITY);
    assert!(log.get(1).is_some());

    log.append(note(51, 51));
    assert_eq!(log.len(), NOTIFICATION_CAPACITY);
    assert!(log.get(1).is_none(), "oldest entry should be evicted");
    assert_eq!(log.iter().next().unwrap().id, 51);
    assert_eq!(log.iter().last().unwrap().id, 2);

    for id in 52..200 {
        log.append(note(id, id));
        assert!(log.len() <= NOTIFICATION_CAPACITY);
    }
}

#[test]
fn toasts_surface_each_id_once_oldest_first() {
    let mut log = NotificationLog::new();
    let mut presented = PresentedIds::new();
    log.append(note(1, 1));
    log.append(note(2, 2));

    let first: Vec<u64> = presented.take_unpresented(&log).iter().map(|n| n.id).collect();
    assert_eq!(first, vec![1, 2]);
    assert!(presented.take_unpresented(&log).is_empty(), "re-render shows nothing new");

    log.append(note(3, 3));
    let next: Vec<u64> = presented.take_unpresented(&log).iter().map(|n| n.id).collect();
    assert_eq!(next, vec![3]);
    assert!(presented.is_presented(1));
}

#[test]
fn toast_tracker_outlives_log_eviction() {
    let mut log = NotificationLog::with_capacity(2);
    let mut presented = PresentedIds::new();
    log.append(note(1, 1));
    presented.take_unpresented(&log);
    log.append(note(2, 2));
    log.append(note(3, 3));
    assert!(log.get(1).is_none());

    // evicted from the log, then re-delivered: the log takes it back, the toast does not repeat
    assert!(log.append(note(1, 1)));
    let shown: Vec<u64> = presented.take_unpresented(&log).iter().map(|n| n.id).collect();
    assert_eq!(shown, vec![3]);
}
