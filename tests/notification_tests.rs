use std::time::Duration;

use fluency_coach::{Notifier, Severity};

#[tokio::test(start_paused = true)]
async fn notification_fades_in_then_expires() {
    let notifier = Notifier::new();
    notifier.publish("Recording started! Speak naturally.", Severity::Success);

    // Present immediately, but not yet visible.
    let active = notifier.active();
    assert_eq!(active.len(), 1);
    assert!(!active[0].visible);

    tokio::time::sleep(Duration::from_millis(150)).await;
    let active = notifier.active();
    assert_eq!(active.len(), 1);
    assert!(active[0].visible);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(notifier.active().is_empty());
}

#[tokio::test(start_paused = true)]
async fn notifications_keep_arrival_order() {
    let notifier = Notifier::new();
    notifier.publish("first", Severity::Info);
    notifier.publish("second", Severity::Error);
    notifier.publish("third", Severity::Success);

    let messages: Vec<_> = notifier.active().iter().map(|n| n.message.clone()).collect();
    assert_eq!(messages, ["first", "second", "third"]);
}

#[tokio::test(start_paused = true)]
async fn staggered_notifications_expire_independently() {
    let notifier = Notifier::new();
    notifier.publish("early", Severity::Info);

    tokio::time::sleep(Duration::from_secs(3)).await;
    notifier.publish("late", Severity::Info);

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let messages: Vec<_> = notifier.active().iter().map(|n| n.message.clone()).collect();
    assert_eq!(messages, ["late"]);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(notifier.active().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clones_share_one_list() {
    let notifier = Notifier::new();
    let clone = notifier.clone();

    notifier.publish("from original", Severity::Info);
    clone.publish("from clone", Severity::Info);

    assert_eq!(notifier.active().len(), 2);
    assert_eq!(clone.active().len(), 2);
}
