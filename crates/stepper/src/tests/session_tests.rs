use super::*;
use std::time::Duration;

use shared::{error::InputError, protocol::StatusLevel};

use crate::{board::RunView, input::LARGE_INPUT_WARNING};

fn session_with_delay(delay_ms: u64) -> SortSession {
    SortSession::new(DelayControl::fixed(Duration::from_millis(delay_ms)), 50)
}

async fn drain_until_complete(rx: &mut broadcast::Receiver<StepEvent>) -> Vec<StepEvent> {
    let mut events = Vec::new();
    loop {
        let event = rx.recv().await.expect("event stream open");
        let done = matches!(event, StepEvent::RunCompleted { .. });
        events.push(event);
        if done {
            return events;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected_while_running() {
    let session = session_with_delay(100);
    let mut rx = session.subscribe_events();

    let handle = session.start(vec![3, 2, 1]).expect("first start");
    assert_eq!(session.run_state(), RunState::Running);

    let err = session.start(vec![9, 8]).expect_err("busy");
    assert!(err.is_busy());
    let err = session
        .start_from_input("not even numbers")
        .expect_err("busy before parsing");
    assert!(err.is_busy());

    let sorted = handle.await.expect("run task");
    assert_eq!(sorted, vec![1, 2, 3]);
    assert_eq!(session.run_state(), RunState::Complete);

    let events = drain_until_complete(&mut rx).await;
    let rejections = events
        .iter()
        .filter(|event| matches!(event, StepEvent::Rejected(n) if n.message == BUSY_MESSAGE))
        .count();
    assert_eq!(rejections, 2);

    let mut view = RunView::default();
    for event in &events {
        view.apply_event(event);
    }
    assert_eq!(view.board.values(), vec![1, 2, 3]);
    assert_eq!(view.sorted, Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn session_can_run_again_after_completion() {
    let session = session_with_delay(0);
    let first = session.run_to_completion(vec![4, 1]).await.expect("first");
    let second = session.run_to_completion(vec![2, 9, 0]).await.expect("second");

    assert_eq!(first, vec![1, 4]);
    assert_eq!(second, vec![0, 2, 9]);
    assert_eq!(session.run_state(), RunState::Complete);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_touching_run_state() {
    let session = session_with_delay(0);
    let mut rx = session.subscribe_events();

    let err = session.start_from_input("   ").expect_err("empty");
    assert!(matches!(err, SessionError::Input(InputError::EmptyInput)));
    let err = session.start_from_input("x, y").expect_err("no numbers");
    assert!(matches!(err, SessionError::Input(InputError::NoValidNumbers)));
    assert_eq!(session.run_state(), RunState::Idle);

    assert_eq!(
        rx.recv().await.expect("event"),
        StepEvent::Rejected(Narration::error("Please enter some numbers."))
    );
    assert_eq!(
        rx.recv().await.expect("event"),
        StepEvent::Rejected(Narration::error("No valid numbers entered."))
    );
}

#[tokio::test]
async fn event_stream_mirrors_the_run() {
    let session = session_with_delay(0);
    let mut rx = session.subscribe_events();

    let handle = session.start_from_input("5, 3, 4, 1, 2").expect("start");
    let events = drain_until_complete(&mut rx).await;
    assert_eq!(handle.await.expect("run task"), vec![1, 2, 3, 4, 5]);

    assert_eq!(
        events.first(),
        Some(&StepEvent::RunStarted {
            values: vec![5, 3, 4, 1, 2]
        })
    );
    assert_eq!(
        events.last(),
        Some(&StepEvent::RunCompleted {
            sorted: vec![1, 2, 3, 4, 5]
        })
    );

    let mut view = RunView::default();
    for event in &events {
        view.apply_event(event);
    }
    assert_eq!(view.run_state, RunState::Complete);
    assert_eq!(view.board.sorted_positions(), vec![0, 1, 2, 3, 4]);
    assert_eq!(
        view.status.map(|status| status.level),
        Some(StatusLevel::Success)
    );
}

#[tokio::test]
async fn large_input_warns_and_still_runs() {
    let session = SortSession::new(DelayControl::fixed(Duration::ZERO), 3);
    let mut rx = session.subscribe_events();

    let handle = session.start_from_input("4,3,2,1").expect("start");
    let events = drain_until_complete(&mut rx).await;
    assert_eq!(handle.await.expect("run task"), vec![1, 2, 3, 4]);

    let warning = Narration::warning(LARGE_INPUT_WARNING);
    assert!(matches!(events.first(), Some(StepEvent::RunStarted { .. })));
    assert_eq!(events.get(1), Some(&StepEvent::Narrated(warning.clone())));

    let mut view = RunView::default();
    for event in &events {
        view.apply_event(event);
    }
    assert_eq!(view.log.entries().first(), Some(&warning));
    assert_eq!(view.board.values(), vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn size_warning_is_not_repeated_on_a_small_rerun() {
    let session = SortSession::new(DelayControl::fixed(Duration::ZERO), 3);
    session
        .start_from_input("4,3,2,1")
        .expect("large start")
        .await
        .expect("run task");

    let mut rx = session.subscribe_events();
    session.start_from_input("2,1").expect("small start");
    let events = drain_until_complete(&mut rx).await;
    assert!(!events.iter().any(
        |event| matches!(event, StepEvent::Narrated(n) if n.level == StatusLevel::Warning)
    ));
}

#[tokio::test(start_paused = true)]
async fn slider_change_mid_run_only_affects_later_steps() {
    let session = session_with_delay(100);
    let slider = session.delay().clone();
    let mut rx = session.subscribe_events();

    let started = tokio::time::Instant::now();
    let handle = session.start(vec![2, 1]).expect("start");

    // Wait for the compare narration; the select pause (100ms) has elapsed by then
    // and the compare pause is already sleeping with the old value.
    loop {
        match rx.recv().await.expect("event") {
            StepEvent::Narrated(n) if n.message.starts_with("Comparing") => break,
            _ => {}
        }
    }
    slider.set(Duration::from_millis(20));

    handle.await.expect("run task");
    // 100 (select) + 100 (compare, already scheduled) + 20 + 20.
    assert_eq!(started.elapsed(), Duration::from_millis(240));
}
