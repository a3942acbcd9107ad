//! Session tests driven by tokio's paused clock
//!
//! With `start_paused` the runtime jumps straight to the next timer whenever
//! every task is idle, so sleeping 350 ms lets exactly three ticks fire. The
//! multi-threaded test runs on the real clock.

use std::{sync::Arc, time::Duration};

use meditation_timer::{
    state::{InitOutcome, SurfaceSize, Toggle},
    TimerError, TimerPhase, TimerSession, TimerSnapshot,
};
use tokio::{
    sync::watch,
    time::{sleep, timeout},
};

const EPSILON: f32 = 1e-4;

async fn wait_until_finished(rx: &mut watch::Receiver<TimerSnapshot>) -> TimerSnapshot {
    timeout(Duration::from_secs(60), async {
        loop {
            let snapshot = rx.borrow_and_update().clone();
            if snapshot.is_finished() {
                return snapshot;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn initialize_starts_running_at_full_progress() {
    let session = TimerSession::new();
    assert_eq!(session.initialize(Duration::from_millis(3000)), Ok(InitOutcome::Started));

    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.total_ms, 3000);
    assert_eq!(snapshot.remaining_ms, 3000);
    assert_eq!(snapshot.progress, 1.0);
    assert!(snapshot.running);
    assert_eq!(snapshot.phase, TimerPhase::Running);
    assert!(session.started_at().unwrap().is_some());
    assert_eq!(*session.subscribe().borrow(), snapshot);
}

#[tokio::test(start_paused = true)]
async fn ticks_every_hundred_milliseconds() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();

    sleep(Duration::from_millis(150)).await;
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.remaining_ms, 2900);
    assert!((snapshot.progress - 0.9667).abs() < EPSILON);
    assert!(snapshot.running);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(session.snapshot().unwrap().remaining_ms, 2700);
}

#[tokio::test(start_paused = true)]
async fn pause_stops_decrements_until_resumed() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();
    sleep(Duration::from_millis(150)).await;

    assert_eq!(session.toggle_running(), Ok(Toggle::Paused));
    assert!(!session.has_active_loop().unwrap());

    sleep(Duration::from_secs(5)).await;
    let paused = session.snapshot().unwrap();
    assert_eq!(paused.remaining_ms, 2900);
    assert_eq!(paused.phase, TimerPhase::Paused);

    assert_eq!(session.toggle_running(), Ok(Toggle::Started));
    sleep(Duration::from_millis(250)).await;
    assert_eq!(session.snapshot().unwrap().remaining_ms, 2700);
}

#[tokio::test(start_paused = true)]
async fn repeated_toggles_keep_a_single_loop() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();

    for _ in 0..5 {
        session.toggle_running().unwrap();
        session.toggle_running().unwrap();
    }
    assert!(session.snapshot().unwrap().running);

    sleep(Duration::from_millis(550)).await;
    assert_eq!(session.snapshot().unwrap().remaining_ms, 2500);
}

#[tokio::test(start_paused = true)]
async fn short_session_finishes_after_one_tick() {
    let session = TimerSession::new();
    let mut rx = session.subscribe();
    session.initialize(Duration::from_millis(100)).unwrap();

    let finished = wait_until_finished(&mut rx).await;
    assert_eq!(
        finished,
        TimerSnapshot {
            total_ms: 100,
            remaining_ms: 0,
            progress: 0.0,
            running: false,
            phase: TimerPhase::Finished,
        }
    );

    for _ in 0..3 {
        assert_eq!(session.toggle_running(), Ok(Toggle::Ignored));
    }
    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.snapshot().unwrap(), finished);
    assert!(!session.has_active_loop().unwrap());
}

#[tokio::test(start_paused = true)]
async fn observers_never_see_torn_state() {
    let session = TimerSession::new();
    let mut rx = session.subscribe();
    session.initialize(Duration::from_millis(1000)).unwrap();

    let mut previous = u64::MAX;
    loop {
        let snapshot = rx.borrow_and_update().clone();
        assert!(snapshot.remaining_ms <= previous);
        assert!((snapshot.progress - snapshot.remaining_ms as f32 / 1000.0).abs() < EPSILON);
        assert_eq!(snapshot.running, snapshot.remaining_ms > 0);
        previous = snapshot.remaining_ms;

        if snapshot.is_finished() {
            break;
        }
        rx.changed().await.unwrap();
    }
    assert_eq!(previous, 0);
}

#[tokio::test(start_paused = true)]
async fn second_initialize_does_not_reset() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();
    sleep(Duration::from_millis(150)).await;

    assert_eq!(
        session.initialize(Duration::from_secs(600)),
        Ok(InitOutcome::AlreadyActive)
    );
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.total_ms, 3000);
    assert_eq!(snapshot.remaining_ms, 2900);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(session.snapshot().unwrap().remaining_ms, 2800);
}

#[tokio::test(start_paused = true)]
async fn zero_duration_is_rejected() {
    let session = TimerSession::new();
    assert_eq!(
        session.initialize(Duration::ZERO),
        Err(TimerError::InvalidDuration(0))
    );
    assert_eq!(session.snapshot().unwrap(), TimerSnapshot::idle());
    assert!(!session.has_active_loop().unwrap());
    assert_eq!(session.toggle_running(), Ok(Toggle::Ignored));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();
    sleep(Duration::from_millis(150)).await;

    session.shutdown().unwrap();
    assert!(!session.has_active_loop().unwrap());

    sleep(Duration::from_secs(2)).await;
    let stopped = session.snapshot().unwrap();
    assert_eq!(stopped.remaining_ms, 2900);
    assert!(!stopped.running);
    assert_eq!(stopped.phase, TimerPhase::Stopped);
    assert_eq!(*session.subscribe().borrow(), stopped);
}

#[tokio::test(start_paused = true)]
async fn shut_down_session_cannot_be_restarted() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();
    sleep(Duration::from_millis(150)).await;
    session.shutdown().unwrap();

    for _ in 0..2 {
        assert_eq!(session.toggle_running(), Ok(Toggle::Ignored));
    }
    assert_eq!(
        session.initialize(Duration::from_secs(180)),
        Ok(InitOutcome::Closed)
    );
    assert!(!session.has_active_loop().unwrap());

    sleep(Duration::from_millis(350)).await;
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.remaining_ms, 2900);
    assert!(!snapshot.running);
}

#[tokio::test(start_paused = true)]
async fn finished_session_can_start_a_new_countdown() {
    let session = TimerSession::new();
    let mut rx = session.subscribe();
    session.initialize(Duration::from_millis(100)).unwrap();
    wait_until_finished(&mut rx).await;

    assert_eq!(
        session.initialize(Duration::from_secs(180)),
        Ok(InitOutcome::Started)
    );
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.total_ms, 180_000);
    assert_eq!(snapshot.remaining_ms, 180_000);
    assert_eq!(snapshot.progress, 1.0);
    assert_eq!(snapshot.phase, TimerPhase::Running);
    assert!(session.has_active_loop().unwrap());

    sleep(Duration::from_millis(250)).await;
    assert_eq!(session.snapshot().unwrap().remaining_ms, 179_800);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_leave_a_loop_for_a_running_session() {
    let session = Arc::new(TimerSession::new());
    session.initialize(Duration::from_secs(3600)).unwrap();

    for _ in 0..20 {
        let toggles: Vec<_> = (0..7)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::task::spawn_blocking(move || session.toggle_running().unwrap())
            })
            .collect();
        for toggle in toggles {
            toggle.await.unwrap();
        }

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.running, session.has_active_loop().unwrap());
    }

    if !session.snapshot().unwrap().running {
        assert_eq!(session.toggle_running(), Ok(Toggle::Started));
    }
    let before = session.snapshot().unwrap().remaining_ms;
    sleep(Duration::from_millis(450)).await;
    assert!(session.snapshot().unwrap().remaining_ms < before);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_session_releases_the_loop() {
    let session = TimerSession::new();
    let mut rx = session.subscribe();
    session.initialize(Duration::from_millis(3000)).unwrap();
    sleep(Duration::from_millis(150)).await;
    drop(session);

    // The aborted loop held the last sender, so the channel closes
    let closed = timeout(Duration::from_secs(5), async {
        while rx.changed().await.is_ok() {}
    })
    .await;
    assert!(closed.is_ok());
    assert_eq!(rx.borrow().remaining_ms, 2900);
}

#[tokio::test(start_paused = true)]
async fn surface_size_is_recorded_without_touching_the_timer() {
    let session = TimerSession::new();
    session.initialize(Duration::from_millis(3000)).unwrap();
    let before = session.snapshot().unwrap();

    session.notify_surface_size(SurfaceSize::new(1080, 2400)).unwrap();
    assert_eq!(session.surface_size(), Ok(SurfaceSize::new(1080, 2400)));
    assert_eq!(session.snapshot().unwrap(), before);
}
