use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep};

/// Length of the cosmetic spin before a draw is committed.
pub const SPIN_DURATION: Duration = Duration::from_millis(2000);
/// How often the displayed value flickers while spinning.
pub const SPIN_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SpinKind {
    Game,
    Team,
}

/// Deferred task driving one spin. It only emits events; the draw itself
/// happens on the UI loop when `SpinFinished` arrives. Dropping the timer
/// cancels it.
#[derive(Debug)]
pub struct SpinTimer {
    handle: JoinHandle<()>,
}

impl SpinTimer {
    pub fn start(kind: SpinKind, events: mpsc::Sender<UiEvent>) -> Self {
        Self::with_timing(kind, events, SPIN_TICK, SPIN_DURATION)
    }

    pub fn with_timing(
        kind: SpinKind,
        events: mpsc::Sender<UiEvent>,
        tick: Duration,
        duration: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = interval(tick);
            // The first tick fires immediately; the spin starts from the
            // current display.
            ticks.tick().await;
            let deadline = sleep(duration);
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    _ = &mut deadline => {
                        let _ = events.send(UiEvent::SpinFinished(kind)).await;
                        break;
                    }
                    _ = ticks.tick() => {
                        if events.send(UiEvent::SpinTick(kind)).await.is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for SpinTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_then_finishes_once() {
        let (tx, mut rx) = mpsc::channel(64);
        let _timer = SpinTimer::start(SpinKind::Team, tx);

        let mut ticks = 0;
        loop {
            match rx.recv().await {
                Some(UiEvent::SpinTick(SpinKind::Team)) => ticks += 1,
                Some(UiEvent::SpinFinished(SpinKind::Team)) => break,
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!((15..=20).contains(&ticks), "got {ticks} ticks");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_finishes() {
        let (tx, mut rx) = mpsc::channel(64);
        let timer = SpinTimer::start(SpinKind::Game, tx);
        timer.cancel();

        while let Some(event) = rx.recv().await {
            assert!(!matches!(event, UiEvent::SpinFinished(_)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_it() {
        let (tx, mut rx) = mpsc::channel(64);
        drop(SpinTimer::with_timing(
            SpinKind::Game,
            tx,
            Duration::from_millis(10),
            Duration::from_millis(50),
        ));
        while let Some(event) = rx.recv().await {
            assert!(!matches!(event, UiEvent::SpinFinished(_)));
        }
    }
}
