use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

use super::SessionState;

pub(crate) const TICK: Duration = Duration::from_secs(1);

/// Bookkeeping for the one countdown a session may have running.
///
/// Arming or cancelling bumps `generation`, so a tick from an older task can
/// tell it no longer belongs to the current question.
#[derive(Debug, Default)]
pub(crate) struct Countdown {
    generation: u64,
    armed: bool,
    task: Option<AbortHandle>,
}

impl Countdown {
    pub(crate) fn arm(&mut self) -> u64 {
        self.cancel();
        self.armed = true;
        self.generation
    }

    pub(crate) fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.armed = false;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.armed
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation that is armed but has no task ticking it yet.
    pub(crate) fn pending(&self) -> Option<u64> {
        (self.armed && self.task.is_none()).then_some(self.generation)
    }

    pub(crate) fn attach(&mut self, generation: u64, task: AbortHandle) {
        if self.armed && self.task.is_none() && generation == self.generation {
            self.task = Some(task);
        } else {
            task.abort();
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawns the ticking task if the state armed a countdown nobody drives yet.
pub(crate) fn drive(session: &Arc<Mutex<SessionState>>, state: &mut SessionState) {
    if let Some(generation) = state.countdown.pending() {
        let task = tokio::spawn(run(Arc::downgrade(session), generation));
        state.countdown.attach(generation, task.abort_handle());
        log::debug!("Countdown {} armed", generation);
    }
}

async fn run(session: Weak<Mutex<SessionState>>, generation: u64) {
    let mut ticker = time::interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;

        let Some(shared) = session.upgrade() else {
            return;
        };
        let mut state = shared.lock().await;
        // A tick that lost the race against a cancel must not touch the new question
        if state.countdown.generation() != generation {
            return;
        }

        let expired = state.tick().is_expired();
        drive(&shared, &mut state);
        if expired {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_bumps_generation() {
        let mut countdown = Countdown::default();
        let first = countdown.arm();
        assert!(countdown.is_armed());
        assert_eq!(countdown.pending(), Some(first));

        let second = countdown.arm();
        assert_ne!(first, second);
        assert_eq!(countdown.pending(), Some(second));
    }

    #[test]
    fn test_cancel_disarms() {
        let mut countdown = Countdown::default();
        let generation = countdown.arm();
        countdown.cancel();
        assert!(!countdown.is_armed());
        assert_eq!(countdown.pending(), None);
        assert_ne!(countdown.generation(), generation);
    }

    #[tokio::test]
    async fn test_attach_rejects_stale_generation() {
        let mut countdown = Countdown::default();
        let stale = countdown.arm();
        let current = countdown.arm();

        let task = tokio::spawn(std::future::pending::<()>());
        countdown.attach(stale, task.abort_handle());
        assert!(task.await.unwrap_err().is_cancelled());
        assert_eq!(countdown.pending(), Some(current));
    }
}
