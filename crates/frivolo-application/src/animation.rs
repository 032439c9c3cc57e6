//! Count-up animation for the calculator result.
//!
//! A single owned task drives three effects for the current price:
//!
//! - the displayed hours count up from 0 to the target over one second
//! - the progress bar fills 100 ms after the price is entered
//! - the "save this search" action is revealed after 1.5 s
//!
//! Entering a new price cancels the running task before starting another,
//! so frames from an old price can never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use frivolo_core::wage::progress_ratio;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const COUNT_UP_DURATION: Duration = Duration::from_millis(1000);
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
pub const PROGRESS_DELAY: Duration = Duration::from_millis(100);
pub const SAVE_REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// What the result panel should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationFrame {
    /// Final value being counted towards.
    pub target_hours: f64,
    /// Value currently on screen.
    pub displayed_hours: f64,
    /// Progress bar fill, `0..=100`.
    pub progress: f64,
    pub save_visible: bool,
}

impl AnimationFrame {
    pub fn is_settled(&self) -> bool {
        self.displayed_hours == self.target_hours
    }
}

struct RunningTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the animation task and publishes frames over a watch channel.
pub struct PriceAnimator {
    frames: Arc<watch::Sender<AnimationFrame>>,
    running: Option<RunningTask>,
}

impl Default for PriceAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceAnimator {
    pub fn new() -> Self {
        let (frames, _) = watch::channel(AnimationFrame::default());
        Self {
            frames: Arc::new(frames),
            running: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationFrame> {
        self.frames.subscribe()
    }

    pub fn current(&self) -> AnimationFrame {
        *self.frames.borrow()
    }

    /// Restarts the animation towards `hours`.
    ///
    /// Must be called from within a tokio runtime. A non-positive target
    /// behaves like [`clear`](Self::clear).
    pub fn set_target(&mut self, hours: f64) {
        self.stop();
        if !hours.is_finite() || hours <= 0.0 {
            self.frames.send_replace(AnimationFrame::default());
            return;
        }

        self.frames.send_modify(|frame| {
            frame.target_hours = hours;
            frame.displayed_hours = 0.0;
            frame.save_visible = false;
        });

        let token = CancellationToken::new();
        let handle = tokio::spawn(animate(hours, self.frames.clone(), token.clone()));
        self.running = Some(RunningTask { token, handle });
        debug!("[PriceAnimator] Animating towards {:.2} hours", hours);
    }

    /// Stops the animation and resets every effect to zero at once.
    pub fn clear(&mut self) {
        self.stop();
        self.frames.send_replace(AnimationFrame::default());
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.running.take() {
            task.token.cancel();
            task.handle.abort();
        }
    }
}

impl Drop for PriceAnimator {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn animate(
    target: f64,
    frames: Arc<watch::Sender<AnimationFrame>>,
    token: CancellationToken,
) {
    let steps = COUNT_UP_DURATION.as_secs_f64() / FRAME_INTERVAL.as_secs_f64();
    let increment = target / steps;

    let start = Instant::now();
    let mut ticker = interval_at(start + FRAME_INTERVAL, FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let progress_at = sleep_until(start + PROGRESS_DELAY);
    let reveal_at = sleep_until(start + SAVE_REVEAL_DELAY);
    tokio::pin!(progress_at);
    tokio::pin!(reveal_at);

    let mut shown = 0.0;
    let mut counting = true;
    let mut progress_done = false;
    let mut revealed = false;

    while counting || !progress_done || !revealed {
        tokio::select! {
            biased;
            _ = token.cancelled() => return,
            _ = ticker.tick(), if counting => {
                shown += increment;
                if shown >= target {
                    shown = target;
                    counting = false;
                }
                frames.send_modify(|frame| frame.displayed_hours = shown);
            }
            _ = &mut progress_at, if !progress_done => {
                progress_done = true;
                frames.send_modify(|frame| frame.progress = progress_ratio(target));
            }
            _ = &mut reveal_at, if !revealed => {
                revealed = true;
                frames.send_modify(|frame| frame.save_visible = true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_count_up_and_staged_effects() {
        let mut animator = PriceAnimator::new();
        animator.set_target(2.0);

        sleep(Duration::from_millis(50)).await;
        let frame = animator.current();
        assert!(frame.displayed_hours > 0.0 && frame.displayed_hours < 2.0);
        assert_eq!(frame.progress, 0.0);
        assert!(!frame.save_visible);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(animator.current().progress, 5.0);

        sleep(Duration::from_millis(950)).await;
        let frame = animator.current();
        assert_eq!(frame.displayed_hours, 2.0);
        assert!(frame.is_settled());
        assert!(!frame.save_visible);

        sleep(Duration::from_millis(500)).await;
        assert!(animator.current().save_visible);
        assert!(!animator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_displayed_value_never_overshoots() {
        let mut animator = PriceAnimator::new();
        let mut rx = animator.subscribe();
        animator.set_target(3.7);

        let mut max_seen: f64 = 0.0;
        while rx.changed().await.is_ok() {
            let frame = *rx.borrow_and_update();
            max_seen = max_seen.max(frame.displayed_hours);
            if frame.save_visible {
                break;
            }
        }
        assert_eq!(max_seen, 3.7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_price_restarts_everything() {
        let mut animator = PriceAnimator::new();
        animator.set_target(2.0);
        sleep(Duration::from_millis(1200)).await;
        assert_eq!(animator.current().displayed_hours, 2.0);

        animator.set_target(40.0);
        let frame = animator.current();
        assert_eq!(frame.displayed_hours, 0.0);
        assert_eq!(frame.target_hours, 40.0);

        // the first animation would have revealed at 1500 ms
        sleep(Duration::from_millis(400)).await;
        assert!(!animator.current().save_visible);
        assert_eq!(animator.current().progress, 100.0);

        sleep(Duration::from_millis(1200)).await;
        let frame = animator.current();
        assert_eq!(frame.displayed_hours, 40.0);
        assert!(frame.save_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_immediately() {
        let mut animator = PriceAnimator::new();
        animator.set_target(5.0);
        sleep(Duration::from_millis(1600)).await;
        assert!(animator.current().save_visible);

        animator.clear();
        assert_eq!(animator.current(), AnimationFrame::default());

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(animator.current(), AnimationFrame::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_target_does_not_spawn() {
        let mut animator = PriceAnimator::new();
        animator.set_target(0.0);
        assert!(!animator.is_running());
        assert_eq!(animator.current(), AnimationFrame::default());
    }
}
