// Render loop - Fixed-step animation over the current figure set
use crate::application::view::BoardCanvas;
use crate::domain::figure::Figure;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Seconds of animation time added per tick. Deliberately decoupled from the
/// wall-clock frame delta.
const TICK_STEP: f32 = 0.02;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationClock {
    time: f32,
}

impl AnimationClock {
    pub fn advance(&mut self) -> f32 {
        self.time += TICK_STEP;
        self.time
    }
}

/// Repaint every `frame_period` until the figure sender goes away.
///
/// The figure set arrives through a watch channel and is only ever replaced
/// wholesale, so a tick sees either the old or the new set, never a mix.
pub async fn run(
    mut canvas: Box<dyn BoardCanvas>,
    mut figures: watch::Receiver<Arc<Vec<Figure>>>,
    frame_period: Duration,
) {
    let mut clock = AnimationClock::default();
    let mut ticker = tokio::time::interval(frame_period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if figures.has_changed().is_err() {
            // Session dropped its sender; the board is done.
            return;
        }

        let time = clock.advance();
        let current = figures.borrow_and_update().clone();
        if current.is_empty() {
            canvas.draw_empty();
        } else {
            canvas.draw(&current, time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances_by_fixed_step() {
        let mut clock = AnimationClock::default();
        clock.advance();
        clock.advance();
        let time = clock.advance();
        assert!((time - 0.06).abs() < 1e-6);
    }

    struct CountingCanvas {
        frames: Arc<std::sync::atomic::AtomicUsize>,
        empties: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl BoardCanvas for CountingCanvas {
        fn draw(&mut self, _figures: &[Figure], _time: f32) {
            self.frames.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }

        fn draw_empty(&mut self) {
            self.empties.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_empty_set_draws_placeholder_and_loop_stops_on_drop() {
        let (tx, rx) = watch::channel(Arc::new(Vec::new()));
        let frames = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let empties = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let canvas = Box::new(CountingCanvas {
            frames: frames.clone(),
            empties: empties.clone(),
        });

        let handle = tokio::spawn(run(canvas, rx, Duration::from_millis(10)));
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(tx);
        handle.await.unwrap();

        assert_eq!(frames.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(empties.load(std::sync::atomic::Ordering::SeqCst) >= 2);
    }
}
