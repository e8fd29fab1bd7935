use super::SceneTask;
use super::scheduler::{Scheduler, TaskHandle};
use bevy::log::debug;
use constants::gesture::WHEEL_GESTURE_THRESHOLD_MS;
use std::time::Duration;

/// Semantic wheel gesture emitted by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelGesture {
    Started,
    Ended,
}

/// `started_at` is set exactly while a gesture is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureTimerState {
    pub started_at: Option<Duration>,
    pub pending_timeout: Option<TaskHandle>,
}

/// Trailing-timeout debounce over raw wheel events.
///
/// The first event of a burst opens the gesture and arms a timeout one
/// threshold later. Later events only move `started_at` forward. When the
/// timeout fires it re-checks the latest event time: if a full threshold has
/// passed the gesture ends, otherwise a fresh timeout is armed.
#[derive(Debug, Clone)]
pub struct WheelGestureDetector {
    threshold: Duration,
    state: GestureTimerState,
}

impl WheelGestureDetector {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: GestureTimerState::default(),
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Takes effect for timeouts armed from now on.
    pub fn set_threshold(&mut self, threshold: Duration) {
        self.threshold = threshold;
    }

    pub fn state(&self) -> GestureTimerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.started_at.is_some()
    }

    pub fn on_wheel(
        &mut self,
        now: Duration,
        scheduler: &mut Scheduler<SceneTask>,
    ) -> Option<WheelGesture> {
        if self.state.started_at.is_some() {
            self.state.started_at = Some(now);
            return None;
        }

        self.state.started_at = Some(now);
        self.arm(now, scheduler);
        debug!("Wheel gesture started at {:?}", now);
        Some(WheelGesture::Started)
    }

    /// Handle a fired timeout. Timeouts that are no longer the pending one
    /// are ignored.
    ///
    /// The gesture ends once the time since the last wheel event reaches the
    /// threshold (`>=`), so a timeout firing exactly on the boundary ends it
    /// instead of re-arming. Anything shorter re-arms for another full
    /// threshold.
    pub fn on_timeout(
        &mut self,
        handle: TaskHandle,
        now: Duration,
        scheduler: &mut Scheduler<SceneTask>,
    ) -> Option<WheelGesture> {
        if self.state.pending_timeout != Some(handle) {
            return None;
        }
        self.state.pending_timeout = None;

        let started_at = self.state.started_at?;
        if now.saturating_sub(started_at) >= self.threshold {
            self.state.started_at = None;
            debug!("Wheel gesture ended at {:?}", now);
            return Some(WheelGesture::Ended);
        }

        self.arm(now, scheduler);
        None
    }

    /// Drop the open gesture and its pending timeout without emitting.
    pub fn cancel(&mut self, scheduler: &mut Scheduler<SceneTask>) {
        if let Some(handle) = self.state.pending_timeout.take() {
            scheduler.cancel(handle);
        }
        self.state.started_at = None;
    }

    fn arm(&mut self, now: Duration, scheduler: &mut Scheduler<SceneTask>) {
        let handle = scheduler.schedule_at(now + self.threshold, SceneTask::WheelGestureTimeout);
        self.state.pending_timeout = Some(handle);
    }
}

impl Default for WheelGestureDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(WHEEL_GESTURE_THRESHOLD_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    /// Feed wheel events at the given times and run the scheduler until idle,
    /// collecting every gesture with its timestamp.
    fn run(wheel_events: &[u64]) -> Vec<(u64, WheelGesture)> {
        let mut detector = WheelGestureDetector::default();
        let mut scheduler = Scheduler::new();
        let mut emitted = Vec::new();
        let mut events = wheel_events.iter().copied().peekable();

        loop {
            let next_event = events.peek().copied().map(ms);
            let next_timeout = scheduler.next_deadline();
            match (next_event, next_timeout) {
                (Some(event), Some(timeout)) if timeout < event => {
                    fire(&mut detector, &mut scheduler, timeout, &mut emitted);
                }
                (Some(event), _) => {
                    events.next();
                    if let Some(gesture) = detector.on_wheel(event, &mut scheduler) {
                        emitted.push((event.as_millis() as u64, gesture));
                    }
                }
                (None, Some(timeout)) => fire(&mut detector, &mut scheduler, timeout, &mut emitted),
                (None, None) => break,
            }
        }
        emitted
    }

    fn fire(
        detector: &mut WheelGestureDetector,
        scheduler: &mut Scheduler<SceneTask>,
        now: Duration,
        emitted: &mut Vec<(u64, WheelGesture)>,
    ) {
        for (handle, _) in scheduler.take_due(now) {
            if let Some(gesture) = detector.on_timeout(handle, now, scheduler) {
                emitted.push((now.as_millis() as u64, gesture));
            }
        }
    }

    #[test]
    fn single_event_ends_one_threshold_later() {
        assert_eq!(
            run(&[0]),
            vec![(0, WheelGesture::Started), (300, WheelGesture::Ended)]
        );
    }

    #[test]
    fn events_within_threshold_form_one_gesture() {
        // Timeout at 300 sees only 50 ms of quiet and re-arms to 600.
        assert_eq!(
            run(&[0, 100, 250]),
            vec![(0, WheelGesture::Started), (600, WheelGesture::Ended)]
        );
    }

    #[test]
    fn long_burst_emits_exactly_one_pair() {
        let events: Vec<u64> = (0..40).map(|i| i * 120).collect();
        let emitted = run(&events);

        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[0], (0, WheelGesture::Started));
        assert_eq!(emitted[1].1, WheelGesture::Ended);
        assert!(emitted[1].0 >= 39 * 120 + 300);
    }

    #[test]
    fn separated_bursts_are_separate_gestures() {
        assert_eq!(
            run(&[0, 1000]),
            vec![
                (0, WheelGesture::Started),
                (300, WheelGesture::Ended),
                (1000, WheelGesture::Started),
                (1300, WheelGesture::Ended),
            ]
        );
    }

    #[test]
    fn stale_timeout_after_end_is_ignored() {
        let mut detector = WheelGestureDetector::default();
        let mut scheduler = Scheduler::new();

        detector.on_wheel(ms(0), &mut scheduler);
        let (handle, _) = scheduler.take_due(ms(300)).remove(0);
        assert_eq!(
            detector.on_timeout(handle, ms(300), &mut scheduler),
            Some(WheelGesture::Ended)
        );

        assert_eq!(detector.on_timeout(handle, ms(900), &mut scheduler), None);
        assert!(!detector.is_active());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancel_drops_pending_timeout() {
        let mut detector = WheelGestureDetector::default();
        let mut scheduler = Scheduler::new();

        detector.on_wheel(ms(0), &mut scheduler);
        detector.cancel(&mut scheduler);

        assert!(scheduler.is_empty());
        assert_eq!(detector.state(), GestureTimerState::default());
    }
}
