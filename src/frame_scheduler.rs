//! Frame pacing and timing statistics
//!
//! The scheduler decides when the effect should advance. The caller is
//! responsible for sleeping between service calls.

use embassy_time::{Duration, Instant};

/// Default effect update interval
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(24);

/// Weight of a new sample in the moving averages, as a shift
const EMA_SHIFT: u32 = 4;

/// Moving averages of the interval between rendered frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Mean frame interval in microseconds
    pub mean_us: u32,
    /// Mean absolute deviation from the target interval in microseconds
    pub jitter_us: u32,
    /// Frames rendered since start
    pub frames: u32,
}

impl FrameStats {
    fn record(&mut self, interval_us: u32, target_us: u32) {
        let deviation = interval_us.abs_diff(target_us);
        // First interval seeds the averages
        if self.frames <= 2 {
            self.mean_us = interval_us;
            self.jitter_us = deviation;
        } else {
            self.mean_us = ema(self.mean_us, interval_us);
            self.jitter_us = ema(self.jitter_us, deviation);
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
const fn ema(current: u32, sample: u32) -> u32 {
    let current = current as i64;
    let delta = sample as i64 - current;
    (current + (delta >> EMA_SHIFT)) as u32
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    next_frame: Option<Instant>,
    last_frame: Option<Instant>,
    frame_duration: Duration,
    stats: FrameStats,
}

impl FrameScheduler {
    pub const fn new(frame_duration: Duration) -> Self {
        Self {
            next_frame: None,
            last_frame: None,
            frame_duration,
            stats: FrameStats {
                mean_us: 0,
                jitter_us: 0,
                frames: 0,
            },
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub fn set_frame_duration(&mut self, frame_duration: Duration) {
        self.frame_duration = frame_duration;
    }

    pub const fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Whether a frame is due at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_frame.is_none_or(|next| now >= next)
    }

    /// Record a rendered frame and schedule the next one
    ///
    /// After falling more than two frames behind, the schedule restarts from
    /// `now` instead of catching up.
    #[allow(clippy::cast_possible_truncation)]
    pub fn tick(&mut self, now: Instant) {
        let mut next = self.next_frame.unwrap_or(now);
        let max_drift = self.frame_duration * 2;
        if now > next + max_drift {
            next = now;
        }
        next += self.frame_duration;
        self.next_frame = Some(next);

        self.stats.frames = self.stats.frames.wrapping_add(1);
        if let Some(last) = self.last_frame {
            let interval = now.saturating_duration_since(last).as_micros();
            let target = self.frame_duration.as_micros();
            self.stats.record(
                interval.min(u64::from(u32::MAX)) as u32,
                target.min(u64::from(u32::MAX)) as u32,
            );
        }
        self.last_frame = Some(now);
    }

    /// Time left until the next frame, zero when one is due
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_frame
            .map_or(Duration::from_ticks(0), |next| next.saturating_duration_since(now))
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_DURATION)
    }
}
