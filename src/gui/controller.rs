use std::time::{Duration, Instant};

use kiss3d::event::{Action, Event, Key, WindowEvent};
use tracing::info;

use super::view::View;

// Key config, all in one place
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_REVERSE: Key = Key::R;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_PREVIEW: Key = Key::V;
const KEY_TOGGLE_RINGS: Key = Key::O;

pub struct Controller {
    paused: bool,
    stats: FrameStats,
}

/// Frame rate, averaged over a sliding window, and a count of how many frames
/// actually moved the scene.
pub struct FrameStats {
    window: Duration,
    window_start: Instant,
    frames_in_window: u32,
    fps: f64,
    stepped_frames: u64,
}

impl FrameStats {
    pub fn new(window: Duration) -> Self {
        FrameStats {
            window,
            window_start: Instant::now(),
            frames_in_window: 0,
            fps: 0.0,
            stepped_frames: 0,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn stepped_frames(&self) -> u64 {
        self.stepped_frames
    }

    /// Counts one rendered frame, `stepped` if the scene advanced during it.
    pub fn record_frame(&mut self, stepped: bool) {
        self.record_frame_at(Instant::now(), stepped);
    }

    fn record_frame_at(&mut self, now: Instant, stepped: bool) {
        self.frames_in_window += 1;
        if stepped {
            self.stepped_frames += 1;
        }

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed > self.window {
            self.fps = f64::from(self.frames_in_window) / elapsed.as_secs_f64();
            self.window_start = now;
            self.frames_in_window = 0;
        }
    }
}

impl Controller {
    pub fn new(paused: bool) -> Self {
        Controller {
            paused,
            stats: FrameStats::new(Duration::from_secs(1)),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                view.set_time_scale(view.time_scale() * 2.0);
                info!(time_scale = view.time_scale(), "sped up");
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                view.set_time_scale(view.time_scale() / 2.0);
                info!(time_scale = view.time_scale(), "slowed down");
            }
            WindowEvent::Key(KEY_REVERSE, Action::Press, _) => {
                view.set_time_scale(-view.time_scale());
                self.paused = false;
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
            }
            WindowEvent::Key(KEY_TOGGLE_PREVIEW, Action::Press, _) => {
                view.toggle_preview();
            }
            WindowEvent::Key(KEY_TOGGLE_RINGS, Action::Press, _) => {
                view.toggle_rings();
            }
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut FrameStats {
        &mut self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_stats_window() {
        let mut stats = FrameStats::new(Duration::from_secs(1));
        let start = stats.window_start;

        for i in 0..30 {
            stats.record_frame_at(start + Duration::from_millis(20 * i), i % 3 != 0);
        }
        // Still inside the first window
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.stepped_frames(), 20);

        // 31 frames over 1.24 s
        stats.record_frame_at(start + Duration::from_millis(1240), true);
        assert!((stats.fps() - 31.0 / 1.24).abs() < 1e-9);
        assert_eq!(stats.frames_in_window, 0);
        assert_eq!(stats.stepped_frames(), 21);
    }
}
