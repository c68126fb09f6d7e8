//! Platform layer
//!
//! Browser bindings live in `web` (wasm32 only). The frame-rate counter is
//! shared so it can be tested natively.

#[cfg(target_arch = "wasm32")]
pub mod web;

const FPS_WINDOW: usize = 60;

/// Rolling FPS over the last 60 frame timestamps (milliseconds)
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp in milliseconds
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample is the one we will overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let span = time_ms - oldest;
            if span > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / span).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
