//! Draw submission
//!
//! The core produces flat instance lists; a backend (GPU, terminal, test
//! recorder) implements [`RenderSink`] to consume them.

pub mod instance;

pub use instance::{DrawInstance, build_frame, color_from_rgba, shape};

use crate::sim::HudSnapshot;

/// Rendering backend
pub trait RenderSink {
    /// Present one frame of actor instances plus the HUD
    fn submit(&mut self, instances: &[DrawInstance], hud: &HudSnapshot);
}

/// Counts frames and logs the HUD line (headless runs)
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub frames: u64,
}

impl RenderSink for LogRenderer {
    fn submit(&mut self, instances: &[DrawInstance], hud: &HudSnapshot) {
        self.frames += 1;
        log::trace!("frame {}: {} instances | {hud}", self.frames, instances.len());
    }
}
