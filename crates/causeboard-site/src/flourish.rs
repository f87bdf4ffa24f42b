#![forbid(unsafe_code)]

//! Floating-heart flourish shown after a donation.
//!
//! Each heart rises and fades over a fixed duration, then disappears. The
//! frame timer only runs while at least one heart is alive.

use std::time::Duration;

use causeboard_core::animation::{Animation, Fade};

use crate::config::FlourishConfig;

/// One heart in flight.
#[derive(Debug, Clone, Copy)]
pub struct FloatingHeart {
    id: u64,
    fade: Fade,
}

impl FloatingHeart {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.fade.value()
    }
}

/// Inline style for a heart at progress `t`.
#[must_use]
pub fn heart_style(t: f32, config: &FlourishConfig) -> String {
    let t = f64::from(t.clamp(0.0, 1.0));
    format!(
        "position:fixed;left:50vw;bottom:60px;font-size:28px;z-index:2000;\
         transform:translateY(-{:.1}px) scale({:.3});opacity:{:.3}",
        t * config.rise_px,
        1.0 + t * config.scale_gain,
        1.0 - t,
    )
}

/// Hearts currently alive, oldest first.
#[derive(Debug, Clone)]
pub struct Flourishes {
    config: FlourishConfig,
    hearts: Vec<FloatingHeart>,
    next_id: u64,
}

impl Flourishes {
    #[must_use]
    pub fn new(config: FlourishConfig) -> Self {
        Self {
            config,
            hearts: Vec::new(),
            next_id: 0,
        }
    }

    /// Launch one heart at progress 0.
    pub fn spawn(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.hearts.push(FloatingHeart {
            id,
            fade: Fade::new(Duration::from_millis(self.config.duration_ms)),
        });
        tracing::trace!(heart_id = id, "heart spawned");
        id
    }

    /// Advance every heart by one frame; finished hearts are dropped.
    pub fn frame(&mut self) {
        let dt = self.frame_interval();
        for heart in &mut self.hearts {
            heart.fade.tick(dt);
        }
        self.hearts.retain(|h| !h.fade.is_complete());
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.config.frame_ms)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.hearts.is_empty()
    }

    #[must_use]
    pub fn hearts(&self) -> &[FloatingHeart] {
        &self.hearts
    }

    /// `(heart, style)` pairs for rendering.
    pub fn styled(&self) -> impl Iterator<Item = (&FloatingHeart, String)> + '_ {
        self.hearts
            .iter()
            .map(|h| (h, heart_style(h.progress(), &self.config)))
    }
}
