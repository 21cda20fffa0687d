//! Idle gesture scheduler.
//!
//! While the avatar idles, elapsed time accumulates toward a randomized threshold drawn
//! from `[min_delay, max_delay]`. Each crossing resets the counter, redraws the threshold
//! and fires a gesture only with the configured probability, so gestures never arrive on a
//! visible beat.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::IdleGestureConfig;

#[derive(Clone, Debug)]
pub struct IdleScheduler {
    cfg: IdleGestureConfig,
    enabled: bool,
    elapsed: f32,
    next_delay: f32,
    rng: Pcg32,
}

impl IdleScheduler {
    pub fn new(cfg: &IdleGestureConfig, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_delay = draw_delay(cfg, &mut rng);
        Self {
            cfg: cfg.clone(),
            enabled: cfg.enabled,
            elapsed: 0.0,
            next_delay,
            rng,
        }
    }

    /// Accumulate idle time. Returns true when a gesture should start now.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.enabled {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.next_delay {
            return false;
        }
        self.elapsed = 0.0;
        self.next_delay = draw_delay(&self.cfg, &mut self.rng);
        let fire = self
            .rng
            .gen_bool(self.cfg.probability.clamp(0.0, 1.0));
        log::trace!(
            "idle threshold crossed (fire={fire}, next in {:.2}s)",
            self.next_delay
        );
        fire
    }

    /// Pick one gesture uniformly.
    pub fn pick<'a>(&mut self, gestures: &'a [String]) -> Option<&'a str> {
        gestures.choose(&mut self.rng).map(String::as_str)
    }

    /// Drop accumulated idle time (the threshold is kept).
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn next_delay(&self) -> f32 {
        self.next_delay
    }
}

fn draw_delay(cfg: &IdleGestureConfig, rng: &mut Pcg32) -> f32 {
    let lo = cfg.min_delay.max(0.0);
    let hi = cfg.max_delay.max(lo);
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}
