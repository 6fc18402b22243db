//! Game settings and preferences
//!
//! Read from LocalStorage, separately from the best score.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{BurstConfig, FrameScheduler, Grid, Tuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    /// Cell edge in CSS pixels
    pub cell_size: f32,
    /// Largest board edge in CSS pixels
    pub max_board_size: f32,

    // === Pace ===
    /// Ticks per second at score 0
    pub start_speed: f32,
    /// Ticks per second added per food
    pub speed_step: f32,
    /// Cap on catch-up ticks in a single frame
    pub max_ticks_per_frame: u32,
    /// Longest frame delta fed to the scheduler (ms)
    pub max_frame_dt_ms: f64,

    // === Visual Effects ===
    /// Particle bursts on eat/death
    pub particles: bool,
    pub consume_burst: usize,
    pub death_burst: usize,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE_PX,
            max_board_size: MAX_BOARD_PX,

            start_speed: START_SPEED,
            speed_step: SPEED_STEP,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
            max_frame_dt_ms: MAX_FRAME_DT_MS,

            particles: true,
            consume_burst: CONSUME_BURST,
            death_burst: DEATH_BURST,

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Speed curve for new sessions
    pub fn tuning(&self) -> Tuning {
        Tuning {
            start_speed: self.start_speed.max(0.1),
            speed_step: self.speed_step.max(0.0),
        }
    }

    /// Burst sizes, zeroed when particles are off
    pub fn bursts(&self) -> BurstConfig {
        if !self.particles {
            return BurstConfig {
                consume: 0,
                death: 0,
            };
        }
        BurstConfig {
            consume: self.consume_burst,
            death: self.death_burst,
        }
    }

    pub fn scheduler(&self) -> FrameScheduler {
        FrameScheduler::new(self.max_ticks_per_frame, self.max_frame_dt_ms)
    }

    /// Board for an available drawing area in CSS pixels
    pub fn grid_for_area(&self, width: f32, height: f32) -> Grid {
        Grid::fit(width, height, self.cell_size, self.max_board_size)
    }

    /// Effective volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "neon_snake_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
