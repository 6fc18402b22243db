//! Audio system using Web Audio API
//!
//! Procedurally generated tones - no external files needed!

use web_sys::{AudioContext, OscillatorType};

use crate::sim::SoundEffect;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// 0.0 - 1.0, already zero when muted
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// The context is created lazily on the first user gesture
    pub fn new() -> Self {
        Self {
            ctx: None,
            volume: 0.8,
        }
    }

    /// Create or resume the audio context (required after user gesture)
    pub fn unlock(&mut self) {
        if self.ctx.is_none() {
            self.ctx = AudioContext::new().ok();
            if self.ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
        }
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Set playback volume (0.0 - 1.0), see `Settings::effective_volume`
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        match effect {
            SoundEffect::Consume => {
                tone(ctx, 880.0, OscillatorType::Square, 0.08, 0.12 * vol);
                tone(ctx, 1100.0, OscillatorType::Square, 0.06, 0.08 * vol);
            }
            SoundEffect::Death => {
                tone(ctx, 200.0, OscillatorType::Sawtooth, 0.30, 0.20 * vol);
                tone(ctx, 120.0, OscillatorType::Sawtooth, 0.50, 0.15 * vol);
            }
        }
    }
}

/// One oscillator with an exponential fade-out
fn tone(ctx: &AudioContext, freq: f32, osc_type: OscillatorType, duration: f64, gain_value: f32) {
    let (Ok(osc), Ok(gain)) = (ctx.create_oscillator(), ctx.create_gain()) else {
        return;
    };
    if osc.connect_with_audio_node(&gain).is_err()
        || gain.connect_with_audio_node(&ctx.destination()).is_err()
    {
        return;
    }

    let t = ctx.current_time();
    osc.set_type(osc_type);
    osc.frequency().set_value_at_time(freq, t).ok();
    gain.gain().set_value_at_time(gain_value, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.001, t + duration)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + duration).ok();
}
