//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is described by a `Voice` recipe so the sounds can be
//! inspected without a browser; `AudioManager` turns recipes into nodes.

use rand::Rng;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shifted lanes
    LaneChange,
    /// Obstacle dodged
    Score,
    /// Player hit an obstacle
    Crash,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Triangle,
    Square,
}

/// A pitched blip sweeping exponentially from `freq_start` to `freq_end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub freq_start: f32,
    pub freq_end: f32,
    /// Seconds the sweep takes
    pub sweep: f64,
    /// Peak gain before the master volume is applied
    pub gain: f32,
    /// Seconds until the oscillator stops
    pub duration: f64,
}

/// White noise through a low-pass filter whose cutoff decays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseBurst {
    pub duration: f64,
    pub gain: f32,
    pub cutoff_start: f32,
    pub cutoff_end: f32,
}

/// Synthesis recipe for one effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voice {
    Tone(Tone),
    Noise(NoiseBurst),
}

/// Gain ramps end here instead of zero (exponential ramps cannot reach 0)
pub const SILENCE: f32 = 0.01;

impl SoundEffect {
    pub fn voice(self) -> Voice {
        match self {
            // Quick rising chirp
            SoundEffect::LaneChange => Voice::Tone(Tone {
                waveform: Waveform::Triangle,
                freq_start: 300.0,
                freq_end: 600.0,
                sweep: 0.1,
                gain: 0.15,
                duration: 0.1,
            }),
            // Bright rising bleep
            SoundEffect::Score => Voice::Tone(Tone {
                waveform: Waveform::Square,
                freq_start: 500.0,
                freq_end: 1000.0,
                sweep: 0.1,
                gain: 0.08,
                duration: 0.15,
            }),
            // Muffled boom
            SoundEffect::Crash => Voice::Noise(NoiseBurst {
                duration: 0.5,
                gain: 0.4,
                cutoff_start: 1000.0,
                cutoff_end: 100.0,
            }),
        }
    }
}

/// Uniform white noise in [-1, 1)
pub fn white_noise<R: Rng>(rng: &mut R, samples: usize) -> Vec<f32> {
    (0..samples).map(|_| rng.random_range(-1.0..1.0)).collect()
}

/// Number of samples needed to hold `seconds` of audio
pub fn sample_count(sample_rate: f32, seconds: f64) -> usize {
    (sample_rate as f64 * seconds).ceil().max(1.0) as usize
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

    use super::*;

    /// Audio manager for the game
    ///
    /// The `AudioContext` is only created on the first user gesture; browsers
    /// keep contexts made earlier suspended.
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        init_failed: bool,
        noise_rng: Pcg32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self {
                ctx: None,
                init_failed: false,
                noise_rng: Pcg32::seed_from_u64(js_sys::Date::now() as u64),
            }
        }

        /// Create (or resume) the context. Safe to call on every gesture.
        pub fn init(&mut self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
                return;
            }
            if self.init_failed {
                return;
            }
            match AudioContext::new() {
                Ok(ctx) => {
                    log::info!("AudioContext created ({} Hz)", ctx.sample_rate());
                    self.ctx = Some(ctx);
                }
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    self.init_failed = true;
                }
            }
        }

        /// Play a sound effect at `volume` (0.0 - 1.0)
        pub fn play(&mut self, effect: SoundEffect, volume: f32) {
            if volume <= 0.0 {
                return;
            }
            let Some(ctx) = self.ctx.clone() else { return };

            match effect.voice() {
                Voice::Tone(tone) => play_tone(&ctx, &tone, volume),
                Voice::Noise(noise) => self.play_noise(&ctx, &noise, volume),
            }
        }

        fn play_noise(&mut self, ctx: &AudioContext, noise: &NoiseBurst, vol: f32) {
            let rate = ctx.sample_rate();
            let len = sample_count(rate, noise.duration);
            let mut samples = white_noise(&mut self.noise_rng, len);

            let Ok(buffer) = ctx.create_buffer(1, len as u32, rate) else {
                return;
            };
            if buffer.copy_to_channel(&mut samples, 0).is_err() {
                return;
            }
            let Ok(source) = ctx.create_buffer_source() else {
                return;
            };
            source.set_buffer(Some(&buffer));
            let Ok(filter) = ctx.create_biquad_filter() else {
                return;
            };
            let Ok(gain) = ctx.create_gain() else { return };

            filter.set_type(BiquadFilterType::Lowpass);
            let connected = source.connect_with_audio_node(&filter).is_ok()
                && filter.connect_with_audio_node(&gain).is_ok()
                && gain.connect_with_audio_node(&ctx.destination()).is_ok();
            if !connected {
                return;
            }

            let t = ctx.current_time();
            filter.frequency().set_value_at_time(noise.cutoff_start, t).ok();
            filter
                .frequency()
                .exponential_ramp_to_value_at_time(noise.cutoff_end, t + noise.duration)
                .ok();
            gain.gain().set_value_at_time(vol * noise.gain, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(SILENCE, t + noise.duration)
                .ok();

            source.start().ok();
            source.stop_with_when(t + noise.duration).ok();
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
        let osc_type = match tone.waveform {
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Square => OscillatorType::Square,
        };
        let Some((osc, gain)) = create_osc(ctx, tone.freq_start, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * tone.gain, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(SILENCE, t + tone.duration)
            .ok();
        osc.frequency().set_value_at_time(tone.freq_start, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(tone.freq_end, t + tone.sweep)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + tone.duration).ok();
    }
}
