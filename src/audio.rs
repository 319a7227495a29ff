//! Audio system using Web Audio API
//!
//! The music track is decoded once at startup and looped. Hit, miss and
//! milestone cues are synthesized from oscillators.

use anyhow::{Context, Result, anyhow};
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioBuffer, AudioBufferSourceNode, AudioContext, AudioContextState, GainNode,
    OscillatorNode, OscillatorType,
};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Lane press scored against a disk
    Hit,
    /// Lane press with nothing in the window while a combo was running
    Miss,
    /// Combo reached the next milestone
    Milestone,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: AudioContext,
    music_gain: GainNode,
    music_source: Option<AudioBufferSourceNode>,
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Result<Self> {
        let ctx = AudioContext::new()
            .map_err(|e| anyhow!("{:?}", e))
            .context("creating AudioContext")?;
        let music_gain = ctx.create_gain().map_err(|e| anyhow!("{:?}", e))?;
        music_gain
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow!("{:?}", e))?;

        let mut audio = Self {
            ctx,
            music_gain,
            music_source: None,
            music_volume: settings.effective_music_volume(),
            sfx_volume: settings.effective_sfx_volume(),
            muted: false,
        };
        audio.apply_music_gain();
        Ok(audio)
    }

    /// Decode the encoded music track and start it looping
    pub async fn load_music(&mut self, encoded: &[u8]) -> Result<()> {
        // decodeAudioData detaches its input, so hand it a fresh copy
        let bytes = Uint8Array::from(encoded);
        let promise = self
            .ctx
            .decode_audio_data(&bytes.buffer())
            .map_err(|e| anyhow!("{:?}", e))?;
        let buffer: AudioBuffer = JsFuture::from(promise)
            .await
            .map_err(|e| anyhow!("{:?}", e))
            .context("decoding music")?
            .dyn_into()
            .map_err(|e| anyhow!("{:?}", e))?;

        let source = self
            .ctx
            .create_buffer_source()
            .map_err(|e| anyhow!("{:?}", e))?;
        source.set_buffer(Some(&buffer));
        source.set_loop(true);
        source
            .connect_with_audio_node(&self.music_gain)
            .map_err(|e| anyhow!("{:?}", e))?;
        source.start().map_err(|e| anyhow!("{:?}", e))?;

        log::info!("Music loaded: {:.1}s", buffer.duration());
        self.music_source = Some(source);
        Ok(())
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if self.ctx.state() == AudioContextState::Suspended {
            let _ = self.ctx.resume();
        }
    }

    /// Suspend everything, music included
    pub fn suspend(&self) {
        if self.ctx.state() == AudioContextState::Running {
            let _ = self.ctx.suspend();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_music_gain();
    }

    fn apply_music_gain(&self) {
        let vol = if self.muted { 0.0 } else { self.music_volume };
        self.music_gain.gain().set_value(vol);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted || self.sfx_volume <= 0.0 {
            return;
        }
        let vol = self.sfx_volume;
        let ctx = &self.ctx;

        match effect {
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::Miss => self.play_miss(ctx, vol),
            SoundEffect::Milestone => self.play_milestone(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
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

    /// Hit - short bright tick
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1320.0, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Miss - low buzzy drop
    fn play_miss(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.3)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Milestone - rising arpeggio
    fn play_milestone(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}
