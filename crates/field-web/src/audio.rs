//! WebAudio synthesis for interaction sounds. Everything is generated from
//! oscillators, noise buffers and filters; no samples are loaded.
//!
//! One engine instance owns the context, the master gain and the single
//! persistent condensation voice. Every other sound is a fire-and-forget
//! node graph that frees itself when its source stops.

use web_sys as web;

use crate::constants::MASTER_GAIN_DEFAULT;
use field_core::AudioTriggers;

struct CondensationVoice {
    fundamental: web::OscillatorNode,
    overtone: web::OscillatorNode,
    gain: web::GainNode,
}

pub struct AudioEngine {
    ctx: web::AudioContext,
    master: web::GainNode,
    /// At most one hum voice per engine; repeated triggers retune its gain
    /// instead of stacking oscillators.
    condensation: Option<CondensationVoice>,
    noise_seed: u32,
}

fn create_gain(ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode, ()> {
    match web::GainNode::new(ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{label} GainNode error: {e:?}");
            Err(())
        }
    }
}

impl AudioEngine {
    /// Build the context and master bus. Must be called from a user gesture
    /// handler or the context starts suspended forever.
    pub fn new() -> Result<Self, ()> {
        let ctx = web::AudioContext::new().map_err(|e| {
            log::error!("AudioContext error: {e:?}");
        })?;
        // Safari can hand back a suspended context even inside a gesture.
        if ctx.state() == web::AudioContextState::Suspended {
            _ = ctx.resume();
        }
        let master = create_gain(&ctx, MASTER_GAIN_DEFAULT, "master")?;
        _ = master.connect_with_audio_node(&ctx.destination());
        log::info!("audio engine ready, sample rate {}", ctx.sample_rate());
        Ok(Self {
            ctx,
            master,
            condensation: None,
            noise_seed: 0x1234_ABCD,
        })
    }

    pub fn set_volume(&self, v: f32) {
        self.master.gain().set_value(v.clamp(0.0, 1.0));
    }

    pub fn dispose(self) {
        if let Some(voice) = &self.condensation {
            _ = voice.fundamental.stop();
            _ = voice.overtone.stop();
        }
        _ = self.ctx.close();
    }

    fn ensure_running(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            _ = self.ctx.resume();
        }
    }

    fn noise_buffer(&mut self, duration: f32) -> Option<web::AudioBuffer> {
        let sr = self.ctx.sample_rate();
        let len = (sr * duration) as u32;
        let buffer = self.ctx.create_buffer(1, len.max(1), sr).ok()?;
        let mut data = vec![0.0f32; len.max(1) as usize];
        for v in data.iter_mut() {
            // xorshift32, good enough for audio noise
            let mut x = self.noise_seed;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.noise_seed = x;
            *v = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
        }
        _ = buffer.copy_to_channel(&mut data, 0);
        Some(buffer)
    }

    fn noise_source(&mut self, duration: f32) -> Option<web::AudioBufferSourceNode> {
        let buffer = self.noise_buffer(duration)?;
        let src = self.ctx.create_buffer_source().ok()?;
        src.set_buffer(Some(&buffer));
        Some(src)
    }

    /// Percussive pop: a 50ms white-noise burst through a 2kHz bandpass
    /// with a fast exponential decay.
    pub fn play_annihilation(&mut self) {
        self.ensure_running();
        let now = self.ctx.current_time();
        let Some(noise) = self.noise_source(0.05) else {
            return;
        };
        let Ok(bp) = web::BiquadFilterNode::new(&self.ctx) else {
            return;
        };
        bp.set_type(web::BiquadFilterType::Bandpass);
        bp.frequency().set_value(2000.0);
        bp.q().set_value(5.0);
        let Ok(env) = create_gain(&self.ctx, 1.0, "pop env") else {
            return;
        };
        _ = env.gain().set_value_at_time(1.0, now);
        _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 0.05);
        _ = noise.connect_with_audio_node(&bp);
        _ = bp.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(&self.master);
        _ = noise.start_with_when(now);
        _ = noise.stop_with_when(now + 0.05);
    }

    /// Descending sweep: sine from 800Hz down to 100Hz over 0.4s.
    pub fn play_decay(&mut self) {
        self.ensure_running();
        let now = self.ctx.current_time();
        let Ok(osc) = web::OscillatorNode::new(&self.ctx) else {
            return;
        };
        osc.set_type(web::OscillatorType::Sine);
        _ = osc.frequency().set_value_at_time(800.0, now);
        _ = osc
            .frequency()
            .exponential_ramp_to_value_at_time(100.0, now + 0.4);
        let Ok(env) = create_gain(&self.ctx, 0.4, "sweep env") else {
            return;
        };
        _ = env.gain().set_value_at_time(0.4, now);
        _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 0.4);
        _ = osc.connect_with_audio_node(&env);
        _ = env.connect_with_audio_node(&self.master);
        _ = osc.start_with_when(now);
        _ = osc.stop_with_when(now + 0.4);
    }

    /// Persistent low hum at 60Hz with a half-gain 120Hz overtone. Repeated
    /// calls crossfade the shared gain over 80ms rather than restarting.
    pub fn play_condensation(&mut self, strength: f32) {
        self.ensure_running();
        let clamped = strength.clamp(0.0, 1.0);
        let now = self.ctx.current_time();

        if self.condensation.is_none() {
            let Ok(gain) = create_gain(&self.ctx, 0.0, "hum") else {
                return;
            };
            _ = gain.connect_with_audio_node(&self.master);

            let Ok(fundamental) = web::OscillatorNode::new(&self.ctx) else {
                return;
            };
            fundamental.set_type(web::OscillatorType::Sine);
            fundamental.frequency().set_value(60.0);
            _ = fundamental.connect_with_audio_node(&gain);
            _ = fundamental.start_with_when(now);

            let Ok(overtone) = web::OscillatorNode::new(&self.ctx) else {
                return;
            };
            overtone.set_type(web::OscillatorType::Sine);
            overtone.frequency().set_value(120.0);
            let Ok(overtone_gain) = create_gain(&self.ctx, 0.5, "hum overtone") else {
                return;
            };
            _ = overtone.connect_with_audio_node(&overtone_gain);
            _ = overtone_gain.connect_with_audio_node(&gain);
            _ = overtone.start_with_when(now);

            self.condensation = Some(CondensationVoice {
                fundamental,
                overtone,
                gain,
            });
        }

        let voice = self.condensation.as_ref().unwrap();
        let param = voice.gain.gain();
        _ = param.cancel_scheduled_values(now);
        _ = param.set_value_at_time(param.value(), now);
        _ = param.linear_ramp_to_value_at_time(clamped * 0.5, now + 0.08);
    }

    /// Harmonic ping: 440Hz plus a 660Hz fifth, very quiet, 200ms.
    pub fn play_entanglement(&mut self) {
        self.ensure_running();
        let now = self.ctx.current_time();
        let Ok(env) = create_gain(&self.ctx, 0.08, "ping env") else {
            return;
        };
        _ = env.gain().set_value_at_time(0.08, now);
        _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 0.2);
        _ = env.connect_with_audio_node(&self.master);
        for freq in [440.0, 660.0] {
            let Ok(osc) = web::OscillatorNode::new(&self.ctx) else {
                continue;
            };
            osc.set_type(web::OscillatorType::Sine);
            osc.frequency().set_value(freq);
            _ = osc.connect_with_audio_node(&env);
            _ = osc.start_with_when(now);
            _ = osc.stop_with_when(now + 0.2);
        }
    }

    /// Deep thud: 40Hz sine with a 10ms attack and 300ms decay, layered
    /// with a short noise burst.
    pub fn play_shockwave(&mut self) {
        self.ensure_running();
        let now = self.ctx.current_time();
        if let Ok(osc) = web::OscillatorNode::new(&self.ctx) {
            osc.set_type(web::OscillatorType::Sine);
            osc.frequency().set_value(40.0);
            if let Ok(env) = create_gain(&self.ctx, 0.0, "thud env") {
                _ = env.gain().set_value_at_time(0.001, now);
                _ = env.gain().linear_ramp_to_value_at_time(0.6, now + 0.01);
                _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 0.3);
                _ = osc.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(&self.master);
                _ = osc.start_with_when(now);
                _ = osc.stop_with_when(now + 0.3);
            }
        }
        if let Some(noise) = self.noise_source(0.08) {
            if let Ok(env) = create_gain(&self.ctx, 0.25, "thud noise env") {
                _ = env.gain().set_value_at_time(0.25, now);
                _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 0.08);
                _ = noise.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(&self.master);
                _ = noise.start_with_when(now);
                _ = noise.stop_with_when(now + 0.08);
            }
        }
    }

    /// Composite blast: rising 200 to 2000Hz sweep, then a long noise tail,
    /// both through a lowpass that closes from 6kHz down to 200Hz.
    pub fn play_supernova(&mut self) {
        self.ensure_running();
        let now = self.ctx.current_time();
        let Ok(lp) = web::BiquadFilterNode::new(&self.ctx) else {
            return;
        };
        lp.set_type(web::BiquadFilterType::Lowpass);
        _ = lp.frequency().set_value_at_time(6000.0, now);
        _ = lp
            .frequency()
            .exponential_ramp_to_value_at_time(200.0, now + 1.3);
        lp.q().set_value(2.0);
        _ = lp.connect_with_audio_node(&self.master);

        if let Ok(osc) = web::OscillatorNode::new(&self.ctx) {
            osc.set_type(web::OscillatorType::Sine);
            _ = osc.frequency().set_value_at_time(200.0, now);
            _ = osc
                .frequency()
                .exponential_ramp_to_value_at_time(2000.0, now + 0.3);
            if let Ok(env) = create_gain(&self.ctx, 0.5, "blast env") {
                _ = env.gain().set_value_at_time(0.5, now);
                _ = env.gain().set_value_at_time(0.5, now + 0.3);
                _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 0.6);
                _ = osc.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(&lp);
                _ = osc.start_with_when(now);
                _ = osc.stop_with_when(now + 0.6);
            }
        }
        if let Some(noise) = self.noise_source(1.3) {
            if let Ok(env) = create_gain(&self.ctx, 0.0, "blast noise env") {
                _ = env.gain().set_value_at_time(0.001, now);
                _ = env.gain().linear_ramp_to_value_at_time(0.6, now + 0.3);
                _ = env.gain().exponential_ramp_to_value_at_time(0.001, now + 1.3);
                _ = noise.connect_with_audio_node(&env);
                _ = env.connect_with_audio_node(&lp);
                _ = noise.start_with_when(now);
                _ = noise.stop_with_when(now + 1.3);
            }
        }
    }

    /// Sonify one tick's trigger record.
    pub fn fire(&mut self, triggers: &AudioTriggers) {
        if triggers.annihilation {
            self.play_annihilation();
        }
        if triggers.decay {
            self.play_decay();
        }
        if triggers.entanglement {
            self.play_entanglement();
        }
        if triggers.supernova {
            self.play_supernova();
        } else if triggers.shockwave {
            // A supernova already carries its own impact layer.
            self.play_shockwave();
        }
        if let Some(strength) = triggers.condensation {
            self.play_condensation(strength);
        }
    }
}
