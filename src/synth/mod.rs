//! Deterministic synthesis bridge: a validated [`SoundSpec`] in, a playable
//! WAV artifact out.
//!
//! Pure from the caller's perspective: no I/O beyond in-memory computation,
//! and the same spec always renders byte-identical output. The noise
//! oscillator draws from a PCG32 stream seeded by a BLAKE3 hash of the
//! spec's canonical serialization.

mod engine;
pub mod wav;

use crate::spec::{SoundSpec, SAMPLE_SIZE, SUPPORTED_SAMPLE_RATES};
use base64::Engine as _;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Rate the engine synthesizes at; lower output rates decimate from here.
const NATIVE_SAMPLE_RATE: u32 = 44100;

/// The synthesizer rejected an otherwise well-shaped parameter set.
#[derive(Debug, Error, PartialEq)]
pub enum SynthesisError {
    #[error("parameter `{name}` out of range: {value} (allowed {min} to {max})")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unsupported wave_type {0} (expected 0..=3)")]
    UnsupportedWaveType(u32),

    #[error("unsupported sample_rate {0} (expected 44100, 22050, 11025 or 5512)")]
    UnsupportedSampleRate(u32),

    #[error("unsupported sample_size {0} (only 16-bit output)")]
    UnsupportedSampleSize(u32),
}

/// A self-contained encoded waveform, playable and downloadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    wav: Vec<u8>,
}

impl AudioArtifact {
    /// The complete RIFF/WAVE file bytes.
    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    /// A `data:audio/wav;base64,...` URI suitable for direct playback.
    pub fn data_uri(&self) -> String {
        format!(
            "data:audio/wav;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.wav)
        )
    }

    /// Write the WAV to disk.
    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, &self.wav)
    }
}

/// Render a validated specification into an audio artifact.
///
/// Fails with [`SynthesisError`] when a parameter is outside the range the
/// synthesis algorithm is defined over; the schema's type layer cannot
/// express those bounds.
pub fn render(spec: &SoundSpec) -> Result<AudioArtifact, SynthesisError> {
    validate_ranges(spec)?;

    let rng = Pcg32::seed_from_u64(spec_seed(spec));
    let native = engine::Engine::new(spec, rng).render();

    // integer decimation from the native rate (5512 is the classic
    // step-of-8 rate, not exactly 44100/8)
    let step = match spec.sample_rate {
        44100 => 1,
        22050 => 2,
        11025 => 4,
        _ => 8,
    };
    let samples: Vec<f64> = native.iter().copied().step_by(step).collect();

    let format = wav::WavFormat::mono16(spec.sample_rate);
    let pcm = wav::samples_to_pcm16(&samples);
    Ok(AudioArtifact {
        wav: wav::write_wav_to_vec(&format, &pcm),
    })
}

/// Derive the noise seed from the spec itself, so equal specs render
/// equal bytes.
fn spec_seed(spec: &SoundSpec) -> u64 {
    let hash = blake3::hash(&spec.canonical_bytes());
    let bytes: [u8; 8] = hash.as_bytes()[0..8].try_into().expect("hash is 32 bytes");
    u64::from_le_bytes(bytes)
}

fn validate_ranges(spec: &SoundSpec) -> Result<(), SynthesisError> {
    if spec.wave_type > 3 {
        return Err(SynthesisError::UnsupportedWaveType(spec.wave_type));
    }
    if !SUPPORTED_SAMPLE_RATES.contains(&spec.sample_rate) {
        return Err(SynthesisError::UnsupportedSampleRate(spec.sample_rate));
    }
    if spec.sample_size != SAMPLE_SIZE {
        return Err(SynthesisError::UnsupportedSampleSize(spec.sample_size));
    }

    let unit = [
        ("p_env_attack", spec.p_env_attack),
        ("p_env_sustain", spec.p_env_sustain),
        ("p_env_punch", spec.p_env_punch),
        ("p_env_decay", spec.p_env_decay),
        ("p_base_freq", spec.p_base_freq),
        ("p_freq_limit", spec.p_freq_limit),
        ("p_vib_strength", spec.p_vib_strength),
        ("p_vib_speed", spec.p_vib_speed),
        ("p_arp_speed", spec.p_arp_speed),
        ("p_duty", spec.p_duty),
        ("p_repeat_speed", spec.p_repeat_speed),
        ("p_lpf_freq", spec.p_lpf_freq),
        ("p_lpf_resonance", spec.p_lpf_resonance),
        ("p_hpf_freq", spec.p_hpf_freq),
        ("sound_vol", spec.sound_vol),
    ];
    for (name, value) in unit {
        check_range(name, value, 0.0, 1.0)?;
    }

    let signed = [
        ("p_freq_ramp", spec.p_freq_ramp),
        ("p_freq_dramp", spec.p_freq_dramp),
        ("p_arp_mod", spec.p_arp_mod),
        ("p_duty_ramp", spec.p_duty_ramp),
        ("p_pha_offset", spec.p_pha_offset),
        ("p_pha_ramp", spec.p_pha_ramp),
        ("p_lpf_ramp", spec.p_lpf_ramp),
        ("p_hpf_ramp", spec.p_hpf_ramp),
    ];
    for (name, value) in signed {
        check_range(name, value, -1.0, 1.0)?;
    }

    Ok(())
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), SynthesisError> {
    if !value.is_finite() || value < min || value > max {
        return Err(SynthesisError::ParameterOutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
