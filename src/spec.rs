//! The sound specification: the closed set of synthesis parameters the
//! model produces and the synthesizer consumes.
//!
//! The shape matches the classic sfxr parameter file. Envelope, frequency,
//! vibrato, and arpeggio fields are normalized floats; `wave_type` selects
//! the oscillator; `sample_size` is pinned to 16-bit output.

use crate::structured::schema::{self, SchemaGenerator};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Sample rates the synthesizer can emit.
pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [44100, 22050, 11025, 5512];

/// Bit depth of the emitted PCM. The schema pins the field to this value.
pub const SAMPLE_SIZE: u32 = 16;

/// A validated synthesis parameter set.
///
/// Immutable once produced; one spec is consumed by exactly one render.
/// Unknown fields are rejected at deserialization in addition to the
/// structural validation of the raw model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoundSpec {
    #[serde(rename = "oldParams")]
    pub old_params: bool,
    /// Oscillator: 0 square, 1 sawtooth, 2 sine, 3 noise.
    pub wave_type: u32,
    pub p_env_attack: f64,
    pub p_env_sustain: f64,
    pub p_env_punch: f64,
    pub p_env_decay: f64,
    pub p_base_freq: f64,
    pub p_freq_limit: f64,
    pub p_freq_ramp: f64,
    pub p_freq_dramp: f64,
    pub p_vib_strength: f64,
    pub p_vib_speed: f64,
    pub p_arp_mod: f64,
    pub p_arp_speed: f64,
    pub p_duty: f64,
    pub p_duty_ramp: f64,
    pub p_repeat_speed: f64,
    pub p_pha_offset: f64,
    pub p_pha_ramp: f64,
    pub p_lpf_freq: f64,
    pub p_lpf_ramp: f64,
    pub p_lpf_resonance: f64,
    pub p_hpf_freq: f64,
    pub p_hpf_ramp: f64,
    pub sound_vol: f64,
    pub sample_rate: u32,
    pub sample_size: u32,
}

static SCHEMA: Lazy<serde_json::Value> = Lazy::new(|| {
    SchemaGenerator::new()
        .title("sound_spec")
        .add_property("oldParams", schema::boolean())
        .add_property("wave_type", schema::integer(0, 3))
        .add_property("p_env_attack", schema::number())
        .add_property("p_env_sustain", schema::number())
        .add_property("p_env_punch", schema::number())
        .add_property("p_env_decay", schema::number())
        .add_property("p_base_freq", schema::number())
        .add_property("p_freq_limit", schema::number())
        .add_property("p_freq_ramp", schema::number())
        .add_property("p_freq_dramp", schema::number())
        .add_property("p_vib_strength", schema::number())
        .add_property("p_vib_speed", schema::number())
        .add_property("p_arp_mod", schema::number())
        .add_property("p_arp_speed", schema::number())
        .add_property("p_duty", schema::number())
        .add_property("p_duty_ramp", schema::number())
        .add_property("p_repeat_speed", schema::number())
        .add_property("p_pha_offset", schema::number())
        .add_property("p_pha_ramp", schema::number())
        .add_property("p_lpf_freq", schema::number())
        .add_property("p_lpf_ramp", schema::number())
        .add_property("p_lpf_resonance", schema::number())
        .add_property("p_hpf_freq", schema::number())
        .add_property("p_hpf_ramp", schema::number())
        .add_property("sound_vol", schema::number())
        .add_property(
            "sample_rate",
            schema::integer_enum(&[44100, 22050, 11025, 5512]),
        )
        .add_property("sample_size", schema::constant(SAMPLE_SIZE))
        .require_all()
        .build()
});

impl SoundSpec {
    /// The closed JSON schema describing this shape. Sent with the request
    /// and used to validate the response.
    pub fn schema() -> &'static serde_json::Value {
        &SCHEMA
    }

    /// Canonical serialized form. Field order follows the struct
    /// declaration, so equal specs hash equally.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("sound spec serializes")
    }
}

#[cfg(test)]
impl SoundSpec {
    /// A pickup-coin style preset shared by unit tests.
    pub(crate) fn test_sample() -> Self {
        Self {
            old_params: true,
            wave_type: 0,
            p_env_attack: 0.0,
            p_env_sustain: 0.3,
            p_env_punch: 0.4,
            p_env_decay: 0.4,
            p_base_freq: 0.8,
            p_freq_limit: 0.0,
            p_freq_ramp: 0.0,
            p_freq_dramp: 0.0,
            p_vib_strength: 0.0,
            p_vib_speed: 0.0,
            p_arp_mod: 0.5,
            p_arp_speed: 0.6,
            p_duty: 0.5,
            p_duty_ramp: 0.0,
            p_repeat_speed: 0.0,
            p_pha_offset: 0.0,
            p_pha_ramp: 0.0,
            p_lpf_freq: 1.0,
            p_lpf_ramp: 0.0,
            p_lpf_resonance: 0.0,
            p_hpf_freq: 0.0,
            p_hpf_ramp: 0.0,
            sound_vol: 0.5,
            sample_rate: 44100,
            sample_size: 16,
        }
    }
}
