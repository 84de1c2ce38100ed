//! sfxr-style waveform synthesis.
//!
//! A faithful rendition of the classic sfxr signal path: phase-accumulator
//! oscillator (square/saw/sine/noise), three-stage envelope with punch,
//! frequency slide with limit and delta-slide, vibrato, one-step arpeggio,
//! duty-cycle sweep, resonant low-pass and one-pole high-pass filters,
//! flanger-style phaser, and a repeat timer that re-strikes the oscillator
//! state mid-sound. Output is mono f64 at 44100 Hz before decimation.

use crate::spec::SoundSpec;
use rand::Rng;
use rand_pcg::Pcg32;

const OVERSAMPLING: usize = 8;
const MASTER_GAIN: f64 = 0.2;
const PHASER_BUFFER_LEN: usize = 1024;
const NOISE_BUFFER_LEN: usize = 32;

// Hard ceiling on render length; the envelope alone never exceeds this.
const MAX_SAMPLES: usize = 44100 * 10;

/// Oscillator state reset both at start and on each repeat strike.
/// The envelope, filters, and phaser deliberately keep running across a
/// repeat, matching sfxr.
struct Strike {
    fperiod: f64,
    fmaxperiod: f64,
    fslide: f64,
    fdslide: f64,
    square_duty: f64,
    square_slide: f64,
    arp_mod: f64,
    arp_time: i32,
    arp_limit: i32,
}

impl Strike {
    fn from_spec(spec: &SoundSpec) -> Self {
        let arp_mod = if spec.p_arp_mod >= 0.0 {
            1.0 - spec.p_arp_mod.powi(2) * 0.9
        } else {
            1.0 + spec.p_arp_mod.powi(2) * 10.0
        };
        let arp_limit = if spec.p_arp_speed == 1.0 {
            0
        } else {
            ((1.0 - spec.p_arp_speed).powi(2) * 20000.0 + 32.0) as i32
        };

        Self {
            fperiod: 100.0 / (spec.p_base_freq.powi(2) + 0.001),
            fmaxperiod: 100.0 / (spec.p_freq_limit.powi(2) + 0.001),
            fslide: 1.0 - spec.p_freq_ramp.powi(3) * 0.01,
            fdslide: -spec.p_freq_dramp.powi(3) * 0.000001,
            square_duty: 0.5 - spec.p_duty * 0.5,
            square_slide: -spec.p_duty_ramp * 0.00005,
            arp_mod,
            arp_time: 0,
            arp_limit,
        }
    }
}

pub(crate) struct Engine<'a> {
    spec: &'a SoundSpec,
    rng: Pcg32,

    strike: Strike,
    phase: i32,
    period: i32,

    // envelope
    env_stage: usize,
    env_time: i32,
    env_length: [i32; 3],
    env_vol: f64,

    // filters
    fltp: f64,
    fltdp: f64,
    fltw: f64,
    fltw_d: f64,
    fltdmp: f64,
    fltphp: f64,
    flthp: f64,
    flthp_d: f64,

    // vibrato
    vib_phase: f64,
    vib_speed: f64,
    vib_amp: f64,

    // phaser
    fphase: f64,
    fdphase: f64,
    iphase: i32,
    ipp: usize,
    phaser_buffer: [f64; PHASER_BUFFER_LEN],

    noise_buffer: [f64; NOISE_BUFFER_LEN],

    // repeat
    rep_time: i32,
    rep_limit: i32,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(spec: &'a SoundSpec, mut rng: Pcg32) -> Self {
        let fltw = spec.p_lpf_freq.powi(3) * 0.1;
        let fltdmp =
            (5.0 / (1.0 + spec.p_lpf_resonance.powi(2) * 20.0) * (0.01 + fltw)).min(0.8);

        let mut fphase = spec.p_pha_offset.powi(2) * 1020.0;
        if spec.p_pha_offset < 0.0 {
            fphase = -fphase;
        }
        let mut fdphase = spec.p_pha_ramp.powi(2);
        if spec.p_pha_ramp < 0.0 {
            fdphase = -fdphase;
        }

        let rep_limit = if spec.p_repeat_speed == 0.0 {
            0
        } else {
            ((1.0 - spec.p_repeat_speed).powi(2) * 20000.0 + 32.0) as i32
        };

        let mut noise_buffer = [0.0; NOISE_BUFFER_LEN];
        for value in noise_buffer.iter_mut() {
            *value = rng.gen_range(-1.0..1.0);
        }

        Self {
            strike: Strike::from_spec(spec),
            phase: 0,
            period: 0,
            env_stage: 0,
            env_time: 0,
            env_length: [
                (spec.p_env_attack.powi(2) * 100_000.0) as i32,
                (spec.p_env_sustain.powi(2) * 100_000.0) as i32,
                (spec.p_env_decay.powi(2) * 100_000.0) as i32,
            ],
            env_vol: 0.0,
            fltp: 0.0,
            fltdp: 0.0,
            fltw,
            fltw_d: 1.0 + spec.p_lpf_ramp * 0.0001,
            fltdmp,
            fltphp: 0.0,
            flthp: spec.p_hpf_freq.powi(2) * 0.1,
            flthp_d: 1.0 + spec.p_hpf_ramp * 0.0003,
            vib_phase: 0.0,
            vib_speed: spec.p_vib_speed.powi(2) * 0.01,
            vib_amp: spec.p_vib_strength * 0.5,
            fphase,
            fdphase,
            iphase: (fphase as i32).abs(),
            ipp: 0,
            phaser_buffer: [0.0; PHASER_BUFFER_LEN],
            noise_buffer,
            rep_time: 0,
            rep_limit,
            spec,
            rng,
        }
    }

    /// Render the sound to completion at 44100 Hz.
    pub(crate) fn render(mut self) -> Vec<f64> {
        let mut samples = Vec::with_capacity(self.total_env_length());

        for _ in 0..MAX_SAMPLES {
            match self.step() {
                Some(sample) => samples.push(sample),
                None => break,
            }
        }

        samples
    }

    fn total_env_length(&self) -> usize {
        self.env_length.iter().map(|&l| l.max(0) as usize).sum()
    }

    /// Advance one output sample. Returns None once the envelope has run
    /// out or the frequency limit cut the sound off.
    fn step(&mut self) -> Option<f64> {
        self.rep_time += 1;
        if self.rep_limit != 0 && self.rep_time >= self.rep_limit {
            self.rep_time = 0;
            self.strike = Strike::from_spec(self.spec);
        }

        // one-step arpeggio: a single pitch jump partway through
        self.strike.arp_time += 1;
        if self.strike.arp_limit != 0 && self.strike.arp_time >= self.strike.arp_limit {
            self.strike.arp_limit = 0;
            self.strike.fperiod *= self.strike.arp_mod;
        }

        self.strike.fslide += self.strike.fdslide;
        self.strike.fperiod *= self.strike.fslide;
        if self.strike.fperiod > self.strike.fmaxperiod {
            self.strike.fperiod = self.strike.fmaxperiod;
            if self.spec.p_freq_limit > 0.0 {
                return None;
            }
        }

        let mut rfperiod = self.strike.fperiod;
        if self.vib_amp > 0.0 {
            self.vib_phase += self.vib_speed;
            rfperiod = self.strike.fperiod * (1.0 + self.vib_phase.sin() * self.vib_amp);
        }
        self.period = (rfperiod as i32).max(8);

        self.strike.square_duty = (self.strike.square_duty + self.strike.square_slide).clamp(0.0, 0.5);

        self.env_time += 1;
        if self.env_time > self.env_length[self.env_stage] {
            self.env_time = 0;
            self.env_stage += 1;
            if self.env_stage == 3 {
                return None;
            }
        }
        self.env_vol = match self.env_stage {
            0 => f64::from(self.env_time) / f64::from(self.env_length[0].max(1)),
            1 => {
                1.0 + (1.0 - f64::from(self.env_time) / f64::from(self.env_length[1].max(1)))
                    * 2.0
                    * self.spec.p_env_punch
            }
            _ => 1.0 - f64::from(self.env_time) / f64::from(self.env_length[2].max(1)),
        };

        self.fphase += self.fdphase;
        self.iphase = (self.fphase as i32).abs().min(1023);

        if self.flthp_d != 0.0 {
            self.flthp = (self.flthp * self.flthp_d).clamp(0.00001, 0.1);
        }

        let mut ssample = 0.0;
        for _ in 0..OVERSAMPLING {
            self.phase += 1;
            if self.phase >= self.period {
                self.phase %= self.period;
                if self.spec.wave_type == 3 {
                    for value in self.noise_buffer.iter_mut() {
                        *value = self.rng.gen_range(-1.0..1.0);
                    }
                }
            }

            let fp = f64::from(self.phase) / f64::from(self.period);
            let mut sample = match self.spec.wave_type {
                0 => {
                    if fp < self.strike.square_duty {
                        0.5
                    } else {
                        -0.5
                    }
                }
                1 => 1.0 - fp * 2.0,
                2 => (fp * 2.0 * std::f64::consts::PI).sin(),
                _ => self.noise_buffer[(self.phase as usize * NOISE_BUFFER_LEN)
                    / self.period as usize],
            };

            // resonant low-pass
            let pp = self.fltp;
            self.fltw = (self.fltw * self.fltw_d).clamp(0.0, 0.1);
            if self.spec.p_lpf_freq < 1.0 {
                self.fltdp += (sample - self.fltp) * self.fltw;
                self.fltdp -= self.fltdp * self.fltdmp;
            } else {
                self.fltp = sample;
                self.fltdp = 0.0;
            }
            self.fltp += self.fltdp;

            // one-pole high-pass
            self.fltphp += self.fltp - pp;
            self.fltphp -= self.fltphp * self.flthp;
            sample = self.fltphp;

            // phaser
            self.phaser_buffer[self.ipp & (PHASER_BUFFER_LEN - 1)] = sample;
            sample += self.phaser_buffer
                [(self.ipp + PHASER_BUFFER_LEN - self.iphase as usize) & (PHASER_BUFFER_LEN - 1)];
            self.ipp = (self.ipp + 1) & (PHASER_BUFFER_LEN - 1);

            ssample += sample * self.env_vol;
        }

        ssample = ssample / OVERSAMPLING as f64 * MASTER_GAIN;
        ssample *= 2.0 * self.spec.sound_vol;

        Some(ssample.clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn base_spec() -> SoundSpec {
        SoundSpec::test_sample()
    }

    #[test]
    fn test_render_produces_signal() {
        let spec = base_spec();
        let samples = Engine::new(&spec, Pcg32::seed_from_u64(1)).render();

        assert!(!samples.is_empty());
        assert!(samples.iter().any(|&s| s.abs() > 0.01));
        assert!(samples.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }

    #[test]
    fn test_render_length_tracks_envelope() {
        let mut spec = base_spec();
        spec.p_env_sustain = 0.1;
        spec.p_env_decay = 0.1;
        let short = Engine::new(&spec, Pcg32::seed_from_u64(1)).render().len();

        spec.p_env_decay = 0.5;
        let long = Engine::new(&spec, Pcg32::seed_from_u64(1)).render().len();

        assert!(long > short);
    }

    #[test]
    fn test_zero_envelope_is_near_instant() {
        let mut spec = base_spec();
        spec.p_env_attack = 0.0;
        spec.p_env_sustain = 0.0;
        spec.p_env_decay = 0.0;
        // one stage advances per sample, so the render collapses to a click
        let samples = Engine::new(&spec, Pcg32::seed_from_u64(1)).render();
        assert!(samples.len() < 4);
    }

    #[test]
    fn test_same_seed_is_deterministic_for_noise() {
        let mut spec = base_spec();
        spec.wave_type = 3;

        let a = Engine::new(&spec, Pcg32::seed_from_u64(7)).render();
        let b = Engine::new(&spec, Pcg32::seed_from_u64(7)).render();
        assert_eq!(a, b);
    }

    #[test]
    fn test_freq_limit_cuts_rising_period() {
        let mut spec = base_spec();
        spec.p_freq_limit = 0.5;
        spec.p_freq_ramp = -0.5; // pitch falls, period grows toward the limit
        let limited = Engine::new(&spec, Pcg32::seed_from_u64(1)).render();

        spec.p_freq_limit = 0.0;
        let free = Engine::new(&spec, Pcg32::seed_from_u64(1)).render();

        assert!(limited.len() < free.len());
    }

    #[test]
    fn test_all_wave_types_render() {
        for wave_type in 0..4 {
            let mut spec = base_spec();
            spec.wave_type = wave_type;
            let samples = Engine::new(&spec, Pcg32::seed_from_u64(3)).render();
            assert!(!samples.is_empty(), "wave_type {} rendered empty", wave_type);
        }
    }
}
