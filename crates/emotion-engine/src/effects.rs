//! Adaptive Audio Effect Chain
//!
//! Stages run in a fixed order: volume, tempo, bass, treble, reverb, echo.
//! Every stage keeps samples inside `[-1, 1]`.

use crate::params::{AdaptationParameters, TEMPO_RANGE};

/// Fixed reverb tap delay (seconds)
pub const REVERB_DELAY_SECS: f64 = 0.1;

/// Reverb decay per unit of reverb amount
pub const REVERB_DECAY: f64 = 0.3;

/// Echo tap level
pub const ECHO_LEVEL: f64 = 0.3;

/// Emphasis coefficient per unit of bass/treble boost
pub const EMPHASIS_SCALE: f64 = 0.1;

/// Tempo multipliers closer than this to 1.0 leave the buffer untouched
const TEMPO_EPSILON: f64 = 0.01;

/// Run the full chain over `samples`
pub fn apply_chain(samples: &[f64], params: &AdaptationParameters, sample_rate: u32) -> Vec<f64> {
    let mut audio = samples.to_vec();
    apply_volume(&mut audio, params.volume_multiplier);
    let mut audio = apply_tempo(&audio, params.tempo_multiplier);
    apply_emphasis(&mut audio, params.bass_boost);
    apply_emphasis(&mut audio, params.treble_boost);
    let audio = apply_reverb(&audio, params.reverb_amount, sample_rate);
    apply_echo(&audio, params.echo_delay, sample_rate)
}

/// Scale by `multiplier` and clamp
pub fn apply_volume(samples: &mut [f64], multiplier: f64) {
    for sample in samples.iter_mut() {
        *sample = (*sample * multiplier).clamp(-1.0, 1.0);
    }
}

/// Strided resampling: picks `samples[floor(k * multiplier)]` while in range.
///
/// Output length is `ceil(len / multiplier)`. Pitch and duration change together.
/// The multiplier is clamped to `TEMPO_RANGE`; NaN leaves the buffer untouched.
pub fn apply_tempo(samples: &[f64], multiplier: f64) -> Vec<f64> {
    if multiplier.is_nan() {
        return samples.to_vec();
    }
    let multiplier = multiplier.clamp(*TEMPO_RANGE.start(), *TEMPO_RANGE.end());
    if (multiplier - 1.0).abs() < TEMPO_EPSILON {
        return samples.to_vec();
    }

    let len = samples.len() as f64;
    let mut output = Vec::with_capacity((len / multiplier).ceil() as usize);
    let mut k = 0usize;
    loop {
        let position = k as f64 * multiplier;
        if position >= len {
            break;
        }
        output.push(samples[position as usize]);
        k += 1;
    }
    output
}

/// First-difference emphasis `y[i] += α (y[i] - y[i-1])`, `α = boost * 0.1`.
///
/// Runs in place, so each step sees the already-emphasized previous sample.
/// Used for both bass and treble.
pub fn apply_emphasis(samples: &mut [f64], boost: f64) {
    if boost.is_nan() || boost <= 0.0 {
        return;
    }
    let alpha = boost * EMPHASIS_SCALE;
    for i in 1..samples.len() {
        let emphasized = samples[i] + alpha * (samples[i] - samples[i - 1]);
        samples[i] = emphasized.clamp(-1.0, 1.0);
    }
}

/// Single 100 ms delay tap at `0.3 * amount`
pub fn apply_reverb(samples: &[f64], amount: f64, sample_rate: u32) -> Vec<f64> {
    if amount.is_nan() || amount <= 0.0 {
        return samples.to_vec();
    }
    let delay = (sample_rate as f64 * REVERB_DELAY_SECS) as usize;
    delay_tap(samples, delay, REVERB_DECAY * amount)
}

/// Single delay tap `delay_secs` back at a fixed 0.3 level
pub fn apply_echo(samples: &[f64], delay_secs: f64, sample_rate: u32) -> Vec<f64> {
    if delay_secs.is_nan() || delay_secs <= 0.0 {
        return samples.to_vec();
    }
    let delay = (sample_rate as f64 * delay_secs) as usize;
    delay_tap(samples, delay, ECHO_LEVEL)
}

fn delay_tap(samples: &[f64], delay: usize, gain: f64) -> Vec<f64> {
    let mut output = samples.to_vec();
    if delay == 0 {
        return output;
    }
    for i in delay..samples.len() {
        output[i] = (samples[i] + samples[i - delay] * gain).clamp(-1.0, 1.0);
    }
    output
}
