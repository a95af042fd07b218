// Tone generator - fundamental plus octave
//
// `sinusoid` is the single-term primitive shared with noise injection and
// cancellation. `tone` layers the octave on top of it to give notes a timbre.

use std::f64::consts::PI;

use crate::signal::Signal;
use crate::synthesis::TimeBase;

/// `sin(2π·f·t)` at every instant of the time base
///
/// A frequency of 0 yields exact silence.
pub fn sinusoid(time_base: &TimeBase, frequency: f64) -> Signal {
    if frequency == 0.0 {
        return Signal::zeros(time_base.sample_count());
    }

    let omega = 2.0 * PI * frequency;
    Signal::from_samples(
        time_base
            .instants()
            .iter()
            .map(|&t| (omega * t).sin())
            .collect(),
    )
}

/// `sin(2π·f·t) + sin(2π·2f·t)` at every instant of the time base
///
/// Built from two [`sinusoid`] calls so the result is exactly their pointwise sum.
pub fn tone(time_base: &TimeBase, frequency: f64) -> Signal {
    if frequency == 0.0 {
        return Signal::zeros(time_base.sample_count());
    }

    let fundamental = sinusoid(time_base, frequency);
    let octave = sinusoid(time_base, 2.0 * frequency);
    Signal::from_samples(
        fundamental
            .samples()
            .iter()
            .zip(octave.samples())
            .map(|(a, b)| a + b)
            .collect(),
    )
}
