// Noise injector - adds unit sinusoids at the descriptor's frequencies

use crate::error::SignalError;
use crate::noise::source::NoiseDescriptor;
use crate::signal::Signal;
use crate::synthesis::{sinusoid, TimeBase};

pub struct NoiseInjector<'a> {
    time_base: &'a TimeBase,
}

impl<'a> NoiseInjector<'a> {
    pub fn new(time_base: &'a TimeBase) -> Self {
        Self { time_base }
    }

    /// Sum of one unit sinusoid per descriptor frequency
    pub fn noise(&self, descriptor: &NoiseDescriptor) -> Signal {
        let mut acc = vec![0.0_f64; self.time_base.sample_count()];
        for &frequency in descriptor.frequencies() {
            let component = sinusoid(self.time_base, frequency);
            for (sample, &v) in acc.iter_mut().zip(component.samples()) {
                *sample += v;
            }
        }
        Signal::from_samples(acc)
    }

    /// `clean + noise`; the clean signal is left untouched
    pub fn inject(
        &self,
        clean: &Signal,
        descriptor: &NoiseDescriptor,
    ) -> Result<Signal, SignalError> {
        let corrupted = clean.add(&self.noise(descriptor))?;
        tracing::info!(
            "[Injector] Injected {} tone(s) at {:?} Hz",
            descriptor.len(),
            descriptor.frequencies()
        );
        Ok(corrupted)
    }
}
