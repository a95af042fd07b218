// Note sequencer - turns a score into one continuous signal
//
// Notes are laid end to end with a fixed silent gap between them. The
// schedule is a fold over the score carrying the next start time; each
// note's tone is gated by its pulse window and summed into the result.

use crate::config::TempoConfig;
use crate::error::ScoreError;
use crate::signal::Signal;
use crate::synthesis::score::{NoteValue, Score, Tempo};
use crate::synthesis::tone::tone;
use crate::synthesis::TimeBase;

/// Closed interval `[start, end]` during which one note sounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseWindow {
    pub start: f64,
    pub end: f64,
}

impl PulseWindow {
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    pub fn overlaps(&self, other: &PulseWindow) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Song synthesizer bound to one time base
pub struct Synthesizer<'a> {
    time_base: &'a TimeBase,
    inter_note_gap: f64,
    allow_empty: bool,
}

impl<'a> Synthesizer<'a> {
    /// Create a synthesizer with an explicit gap (seconds) between notes
    pub fn new(time_base: &'a TimeBase, inter_note_gap: f64) -> Self {
        Self {
            time_base,
            inter_note_gap: inter_note_gap.max(0.0),
            allow_empty: true,
        }
    }

    /// Derive the gap from tempo configuration (`gap_fraction` of the smallest note unit)
    pub fn from_config(time_base: &'a TimeBase, config: &TempoConfig) -> Result<Self, ScoreError> {
        let tempo = Tempo::new(config.bpm)?;
        if config.gap_fraction < 0.0 {
            tracing::warn!(
                "[Sequencer] Negative gap fraction {} clamped to 0",
                config.gap_fraction
            );
        }
        let gap = tempo.duration_of(NoteValue::SMALLEST) * config.gap_fraction;
        Ok(Self::new(time_base, gap).with_allow_empty(config.allow_empty_score))
    }

    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn inter_note_gap(&self) -> f64 {
        self.inter_note_gap
    }

    /// Pulse window of every note, in score order
    pub fn schedule(&self, score: &Score) -> Vec<PulseWindow> {
        score
            .notes()
            .iter()
            .scan(0.0_f64, |next_start, note| {
                let window = PulseWindow {
                    start: *next_start,
                    end: *next_start + note.duration(),
                };
                *next_start += note.duration() + self.inter_note_gap;
                Some(window)
            })
            .collect()
    }

    /// Render the score into a signal on the time base
    ///
    /// Windows running past the end of the time base are truncated. An empty
    /// score yields silence unless empty scores are disabled.
    pub fn synthesize(&self, score: &Score) -> Result<Signal, ScoreError> {
        if score.is_empty() {
            if !self.allow_empty {
                return Err(ScoreError::EmptyScore);
            }
            tracing::debug!("[Sequencer] Empty score, producing silence");
            return Ok(Signal::zeros(self.time_base.sample_count()));
        }

        let instants = self.time_base.instants();
        let windows = self.schedule(score);

        let song = score.notes().iter().zip(windows.iter()).fold(
            vec![0.0_f64; instants.len()],
            |mut acc, (note, window)| {
                if note.is_rest() {
                    return acc;
                }
                let voiced = tone(self.time_base, note.frequency());
                for ((sample, &t), &v) in acc.iter_mut().zip(instants).zip(voiced.samples()) {
                    if window.contains(t) {
                        *sample += v;
                    }
                }
                acc
            },
        );

        if let Some(last) = windows.last() {
            if last.end > self.time_base.duration() {
                tracing::debug!(
                    "[Sequencer] Score runs to {:.3}s, truncated at {:.3}s",
                    last.end,
                    self.time_base.duration()
                );
            }
        }
        tracing::info!(
            "[Sequencer] Synthesized {} notes ({} samples)",
            score.len(),
            instants.len()
        );

        Ok(Signal::from_samples(song))
    }
}
