// Synthesis module - score to signal
//
// Leaf-first: the time base defines the sampling grid, the tone generator
// samples waveforms on it, and the sequencer gates and sums tones per note.

pub mod score;
pub mod sequencer;
pub mod time_base;
pub mod tone;

pub use score::{Note, NoteValue, Pitch, Score, ScoreEntry, ScoreFile, Tempo};
pub use sequencer::{PulseWindow, Synthesizer};
pub use time_base::TimeBase;
pub use tone::{sinusoid, tone};
