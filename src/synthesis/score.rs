//! Notes, tempo, and scores
//!
//! A score is an ordered list of notes validated against the run's time base.
//! Malformed notes are rejected here, before any signal is synthesized.
//! Scores can also be loaded from JSON files naming pitches (`"A3"`) or raw
//! frequencies, with lengths given as note values or seconds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::synthesis::TimeBase;

/// Single note of a melody; frequency 0 is a rest
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Note {
    frequency: f64,
    duration: f64,
}

impl Note {
    pub fn new(frequency: f64, duration: f64) -> Self {
        Self {
            frequency,
            duration,
        }
    }

    pub fn rest(duration: f64) -> Self {
        Self::new(0.0, duration)
    }

    /// Frequency in Hz (0 = silence)
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_rest(&self) -> bool {
        self.frequency == 0.0
    }

    fn validate(&self, index: usize, nyquist: f64) -> Result<(), ScoreError> {
        let reject = |reason: String| ScoreError::InvalidNote {
            index,
            frequency: self.frequency,
            duration: self.duration,
            reason,
        };

        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(reject("duration must be positive".to_string()));
        }
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(reject("frequency must be non-negative".to_string()));
        }
        if self.frequency >= nyquist {
            return Err(reject(format!(
                "frequency must be below the Nyquist limit of {} Hz",
                nyquist
            )));
        }
        Ok(())
    }
}

/// Ordered, validated sequence of notes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Score {
    notes: Vec<Note>,
}

impl Score {
    /// Validate `notes` against the time base's Nyquist limit
    ///
    /// An empty list is accepted here; whether silence is allowed is decided
    /// by the synthesizer's configuration.
    pub fn new(notes: Vec<Note>, time_base: &TimeBase) -> Result<Self, ScoreError> {
        let nyquist = time_base.nyquist_hz();
        for (index, note) in notes.iter().enumerate() {
            note.validate(index, nyquist)?;
        }
        Ok(Self { notes })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Sum of note durations, excluding inter-note gaps
    pub fn total_duration(&self) -> f64 {
        self.notes.iter().map(Note::duration).sum()
    }
}

/// Musical note lengths relative to one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteValue {
    /// One full beat
    Whole,
    /// Half a beat
    Half,
    /// Quarter of a beat, the smallest unit
    Quarter,
}

impl NoteValue {
    pub const SMALLEST: NoteValue = NoteValue::Quarter;

    fn beats(self) -> f64 {
        match self {
            NoteValue::Whole => 1.0,
            NoteValue::Half => 0.5,
            NoteValue::Quarter => 0.25,
        }
    }
}

/// Tempo in beats per minute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub fn new(bpm: f64) -> Result<Self, ScoreError> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(ScoreError::InvalidTempo { bpm });
        }
        Ok(Self { bpm })
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Seconds per beat (`60 / bpm`)
    pub fn beat_secs(&self) -> f64 {
        60.0 / self.bpm
    }

    pub fn duration_of(&self, value: NoteValue) -> f64 {
        self.beat_secs() * value.beats()
    }
}

/// Scientific pitch names in twelve-tone equal temperament (A4 = 440 Hz)
pub struct Pitch;

impl Pitch {
    /// Accepted octave numbers; anything outside is an invalid pitch
    pub const MIN_OCTAVE: i32 = -1;
    pub const MAX_OCTAVE: i32 = 10;

    /// Parse names such as `C3`, `F#4`, `Bb2` or `rest` into Hz
    pub fn parse(name: &str) -> Result<f64, ScoreError> {
        let invalid = || ScoreError::InvalidPitch {
            name: name.to_string(),
        };

        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("rest") {
            return Ok(0.0);
        }

        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let semitone: i32 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (accidental, octave) = if let Some(stripped) = rest.strip_prefix('#') {
            (1, stripped)
        } else if let Some(stripped) = rest.strip_prefix('b') {
            (-1, stripped)
        } else {
            (0, rest)
        };
        let octave: i32 = octave.parse().map_err(|_| invalid())?;
        if !(Self::MIN_OCTAVE..=Self::MAX_OCTAVE).contains(&octave) {
            return Err(invalid());
        }

        let midi = (octave + 1) * 12 + semitone + accidental;
        Ok(440.0 * 2f64.powf((midi - 69) as f64 / 12.0))
    }
}

/// JSON score document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFile {
    #[serde(default)]
    pub name: String,
    pub notes: Vec<ScoreEntry>,
}

/// One note of a score file: `pitch` or `frequency`, plus `value` or `seconds`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<NoteValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
}

impl ScoreEntry {
    fn resolve(&self, index: usize, tempo: &Tempo) -> Result<Note, ScoreError> {
        let malformed = |frequency: f64, reason: &str| ScoreError::InvalidNote {
            index,
            frequency,
            duration: self.seconds.unwrap_or(f64::NAN),
            reason: reason.to_string(),
        };

        let frequency = match (&self.pitch, self.frequency) {
            (Some(name), None) => Pitch::parse(name)?,
            (None, Some(hz)) => hz,
            _ => {
                return Err(malformed(
                    self.frequency.unwrap_or(f64::NAN),
                    "exactly one of `pitch` or `frequency` is required",
                ))
            }
        };
        let duration = match (self.value, self.seconds) {
            (Some(value), None) => tempo.duration_of(value),
            (None, Some(seconds)) => seconds,
            _ => {
                return Err(malformed(
                    frequency,
                    "exactly one of `value` or `seconds` is required",
                ))
            }
        };

        Ok(Note::new(frequency, duration))
    }
}

impl ScoreFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoreError> {
        let path = path.as_ref();
        let file_error = |reason: String| ScoreError::ScoreFile {
            path: path.display().to_string(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|err| file_error(err.to_string()))?;
        let file: ScoreFile =
            serde_json::from_str(&contents).map_err(|err| file_error(err.to_string()))?;
        tracing::debug!(
            "[Score] Loaded '{}' with {} entries from {:?}",
            file.name,
            file.notes.len(),
            path
        );
        Ok(file)
    }

    /// Resolve pitch names and note values, then validate as a [`Score`]
    pub fn into_score(self, tempo: &Tempo, time_base: &TimeBase) -> Result<Score, ScoreError> {
        let notes = self
            .notes
            .iter()
            .enumerate()
            .map(|(index, entry)| entry.resolve(index, tempo))
            .collect::<Result<Vec<_>, _>>()?;
        Score::new(notes, time_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn time_base() -> TimeBase {
        TimeBase::new(12 * 1024, 3.0, 1024.0).unwrap()
    }

    #[test]
    fn test_tempo_note_values() {
        let tempo = Tempo::new(140.0).unwrap();
        let whole = 60.0 / 140.0;
        assert!((tempo.duration_of(NoteValue::Whole) - whole).abs() < 1e-12);
        assert!((tempo.duration_of(NoteValue::Half) - whole / 2.0).abs() < 1e-12);
        // ≈ 0.1071 s at 140 BPM
        assert!((tempo.duration_of(NoteValue::Quarter) - 0.107142857).abs() < 1e-6);
    }

    #[test]
    fn test_tempo_rejects_invalid_bpm() {
        assert_eq!(Tempo::new(0.0), Err(ScoreError::InvalidTempo { bpm: 0.0 }));
        assert!(Tempo::new(-120.0).is_err());
        assert!(Tempo::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_score_accepts_rests_and_in_band_notes() {
        let score = Score::new(
            vec![Note::new(220.0, 0.1), Note::rest(0.1), Note::new(511.0, 0.2)],
            &time_base(),
        )
        .unwrap();
        assert_eq!(score.len(), 3);
        assert!(score.notes()[1].is_rest());
        assert!((score.total_duration() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_score_rejects_negative_duration() {
        let err = Score::new(
            vec![Note::new(220.0, 0.1), Note::new(220.0, -0.1)],
            &time_base(),
        )
        .unwrap_err();
        match err {
            ScoreError::InvalidNote { index, .. } => assert_eq!(index, 1),
            other => panic!("Expected InvalidNote, got {:?}", other),
        }
    }

    #[test]
    fn test_score_rejects_out_of_band_frequencies() {
        let tb = time_base();
        assert!(Score::new(vec![Note::new(512.0, 0.1)], &tb).is_err());
        assert!(Score::new(vec![Note::new(-1.0, 0.1)], &tb).is_err());
        assert!(Score::new(vec![Note::new(f64::NAN, 0.1)], &tb).is_err());
    }

    #[test]
    fn test_empty_score_is_valid() {
        let score = Score::new(Vec::new(), &time_base()).unwrap();
        assert!(score.is_empty());
    }

    #[test]
    fn test_pitch_names() {
        let cases = [
            ("C3", 130.81),
            ("D3", 146.83),
            ("E3", 164.81),
            ("F3", 174.61),
            ("G3", 196.00),
            ("A3", 220.00),
            ("B3", 246.94),
            ("A2", 110.00),
            ("A4", 440.00),
            ("F#4", 369.99),
            ("Bb2", 116.54),
        ];
        for (name, hz) in cases {
            let parsed = Pitch::parse(name).unwrap();
            assert!(
                (parsed - hz).abs() < 0.01,
                "{} parsed as {} (expected {})",
                name,
                parsed,
                hz
            );
        }
        assert_eq!(Pitch::parse("rest").unwrap(), 0.0);
        assert_eq!(Pitch::parse("REST").unwrap(), 0.0);
    }

    #[test]
    fn test_pitch_rejects_garbage() {
        for name in ["", "H3", "C", "C#", "Cx3", "C2147483647", "A-2147483648", "G11"] {
            assert!(
                matches!(Pitch::parse(name), Err(ScoreError::InvalidPitch { .. })),
                "'{}' should not parse",
                name
            );
        }
    }

    #[test]
    fn test_score_file_resolution() {
        let json = r#"{
            "name": "intro",
            "notes": [
                {"pitch": "A2", "value": "quarter"},
                {"frequency": 0, "value": "half"},
                {"pitch": "C3", "seconds": 0.5}
            ]
        }"#;
        let file: ScoreFile = serde_json::from_str(json).unwrap();
        let tempo = Tempo::new(140.0).unwrap();
        let score = file.into_score(&tempo, &time_base()).unwrap();

        assert_eq!(score.len(), 3);
        assert!((score.notes()[0].frequency() - 110.0).abs() < 1e-9);
        assert_eq!(
            score.notes()[1].duration(),
            tempo.duration_of(NoteValue::Half)
        );
        assert!(score.notes()[1].is_rest());
        assert_eq!(score.notes()[2].duration(), 0.5);
    }

    #[test]
    fn test_score_file_entry_needs_exactly_one_pitch_source() {
        let file = ScoreFile {
            name: String::new(),
            notes: vec![ScoreEntry {
                pitch: Some("A3".to_string()),
                frequency: Some(220.0),
                value: Some(NoteValue::Quarter),
                seconds: None,
            }],
        };
        let tempo = Tempo::new(140.0).unwrap();
        assert!(matches!(
            file.into_score(&tempo, &time_base()),
            Err(ScoreError::InvalidNote { index: 0, .. })
        ));
    }

    #[test]
    fn test_pitch_octave_bounds() {
        assert!((Pitch::parse("C-1").unwrap() - 8.18).abs() < 0.01);
        assert!(Pitch::parse("C10").unwrap() > 16_000.0);
        assert!(Pitch::parse("C-2").is_err());
    }

    #[test]
    fn test_invalid_entry_message_uses_resolved_pitch() {
        let file = ScoreFile {
            name: String::new(),
            notes: vec![ScoreEntry {
                pitch: Some("A3".to_string()),
                frequency: None,
                value: None,
                seconds: None,
            }],
        };
        let tempo = Tempo::new(140.0).unwrap();
        let err = file.into_score(&tempo, &time_base()).unwrap_err();
        let message = err.message();
        assert!(message.contains("220 Hz"), "unexpected message: {}", message);
        assert!(!message.contains("NaN"), "unexpected message: {}", message);
    }

    #[test]
    fn test_score_file_missing_path() {
        let err = ScoreFile::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ScoreError::ScoreFile { .. }));
    }
}
