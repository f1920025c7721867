#![doc = r#"
Tempo state for the dispatch loop.

SMF expresses tempo as microseconds per quarter note, changed only by a meta
event of type `0x51`. A change applies from its own tick forward, never
retroactively, so tick-to-time conversion is a piecewise-linear function over
tempo segments. [`TempoMap`] accumulates elapsed time segment by segment
instead of applying one global tempo to the whole file.
"#]

use crate::error::ParseError;
use std::time::Duration;

/// Microseconds per quarter note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tempo(u32);

impl Tempo {
    /// The SMF default: 500 000 µs per quarter note, i.e. 120 BPM.
    pub const DEFAULT: Tempo = Tempo(500_000);

    /// A tempo from raw microseconds per quarter note.
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Decode the 3-byte big-endian payload of a type-`0x51` meta event.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ParseError> {
        match payload {
            &[a, b, c] => Ok(Self(u32::from_be_bytes([0, a, b, c]))),
            _ => Err(ParseError::BadTempoPayload(payload.len())),
        }
    }

    /// Microseconds per quarter note.
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Beats per minute, for logging.
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / f64::from(self.0)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[doc = r#"
Piecewise tick-to-time conversion under a changing tempo.

Owned by the scheduler: created at playback start with the file's division
and the default tempo, mutated only by tempo meta-events in timeline order,
and discarded when playback ends. Because it is plain state with no timer
behind it, the dispatch loop is testable with simulated time.
"#]
#[derive(Debug, Clone)]
pub struct TempoMap {
    ticks_per_quarter_note: f64,
    micros_per_tick: f64,
    segment_start_tick: u64,
    elapsed_at_segment_micros: f64,
}

impl TempoMap {
    /// Start a map at tick zero with the default tempo.
    pub fn new(ticks_per_quarter_note: u16) -> Self {
        let tpqn = f64::from(ticks_per_quarter_note);
        Self {
            ticks_per_quarter_note: tpqn,
            micros_per_tick: f64::from(Tempo::DEFAULT.micros_per_quarter_note()) / tpqn,
            segment_start_tick: 0,
            elapsed_at_segment_micros: 0.0,
        }
    }

    /// The elapsed-time deadline for an event at `tick`.
    ///
    /// Valid only for ticks at or after the current segment start, which the
    /// merged timeline's non-decreasing tick order guarantees.
    pub fn deadline(&self, tick: u64) -> Duration {
        debug_assert!(tick >= self.segment_start_tick);
        let micros = self.elapsed_at_segment_micros
            + (tick - self.segment_start_tick) as f64 * self.micros_per_tick;
        // Round to the nearest microsecond so accumulated f64 error cannot
        // land a deadline one microsecond early.
        Duration::from_micros(micros.round() as u64)
    }

    /// Apply a tempo change at `at_tick`.
    ///
    /// Rolls elapsed time forward to `at_tick` under the outgoing tempo
    /// first; the new tempo governs ticks from that point on only.
    pub fn set_tempo(&mut self, tempo: Tempo, at_tick: u64) {
        debug_assert!(at_tick >= self.segment_start_tick);
        self.elapsed_at_segment_micros +=
            (at_tick - self.segment_start_tick) as f64 * self.micros_per_tick;
        self.segment_start_tick = at_tick;
        self.micros_per_tick =
            f64::from(tempo.micros_per_quarter_note()) / self.ticks_per_quarter_note;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_tempo_is_120_bpm() {
        assert_eq!(Tempo::default().micros_per_quarter_note(), 500_000);
        assert!((Tempo::default().bpm() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn payload_decodes_big_endian() {
        assert_eq!(Tempo::from_payload(&[0x07, 0xA1, 0x20]).unwrap(), Tempo::new(500_000));
        assert_eq!(Tempo::from_payload(&[0x0F, 0x42, 0x40]).unwrap(), Tempo::new(1_000_000));
    }

    #[test]
    fn payload_must_be_three_bytes() {
        assert_eq!(Tempo::from_payload(&[0x07, 0xA1]), Err(ParseError::BadTempoPayload(2)));
        assert_eq!(
            Tempo::from_payload(&[0, 0, 0, 0]),
            Err(ParseError::BadTempoPayload(4))
        );
    }

    #[test]
    fn default_tempo_deadline() {
        // One quarter note at 120 BPM is half a second.
        let map = TempoMap::new(480);
        assert_eq!(map.deadline(480), Duration::from_millis(500));
        assert_eq!(map.deadline(0), Duration::ZERO);
    }

    #[test]
    fn tempo_change_at_zero_rescales_everything() {
        let mut map = TempoMap::new(480);
        map.set_tempo(Tempo::new(1_000_000), 0);
        assert_eq!(map.deadline(480), Duration::from_millis(1000));
    }

    #[test]
    fn tempo_change_applies_from_its_tick_forward() {
        // 240 ticks at 500 000 µs/qn (250 ms), then double time for the rest.
        let mut map = TempoMap::new(480);
        map.set_tempo(Tempo::new(250_000), 240);
        assert_eq!(map.deadline(240), Duration::from_millis(250));
        assert_eq!(map.deadline(480), Duration::from_millis(375));
        assert_eq!(map.deadline(960), Duration::from_millis(625));
    }

    #[test]
    fn successive_changes_accumulate_piecewise() {
        let mut map = TempoMap::new(96);
        map.set_tempo(Tempo::new(1_000_000), 96); // 96 ticks @ 500ms/qn = 500ms
        map.set_tempo(Tempo::new(250_000), 192); // +96 ticks @ 1s/qn = 1500ms
        assert_eq!(map.deadline(192), Duration::from_millis(1500));
        assert_eq!(map.deadline(288), Duration::from_millis(1750));
    }
}
