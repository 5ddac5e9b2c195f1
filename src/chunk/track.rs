use core::fmt;

use crate::{DecodeResult, EditError, Event, EventKind};

#[doc = r#"
The `MTrk` chunk: an ordered sequence of [`Event`]s, insertion order being
playback order.

Each event's `delta_time` is relative to its predecessor, so the cumulative
sum of delta-times up to any index is that event's absolute tick position.
The editing operations ([`insert_note`](Self::insert_note),
[`remove_note`](Self::remove_note)) split and merge neighboring delta-times
so that every undisturbed event keeps its absolute position.
"#]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackChunk {
    events: Vec<Event>,
}

impl TrackChunk {
    /// An empty track.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// A track over an already-ordered event sequence.
    pub const fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// The events in playback order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the track.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Decodes a complete track payload.
    ///
    /// Events are read from the front until the payload is exhausted,
    /// threading the running-status state through [`Event::decode`]. The
    /// first malformed event fails the whole decode; no partial track is
    /// returned.
    pub fn decode(mut payload: &[u8]) -> DecodeResult<Self> {
        let mut events = Vec::new();
        let mut last_status = None;
        while !payload.is_empty() {
            let (event, rest) = Event::decode(payload, &mut last_status)?;
            events.push(event);
            payload = rest;
        }
        Ok(Self { events })
    }

    /// Encodes the track payload.
    ///
    /// When `clean` is true, droppable meta events (every type but
    /// end-of-track) are skipped.
    pub fn payload_bytes(&self, clean: bool) -> DecodeResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut last_status = None;
        for event in &self.events {
            if clean && event.is_droppable() {
                continue;
            }
            event.encode_into(&mut out, &mut last_status)?;
        }
        Ok(out)
    }

    /// Inserts `event` at the absolute tick position given by its
    /// `delta_time`, splitting the delta-time of the event it lands in
    /// front of.
    ///
    /// Walks the track accumulating elapsed ticks; at the first event placed
    /// at or after the target position, the newcomer takes the remaining
    /// distance as its delta-time and the existing event's delta-time
    /// shrinks by the same amount. Past the end, the newcomer is appended
    /// carrying the residual delta.
    pub fn insert_event(&mut self, mut event: Event) {
        let mut index = 0;
        while index < self.events.len() {
            let next = &mut self.events[index];
            if next.delta_time < event.delta_time {
                event.delta_time -= next.delta_time;
                index += 1;
            } else {
                next.delta_time -= event.delta_time;
                self.events.insert(index, event);
                return;
            }
        }
        self.events.push(event);
    }

    /// Inserts a note: a note-on at absolute `time` and a matching note-off
    /// at `time + duration`, each placed by [`insert_event`](Self::insert_event).
    pub fn insert_note(&mut self, time: u32, key: u8, duration: u32, velocity: u8, channel: u8) {
        self.insert_event(Event::note_on(time, key, velocity, channel));
        self.insert_event(Event::note_off(time + duration, key, velocity, channel));
    }

    /// Removes the note starting at `index`.
    ///
    /// The event at `index` must be a note-on; it is removed, its delta-time
    /// is folded into its successor, and the first following note-off with
    /// the same channel and key is removed the same way. Returns the removed
    /// note-on.
    ///
    /// Fails with [`EditError::InvalidOperation`] if the event at `index` is
    /// not a note-on and [`EditError::OutOfBounds`] for a bad index; either
    /// way the track is left unmodified.
    pub fn remove_note(&mut self, index: usize) -> Result<Event, EditError> {
        let event = self
            .events
            .get(index)
            .ok_or(EditError::OutOfBounds(index))?;
        let EventKind::NoteOn { channel, key, .. } = event.kind else {
            return Err(EditError::InvalidOperation(
                "remove_note must start from a note-on event",
            ));
        };

        let note_on = self.pop_event(index);

        let matching_off = self.events[index..].iter().position(|e| {
            matches!(
                e.kind,
                EventKind::NoteOff {
                    channel: c,
                    key: k,
                    ..
                } if c == channel && k == key
            )
        });
        if let Some(offset) = matching_off {
            self.pop_event(index + offset);
        }

        Ok(note_on)
    }

    /// Scales playback speed by `multiplier` (2.0 halves every delta-time).
    ///
    /// Each delta-time becomes `round(delta_time / multiplier)`. Repeated
    /// scaling accumulates rounding error; this is accepted lossy behavior
    /// and no correction is applied.
    pub fn scale_speed(&mut self, multiplier: f64) -> Result<(), EditError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(EditError::InvalidOperation(
                "speed multiplier must be positive and finite",
            ));
        }
        for event in &mut self.events {
            event.delta_time = (f64::from(event.delta_time) / multiplier).round() as u32;
        }
        Ok(())
    }

    // Removes the event at `index` and folds its delta-time into the event
    // now occupying `index`, keeping every later event at its absolute
    // position.
    fn pop_event(&mut self, index: usize) -> Event {
        let event = self.events.remove(index);
        if let Some(next) = self.events.get_mut(index) {
            next.delta_time += event.delta_time;
        }
        event
    }
}

impl fmt::Display for TrackChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Track:\n\t{:<12}{:<12}{:<12}{:<12}{:<12}{:<12}",
            "Delta Time", "Status", "Channel", "Key", "Velocity", "Misc."
        )?;
        for event in &self.events {
            write!(f, "\n\t{event}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn absolute_times(track: &TrackChunk) -> Vec<u32> {
        track
            .events()
            .iter()
            .scan(0u32, |acc, e| {
                *acc += e.delta_time;
                Some(*acc)
            })
            .collect()
    }

    #[test]
    fn insert_splits_the_next_delta() {
        let mut track = TrackChunk::from_events(vec![
            Event::note_on(0, 60, 64, 0),
            Event::note_off(10, 60, 64, 0),
        ]);
        track.insert_event(Event::note_on(4, 62, 64, 0));

        assert_eq!(
            track.events().iter().map(|e| e.delta_time).collect::<Vec<_>>(),
            vec![0, 4, 6]
        );
        assert_eq!(absolute_times(&track), vec![0, 4, 10]);
    }

    #[test]
    fn insert_past_the_end_appends_the_residual() {
        let mut track = TrackChunk::from_events(vec![Event::note_on(0, 60, 64, 0)]);
        track.insert_event(Event::end_of_track(16));
        assert_eq!(track.events()[1].delta_time, 16);
        assert_eq!(absolute_times(&track), vec![0, 16]);
    }

    #[test]
    fn remove_note_relinks_and_drops_the_matching_off() {
        let mut track = TrackChunk::new();
        track.insert_note(0, 60, 8, 64, 0);
        track.insert_note(2, 64, 8, 64, 0);
        assert_eq!(absolute_times(&track), vec![0, 2, 8, 10]);

        // removes the note-on at tick 0 and its note-off at tick 8
        track.remove_note(0).unwrap();
        assert_eq!(track.len(), 2);
        assert_eq!(absolute_times(&track), vec![2, 10]);
        assert!(matches!(
            track.events()[0].kind,
            EventKind::NoteOn { key: 64, .. }
        ));
    }

    #[test]
    fn remove_note_matches_channel_and_key() {
        let mut track = TrackChunk::new();
        track.insert_note(0, 60, 8, 64, 0);
        track.insert_note(0, 60, 4, 64, 1);

        // equal-time inserts land in front, so index 0 is the channel-1 pair
        track.remove_note(0).unwrap();

        // the channel-0 pair survives untouched
        assert_eq!(absolute_times(&track), vec![0, 8]);
        for event in track.events() {
            match event.kind {
                EventKind::NoteOn { channel, .. } | EventKind::NoteOff { channel, .. } => {
                    assert_eq!(channel, 0)
                }
                _ => panic!("unexpected event"),
            }
        }
    }

    #[test]
    fn remove_note_rejects_non_note_on() {
        let mut track = TrackChunk::new();
        track.insert_note(0, 60, 8, 64, 0);
        let before = track.clone();

        assert_eq!(
            track.remove_note(1),
            Err(EditError::InvalidOperation(
                "remove_note must start from a note-on event"
            ))
        );
        assert_eq!(track, before);

        assert_eq!(track.remove_note(5), Err(EditError::OutOfBounds(5)));
        assert_eq!(track, before);
    }

    #[test]
    fn scale_speed_rounds_each_delta() {
        let mut track = TrackChunk::from_events(vec![
            Event::note_on(0, 60, 64, 0),
            Event::note_off(3, 60, 64, 0),
            Event::end_of_track(5),
        ]);
        track.scale_speed(2.0).unwrap();
        assert_eq!(
            track.events().iter().map(|e| e.delta_time).collect::<Vec<_>>(),
            vec![0, 2, 3] // 3/2 and 5/2 round away from zero
        );

        assert!(track.scale_speed(0.0).is_err());
        assert!(track.scale_speed(f64::NAN).is_err());
    }

    #[test]
    fn clean_encode_drops_droppable_meta() {
        let track = TrackChunk::from_events(vec![
            Event::meta(0, 0x01, b"text".to_vec()),
            Event::note_on(0, 60, 64, 0),
            Event::note_off(4, 60, 0, 0),
            Event::end_of_track(0),
        ]);

        let cleaned = TrackChunk::decode(&track.payload_bytes(true).unwrap()).unwrap();
        assert_eq!(cleaned.len(), 3);
        assert!(!matches!(
            cleaned.events()[0].kind,
            EventKind::Meta { meta_type: 0x01, .. }
        ));
        assert!(matches!(
            cleaned.events()[2].kind,
            EventKind::Meta { meta_type: 0x2F, .. }
        ));
    }
}
