//! Shared fixtures for analyzer tests

use crate::events::{parse_timestamp, Dataset, TypingEvent};

/// Creates an event with the commonly used fields set.
pub fn event(activation: &str, source: &str, elapsed_ms: f64) -> TypingEvent {
    TypingEvent {
        session_id: Some("session-1".into()),
        activation_key_name: Some(activation.into()),
        source_key_name: Some(source.into()),
        elapsed_ms: Some(elapsed_ms),
        ..Default::default()
    }
}

/// Same as [`event`] but with a mistake label.
pub fn labelled(activation: &str, source: &str, elapsed_ms: f64, mistake: bool) -> TypingEvent {
    TypingEvent {
        marked_as_mistake: Some(mistake),
        ..event(activation, source, elapsed_ms)
    }
}

/// Sets the previous key.
pub fn after(mut event: TypingEvent, previous: Option<&str>) -> TypingEvent {
    event.previous_key = previous.map(str::to_string);
    event
}

/// Sets the rollover flag.
pub fn rollover(mut event: TypingEvent, detected: bool) -> TypingEvent {
    event.rollover_detected = Some(detected);
    event
}

/// Sets the timestamp from a string.
pub fn at(mut event: TypingEvent, timestamp: &str) -> TypingEvent {
    event.timestamp = parse_timestamp(timestamp);
    event
}

/// `n` copies of an event.
pub fn repeat(event: TypingEvent, n: usize) -> Vec<TypingEvent> {
    vec![event; n]
}

pub fn dataset(events: Vec<TypingEvent>) -> Dataset {
    Dataset::from_events(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Field;

    #[test]
    fn labelled_sets_mistake() {
        let e = labelled("Space", "P", 10.0, true);
        assert_eq!(e.marked_as_mistake, Some(true));
        assert_eq!(e.key_combo().as_deref(), Some("Space + P"));
    }

    #[test]
    fn at_parses_timestamp() {
        let e = at(event("Space", "P", 1.0), "2025-01-15T09:00:00");
        assert_eq!(e.hour(), Some(9));
    }

    #[test]
    fn dataset_reports_columns() {
        let data = dataset(repeat(event("Space", "P", 1.0), 3));
        assert_eq!(data.len(), 3);
        assert!(!data.has(Field::MarkedAsMistake));
    }
}
