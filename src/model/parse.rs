//! Decoding raw documents into event records

use serde_json::{Map, Value};

use super::EventRecord;
use crate::error::{Error, Result};

/// Decode a document that is a JSON array, a single JSON object, or NDJSON.
///
/// Decoding is strict: any syntax error fails the whole document, so the
/// engine never sees partially decoded input.
pub fn parse_events(data: &[u8]) -> Result<Vec<EventRecord>> {
    let text = String::from_utf8_lossy(data);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyInput);
    }

    if trimmed.starts_with('[') {
        let objects: Vec<Map<String, Value>> =
            serde_json::from_str(trimmed).map_err(Error::DecodeArray)?;
        return Ok(objects.into_iter().map(EventRecord::new).collect());
    }

    if trimmed.starts_with('{') {
        match serde_json::from_str::<Map<String, Value>>(trimmed) {
            Ok(object) => return Ok(vec![EventRecord::new(object)]),
            // Several objects on separate lines: fall through to NDJSON
            Err(_) if non_blank_lines(trimmed) > 1 && first_line_is_object(trimmed) => {}
            Err(err) => return Err(Error::DecodeObject(err)),
        }
    }

    parse_ndjson(trimmed)
}

fn non_blank_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

fn first_line_is_object(text: &str) -> bool {
    text.lines()
        .next()
        .is_some_and(|line| serde_json::from_str::<Map<String, Value>>(line.trim()).is_ok())
}

fn parse_ndjson(text: &str) -> Result<Vec<EventRecord>> {
    let mut events = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let object: Map<String, Value> = serde_json::from_str(line)
            .map_err(|source| Error::DecodeLine { line: i + 1, source })?;
        events.push(EventRecord::new(object));
    }
    if events.is_empty() {
        return Err(Error::NoEvents);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{"event_type":"x","room_id":"r","camera_id":"c","pipeline":"p","confidence":1,"timestamp":1,"frame_timestamp":1,"frame_source_timestamp":1,"emitted_at":1,"timestamp_offset_seconds":0,"timestamp_stabilizer_skew_seconds":0,"frame_age_seconds":0,"frame_transport_delay_seconds":0}"#;

    #[test]
    fn test_parse_array() {
        let doc = format!("[{EVENT},{EVENT}]");
        let events = parse_events(doc.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        let (_, problems) = events[0].common_fields();
        assert!(problems.is_empty());
    }

    #[test]
    fn test_parse_single_object() {
        let events = parse_events(EVENT.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].string("event_type"), Some("x"));
    }

    #[test]
    fn test_parse_ndjson() {
        let doc = format!("{EVENT}\n\n{EVENT}\n{EVENT}\n");
        assert_eq!(parse_events(doc.as_bytes()).unwrap().len(), 3);

        let single_line = format!("{EVENT}\n");
        assert_eq!(parse_events(single_line.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_pretty_printed_object() {
        let doc = "{\n  \"event_type\": \"frame_tick\",\n  \"detections_count\": 2\n}\n";
        let events = parse_events(doc.as_bytes()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].i64("detections_count"), Some(2));
    }

    #[test]
    fn test_parse_ndjson_bad_second_line() {
        let doc = format!("{EVENT}\n{{\"event_type\":\n");
        match parse_events(doc.as_bytes()) {
            Err(Error::DecodeLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected line error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_events(b"  \n\t"), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_parse_empty_array_is_valid() {
        assert!(parse_events(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json_is_hard_failure() {
        assert!(matches!(
            parse_events(b"[{\"event_type\": }]"),
            Err(Error::DecodeArray(_))
        ));
        assert!(matches!(
            parse_events(b"{\"a\":"),
            Err(Error::DecodeObject(_))
        ));
    }

    #[test]
    fn test_parse_broken_pretty_printed_object() {
        let doc = "{\n  \"event_type\": \"frame_tick\",\n  \"detections_count\": \n}\n";
        let err = parse_events(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::DecodeObject(_)), "{err:?}");
        assert!(err.to_string().starts_with("decode JSON object:"));
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let doc = "\"not-an-object\"\n";
        match parse_events(doc.as_bytes()) {
            Err(Error::DecodeLine { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected line error, got {other:?}"),
        }
    }
}
