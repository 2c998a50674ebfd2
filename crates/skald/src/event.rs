//! Trace event records and the persisted log format.
//!
//! The log holds one line per event, three whitespace-separated fields:
//! `<name> <start_ns> <end_ns>`. Offsets are integer nanosecond counts
//! relative to the owning session's creation instant. No header, no
//! escaping; names are expected not to contain whitespace.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Error type for parsing a single persisted line.
#[derive(Debug, thiserror::Error)]
#[error("malformed trace line: {0}")]
pub struct ParseEventError(&'static str);

/// Error type for reading a persisted trace log.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Malformed {
        line: usize,
        source: ParseEventError,
    },
}

/// One timed occurrence: a name plus start and end offsets relative to the
/// owning session's creation instant.
///
/// Ephemeral by design: produced by one producer, written once by the
/// session's background writer, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    /// Name of the traced event.
    pub name: String,
    /// Start offset from the session's creation instant.
    pub start: Duration,
    /// End offset from the session's creation instant.
    pub end: Duration,
}

impl TraceEvent {
    /// Create a new event record.
    pub fn new(name: impl Into<String>, start: Duration, end: Duration) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Wall-clock duration of the event.
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.name,
            self.start.as_nanos(),
            self.end.as_nanos()
        )
    }
}

impl FromStr for TraceEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let name = fields.next().ok_or(ParseEventError("empty line"))?;
        let start = fields.next().ok_or(ParseEventError("missing start offset"))?;
        let end = fields.next().ok_or(ParseEventError("missing end offset"))?;
        if fields.next().is_some() {
            return Err(ParseEventError("trailing fields"));
        }

        let start: u64 = start
            .parse()
            .map_err(|_| ParseEventError("start offset is not an integer"))?;
        let end: u64 = end
            .parse()
            .map_err(|_| ParseEventError("end offset is not an integer"))?;

        Ok(Self::new(
            name,
            Duration::from_nanos(start),
            Duration::from_nanos(end),
        ))
    }
}

/// Read all events from a persisted trace log.
///
/// Blank lines are skipped; any other malformed line is an error reporting
/// its 1-based line number.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, ReadError> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.parse()
                .map_err(|source| ReadError::Malformed {
                    line: idx + 1,
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_display_matches_log_format() {
        let event = TraceEvent::new("cb", Duration::from_nanos(10), Duration::from_nanos(40));
        assert_eq!(event.to_string(), "cb 10 40");
    }

    #[test]
    fn test_parse_round_trip() {
        let event = TraceEvent::new(
            "ns::work",
            Duration::from_nanos(1_234),
            Duration::from_nanos(5_678),
        );
        let parsed: TraceEvent = event.to_string().parse().unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!("".parse::<TraceEvent>().is_err());
        assert!("name_only".parse::<TraceEvent>().is_err());
        assert!("name 10".parse::<TraceEvent>().is_err());
        assert!("name ten 40".parse::<TraceEvent>().is_err());
        assert!("name 10 40 extra".parse::<TraceEvent>().is_err());
    }

    #[test]
    fn test_duration() {
        let event = TraceEvent::new("f", Duration::from_nanos(10), Duration::from_nanos(40));
        assert_eq!(event.duration(), Duration::from_nanos(30));
    }

    #[test]
    fn test_read_events_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.log");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "a 0 50").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "b 10 40").unwrap();
        drop(file);

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "a");
        assert_eq!(events[1].name, "b");
    }

    #[test]
    fn test_read_events_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trace.log");
        fs::write(&path, "a 0 50\nbroken line here oops\n").unwrap();

        match read_events(&path) {
            Err(ReadError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {:?}", other),
        }
    }
}
