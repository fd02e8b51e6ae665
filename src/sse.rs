use crate::events::DocStreamEvent;

/// Literal prefix marking a data line in the generation stream.
const DATA_PREFIX: &str = "data: ";

/// Incremental parser for newline-delimited `data: <json>` streams.
///
/// The transport delivers opaque byte chunks with non-semantic boundaries:
/// a logical line may span two chunks, or one chunk may carry several
/// lines. A single residual-text buffer is kept across `feed` calls; the
/// final, possibly-incomplete segment of each chunk stays buffered until a
/// newline completes it.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: String,
    dropped_lines: u64,
}

impl SseStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<DocStreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        let mut events = Vec::new();

        while let Some(split) = self.buffer.find('\n') {
            let line = self.buffer[..split].to_string();
            self.buffer.drain(0..=split);

            let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            if payload.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<DocStreamEvent>(payload) {
                Ok(event) if !event.is_empty() => events.push(event),
                _ => {
                    // Malformed lines are dropped and reported; the stream continues.
                    self.dropped_lines += 1;
                    log::warn!("dropping malformed stream line: {line}");
                }
            }
        }

        events
    }

    /// Parse a complete stream payload in one shot.
    pub fn parse_lines(input: &str) -> Vec<DocStreamEvent> {
        let mut parser = Self::default();
        parser.feed(input.as_bytes())
    }

    /// An unterminated trailing line is not a complete event and must not
    /// be parsed; callers check this at end-of-stream before discarding.
    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Count of malformed data lines dropped so far.
    pub fn dropped_lines(&self) -> u64 {
        self.dropped_lines
    }
}
