//! JSON-lines output on stdout.

use awsop_core::{OutputError, OutputSink};
use serde_json::Value;
use std::io::Write;

/// Writes each projected value as one JSON document per line. Arrays are
/// unrolled into one line per element; `null` is skipped.
pub struct JsonLines<W: Write> {
    writer: W,
    pretty: bool,
    written: usize,
}

impl JsonLines<std::io::Stdout> {
    pub fn stdout(pretty: bool) -> Self {
        Self::new(std::io::stdout(), pretty)
    }
}

impl<W: Write> JsonLines<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            written: 0,
        }
    }

    /// Number of lines (documents) written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write_one(&mut self, value: &Value) -> Result<(), OutputError> {
        if value.is_null() {
            return Ok(());
        }
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> OutputSink for JsonLines<W> {
    fn emit(&mut self, value: Value) -> Result<(), OutputError> {
        match value {
            Value::Array(items) => {
                for item in &items {
                    self.write_one(item)?;
                }
            }
            other => self.write_one(&other)?,
        }
        // flush per page
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(values: Vec<Value>, pretty: bool) -> String {
        let mut buf = Vec::new();
        let mut sink = JsonLines::new(&mut buf, pretty);
        for v in values {
            sink.emit(v).unwrap();
        }
        drop(sink);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn arrays_unroll_one_per_line() {
        let out = render(vec![json!([{ "a": 1 }, { "a": 2 }]), json!("x")], false);
        assert_eq!(out, "{\"a\":1}\n{\"a\":2}\n\"x\"\n");
    }

    #[test]
    fn nulls_are_skipped() {
        let out = render(vec![Value::Null, json!([null, 3])], false);
        assert_eq!(out, "3\n");
    }

    #[test]
    fn pretty_output() {
        let out = render(vec![json!({ "k": "v" })], true);
        assert_eq!(out, "{\n  \"k\": \"v\"\n}\n");
    }

    #[test]
    fn counts_written_documents() {
        let mut sink = JsonLines::new(Vec::new(), false);
        sink.emit(json!([1, 2, 3])).unwrap();
        sink.emit(json!([])).unwrap();
        assert_eq!(sink.written(), 3);
    }
}
