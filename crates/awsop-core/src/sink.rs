//! Where projected values go.

use serde_json::Value;

use crate::error::OutputError;

/// Receives projected values in page order. Each call must finish writing
/// before it returns.
pub trait OutputSink {
    fn emit(&mut self, value: Value) -> Result<(), OutputError>;
}

/// Collects everything in memory.
impl OutputSink for Vec<Value> {
    fn emit(&mut self, value: Value) -> Result<(), OutputError> {
        self.push(value);
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit(&mut self, value: Value) -> Result<(), OutputError> {
        (**self).emit(value)
    }
}
