//! Core types for command execution.

use crate::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw result of running a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Combined stdout and stderr bytes
    pub output: Vec<u8>,
    /// Whether the process exited successfully
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Successful output with the given bytes (handy for fake executors).
    pub fn ok(output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            success: true,
            code: Some(0),
        }
    }

    /// Failed output with the given exit code and bytes.
    pub fn failed(code: i32, output: impl Into<Vec<u8>>) -> Self {
        Self {
            output: output.into(),
            success: false,
            code: Some(code),
        }
    }

    /// Get the output as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).to_string()
    }
}

/// A successful run of a declared command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    /// The command line exactly as declared
    pub command: String,
    /// Captured output decoded as text
    pub text_output: String,
    /// Captured output decoded as a JSON object, if it is one
    pub json_output: Option<Map<String, Value>>,
    /// Hash of the command line and the captured bytes
    pub fingerprint: Fingerprint,
}

impl Execution {
    /// Build an execution record from a command line and its raw output.
    pub fn from_output(command: &str, output: &[u8]) -> Self {
        Self {
            command: command.to_string(),
            text_output: String::from_utf8_lossy(output).to_string(),
            json_output: decode_json_object(output),
            fingerprint: Fingerprint::compute(command, output),
        }
    }
}

/// Decode output as a JSON object.
///
/// Anything other than a single JSON object (arrays, scalars, `null`, plain
/// text, trailing garbage) yields `None`. The failure is logged and never
/// returned as an error.
pub fn decode_json_object(output: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Map<String, Value>>(output) {
        Ok(map) => Some(map),
        Err(e) => {
            log::debug!("Output is not a JSON object: {e}");
            None
        }
    }
}
