use std::collections::HashMap;

use crate::error::EvalError;
use crate::value::Value;

/// Name bindings for one evaluation session.
///
/// The session namespace is the bottom frame. Function application pushes
/// a frame holding the argument bindings and pops it when the body is done.
/// Lookups see the innermost frame and then the session frame, never the
/// frames of callers further out.
#[derive(Debug)]
pub struct Env {
    frames: Vec<HashMap<String, Value>>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let (session, calls) = self.frames.split_first()?;
        calls
            .last()
            .and_then(|frame| frame.get(name))
            .or_else(|| session.get(name))
    }

    pub fn lookup(&self, name: &str) -> Result<&Value, EvalError> {
        self.get(name)
            .ok_or_else(|| EvalError::UnboundName(name.to_string()))
    }

    /// Bind (or rebind) `name` in the innermost frame.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    pub fn push_frame(&mut self, bindings: HashMap<String, Value>) {
        self.frames.push(bindings);
    }

    /// Drop the innermost frame. The session frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of session-level bindings.
    pub fn len(&self) -> usize {
        self.frames.first().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
