use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discrete per-frame code (e.g. ball possession) with its meaning table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Code {
    pub name: String,
    /// One value per frame, `None` where the source has no code
    pub code: Vec<Option<i64>>,
    pub definitions: BTreeMap<i64, String>,
    pub framerate: Option<u32>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Meaning of the code at `frame`
    pub fn label(&self, frame: usize) -> Option<&str> {
        let value = self.code.get(frame).copied().flatten()?;
        self.definitions.get(&value).map(String::as_str)
    }
}
