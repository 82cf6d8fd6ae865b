use std::collections::HashMap;

/// Records per-request key/value notes for a downstream logger.
///
/// Recording is best-effort. A tracker without a sink skips it.
pub trait NoteSink {
    /// Stores `value` under `key`, returning the value it replaced.
    fn record(&mut self, key: &str, value: &str) -> Option<String>;
}

impl<N: NoteSink + ?Sized> NoteSink for &mut N {
    fn record(&mut self, key: &str, value: &str) -> Option<String> {
        (**self).record(key, value)
    }
}

/// Notes kept in a map, used by the CLI and in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryNotes {
    notes: HashMap<String, String>,
}

impl MemoryNotes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.notes.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .notes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}

impl NoteSink for MemoryNotes {
    fn record(&mut self, key: &str, value: &str) -> Option<String> {
        self.notes.insert(key.to_owned(), value.to_owned())
    }
}
