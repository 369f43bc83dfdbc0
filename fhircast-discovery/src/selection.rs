//! Ordered event selection.
//!
//! The selection maps each event a hub supports to whether the user wants it
//! delivered. Entry order follows the hub's `eventsSupported` order and is
//! preserved through (de)serialization.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Event name → selected flag, in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSelection {
    entries: Vec<(String, bool)>,
}

impl EventSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection with every event present and unselected
    pub fn from_supported<S: AsRef<str>>(supported: &[S]) -> Self {
        let mut selection = Self::new();
        selection.reconcile(supported);
        selection
    }

    /// Bring the selection in line with a freshly discovered event list.
    ///
    /// Every supported event gets an entry, keeping its previous flag when it
    /// was already known and starting unselected otherwise. Events the hub no
    /// longer supports are dropped. Order follows `supported`; duplicates in
    /// `supported` are collapsed.
    pub fn reconcile<S: AsRef<str>>(&mut self, supported: &[S]) {
        let mut entries: Vec<(String, bool)> = Vec::with_capacity(supported.len());

        for event in supported {
            let event = event.as_ref();
            if entries.iter().any(|(name, _)| name == event) {
                continue;
            }
            let previous = self.is_selected(event);
            entries.push((event.to_string(), previous));
        }

        let dropped = self
            .entries
            .iter()
            .filter(|(name, _)| !entries.iter().any(|(kept, _)| kept == name))
            .count();
        if dropped > 0 {
            tracing::debug!("Dropped {} event(s) no longer supported by the hub", dropped);
        }

        self.entries = entries;
    }

    /// Set the flag for a known event; returns `false` if the event is unknown
    pub fn set(&mut self, event: &str, selected: bool) -> bool {
        match self.entries.iter_mut().find(|(name, _)| name == event) {
            Some(entry) => {
                entry.1 = selected;
                true
            }
            None => false,
        }
    }

    /// Flip the flag for a known event; returns `false` if the event is unknown
    pub fn toggle(&mut self, event: &str) -> bool {
        match self.entries.iter_mut().find(|(name, _)| name == event) {
            Some(entry) => {
                entry.1 = !entry.1;
                true
            }
            None => false,
        }
    }

    /// Select or deselect every known event
    pub fn set_all(&mut self, selected: bool) {
        for entry in &mut self.entries {
            entry.1 = selected;
        }
    }

    pub fn is_selected(&self, event: &str) -> bool {
        self.entries
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, selected)| *selected)
            .unwrap_or(false)
    }

    pub fn contains(&self, event: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == event)
    }

    /// Selected event names, in order
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(name, _)| name.as_str())
    }

    /// Selected event names joined with commas (empty when nothing is selected)
    pub fn joined(&self) -> String {
        self.selected().collect::<Vec<_>>().join(",")
    }

    pub fn has_selection(&self) -> bool {
        self.entries.iter().any(|(_, selected)| *selected)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(name, selected)| (name.as_str(), *selected))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for EventSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, selected) in &self.entries {
            map.serialize_entry(name, selected)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EventSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SelectionVisitor;

        impl<'de> Visitor<'de> for SelectionVisitor {
            type Value = EventSelection;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of event names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, bool)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, selected)) = access.next_entry::<String, bool>()? {
                    match entries.iter_mut().find(|(existing, _)| *existing == name) {
                        Some(entry) => entry.1 = selected,
                        None => entries.push((name, selected)),
                    }
                }
                Ok(EventSelection { entries })
            }
        }

        deserializer.deserialize_map(SelectionVisitor)
    }
}
