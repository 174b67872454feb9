use crate::sensors::Entity;
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde_json::Value;
use std::fmt;
use std::time::Instant;

struct Registered {
    entity: Box<dyn Entity>,
    available: bool,
    last_updated: Option<DateTime<Local>>,
}

impl Registered {
    fn update(&mut self) -> bool {
        match self.entity.update() {
            Ok(()) => {
                self.available = true;
                self.last_updated = Some(Local::now());
                true
            }
            Err(e) => {
                warn!("Update of {} failed: {}", self.entity.unique_id(), e);
                self.available = false;
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Read-only view of an entity as the host last saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub unique_id: String,
    pub name: String,
    pub state: Option<Value>,
    pub unit: Option<&'static str>,
    pub available: bool,
    pub last_updated: Option<DateTime<Local>>,
}

impl fmt::Display for EntitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match (&self.state, self.available) {
            (Some(state), true) => state,
            _ => return write!(f, "{}: unavailable", self.name),
        };
        match state {
            Value::String(s) => write!(f, "{}: {}", self.name, s)?,
            other => write!(f, "{}: {}", self.name, other)?,
        }
        if let Some(unit) = self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}

/// Holds registered entities and polls them one after another.
#[derive(Default)]
pub struct EntityRegistry {
    entries: Vec<Registered>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entities(&mut self, entities: Vec<Box<dyn Entity>>, update_before_add: bool) {
        for entity in entities {
            let mut entry = Registered {
                entity,
                available: !update_before_add,
                last_updated: None,
            };
            if update_before_add {
                entry.update();
            }
            debug!("Registered {}", entry.entity.unique_id());
            self.entries.push(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs one update cycle over every entity.
    pub fn poll(&mut self) -> PollSummary {
        let start = Instant::now();
        let mut summary = PollSummary::default();
        for entry in &mut self.entries {
            if entry.update() {
                summary.updated += 1;
            } else {
                summary.failed += 1;
            }
        }
        debug!("poll took: {} ms", start.elapsed().as_millis());
        summary
    }

    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.entries
            .iter()
            .map(|entry| EntitySnapshot {
                unique_id: entry.entity.unique_id().to_string(),
                name: entry.entity.name().to_string(),
                state: entry.entity.state().cloned(),
                unit: entry.entity.unit_of_measurement(),
                available: entry.available,
                last_updated: entry.last_updated,
            })
            .collect()
    }
}
