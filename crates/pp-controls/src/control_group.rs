//! Slider ensemble: a set of named numeric controls with bounds and defaults.
//!
//! The group never talks to the network or the renderer. Every user-driven
//! value change is reported back to the caller as a [`ControlChange`], which
//! the caller is free to feed into a rate limiter.

use std::collections::{BTreeMap, HashMap};

use pp_core::within;
use pp_schema::{ControlSpec, validate_controls};

use crate::error::{ControlError, ControlResult};

/// Notification emitted for every value change, including resets.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlChange {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
struct ControlEntry {
    spec: ControlSpec,
    value: f64,
    enabled: bool,
}

/// Named controls kept in declaration order.
#[derive(Debug, Clone)]
pub struct ControlGroup {
    entries: Vec<ControlEntry>,
    index: HashMap<String, usize>,
}

impl ControlGroup {
    /// Build a group from specs; every control starts at its default and enabled.
    ///
    /// # Errors
    ///
    /// Returns error if a spec violates `min <= default <= max`, `step > 0`,
    /// or if two specs share a name.
    pub fn new(specs: &[ControlSpec]) -> ControlResult<Self> {
        validate_controls(specs, "control group")?;
        let entries: Vec<ControlEntry> = specs
            .iter()
            .map(|spec| ControlEntry {
                spec: spec.clone(),
                value: spec.default,
                enabled: true,
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.spec.name.clone(), i))
            .collect();
        Ok(Self { entries, index })
    }

    fn entry(&self, name: &str) -> ControlResult<&ControlEntry> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ControlError::UnknownControl {
                name: name.to_string(),
            })
    }

    fn entry_mut(&mut self, name: &str) -> ControlResult<&mut ControlEntry> {
        match self.index.get(name) {
            Some(&i) => Ok(&mut self.entries[i]),
            None => Err(ControlError::UnknownControl {
                name: name.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> ControlResult<f64> {
        self.entry(name).map(|e| e.value)
    }

    /// Current value of every control.
    pub fn values(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|e| (e.spec.name.clone(), e.value))
            .collect()
    }

    /// User-driven change. Values outside `[min, max]` or non-finite snap to the
    /// control's default; the returned change carries the value actually stored.
    pub fn set(&mut self, name: &str, value: f64) -> ControlResult<ControlChange> {
        let entry = self.entry_mut(name)?;
        if !entry.enabled {
            return Err(ControlError::Disabled {
                name: name.to_string(),
            });
        }
        let spec = &entry.spec;
        entry.value = if within(value, spec.min, spec.max) {
            value
        } else {
            tracing::debug!(control = name, value, "out of range input, using default");
            spec.default
        };
        Ok(ControlChange {
            name: name.to_string(),
            value: entry.value,
        })
    }

    /// Same as [`set`](Self::set) for user-typed text; unparseable text snaps to default.
    pub fn set_text(&mut self, name: &str, text: &str) -> ControlResult<ControlChange> {
        let value = text.trim().parse::<f64>().unwrap_or(f64::NAN);
        self.set(name, value)
    }

    /// Restore every control to its default, one change per control in declaration order.
    pub fn reset(&mut self) -> Vec<ControlChange> {
        self.entries
            .iter_mut()
            .map(|e| {
                e.value = e.spec.default;
                ControlChange {
                    name: e.spec.name.clone(),
                    value: e.value,
                }
            })
            .collect()
    }

    pub fn is_enabled(&self, name: &str) -> ControlResult<bool> {
        self.entry(name).map(|e| e.enabled)
    }

    /// Enable or disable the named controls; values are untouched. Nothing
    /// changes if any name is unknown.
    pub fn set_enabled(&mut self, names: &[&str], enabled: bool) -> ControlResult<()> {
        let positions = names
            .iter()
            .map(|name| {
                self.index
                    .get(*name)
                    .copied()
                    .ok_or_else(|| ControlError::UnknownControl {
                        name: name.to_string(),
                    })
            })
            .collect::<ControlResult<Vec<usize>>>()?;
        for i in positions {
            self.entries[i].enabled = enabled;
        }
        Ok(())
    }

    /// Disable exactly the named controls and enable every other one.
    /// Unknown names are ignored.
    pub fn hide(&mut self, names: &[&str]) {
        for e in &mut self.entries {
            e.enabled = !names.contains(&e.spec.name.as_str());
        }
    }
}
