//! Form-tree change classification.
//!
//! The form collaborator hands over a plain nested mapping of every editable
//! field. Comparing it with the previously observed snapshot tells whether the
//! user switched model, edited the integrator subtree, or only renamed the
//! configuration. Which fields play which role comes from [`TreeSchema`].

use serde_json::{Map, Value};

use crate::config::TreeSchema;

/// Snapshot of the form tree.
pub type TreeSnapshot = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum TreeChange {
    /// A different model was selected; everything model-dependent must be rebuilt.
    ModelChanged { model: String },
    /// The identity is unchanged, so the edit belongs to the integrator settings.
    IntegratorSubtreeChanged { state: Value },
    /// Identity-only edit, handled at submission time.
    NoAction,
}

/// Resolve a dotted path (`integrator.dt`) inside a snapshot.
pub fn lookup<'a>(tree: &'a TreeSnapshot, path: &str) -> Option<&'a Value> {
    let mut keys = path.split('.');
    let first = tree.get(keys.next()?)?;
    keys.try_fold(first, |node, key| node.get(key))
}

fn model_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Diffs successive snapshots. Calls must be serialized: each observation
/// replaces the stored snapshot wholesale.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    schema: TreeSchema,
    previous: TreeSnapshot,
}

impl ChangeDetector {
    /// Start with an empty previous snapshot, so the first observation of a
    /// tree carrying a model reports `ModelChanged`.
    pub fn new(schema: TreeSchema) -> Self {
        Self {
            schema,
            previous: TreeSnapshot::new(),
        }
    }

    pub fn schema(&self) -> &TreeSchema {
        &self.schema
    }

    pub fn previous(&self) -> &TreeSnapshot {
        &self.previous
    }

    /// Classify `current` against the stored snapshot without recording it.
    pub fn classify(&self, current: &TreeSnapshot) -> TreeChange {
        let model_field = self.schema.model_field.as_str();
        let model_now = lookup(current, model_field);
        if model_now != lookup(&self.previous, model_field) {
            return match model_now.and_then(model_id) {
                Some(model) => TreeChange::ModelChanged { model },
                None => {
                    tracing::warn!(field = model_field, "model field missing or not a scalar");
                    TreeChange::NoAction
                }
            };
        }

        let identity_unchanged = self
            .schema
            .identity_fields
            .iter()
            .all(|f| lookup(current, f) == lookup(&self.previous, f));
        if identity_unchanged {
            TreeChange::IntegratorSubtreeChanged {
                state: self.integrator_state(current),
            }
        } else {
            TreeChange::NoAction
        }
    }

    /// Classify `current`, then make it the new previous snapshot.
    pub fn observe(&mut self, current: TreeSnapshot) -> TreeChange {
        let change = self.classify(&current);
        self.previous = current;
        change
    }

    fn integrator_state(&self, current: &TreeSnapshot) -> Value {
        if self.schema.integrator_fields.is_empty() {
            return Value::Object(current.clone());
        }
        let subtree: Map<String, Value> = self
            .schema
            .integrator_fields
            .iter()
            .filter_map(|f| lookup(current, f).map(|v| (f.clone(), v.clone())))
            .collect();
        Value::Object(subtree)
    }
}
