//! Structural (not semantic) diff over JSON-shaped records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Kind of patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOpKind {
    /// Key or index present only on the after side.
    Add,
    /// Key or index present only on the before side.
    Remove,
    /// Unequal values at the same path.
    Replace,
}

impl PatchOpKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PatchOpKind::Add => "Add",
            PatchOpKind::Remove => "Remove",
            PatchOpKind::Replace => "Replace",
        }
    }

    /// Single-character marker for patch viewers.
    pub fn marker(&self) -> char {
        match self {
            PatchOpKind::Add => '+',
            PatchOpKind::Remove => '-',
            PatchOpKind::Replace => '~',
        }
    }
}

/// One patch operation at a `/`-delimited path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    /// Operation kind.
    pub op: PatchOpKind,

    /// Location of the change; the root is `/`.
    pub path: String,

    /// Value on the before side (remove, replace).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub before: Option<Value>,

    /// Value on the after side (add, replace).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub after: Option<Value>,
}

impl PatchOp {
    /// An `add` of `value` at `path`.
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOpKind::Add,
            path: path.into(),
            before: None,
            after: Some(value),
        }
    }

    /// A `remove` of `value` at `path`.
    pub fn remove(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOpKind::Remove,
            path: path.into(),
            before: Some(value),
            after: None,
        }
    }

    /// A `replace` of `before` with `after` at `path`.
    pub fn replace(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self {
            op: PatchOpKind::Replace,
            path: path.into(),
            before: Some(before),
            after: Some(after),
        }
    }
}

// An explicit `null` is a present value, not an absent one.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Compare two values and return the ordered list of patch operations.
///
/// Mappings emit removes, then adds, then recursive diffs of shared keys,
/// each group in sorted key order. Sequences are compared index by index with
/// no move detection, so a reordered list shows up as several replacements.
/// Any other pairing yields a single `replace` when the values differ.
///
/// Never fails and never mutates its inputs; `diff(x, x)` is always empty.
pub fn diff(before: &Value, after: &Value) -> Vec<PatchOp> {
    let mut ops = Vec::new();
    diff_into(before, after, "", &mut ops);
    ops
}

fn diff_into(before: &Value, after: &Value, path: &str, ops: &mut Vec<PatchOp>) {
    match (before, after) {
        (Value::Object(b), Value::Object(a)) => diff_objects(b, a, path, ops),
        (Value::Array(b), Value::Array(a)) => diff_arrays(b, a, path, ops),
        _ => {
            if before != after {
                let at = if path.is_empty() { "/" } else { path };
                ops.push(PatchOp::replace(at, before.clone(), after.clone()));
            }
        }
    }
}

fn diff_objects(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    path: &str,
    ops: &mut Vec<PatchOp>,
) {
    let mut removed: Vec<&String> = before.keys().filter(|k| !after.contains_key(*k)).collect();
    let mut added: Vec<&String> = after.keys().filter(|k| !before.contains_key(*k)).collect();
    let mut shared: Vec<&String> = after.keys().filter(|k| before.contains_key(*k)).collect();
    removed.sort();
    added.sort();
    shared.sort();

    for key in removed {
        ops.push(PatchOp::remove(child_path(path, key), before[key].clone()));
    }
    for key in added {
        ops.push(PatchOp::add(child_path(path, key), after[key].clone()));
    }
    for key in shared {
        diff_into(&before[key], &after[key], &child_path(path, key), ops);
    }
}

fn diff_arrays(before: &[Value], after: &[Value], path: &str, ops: &mut Vec<PatchOp>) {
    for i in 0..before.len().max(after.len()) {
        let at = child_path(path, &i.to_string());
        match (before.get(i), after.get(i)) {
            (Some(b), Some(a)) => diff_into(b, a, &at, ops),
            (None, Some(a)) => ops.push(PatchOp::add(at, a.clone())),
            (Some(b), None) => ops.push(PatchOp::remove(at, b.clone())),
            (None, None) => {}
        }
    }
}

fn child_path(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment)
}
