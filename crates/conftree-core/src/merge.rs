//! Merge engine
//!
//! Folding rules for values that several fragments contribute to one key:
//! - Objects: handed to the configured [`MergeStrategy`], primary overriding
//! - Everything else (scalars, arrays, null, type mismatch): primary wins

use serde_json::Value;

use crate::Object;

/// Strategy that combines two objects into a new one.
///
/// `primary` overrides `secondary`. Implementations must not depend on
/// mutating either input; the engine only hands out shared references.
pub trait MergeStrategy: Send + Sync {
    fn merge(&self, primary: &Object, secondary: &Object) -> Object;
}

impl<F> MergeStrategy for F
where
    F: Fn(&Object, &Object) -> Object + Send + Sync,
{
    fn merge(&self, primary: &Object, secondary: &Object) -> Object {
        self(primary, secondary)
    }
}

/// Default strategy: recursive merge, arrays replaced rather than concatenated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepMerge;

impl MergeStrategy for DeepMerge {
    fn merge(&self, primary: &Object, secondary: &Object) -> Object {
        deep_merge_objects(secondary.clone(), primary.clone())
    }
}

/// Whether a value takes part in object merging.
///
/// Only JSON objects qualify; arrays and null are structured but are
/// replaced, never merged.
pub fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_))
}

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (overlay wins entirely)
/// - Scalars: override (overlay wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            Value::Object(deep_merge_objects(base_map, overlay_map))
        }

        // Arrays and scalars: overlay wins
        (_, overlay) => overlay,
    }
}

fn deep_merge_objects(mut base: Object, overlay: Object) -> Object {
    for (key, overlay_value) in overlay {
        let merged = match base.remove(&key) {
            Some(base_value) => deep_merge(base_value, overlay_value),
            None => overlay_value,
        };
        base.insert(key, merged);
    }
    base
}

/// Fold `primary` over `secondary`.
///
/// A missing primary yields the secondary unchanged. Two objects go through
/// `strategy`; in every other case the primary is returned as is.
pub fn merge_values(
    primary: Option<Value>,
    secondary: Option<Value>,
    strategy: &dyn MergeStrategy,
) -> Option<Value> {
    match (primary, secondary) {
        (None, secondary) => secondary,
        (Some(Value::Object(primary)), Some(Value::Object(secondary))) => {
            Some(Value::Object(strategy.merge(&primary, &secondary)))
        }
        (primary, _) => primary,
    }
}
