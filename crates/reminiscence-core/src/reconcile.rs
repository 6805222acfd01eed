//! Default-fill reconciliation of a stored document against a template

use crate::value::Value;

/// Fill keys missing from `candidate` with the template's values.
///
/// For every key of a map `template`: a key absent from `candidate` receives
/// a copy of the template's value (nested template maps come along whole);
/// a key already present keeps the candidate's value untouched. Keys that
/// only exist in `candidate` survive, nothing is pruned. When either side is
/// not a map the candidate is returned unchanged.
pub fn reconcile(template: &Value, candidate: Value) -> Value {
    match (template, candidate) {
        (Value::Map(defaults), Value::Map(mut map)) => {
            for (key, default) in defaults {
                if !map.contains_key(key) {
                    map.insert(key.clone(), default.clone());
                }
            }
            Value::Map(map)
        }
        (_, candidate) => candidate,
    }
}
