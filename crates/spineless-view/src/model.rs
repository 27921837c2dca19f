//! View models
//!
//! A model is the view's own key/value observable state, independent of its
//! DOM. Seeded at construction by merging declared defaults with the
//! caller's options.

use serde_json::{Map, Value};

/// Per-view key/value state
pub type Model = Map<String, Value>;

/// Merge declared defaults with caller options into a fresh model.
///
/// For every key in `defaults`, the option value wins when present, and is
/// *removed* from `options` so it does not also leak into raw instance
/// props. The result contains exactly the defaulted keys.
pub fn merge_defaults(defaults: &Model, options: &mut Model) -> Model {
    let mut model = Model::new();
    for (key, default) in defaults {
        let value = options.remove(key).unwrap_or_else(|| default.clone());
        model.insert(key.clone(), value);
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Model {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_option_overrides_default() {
        let defaults = map(json!({"x": 1, "y": 2}));
        let mut options = map(json!({"y": 9}));

        let model = merge_defaults(&defaults, &mut options);

        assert_eq!(Value::Object(model), json!({"x": 1, "y": 9}));
    }

    #[test]
    fn test_consumed_options_leave_props() {
        let defaults = map(json!({"text": ""}));
        let mut options = map(json!({"text": "buy milk", "superfluous": true}));

        merge_defaults(&defaults, &mut options);

        assert!(!options.contains_key("text"), "merged keys are consumed");
        assert!(options.contains_key("superfluous"), "unrelated options stay");
    }

    #[test]
    fn test_every_default_key_present() {
        let defaults = map(json!({"type": "text", "label": "", "value": null}));
        let mut options = Model::new();

        let model = merge_defaults(&defaults, &mut options);

        assert_eq!(model.len(), 3);
        assert_eq!(model["value"], Value::Null);
    }
}
