//! Declarative output schemas for schema-constrained generation.
//!
//! A [`Schema`] serves two purposes: it renders the prompt instructions that
//! demand an exact JSON shape from the model, and it validates the extracted
//! value before the pipeline trusts it. Generator output is never used past
//! this boundary unvalidated.

use serde_json::{Map, Value, json};

/// Expected shape of a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Any string
    String,
    /// Any number
    Number,
    /// One of a fixed set of string tokens
    OneOf(&'static [&'static str]),
    /// An array of homogeneous items, optionally length-bounded
    Array {
        /// Schema of each item
        items: Box<Schema>,
        /// Exact required length, if any
        exact_len: Option<usize>,
        /// Minimum required length, if any
        min_len: Option<usize>,
    },
    /// An object with required and optional fields
    Object {
        /// Fields that must be present
        required: Vec<(&'static str, Schema)>,
        /// Fields that may be present
        optional: Vec<(&'static str, Schema)>,
    },
}

impl Schema {
    /// Convenience constructor for an unbounded array.
    pub fn array(items: Schema) -> Self {
        Self::Array {
            items: Box::new(items),
            exact_len: None,
            min_len: None,
        }
    }

    /// Convenience constructor for an exact-length array.
    pub fn array_exact(items: Schema, len: usize) -> Self {
        Self::Array {
            items: Box::new(items),
            exact_len: Some(len),
            min_len: None,
        }
    }

    /// Convenience constructor for a minimum-length array.
    pub fn array_min(items: Schema, len: usize) -> Self {
        Self::Array {
            items: Box::new(items),
            exact_len: None,
            min_len: Some(len),
        }
    }

    /// Validates a value against this schema.
    ///
    /// # Errors
    ///
    /// Returns the first structural complaint found, with the JSON path of
    /// the violating element (e.g., `formats[2].id: expected string`).
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), String> {
        match self {
            Schema::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(format!("{path}: expected string"))
                }
            }
            Schema::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(format!("{path}: expected number"))
                }
            }
            Schema::OneOf(tokens) => match value.as_str() {
                Some(s) if tokens.contains(&s) => Ok(()),
                Some(s) => Err(format!("{path}: '{s}' not in {tokens:?}")),
                None => Err(format!("{path}: expected one of {tokens:?}")),
            },
            Schema::Array {
                items,
                exact_len,
                min_len,
            } => {
                let Some(array) = value.as_array() else {
                    return Err(format!("{path}: expected array"));
                };
                if let Some(expected) = exact_len
                    && array.len() != *expected
                {
                    return Err(format!(
                        "{path}: expected exactly {expected} items, got {}",
                        array.len()
                    ));
                }
                if let Some(minimum) = min_len
                    && array.len() < *minimum
                {
                    return Err(format!(
                        "{path}: expected at least {minimum} items, got {}",
                        array.len()
                    ));
                }
                for (i, item) in array.iter().enumerate() {
                    items.validate_at(item, &format!("{path}[{i}]"))?;
                }
                Ok(())
            }
            Schema::Object { required, optional } => {
                let Some(object) = value.as_object() else {
                    return Err(format!("{path}: expected object"));
                };
                for (key, schema) in required {
                    let Some(field) = object.get(*key) else {
                        return Err(format!("{path}: missing required key '{key}'"));
                    };
                    schema.validate_at(field, &format!("{path}.{key}"))?;
                }
                for (key, schema) in optional {
                    if let Some(field) = object.get(*key) {
                        schema.validate_at(field, &format!("{path}.{key}"))?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Renders a JSON skeleton of the expected shape for prompt injection.
    ///
    /// Strings become `"..."`, numbers `0`, enumerations list their tokens,
    /// and arrays show one representative item.
    pub fn skeleton(&self) -> Value {
        match self {
            Schema::String => json!("..."),
            Schema::Number => json!(0),
            Schema::OneOf(tokens) => json!(tokens.join(" | ")),
            Schema::Array { items, .. } => json!([items.skeleton()]),
            Schema::Object { required, optional } => {
                let mut map = Map::new();
                for (key, schema) in required.iter().chain(optional.iter()) {
                    map.insert((*key).to_string(), schema.skeleton());
                }
                Value::Object(map)
            }
        }
    }

    /// Renders the output-contract block appended to every prompt.
    pub fn instructions(&self) -> String {
        let mut rules = vec![
            "Restituisci SOLO JSON valido con questa forma:".to_string(),
            serde_json::to_string_pretty(&self.skeleton()).unwrap_or_default(),
        ];
        rules.push(self.length_rules());
        rules.push(
            "Regole finali:\n- Niente testo fuori dal JSON.\n- Niente markdown.\n- Niente spiegazioni."
                .to_string(),
        );
        rules.retain(|r| !r.is_empty());
        rules.join("\n\n")
    }

    fn length_rules(&self) -> String {
        let mut rules = Vec::new();
        self.collect_length_rules("$", &mut rules);
        rules.join("\n")
    }

    fn collect_length_rules(&self, path: &str, rules: &mut Vec<String>) {
        match self {
            Schema::Array {
                items,
                exact_len,
                min_len,
            } => {
                if let Some(n) = exact_len {
                    rules.push(format!("- {path} deve contenere ESATTAMENTE {n} elementi."));
                }
                if let Some(n) = min_len {
                    rules.push(format!("- {path} deve contenere almeno {n} elementi."));
                }
                items.collect_length_rules(&format!("{path}[]"), rules);
            }
            Schema::Object { required, optional } => {
                for (key, schema) in required.iter().chain(optional.iter()) {
                    schema.collect_length_rules(&format!("{path}.{key}"), rules);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn format_schema() -> Schema {
        Schema::Object {
            required: vec![
                ("id", Schema::String),
                ("title", Schema::String),
                ("trends", Schema::array(Schema::String)),
            ],
            optional: vec![("why_this_works", Schema::array(Schema::String))],
        }
    }

    #[test]
    fn valid_object_passes() {
        let schema = format_schema();
        let value = json!({"id": "fmt-001", "title": "t", "trends": ["a"]});
        assert!(schema.validate(&value).is_ok());
    }

    #[test]
    fn missing_key_names_the_key() {
        let schema = format_schema();
        let value = json!({"id": "fmt-001", "trends": []});
        let err = schema.validate(&value).unwrap_err();
        assert!(err.contains("title"), "unexpected violation: {err}");
    }

    #[test]
    fn wrong_type_names_the_path() {
        let schema = format_schema();
        let value = json!({"id": 7, "title": "t", "trends": []});
        let err = schema.validate(&value).unwrap_err();
        assert!(err.contains("$.id"), "unexpected violation: {err}");
    }

    #[test]
    fn exact_length_is_enforced() {
        let schema = Schema::array_exact(Schema::String, 6);
        let err = schema.validate(&json!(["a", "b"])).unwrap_err();
        assert!(err.contains("exactly 6"), "unexpected violation: {err}");
    }

    #[test]
    fn min_length_is_enforced() {
        let schema = Schema::array_min(Schema::String, 1);
        assert!(schema.validate(&json!([])).is_err());
        assert!(schema.validate(&json!(["a"])).is_ok());
    }

    #[test]
    fn one_of_rejects_unknown_tokens() {
        let schema = Schema::OneOf(&["low", "medium", "high"]);
        assert!(schema.validate(&json!("medium")).is_ok());
        let err = schema.validate(&json!("extreme")).unwrap_err();
        assert!(err.contains("extreme"));
    }

    #[test]
    fn skeleton_shows_shape() {
        let schema = Schema::Object {
            required: vec![("formats", Schema::array_exact(format_schema(), 6))],
            optional: vec![],
        };
        let skeleton = schema.skeleton();
        assert!(skeleton["formats"][0]["id"].is_string());
    }

    #[test]
    fn instructions_carry_length_rule() {
        let schema = Schema::Object {
            required: vec![("formats", Schema::array_exact(Schema::String, 6))],
            optional: vec![],
        };
        let text = schema.instructions();
        assert!(text.contains("ESATTAMENTE 6"));
        assert!(text.contains("SOLO JSON"));
    }
}
