//! Declarative per-field validation and filtering

use super::filters::Filter;
use super::validators::Validator;
use crate::core::error::FieldValidationError;
use serde_json::Value;

/// Filters and validators attached to a single field
#[derive(Default)]
struct FieldRule {
    filters: Vec<Filter>,
    validators: Vec<Validator>,
}

/// Ordered set of field rules for one payload shape
///
/// Filters run first (in registration order), then validators see the filtered
/// value. All validation messages are collected rather than stopping at the
/// first failure.
#[derive(Default)]
pub struct FieldRules {
    fields: Vec<(String, FieldRule)>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter<F>(mut self, field: &str, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.rule_mut(field).filters.push(Box::new(filter));
        self
    }

    pub fn validate<V>(mut self, field: &str, validator: V) -> Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.rule_mut(field).validators.push(Box::new(validator));
        self
    }

    fn rule_mut(&mut self, field: &str) -> &mut FieldRule {
        let index = match self.fields.iter().position(|(name, _)| name == field) {
            Some(index) => index,
            None => {
                self.fields.push((field.to_string(), FieldRule::default()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    /// Filter then validate a JSON object payload
    ///
    /// Returns the filtered payload, or every validation failure.
    pub fn validate_and_filter(
        &self,
        mut payload: Value,
    ) -> Result<Value, Vec<FieldValidationError>> {
        let mut errors = Vec::new();

        for (field, rule) in &self.fields {
            let mut value = payload.get(field).cloned().unwrap_or(Value::Null);

            for filter in &rule.filters {
                match filter(field.as_str(), value) {
                    Ok(filtered) => value = filtered,
                    Err(e) => {
                        errors.push(FieldValidationError {
                            field: field.clone(),
                            message: e.to_string(),
                        });
                        value = Value::Null;
                        break;
                    }
                }
            }

            for validator in &rule.validators {
                if let Err(message) = validator(field.as_str(), &value) {
                    errors.push(FieldValidationError {
                        field: field.clone(),
                        message,
                    });
                }
            }

            if value.is_null() {
                continue;
            }
            if let Some(obj) = payload.as_object_mut() {
                obj.insert(field.clone(), value);
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }
}
