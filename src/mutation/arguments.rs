//! Mutation argument declarations and their validator maps.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::ast;
use crate::schema;

/// Validates one input-object sub-value. A failing validator's message is
/// surfaced as [`ResolveError::ValidationFailed`](super::resolver::ResolveError).
pub type ValidatorFn = Arc<dyn Fn(&serde_json::Value) -> Result<(), String> + Send + Sync>;

/// A declared mutation argument.
///
/// Validators are registered explicitly per input-object sub-key; the
/// validating resolver invokes them on the matching sub-values before the
/// mutate function runs.
#[derive(Clone)]
pub struct Argument {
    pub description: Option<String>,
    pub argument_type: ast::Type,
    pub default_value: Option<serde_json::Value>,
    pub deprecation_status: schema::DeprecationStatus,
    validators: BTreeMap<ast::Name, ValidatorFn>,
}

impl Argument {
    pub fn new(argument_type: ast::Type) -> Self {
        Argument {
            description: None,
            argument_type,
            default_value: None,
            deprecation_status: schema::DeprecationStatus::NotDeprecated,
            validators: BTreeMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, default_value: serde_json::Value) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Register a validator for the given input-object sub-key.
    pub fn with_validator<F>(mut self, key: ast::Name, validator: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.insert(key, Arc::new(validator));
        self
    }

    pub fn validator_for(&self, key: &str) -> Option<&ValidatorFn> {
        self.validators
            .iter()
            .find_map(|(name, validator)| (name.as_str() == key).then_some(validator))
    }

    /// Lower the argument to the input field mounted on the schema.
    pub fn to_input_field(&self, name: ast::Name) -> schema::InputField {
        schema::InputField::new(
            name,
            self.description.clone(),
            self.argument_type.clone(),
            self.default_value.clone(),
            self.deprecation_status.clone(),
        )
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("description", &self.description)
            .field("argument_type", &self.argument_type)
            .field("default_value", &self.default_value)
            .field("deprecation_status", &self.deprecation_status)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
