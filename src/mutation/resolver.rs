//! Resolver plumbing: the callable the execution engine invokes, and the
//! validator dispatch that runs ahead of the user's mutate function.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::arguments::Argument;
use crate::ast;

/// The keyword-argument payload the execution engine passes to a resolver,
/// keyed by declared argument name.
pub type ArgumentValues = BTreeMap<ast::Name, serde_json::Value>;

/// A function invoked by the execution engine to produce the mutation's
/// value: parent (root) value in, argument payload in, result out.
///
/// User-supplied mutate functions have the same shape; the builder wraps
/// them in a validating resolver.
pub type Resolver = Arc<
    dyn Fn(&serde_json::Value, &ArgumentValues) -> Result<serde_json::Value, ResolveError>
        + Send
        + Sync,
>;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ResolveError {
    #[error("validation of input {key} in argument {argument} failed: {message}")]
    ValidationFailed {
        argument: ast::Name,
        key: String,
        message: String,
    },
    #[error("mutation failed: {message}")]
    Mutation { message: String },
}

/// Runs per-argument validators against an argument payload.
///
/// Only object-shaped argument values are inspected: for each sub-key of a
/// declared argument present in the payload, the validator registered for
/// that sub-key (if any) is invoked with the sub-value. Absent arguments,
/// scalar or list values, and unregistered sub-keys cause no call and no
/// error.
pub(crate) fn run_validators(
    arguments: &IndexMap<ast::Name, Argument>,
    values: &ArgumentValues,
) -> Result<(), ResolveError> {
    for (argument_name, argument) in arguments {
        let Some(value) = values.get(argument_name) else {
            continue;
        };
        let serde_json::Value::Object(input_object) = value else {
            continue;
        };
        for (key, sub_value) in input_object {
            if let Some(validator) = argument.validator_for(key) {
                validator(sub_value).map_err(|message| ResolveError::ValidationFailed {
                    argument: argument_name.clone(),
                    key: key.clone(),
                    message,
                })?;
            }
        }
    }
    Ok(())
}
