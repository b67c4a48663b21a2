//! Declarative construction of mutation schema fields.
//!
//! [`MutationBuilder`] takes the explicit description of a mutation —
//! interfaces, output fields or an explicit output type, argument set and
//! mutate function — and builds a [`MutationType`], which mounts as a
//! schema field via [`MutationType::field`].

pub mod arguments;
pub mod resolver;

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast;
use crate::schema;
use self::arguments::Argument;
use self::resolver::{run_validators, Resolver};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("all interfaces of {type_name} must be interface types, received {interface_kind} \"{interface_name}\"")]
    NotAnInterface {
        type_name: ast::TypeName,
        interface_name: ast::TypeName,
        interface_kind: &'static str,
    },
    #[error("mutation {type_name} must define a mutate function when no resolver is given")]
    MissingMutateFunction { type_name: ast::TypeName },
    #[error("\"{name:}\" is not a valid GraphQL name.")]
    InvalidGraphQlName { name: String },
}

impl From<ast::InvalidGraphQlName> for Error {
    fn from(error: ast::InvalidGraphQlName) -> Self {
        Error::InvalidGraphQlName { name: error.0 }
    }
}

pub fn mk_typename(name: &str) -> Result<ast::TypeName, Error> {
    match ast::Name::from_str(name) {
        Ok(name) => Ok(ast::TypeName(name)),
        Err(_) => Err(Error::InvalidGraphQlName {
            name: name.to_string(),
        }),
    }
}

/// One ordered set of payload fields. Sources are applied most-base first,
/// most-derived last, so later sources win on name collision.
pub type FieldSource = IndexMap<ast::Name, schema::Field>;

/// Explicit configuration of a mutation, in place of the class-body
/// introspection a dynamic schema library would do.
pub struct MutationBuilder {
    type_name: ast::TypeName,
    description: Option<String>,
    output: Option<ast::Type>,
    interfaces: Vec<schema::TypeInfo>,
    field_sources: Vec<FieldSource>,
    arguments: Option<IndexMap<ast::Name, Argument>>,
    legacy_input: Option<IndexMap<ast::Name, Argument>>,
    resolver: Option<Resolver>,
    mutate: Option<Resolver>,
}

impl MutationBuilder {
    pub fn new(type_name: ast::TypeName) -> Self {
        MutationBuilder {
            type_name,
            description: None,
            output: None,
            interfaces: Vec::new(),
            field_sources: Vec::new(),
            arguments: None,
            legacy_input: None,
            resolver: None,
            mutate: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Use an explicit output type instead of a synthesized payload object.
    /// Field sources are not consulted when an output type is given.
    pub fn output(mut self, output: ast::Type) -> Self {
        self.output = Some(output);
        self
    }

    /// Declare an interface the payload object implements. Its fields are
    /// merged into the payload ahead of the field sources. Must be an
    /// interface type; anything else fails the build.
    pub fn implements(mut self, interface: schema::TypeInfo) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Append a payload field source. Sources are applied in the order they
    /// are added; later sources override earlier ones on name collision.
    pub fn fields(mut self, source: FieldSource) -> Self {
        self.field_sources.push(source);
        self
    }

    pub fn arguments(mut self, arguments: IndexMap<ast::Name, Argument>) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// Legacy spelling of the argument set. Building warns when it is used.
    #[deprecated(note = "declare the argument set with `arguments` instead")]
    pub fn input(mut self, arguments: IndexMap<ast::Name, Argument>) -> Self {
        self.legacy_input = Some(arguments);
        self
    }

    /// Supply an explicit resolver, bypassing the validating wrapper.
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The mutation function. Required unless an explicit resolver is given;
    /// wrapped in a resolver that runs argument validators first.
    pub fn mutate<F>(mut self, mutate: F) -> Self
    where
        F: Fn(
                &serde_json::Value,
                &resolver::ArgumentValues,
            ) -> Result<serde_json::Value, resolver::ResolveError>
            + Send
            + Sync
            + 'static,
    {
        self.mutate = Some(Arc::new(mutate));
        self
    }

    pub fn build(self) -> Result<MutationType, Error> {
        let mut fields = IndexMap::new();
        let mut interface_names = BTreeSet::new();

        for interface in &self.interfaces {
            let schema::TypeInfo::Interface(interface) = interface else {
                return Err(Error::NotAnInterface {
                    type_name: self.type_name.clone(),
                    interface_name: interface.type_name().clone(),
                    interface_kind: interface.kind(),
                });
            };
            for (field_name, field) in &interface.fields {
                fields.insert(field_name.clone(), field.clone());
            }
            interface_names.insert(interface.name.clone());
        }

        let output = match self.output {
            // An explicit output type wins; declared fields are not collected.
            Some(output_type) => MutationOutput::Explicit(output_type),
            None => {
                for source in self.field_sources {
                    for (field_name, field) in source {
                        fields.insert(field_name, field);
                    }
                }
                MutationOutput::Payload(schema::Object::new(
                    self.type_name.clone(),
                    self.description.clone(),
                    fields.into_iter().collect::<BTreeMap<_, _>>(),
                    interface_names.clone(),
                ))
            }
        };

        let arguments = match (self.arguments, self.legacy_input) {
            (Some(arguments), _) => arguments,
            (None, Some(arguments)) => {
                tracing::warn!(
                    mutation = %self.type_name,
                    "the input declaration is deprecated, declare the argument set with arguments instead"
                );
                arguments
            }
            (None, None) => IndexMap::new(),
        };

        let resolver = match self.resolver {
            Some(resolver) => resolver,
            None => {
                let mutate = self.mutate.ok_or_else(|| Error::MissingMutateFunction {
                    type_name: self.type_name.clone(),
                })?;
                let declared = arguments.clone();
                let validating: Resolver = Arc::new(move |parent, values| {
                    run_validators(&declared, values)?;
                    mutate(parent, values)
                });
                validating
            }
        };

        Ok(MutationType {
            type_name: self.type_name,
            description: self.description,
            output,
            arguments,
            resolver,
            interfaces: interface_names,
        })
    }
}

/// The output side of a built mutation: either the type the caller named
/// explicitly, or the payload object synthesized from the merged fields.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutput {
    Explicit(ast::Type),
    Payload(schema::Object),
}

impl MutationOutput {
    pub fn payload_object(&self) -> Option<&schema::Object> {
        match self {
            MutationOutput::Explicit(_) => None,
            MutationOutput::Payload(object) => Some(object),
        }
    }

    fn field_type(&self, required: bool) -> ast::Type {
        match self {
            MutationOutput::Explicit(output_type) => {
                let mut output_type = output_type.clone();
                if required {
                    output_type.nullable = false;
                }
                output_type
            }
            MutationOutput::Payload(object) => {
                if required {
                    ast::Type::named_non_null(object.name.clone())
                } else {
                    ast::Type::named_null(object.name.clone())
                }
            }
        }
    }
}

/// A built mutation definition, ready to be mounted as a schema field.
#[derive(Clone)]
pub struct MutationType {
    pub type_name: ast::TypeName,
    pub description: Option<String>,
    pub output: MutationOutput,
    pub arguments: IndexMap<ast::Name, Argument>,
    pub resolver: Resolver,
    pub interfaces: BTreeSet<ast::TypeName>,
}

impl std::fmt::Debug for MutationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationType")
            .field("type_name", &self.type_name)
            .field("description", &self.description)
            .field("output", &self.output)
            .field("arguments", &self.arguments)
            .field("interfaces", &self.interfaces)
            .finish_non_exhaustive()
    }
}

/// Mount-time overrides for [`MutationType::field`].
#[derive(Debug, Default, Clone)]
pub struct FieldOptions {
    /// Overrides the mutation's own description.
    pub description: Option<String>,
    pub deprecation_reason: Option<String>,
    /// Makes the field's output type non-null.
    pub required: bool,
}

/// The produced field descriptor: the schema field plus the resolver the
/// execution engine invokes for it.
#[derive(Clone)]
pub struct MutationField {
    pub field: schema::Field,
    pub resolver: Resolver,
}

impl MutationType {
    /// Mount the mutation as a schema field under the given name.
    pub fn field(&self, name: ast::Name, options: FieldOptions) -> MutationField {
        let arguments = self
            .arguments
            .iter()
            .map(|(argument_name, argument)| {
                (
                    argument_name.clone(),
                    argument.to_input_field(argument_name.clone()),
                )
            })
            .collect();
        let deprecation_status = match &options.deprecation_reason {
            Some(reason) => schema::DeprecationStatus::new_deprecated(Some(reason)),
            None => schema::DeprecationStatus::NotDeprecated,
        };
        MutationField {
            field: schema::Field::new(
                name,
                options.description.or_else(|| self.description.clone()),
                self.output.field_type(options.required),
                arguments,
                deprecation_status,
            ),
            resolver: self.resolver.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mk_name;
    use serde_json::json;

    fn boolean_type() -> ast::Type {
        ast::Type::named_non_null(ast::TypeName(mk_name!("Boolean")))
    }

    fn ok_field() -> schema::Field {
        schema::Field::new(
            mk_name!("ok"),
            None,
            boolean_type(),
            BTreeMap::new(),
            schema::DeprecationStatus::NotDeprecated,
        )
    }

    #[test]
    fn test_non_interface_is_rejected() {
        let scalar = schema::TypeInfo::Scalar(schema::Scalar {
            name: ast::TypeName(mk_name!("String")),
            description: None,
        });
        let error = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
            .implements(scalar)
            .mutate(|_, _| Ok(json!(null)))
            .build()
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "all interfaces of CreatePerson must be interface types, received SCALAR \"String\""
        );
    }

    #[test]
    fn test_missing_mutate_function_is_rejected() {
        let error = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
            .fields(FieldSource::from([(mk_name!("ok"), ok_field())]))
            .build()
            .unwrap_err();
        assert!(matches!(error, Error::MissingMutateFunction { .. }));
        assert!(error.to_string().contains("CreatePerson"));
    }

    #[test]
    fn test_explicit_resolver_needs_no_mutate_function() {
        let resolver: Resolver = Arc::new(|_, _| Ok(json!(true)));
        let mutation = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
            .resolver(resolver)
            .build()
            .unwrap();
        let result = (mutation.resolver)(&json!(null), &resolver::ArgumentValues::new());
        assert_eq!(result.unwrap(), json!(true));
    }

    #[test]
    fn test_deprecated_input_declaration_matches_arguments() {
        let declared = || {
            IndexMap::from([(
                mk_name!("name"),
                Argument::new(ast::Type::named_non_null(ast::TypeName(mk_name!("String")))),
            )])
        };
        let current = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
            .arguments(declared())
            .mutate(|_, _| Ok(json!(null)))
            .build()
            .unwrap();
        #[allow(deprecated)]
        let legacy = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
            .input(declared())
            .mutate(|_, _| Ok(json!(null)))
            .build()
            .unwrap();

        let current_field = current.field(mk_name!("createPerson"), FieldOptions::default());
        let legacy_field = legacy.field(mk_name!("createPerson"), FieldOptions::default());
        assert_eq!(current_field.field.arguments, legacy_field.field.arguments);
    }

    #[test]
    fn test_deprecated_input_declaration_warns() {
        use std::sync::Mutex;

        #[derive(Clone, Default)]
        struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for CaptureWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
            type Writer = CaptureWriter;
            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        fn warnings_during(build: impl FnOnce()) -> String {
            let writer = CaptureWriter::default();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(writer.clone())
                .with_max_level(tracing::Level::WARN)
                .with_ansi(false)
                .without_time()
                .finish();
            tracing::subscriber::with_default(subscriber, build);
            let captured = writer.0.lock().unwrap();
            String::from_utf8(captured.clone()).unwrap()
        }

        let declared = || {
            IndexMap::from([(
                mk_name!("name"),
                Argument::new(ast::Type::named_non_null(ast::TypeName(mk_name!("String")))),
            )])
        };

        let legacy_warnings = warnings_during(|| {
            #[allow(deprecated)]
            let mutation = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
                .input(declared())
                .mutate(|_, _| Ok(json!(null)))
                .build()
                .unwrap();
            let _ = mutation;
        });
        assert!(legacy_warnings.contains("input declaration is deprecated"));
        assert!(legacy_warnings.contains("CreatePerson"));

        let current_warnings = warnings_during(|| {
            let mutation = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
                .arguments(declared())
                .mutate(|_, _| Ok(json!(null)))
                .build()
                .unwrap();
            let _ = mutation;
        });
        assert!(current_warnings.is_empty());
    }

    #[test]
    fn test_mount_overrides() {
        let mutation = MutationBuilder::new(ast::TypeName(mk_name!("CreatePerson")))
            .description("creates a person")
            .fields(FieldSource::from([(mk_name!("ok"), ok_field())]))
            .mutate(|_, _| Ok(json!(null)))
            .build()
            .unwrap();

        let field = mutation.field(
            mk_name!("createPerson"),
            FieldOptions {
                description: None,
                deprecation_reason: Some("use createUser".to_string()),
                required: true,
            },
        );
        assert_eq!(field.field.description.as_deref(), Some("creates a person"));
        assert_eq!(field.field.field_type.to_string(), "CreatePerson!");
        assert!(field.field.deprecation_status.is_deprecated());
        assert_eq!(
            field.field.deprecation_status.reason(),
            Some("use createUser")
        );
    }

    #[test]
    fn test_mk_typename() {
        assert_eq!(
            mk_typename("CreatePerson").unwrap(),
            ast::TypeName(mk_name!("CreatePerson"))
        );
        assert!(mk_typename("create person").is_err());
    }
}
