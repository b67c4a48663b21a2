//! Schema type definitions: the field-descriptor and type abstractions
//! consumed and produced by the mutation builder.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ast;
use crate::mk_name;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub enum DeprecationStatus {
    #[default]
    NotDeprecated,
    Deprecated {
        reason: Option<String>,
    },
}

impl DeprecationStatus {
    pub fn new_deprecated(reason: Option<&str>) -> Self {
        DeprecationStatus::Deprecated {
            reason: reason.map(ToString::to_string),
        }
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, DeprecationStatus::Deprecated { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            DeprecationStatus::NotDeprecated => None,
            DeprecationStatus::Deprecated { reason } => reason.as_deref(),
        }
    }
}

/// An input value mounted on a field or an input object type.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct InputField {
    pub name: ast::Name,
    pub description: Option<String>,
    pub field_type: ast::Type,
    pub default_value: Option<serde_json::Value>,
    pub deprecation_status: DeprecationStatus,
}

impl InputField {
    pub fn new(
        name: ast::Name,
        description: Option<String>,
        field_type: ast::Type,
        default_value: Option<serde_json::Value>,
        deprecation_status: DeprecationStatus,
    ) -> Self {
        InputField {
            name,
            description,
            field_type,
            default_value,
            deprecation_status,
        }
    }
}

/// An output field: the descriptor mounted onto an object or interface type.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Field {
    pub name: ast::Name,
    pub description: Option<String>,
    pub field_type: ast::Type,
    pub arguments: BTreeMap<ast::Name, InputField>,
    pub deprecation_status: DeprecationStatus,
}

impl Field {
    pub fn new(
        name: ast::Name,
        description: Option<String>,
        field_type: ast::Type,
        arguments: BTreeMap<ast::Name, InputField>,
        deprecation_status: DeprecationStatus,
    ) -> Self {
        Field {
            name,
            description,
            field_type,
            arguments,
            deprecation_status,
        }
    }
}

fn build_typename_field() -> Field {
    Field::new(
        mk_name!("__typename"),
        None,
        ast::Type::named_non_null(ast::TypeName(mk_name!("String"))),
        BTreeMap::new(),
        DeprecationStatus::NotDeprecated,
    )
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Object {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub fields: BTreeMap<ast::Name, Field>,
    /// The set of interfaces that this object type implements
    pub interfaces: BTreeSet<ast::TypeName>,
}

impl Object {
    pub fn new(
        name: ast::TypeName,
        description: Option<String>,
        fields: BTreeMap<ast::Name, Field>,
        interfaces: BTreeSet<ast::TypeName>,
    ) -> Self {
        let mut definition = Object {
            name,
            description,
            fields,
            interfaces,
        };
        let typename_field = build_typename_field();
        definition
            .fields
            .insert(typename_field.name.clone(), typename_field);
        definition
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Interface {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub fields: BTreeMap<ast::Name, Field>,
}

impl Interface {
    pub fn new(
        name: ast::TypeName,
        description: Option<String>,
        fields: BTreeMap<ast::Name, Field>,
    ) -> Self {
        let mut definition = Interface {
            name,
            description,
            fields,
        };
        let typename_field = build_typename_field();
        definition
            .fields
            .insert(typename_field.name.clone(), typename_field);
        definition
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Scalar {
    pub name: ast::TypeName,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct EnumValue {
    pub value: ast::Name,
    pub description: Option<String>,
    pub deprecation_status: DeprecationStatus,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Enum {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub values: BTreeMap<ast::Name, EnumValue>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct InputObject {
    pub name: ast::TypeName,
    pub description: Option<String>,
    pub fields: BTreeMap<ast::Name, InputField>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub enum TypeInfo {
    Scalar(Scalar),
    Enum(Enum),
    Object(Object),
    Interface(Interface),
    InputObject(InputObject),
}

impl TypeInfo {
    pub fn kind(&self) -> &'static str {
        match self {
            TypeInfo::Scalar(_) => "SCALAR",
            TypeInfo::Enum(_) => "ENUM",
            TypeInfo::Object(_) => "OBJECT",
            TypeInfo::Interface(_) => "INTERFACE",
            TypeInfo::InputObject(_) => "INPUT_OBJECT",
        }
    }

    pub fn type_name(&self) -> &ast::TypeName {
        match self {
            TypeInfo::Scalar(d) => &d.name,
            TypeInfo::Enum(d) => &d.name,
            TypeInfo::Object(d) => &d.name,
            TypeInfo::Interface(d) => &d.name,
            TypeInfo::InputObject(d) => &d.name,
        }
    }
}
