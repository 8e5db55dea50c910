use serde::{Deserialize, Serialize};

/// Envelope of an introspection response: `{"data": {"__schema": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    /// Response payload
    pub data: IntrospectionData,
}

impl IntrospectionResponse {
    /// Decodes a raw response body.
    ///
    /// # Errors
    /// Returns an error if the body is not JSON or lacks `data.__schema`.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Decoded schema.
    pub fn schema(&self) -> &Schema {
        &self.data.schema
    }
}

/// The `data` member of an introspection response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionData {
    /// The introspected schema
    #[serde(rename = "__schema")]
    pub schema: Schema,
}

/// Root type reference such as `queryType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootType {
    /// Name of the root object type
    pub name: String,
}

/// An introspected GraphQL schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Query root
    pub query_type: Option<RootType>,
    /// Mutation root
    #[serde(default)]
    pub mutation_type: Option<RootType>,
    /// Subscription root
    #[serde(default)]
    pub subscription_type: Option<RootType>,
    /// Every named type, including introspection types
    #[serde(default)]
    pub types: Vec<SchemaType>,
    /// Declared directives
    #[serde(default)]
    pub directives: Vec<Directive>,
}

impl Schema {
    /// Types declared by the service, skipping `__`-prefixed introspection types.
    pub fn user_types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types
            .iter()
            .filter(|schema_type| !schema_type.name.starts_with("__"))
    }

    /// Looks up a type by name.
    pub fn find_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.iter().find(|schema_type| schema_type.name == name)
    }

    /// The query root type, if declared and present.
    pub fn query_root(&self) -> Option<&SchemaType> {
        self.query_type
            .as_ref()
            .and_then(|root| self.find_type(&root.name))
    }

    /// The mutation root type, if declared and present.
    pub fn mutation_root(&self) -> Option<&SchemaType> {
        self.mutation_type
            .as_ref()
            .and_then(|root| self.find_type(&root.name))
    }
}

/// Kind of a GraphQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    /// Built-in or custom scalar
    Scalar,
    /// Object type
    Object,
    /// Interface type
    Interface,
    /// Union type
    Union,
    /// Enum type
    Enum,
    /// Input object type
    InputObject,
    /// List wrapper
    List,
    /// Non-null wrapper
    NonNull,
}

/// A named type of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaType {
    /// Type kind
    pub kind: TypeKind,
    /// Type name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Output fields for objects and interfaces
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
    /// Input fields for input objects
    #[serde(default)]
    pub input_fields: Option<Vec<InputValue>>,
    /// Implemented interfaces
    #[serde(default)]
    pub interfaces: Option<Vec<TypeRef>>,
    /// Values of an enum
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValue>>,
    /// Members of a union or implementors of an interface
    #[serde(default)]
    pub possible_types: Option<Vec<TypeRef>>,
}

/// An output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Field arguments
    #[serde(default)]
    pub args: Vec<InputValue>,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    /// Whether the field is deprecated
    #[serde(default)]
    pub is_deprecated: bool,
    /// Deprecation reason
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// An argument or input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    /// Value name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Value type
    #[serde(rename = "type")]
    pub value_type: TypeRef,
    /// Default value as GraphQL literal text
    #[serde(default)]
    pub default_value: Option<String>,
}

/// A (possibly wrapped) type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// Kind of this layer
    pub kind: TypeKind,
    /// Name, absent for `LIST` and `NON_NULL` wrappers
    #[serde(default)]
    pub name: Option<String>,
    /// Wrapped type for `LIST` and `NON_NULL`
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Name of the innermost named type.
    pub fn named_type(&self) -> Option<&str> {
        match (&self.name, &self.of_type) {
            (Some(name), _) => Some(name),
            (None, Some(inner)) => inner.named_type(),
            (None, None) => None,
        }
    }

    /// Whether the outermost layer is `NON_NULL`.
    pub fn is_non_null(&self) -> bool {
        self.kind == TypeKind::NonNull
    }

    /// Whether a `LIST` layer appears anywhere in the wrapper chain.
    pub fn is_list(&self) -> bool {
        self.kind == TypeKind::List
            || self.of_type.as_ref().is_some_and(|inner| inner.is_list())
    }

    /// GraphQL type notation, e.g. `[String!]!`.
    pub fn signature(&self) -> String {
        match (self.kind, &self.of_type) {
            (TypeKind::NonNull, Some(inner)) => format!("{}!", inner.signature()),
            (TypeKind::List, Some(inner)) => format!("[{}]", inner.signature()),
            _ => self.name.clone().unwrap_or_default(),
        }
    }
}

/// A value of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Value name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the value is deprecated
    #[serde(default)]
    pub is_deprecated: bool,
    /// Deprecation reason
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// A directive declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    /// Directive name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Allowed locations
    #[serde(default)]
    pub locations: Vec<String>,
    /// Directive arguments
    #[serde(default)]
    pub args: Vec<InputValue>,
}
