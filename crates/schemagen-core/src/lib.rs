//! Core types shared by the schema generator crates.
//!
//! This crate holds everything that is decided before any network traffic
//! happens: the per-target configuration surface and its eager validation,
//! the immutable [`FetchRequest`] derived from it, header parsing, the
//! failure taxonomy of a schema fetch, and the serde model of a GraphQL
//! introspection response.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Target configuration and eager validation.
pub mod config;
/// Configuration error types.
pub mod error;
/// `name:value` header specification parsing.
pub mod headers;
/// Immutable fetch request and failure classes.
pub mod request;
/// GraphQL introspection schema model.
pub mod schema;

pub use config::{
    DEFAULT_CLASS_NAME, DEFAULT_OUTPUT_DIR, DEFAULT_PACKAGE, Language, TargetConfig, TargetsFile,
    ValidatedTarget,
};
pub use error::{ConfigError, Result};
pub use headers::parse_headers;
pub use request::{FailureClass, FetchRequest};
pub use schema::{
    Directive, EnumValue, Field, InputValue, IntrospectionData, IntrospectionResponse, RootType,
    Schema, SchemaType, TypeKind, TypeRef,
};
