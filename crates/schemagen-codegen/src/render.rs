use std::collections::HashMap;

use schemagen_core::{Schema, TypeRef};
use serde::Serialize;
use tera::{Context, Error as TeraError, Result as TeraResult, Tera, Value};

use crate::error::TemplateError;
use crate::java::{java_identifier, java_type, upper_first};
use crate::registry::{TemplateDescriptor, TemplateRegistry};

/// Values exposed to a template.
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext<'ctx> {
    /// Generated class name
    pub class_name: &'ctx str,
    /// Generated package / namespace
    pub package: &'ctx str,
    /// Decoded introspection schema
    pub schema: &'ctx Schema,
    /// Static helper code for the target language
    pub builders: &'ctx str,
    /// Descriptor of the template being rendered
    pub template: &'ctx TemplateDescriptor,
}

/// Renders a named template against a context.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template_id` with `context`.
    ///
    /// # Errors
    /// Returns an error if the template is unknown or fails to render.
    fn render(&self, template_id: &str, context: &RenderContext<'_>) -> Result<String, TemplateError>;
}

/// [`TemplateRenderer`] backed by `tera`, with the Java helper filters
/// (`java_type`, `java_ident`, `upper_first`, `members`) registered.
#[derive(Debug)]
pub struct TeraRenderer {
    /// Parsed templates
    tera: Tera,
}

impl TeraRenderer {
    /// Parses every template of `registry`.
    ///
    /// # Errors
    /// Returns an error if a template source does not parse.
    pub fn from_registry(registry: &TemplateRegistry) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        for template in registry.templates() {
            tera.add_raw_template(&template.descriptor.template_id, &template.source)?;
        }
        tera.register_filter("java_type", java_type_filter);
        tera.register_filter("java_ident", java_ident_filter);
        tera.register_filter("upper_first", upper_first_filter);
        tera.register_filter("members", members_filter);
        Ok(Self { tera })
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template_id: &str, context: &RenderContext<'_>) -> Result<String, TemplateError> {
        let tera_context =
            Context::from_serialize(context).map_err(|err| TemplateError::Context(err.to_string()))?;
        Ok(self.tera.render(template_id, &tera_context)?)
    }
}

fn java_type_filter(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let type_ref: TypeRef = serde_json::from_value(value.clone())
        .map_err(|err| TeraError::msg(format!("java_type expects a type reference: {err}")))?;
    Ok(Value::String(java_type(&type_ref)))
}

fn java_ident_filter(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| TeraError::msg("java_ident expects a string"))?;
    Ok(Value::String(java_identifier(name)))
}

fn upper_first_filter(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let name = value
        .as_str()
        .ok_or_else(|| TeraError::msg("upper_first expects a string"))?;
    Ok(Value::String(upper_first(name)))
}

/// Output fields of an object or interface, input fields of an input object.
fn members_filter(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let members = ["fields", "inputFields"]
        .into_iter()
        .find_map(|key| value.get(key).filter(|list| list.is_array()))
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    Ok(members)
}
