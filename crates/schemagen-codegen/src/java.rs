use schemagen_core::{TypeKind, TypeRef};

/// Java reserved words and literals that cannot be used as identifiers.
const RESERVED: [&str; 53] = [
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// Java type for a GraphQL type reference. Wrappers are unwrapped, lists
/// become `List<...>`, scalars map to boxed Java types and named types keep
/// their name.
pub fn java_type(type_ref: &TypeRef) -> String {
    match (type_ref.kind, type_ref.of_type.as_deref()) {
        (TypeKind::NonNull, Some(inner)) => java_type(inner),
        (TypeKind::List, Some(inner)) => format!("List<{}>", java_type(inner)),
        (TypeKind::Scalar, _) => scalar_type(type_ref.name.as_deref().unwrap_or_default()).to_owned(),
        _ => type_ref
            .name
            .clone()
            .unwrap_or_else(|| "Object".to_owned()),
    }
}

fn scalar_type(name: &str) -> &'static str {
    match name {
        "Int" => "Integer",
        "Float" => "Double",
        "Boolean" => "Boolean",
        "Long" => "Long",
        "Short" => "Short",
        "Byte" => "Byte",
        "BigDecimal" => "java.math.BigDecimal",
        "BigInteger" => "java.math.BigInteger",
        _ => "String",
    }
}

/// `name`, suffixed with `_` when it is a Java reserved word.
pub fn java_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else {
        name.to_owned()
    }
}

/// `name` with its first character upper-cased and the rest untouched.
pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
