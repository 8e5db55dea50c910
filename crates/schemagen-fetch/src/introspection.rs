/// Standard introspection query, already wrapped as a JSON request body.
pub const INTROSPECTION_QUERY: &str = include_str!("introspection_query.json");
