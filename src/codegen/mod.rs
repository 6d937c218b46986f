//! Code Generation
//!
//! Maps schema nodes onto a language-agnostic type representation and
//! assembles the full set of generated artifacts.
//!
//! Architecture:
//! - TypeMapper: SchemaNode -> TypeRepr, one schema construct at a time
//! - Renderer: TypeRepr / RecordSpec -> source text (pluggable)
//! - RuntimeSupport: fixed files shipped next to the generated records
//! - ArtifactAssembler: walks the root's definitions and properties and
//!   produces the named artifact set
//!
//! The key constraint: Renderers NEVER read raw schema JSON - only TypeRepr
//! and RecordSpec values.

pub mod assemble;
pub mod names;
pub mod render;
pub mod support;

pub use assemble::{ArtifactAssembler, FieldSpec, ModuleSpec, RecordSpec};
pub use names::Import;
pub use render::{Renderer, TraitletsRenderer};
pub use support::{RuntimeSupport, SupportFile, TraitletsSupport};

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::{GenError, Result};
use crate::reference::ReferenceCache;
use crate::schema::{SchemaNode, SIMPLE_TYPES};

/// Combinators that abort generation when present
const UNSUPPORTED_COMBINATORS: [&str; 3] = ["anyOf", "allOf", "oneOf"];

// =============================================================================
// Type Representation
// =============================================================================

/// JSON scalar type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Null,
    Number,
    Integer,
    String,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Primitive::Boolean),
            "null" => Some(Primitive::Null),
            "number" => Some(Primitive::Number),
            "integer" => Some(Primitive::Integer),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::Number => "number",
            Primitive::Integer => "integer",
            Primitive::String => "string",
        }
    }
}

/// Type of a generated field, prior to rendering
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRepr {
    Primitive(Primitive),
    /// Allowed literal values, verbatim and in schema order
    Enum(Vec<Value>),
    Array(Box<TypeRepr>),
    /// Members in the order the schema lists them
    Union(Vec<TypeRepr>),
    /// Instance of another generated record, by class name
    Object(String),
}

impl fmt::Display for TypeRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRepr::Primitive(p) => f.write_str(p.as_str()),
            TypeRepr::Enum(values) => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "enum[{}]", values.join(", "))
            }
            TypeRepr::Array(item) => write!(f, "array<{}>", item),
            TypeRepr::Union(members) => {
                let members: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "union<{}>", members.join(" | "))
            }
            TypeRepr::Object(classname) => f.write_str(classname),
        }
    }
}

// =============================================================================
// Type Mapper
// =============================================================================

/// Converts schema nodes into [`TypeRepr`] trees.
///
/// Holds the run's reference cache; never degrades silently on constructs it
/// does not handle.
pub struct TypeMapper<'a> {
    refs: &'a ReferenceCache,
}

impl<'a> TypeMapper<'a> {
    pub fn new(refs: &'a ReferenceCache) -> Self {
        Self { refs }
    }

    pub fn references(&self) -> &ReferenceCache {
        self.refs
    }

    /// Map a node to its type representation.
    ///
    /// First match wins: `not`, `$ref`, combinators, `enum`, then `type`.
    pub fn type_representation(&self, node: &Rc<SchemaNode>) -> Result<TypeRepr> {
        if node.has("not") {
            return Err(GenError::not_supported("not"));
        }

        if let Some(reference) = node.reference()? {
            let target = self.refs.resolve(node, reference)?;
            return if target.is_object() {
                Ok(TypeRepr::Object(target.classname()?))
            } else {
                self.type_representation(&target)
            };
        }

        if let Some(keyword) = UNSUPPORTED_COMBINATORS.iter().find(|k| node.has(k)) {
            return Err(GenError::not_supported(*keyword));
        }

        if let Some(values) = node.get("enum") {
            return match values {
                Value::Array(values) => Ok(TypeRepr::Enum(values.clone())),
                other => Err(GenError::malformed("enum", format!("expected a list, found {}", other))),
            };
        }

        match node.schema_type() {
            Value::String(name) => match name.as_str() {
                "array" => self.array_representation(node),
                "object" => Ok(TypeRepr::Object(node.classname()?)),
                simple => primitive(simple)
                    .ok_or_else(|| GenError::UnrecognizedType(simple.to_string())),
            },
            Value::Array(names) => union_representation(names),
            other => Err(GenError::UnrecognizedType(other.to_string())),
        }
    }

    fn array_representation(&self, node: &Rc<SchemaNode>) -> Result<TypeRepr> {
        match node.get("items") {
            Some(Value::Array(_)) => Err(GenError::not_supported("items-as-list")),
            Some(items) => {
                let item = node.make_child(items.clone(), None);
                Ok(TypeRepr::Array(Box::new(self.type_representation(&item)?)))
            }
            None => Err(GenError::malformed("items", "array type without 'items'")),
        }
    }

    /// Resolve a property's own `$ref` to an object-typed target, if it has one.
    ///
    /// Used for import computation; looks at the property itself, not at the
    /// type representation built from it.
    pub fn object_target(&self, node: &Rc<SchemaNode>) -> Result<Option<Rc<SchemaNode>>> {
        match node.reference()? {
            Some(reference) => {
                let target = self.refs.resolve(node, reference)?;
                Ok(target.is_object().then_some(target))
            }
            None => Ok(None),
        }
    }
}

fn primitive(name: &str) -> Option<TypeRepr> {
    Primitive::from_name(name).map(TypeRepr::Primitive)
}

/// `type: [..]` - every member must be a simple type name
fn union_representation(names: &[Value]) -> Result<TypeRepr> {
    let members = names
        .iter()
        .map(|name| {
            name.as_str()
                .filter(|n| SIMPLE_TYPES.contains(n))
                .and_then(primitive)
                .ok_or_else(|| GenError::UnrecognizedType(Value::Array(names.to_vec()).to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(TypeRepr::Union(members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(root: &Rc<SchemaNode>, schema: Value) -> Result<TypeRepr> {
        let refs = ReferenceCache::new();
        let node = root.make_child(schema, None);
        TypeMapper::new(&refs).type_representation(&node)
    }

    fn document() -> Rc<SchemaNode> {
        SchemaNode::root(json!({
            "definitions": {
                "Foo": {"type": "object", "properties": {"x": {"type": "string"}}},
                "Bar": {"type": "integer"},
                "Alias": {"$ref": "#/definitions/Bar"},
                "Node": {
                    "type": "object",
                    "properties": {"next": {"$ref": "#/definitions/Node"}}
                }
            }
        }))
    }

    #[test]
    fn test_primitives() {
        let root = document();
        for name in SIMPLE_TYPES {
            let repr = map(&root, json!({"type": name})).unwrap();
            assert_eq!(repr, TypeRepr::Primitive(Primitive::from_name(name).unwrap()));
        }
    }

    #[test]
    fn test_union_of_primitives_keeps_order() {
        let root = document();
        let repr = map(&root, json!({"type": ["string", "null"]})).unwrap();
        assert_eq!(
            repr,
            TypeRepr::Union(vec![
                map(&root, json!({"type": "string"})).unwrap(),
                map(&root, json!({"type": "null"})).unwrap(),
            ])
        );
    }

    #[test]
    fn test_union_with_non_primitive_member() {
        let root = document();
        let err = map(&root, json!({"type": ["string", "object"]})).unwrap_err();
        assert!(matches!(err, GenError::UnrecognizedType(_)));
    }

    #[test]
    fn test_reference_to_object() {
        let root = document();
        let repr = map(&root, json!({"$ref": "#/definitions/Foo"})).unwrap();
        assert_eq!(repr, TypeRepr::Object("Foo".to_string()));
    }

    #[test]
    fn test_reference_to_trait_inlines() {
        let root = document();
        let via_ref = map(&root, json!({"$ref": "#/definitions/Bar"})).unwrap();
        let direct = map(&root, json!({"type": "integer"})).unwrap();
        assert_eq!(via_ref, direct);

        let via_alias = map(&root, json!({"$ref": "#/definitions/Alias"})).unwrap();
        assert_eq!(via_alias, direct);
    }

    #[test]
    fn test_self_reference_terminates() {
        let root = document();
        let refs = ReferenceCache::new();
        let mapper = TypeMapper::new(&refs);
        let node = refs.resolve(&root, "#/definitions/Node").unwrap();
        let props = node.wrapped_properties().unwrap();
        let next = Rc::clone(&props["next"]);
        assert_eq!(
            mapper.type_representation(&next).unwrap(),
            TypeRepr::Object("Node".to_string())
        );
    }

    #[test]
    fn test_enum_wins_over_type() {
        let root = document();
        let repr = map(&root, json!({"type": "string", "enum": ["b", "a", "b", 1, null]})).unwrap();
        assert_eq!(repr, TypeRepr::Enum(vec![json!("b"), json!("a"), json!("b"), json!(1), json!(null)]));
    }

    #[test]
    fn test_array_of_items() {
        let root = document();
        let repr = map(&root, json!({"type": "array", "items": {"$ref": "#/definitions/Foo"}})).unwrap();
        assert_eq!(repr, TypeRepr::Array(Box::new(TypeRepr::Object("Foo".to_string()))));
    }

    #[test]
    fn test_array_items_as_list_unsupported() {
        let root = document();
        let err = map(&root, json!({"type": "array", "items": [{"type": "string"}]})).unwrap_err();
        match err {
            GenError::NotSupported(keyword) => assert_eq!(keyword, "items-as-list"),
            other => panic!("Expected NotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_array_without_items() {
        let root = document();
        let err = map(&root, json!({"type": "array"})).unwrap_err();
        assert!(matches!(err, GenError::Malformed { keyword: "items", .. }));
    }

    #[test]
    fn test_unsupported_keywords_win() {
        let root = document();
        for keyword in ["not", "anyOf", "allOf", "oneOf"] {
            let mut schema = json!({"type": "string", "enum": ["a"]});
            schema[keyword] = json!([{"type": "string"}]);
            match map(&root, schema) {
                Err(GenError::NotSupported(k)) => assert_eq!(k, keyword),
                other => panic!("Expected NotSupported({}), got {:?}", keyword, other),
            }
        }
    }

    #[test]
    fn test_not_checked_before_ref() {
        let root = document();
        let err = map(&root, json!({"$ref": "#/definitions/Foo", "not": {}})).unwrap_err();
        assert!(matches!(err, GenError::NotSupported(k) if k == "not"));
    }

    #[test]
    fn test_ref_checked_before_combinators() {
        let root = document();
        let repr = map(&root, json!({"$ref": "#/definitions/Foo", "anyOf": []})).unwrap();
        assert_eq!(repr, TypeRepr::Object("Foo".to_string()));
    }

    #[test]
    fn test_anonymous_object_has_no_classname() {
        let root = document();
        let err = map(&root, json!({"type": "object"})).unwrap_err();
        assert!(matches!(err, GenError::UndefinedClassname { .. }));
    }

    #[test]
    fn test_unrecognized_type() {
        let root = document();
        match map(&root, json!({"type": "date"})) {
            Err(GenError::UnrecognizedType(t)) => assert_eq!(t, "date"),
            other => panic!("Expected UnrecognizedType, got {:?}", other),
        }
        assert!(matches!(
            map(&root, json!({"type": 7})),
            Err(GenError::UnrecognizedType(_))
        ));
    }

    #[test]
    fn test_reference_chain_memoized() {
        let root = document();
        let refs = ReferenceCache::new();
        let mapper = TypeMapper::new(&refs);
        let node = root.make_child(json!({"$ref": "#/definitions/Alias"}), None);

        assert_eq!(
            mapper.type_representation(&node).unwrap(),
            TypeRepr::Primitive(Primitive::Integer)
        );
        assert_eq!(mapper.references().len(), 2);
    }

    #[test]
    fn test_display() {
        let repr = TypeRepr::Array(Box::new(TypeRepr::Union(vec![
            TypeRepr::Primitive(Primitive::String),
            TypeRepr::Object("Foo".to_string()),
        ])));
        assert_eq!(repr.to_string(), "array<union<string | Foo>>");
    }
}
