//! Schema node wrapper
//!
//! A [`SchemaNode`] wraps one subtree of a JSON Schema document together with
//! the document root it was reached from. Every node reachable from one root
//! shares the same root allocation, so "is this the root?" is a pointer
//! comparison rather than a structural one.

use std::fmt;
use std::rc::Rc;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{GenError, Result};
use crate::reference::target_name;

/// JSON Schema type names that map directly onto a primitive trait
pub const SIMPLE_TYPES: [&str; 5] = ["boolean", "null", "number", "integer", "string"];

/// Class name given to the document root when it has no explicit name
pub const ROOT_CLASSNAME: &str = "RootInstance";

// =============================================================================
// Classification
// =============================================================================

/// How a node is treated by code generation.
///
/// Exactly one applies to every node; the `is_*` predicates on
/// [`SchemaNode`] are projections of this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Carries a `$ref` key, whatever else it declares
    Reference,
    /// `type` is (or defaults to) `"object"`; gets its own record
    Object,
    /// Anything else: rendered inline as a field trait
    Trait,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Reference => "reference",
            NodeKind::Object => "object",
            NodeKind::Trait => "trait",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// Schema Node
// =============================================================================

/// One schema subtree plus the document it belongs to.
///
/// Nodes are never mutated after construction. Children are created with
/// [`SchemaNode::make_child`], which shares `context` and records the parent.
pub struct SchemaNode {
    schema: Rc<Value>,
    context: Rc<Value>,
    parent: Option<Rc<SchemaNode>>,
    name: Option<String>,
}

impl SchemaNode {
    /// Wrap a whole document. The returned node is its own context.
    pub fn root(document: Value) -> Rc<Self> {
        let schema = Rc::new(document);
        Rc::new(Self {
            context: Rc::clone(&schema),
            schema,
            parent: None,
            name: None,
        })
    }

    /// Wrap a whole document under an explicit class name.
    pub fn named_root(document: Value, name: impl Into<String>) -> Rc<Self> {
        let schema = Rc::new(document);
        Rc::new(Self {
            context: Rc::clone(&schema),
            schema,
            parent: None,
            name: Some(name.into()),
        })
    }

    /// Make a child node sharing this node's context, with `self` as parent.
    pub fn make_child(self: &Rc<Self>, schema: Value, name: Option<&str>) -> Rc<SchemaNode> {
        Rc::new(SchemaNode {
            schema: Rc::new(schema),
            context: Rc::clone(&self.context),
            parent: Some(Rc::clone(self)),
            name: name.map(str::to_string),
        })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn context(&self) -> &Value {
        &self.context
    }

    pub fn parent(&self) -> Option<&Rc<SchemaNode>> {
        self.parent.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True iff this node's schema *is* its context (not merely equal to it)
    pub fn is_root(&self) -> bool {
        Rc::ptr_eq(&self.schema, &self.context)
    }

    /// Whether the raw schema carries `key`
    pub fn has(&self, key: &str) -> bool {
        self.schema.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.schema.get(key)
    }

    // -------------------------------------------------------------------------
    // Defaulted attributes
    // -------------------------------------------------------------------------

    pub fn title(&self) -> &str {
        self.schema.get("title").and_then(Value::as_str).unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.schema.get("description").and_then(Value::as_str).unwrap_or("")
    }

    pub fn properties(&self) -> Result<&Map<String, Value>> {
        self.mapping("properties")
    }

    pub fn definitions(&self) -> Result<&Map<String, Value>> {
        self.mapping("definitions")
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.schema.get("default")
    }

    pub fn examples(&self) -> &Value {
        static EMPTY: OnceLock<Value> = OnceLock::new();
        self.schema
            .get("examples")
            .unwrap_or_else(|| EMPTY.get_or_init(|| Value::Object(Map::new())))
    }

    /// The `type` keyword, `"object"` when absent
    pub fn schema_type(&self) -> &Value {
        static OBJECT: OnceLock<Value> = OnceLock::new();
        self.schema
            .get("type")
            .unwrap_or_else(|| OBJECT.get_or_init(|| Value::String("object".to_string())))
    }

    fn mapping(&self, key: &'static str) -> Result<&Map<String, Value>> {
        static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
        match self.schema.get(key) {
            None => Ok(EMPTY.get_or_init(Map::new)),
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(GenError::malformed(
                key,
                format!("expected an object, found {}", other),
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    pub fn kind(&self) -> NodeKind {
        if self.has("$ref") {
            NodeKind::Reference
        } else if self.schema_type().as_str() == Some("object") {
            NodeKind::Object
        } else {
            NodeKind::Trait
        }
    }

    pub fn is_reference(&self) -> bool {
        self.kind() == NodeKind::Reference
    }

    pub fn is_object(&self) -> bool {
        self.kind() == NodeKind::Object
    }

    pub fn is_trait(&self) -> bool {
        self.kind() == NodeKind::Trait
    }

    /// The `$ref` string, if this node is a reference
    pub fn reference(&self) -> Result<Option<&str>> {
        match self.schema.get("$ref") {
            None => Ok(None),
            Some(Value::String(reference)) => Ok(Some(reference)),
            Some(other) => Err(GenError::malformed(
                "$ref",
                format!("expected a string, found {}", other),
            )),
        }
    }

    // -------------------------------------------------------------------------
    // Naming
    // -------------------------------------------------------------------------

    /// Name of the record generated for this node.
    ///
    /// Anonymous nodes (not root, no `$ref`, no explicit name) have no class
    /// name and asking for one is an error.
    pub fn classname(&self) -> Result<String> {
        if let Some(name) = &self.name {
            return Ok(name.clone());
        }
        if self.is_root() {
            return Ok(ROOT_CLASSNAME.to_string());
        }
        if let Some(reference) = self.reference()? {
            return Ok(target_name(reference).into_owned());
        }
        Err(GenError::UndefinedClassname {
            schema: self.schema.to_string(),
        })
    }

    /// Module (and artifact stem) name: the lower-cased class name
    pub fn modulename(&self) -> Result<String> {
        Ok(self.classname()?.to_lowercase())
    }

    // -------------------------------------------------------------------------
    // Children
    // -------------------------------------------------------------------------

    /// One child per entry in `properties`, in declaration order
    pub fn wrapped_properties(self: &Rc<Self>) -> Result<IndexMap<String, Rc<SchemaNode>>> {
        Ok(self
            .properties()?
            .iter()
            .map(|(name, schema)| (name.clone(), self.make_child(schema.clone(), None)))
            .collect())
    }

    /// One child per entry in `definitions`, keyed by lower-cased name.
    ///
    /// Each child keeps the original key as its explicit name.
    pub fn wrapped_definitions(self: &Rc<Self>) -> Result<IndexMap<String, Rc<SchemaNode>>> {
        Ok(self
            .definitions()?
            .iter()
            .map(|(name, schema)| {
                (name.to_lowercase(), self.make_child(schema.clone(), Some(name)))
            })
            .collect())
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("schema", &self.schema)
            .field("name", &self.name)
            .field("is_root", &self.is_root())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_is_its_own_context() {
        let root = SchemaNode::root(json!({"type": "object"}));
        assert!(root.is_root());
        assert_eq!(root.classname().unwrap(), "RootInstance");
    }

    #[test]
    fn test_equal_child_is_not_root() {
        let doc = json!({"type": "object"});
        let root = SchemaNode::root(doc.clone());
        let child = root.make_child(doc, None);
        assert!(!child.is_root());
        assert_eq!(child.context(), root.context());
        assert!(Rc::ptr_eq(child.parent().unwrap(), &root));
    }

    #[test]
    fn test_defaults() {
        let root = SchemaNode::root(json!({}));
        assert_eq!(root.title(), "");
        assert_eq!(root.description(), "");
        assert!(root.properties().unwrap().is_empty());
        assert!(root.definitions().unwrap().is_empty());
        assert!(root.default_value().is_none());
        assert_eq!(root.examples(), &json!({}));
        assert_eq!(root.schema_type(), &json!("object"));
    }

    #[test]
    fn test_malformed_properties() {
        let root = SchemaNode::root(json!({"properties": [1, 2]}));
        assert!(matches!(
            root.properties(),
            Err(GenError::Malformed { keyword: "properties", .. })
        ));
    }

    #[test]
    fn test_classification_is_exclusive() {
        let root = SchemaNode::root(json!({}));
        let cases = [
            (json!({"$ref": "#/definitions/A", "type": "object"}), NodeKind::Reference),
            (json!({"type": "object"}), NodeKind::Object),
            (json!({}), NodeKind::Object),
            (json!({"type": "string"}), NodeKind::Trait),
            (json!({"type": ["string", "null"]}), NodeKind::Trait),
        ];
        for (schema, expected) in cases {
            let node = root.make_child(schema, None);
            assert_eq!(node.kind(), expected);
            let flags = [node.is_reference(), node.is_object(), node.is_trait()];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1);
        }
    }

    #[test]
    fn test_classname_precedence() {
        let root = SchemaNode::root(json!({}));

        let named = root.make_child(json!({"$ref": "#/definitions/Other"}), Some("Explicit"));
        assert_eq!(named.classname().unwrap(), "Explicit");

        let reference = root.make_child(json!({"$ref": "#/definitions/Other"}), None);
        assert_eq!(reference.classname().unwrap(), "Other");
        assert_eq!(reference.modulename().unwrap(), "other");

        let escaped = root.make_child(json!({"$ref": "#/definitions/a~1b~0c"}), None);
        assert_eq!(escaped.classname().unwrap(), "a/b~c");

        let named_root = SchemaNode::named_root(json!({}), "Chart");
        assert!(named_root.is_root());
        assert_eq!(named_root.classname().unwrap(), "Chart");
    }

    #[test]
    fn test_anonymous_classname_fails() {
        let root = SchemaNode::root(json!({}));
        let anonymous = root.make_child(json!({"type": "object"}), None);
        assert!(matches!(
            anonymous.classname(),
            Err(GenError::UndefinedClassname { .. })
        ));
    }

    #[test]
    fn test_wrapped_properties_keep_order() {
        let root = SchemaNode::root(json!({
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "integer"},
                "mid": {"type": "boolean"}
            }
        }));
        let props = root.wrapped_properties().unwrap();
        let names: Vec<_> = props.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(props.values().all(|p| p.name().is_none()));
    }

    #[test]
    fn test_wrapped_definitions_lowercase_keys() {
        let root = SchemaNode::root(json!({
            "definitions": {
                "MarkDef": {"type": "object"},
                "Color": {"type": "string"}
            }
        }));
        let defs = root.wrapped_definitions().unwrap();
        assert_eq!(defs.keys().collect::<Vec<_>>(), vec!["markdef", "color"]);
        assert_eq!(defs["markdef"].classname().unwrap(), "MarkDef");
        assert_eq!(defs["color"].name(), Some("Color"));
    }
}
