//! Schema Records
//!
//! Generates a package of validated record classes from a JSON Schema
//! document: one record per object-typed definition, one for the document
//! root, a manifest, and the runtime support files they import.
//!
//! ## Pipeline
//!
//! ```text
//! document ──► SchemaNode ──► TypeMapper ──► RecordSpec ──► Renderer ──► ModuleSpec
//!                  │               │
//!                  └── $ref ──► ReferenceCache (one per run)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//!
//! let spec = schema_records::generate(json!({
//!     "definitions": {
//!         "Point": {
//!             "type": "object",
//!             "properties": {"x": {"type": "number"}, "y": {"type": "number"}}
//!         }
//!     },
//!     "properties": {"origin": {"$ref": "#/definitions/Point"}}
//! }))
//! .unwrap();
//!
//! assert!(spec.get("point.py").unwrap().contains("x = jst.JSONNumber()"));
//! assert!(spec.get("rootinstance.py").unwrap().contains("from .point import Point"));
//! ```
//!
//! Unsupported constructs (`not`, `anyOf`, `allOf`, `oneOf`, tuple `items`)
//! fail the whole run rather than producing approximate output.

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod reference;
pub mod schema;

pub use checksum::Checksum;
pub use codegen::{
    ArtifactAssembler, FieldSpec, Import, ModuleSpec, Primitive, RecordSpec, Renderer,
    RuntimeSupport, TraitletsRenderer, TraitletsSupport, TypeMapper, TypeRepr,
};
pub use config::{GenerationSettings, GeneratorConfig};
pub use error::{GenError, Result};
pub use reference::ReferenceCache;
pub use schema::{NodeKind, SchemaNode};

use std::rc::Rc;

use serde_json::Value;

/// Generate the artifact set for a document with default settings
pub fn generate(document: Value) -> Result<ModuleSpec> {
    generate_with(document, &GenerationSettings::default())
}

/// Generate the artifact set for a JSON document given as text
pub fn generate_str(source: &str) -> Result<ModuleSpec> {
    generate(serde_json::from_str(source)?)
}

/// Generate the artifact set for a document
pub fn generate_with(document: Value, settings: &GenerationSettings) -> Result<ModuleSpec> {
    ArtifactAssembler::new()
        .cache_references(settings.cache_references)
        .assemble(&root_node(document, settings))
}

/// Wrap a document as the root node, honouring a configured root class name
pub fn root_node(document: Value, settings: &GenerationSettings) -> Rc<SchemaNode> {
    if settings.root_classname == schema::ROOT_CLASSNAME {
        SchemaNode::root(document)
    } else {
        SchemaNode::named_root(document, settings.root_classname.clone())
    }
}
