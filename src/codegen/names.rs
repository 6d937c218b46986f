//! Artifact Naming
//!
//! Class names come from the schema (explicit name, root, or `$ref` tail).
//! Everything derived from them here is mechanical: module names are the
//! lower-cased class name, artifact names add the renderer's extension.

use std::rc::Rc;

use crate::error::Result;
use crate::schema::SchemaNode;

/// Module name for a class name
pub fn modulename(classname: &str) -> String {
    classname.to_lowercase()
}

/// Artifact (file) name for a module
pub fn filename(module: &str, extension: &str) -> String {
    if extension.is_empty() {
        module.to_string()
    } else {
        format!("{}.{}", module, extension)
    }
}

/// Artifact name for the record generated from `node`
pub fn artifact_name(node: &Rc<SchemaNode>, extension: &str) -> Result<String> {
    Ok(filename(&node.modulename()?, extension))
}

// =============================================================================
// Imports
// =============================================================================

/// One import line of a generated artifact, before rendering
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Import {
    /// The runtime type-constraint module shipped with the output
    Runtime,
    /// The base record class shipped with the output
    Base { classname: String },
    /// Another generated record
    Record { module: String, classname: String },
}

impl Import {
    /// Import of the record generated for `node`
    pub fn record_of(node: &Rc<SchemaNode>) -> Result<Self> {
        let classname = node.classname()?;
        Ok(Import::Record {
            module: modulename(&classname),
            classname,
        })
    }

    pub fn base(classname: impl Into<String>) -> Self {
        Import::Base { classname: classname.into() }
    }
}

/// Append `import` unless an equal one is already present
pub(crate) fn push_unique(imports: &mut Vec<Import>, import: Import) {
    if !imports.contains(&import) {
        imports.push(import);
    }
}
