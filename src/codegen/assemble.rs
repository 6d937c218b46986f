//! Artifact Assembly
//!
//! Builds the complete output set for a root schema:
//! - the two fixed runtime support files
//! - one record artifact for the root itself
//! - a manifest importing the root and every object-typed definition
//! - one record artifact per object-typed definition
//!
//! Every call to [`ArtifactAssembler::assemble`] is one generation run with its
//! own [`ReferenceCache`].

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use super::names::{self, push_unique, Import};
use super::render::{Renderer, TraitletsRenderer};
use super::support::{RuntimeSupport, TraitletsSupport};
use super::{TypeMapper, TypeRepr};
use crate::checksum::{Checksum, CHECKSUMS_FILE};
use crate::error::{GenError, Result};
use crate::reference::ReferenceCache;
use crate::schema::SchemaNode;

// =============================================================================
// Record Description
// =============================================================================

/// One field of a generated record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeRepr,
}

/// Everything a renderer needs to emit one record artifact
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSpec {
    pub classname: String,
    pub baseclass: String,
    pub description: String,
    /// Fields in property declaration order
    pub fields: Vec<FieldSpec>,
    pub imports: Vec<Import>,
}

// =============================================================================
// Generated Output
// =============================================================================

/// Named artifacts produced by one generation run, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSpec {
    artifacts: IndexMap<String, String>,
}

impl ModuleSpec {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.artifacts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.artifacts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.artifacts
    }

    /// Write every artifact into `dir`, optionally followed by a checksum list.
    ///
    /// Every artifact name must be a single plain file name; otherwise nothing
    /// is written. Returns the paths written, in order.
    pub fn write_to(&self, dir: &Path, include_checksums: bool) -> Result<Vec<PathBuf>> {
        if let Some(name) = self.names().find(|name| !is_plain_file_name(name)) {
            return Err(GenError::UnsafeArtifactName(name.to_string()));
        }
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.artifacts.len() + 1);
        let mut checksums = Vec::with_capacity(self.artifacts.len());
        for (name, contents) in &self.artifacts {
            let path = dir.join(name);
            fs::write(&path, contents)?;
            checksums.push((name.clone(), Checksum::from_content(contents)));
            written.push(path);
        }

        if include_checksums {
            let path = dir.join(CHECKSUMS_FILE);
            fs::write(&path, Checksum::listing(&checksums))?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Exactly one normal path component: no separators, `..`, or roots
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl<'a> IntoIterator for &'a ModuleSpec {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Produces the artifact set for a root schema
pub struct ArtifactAssembler<R = TraitletsRenderer, S = TraitletsSupport> {
    renderer: R,
    support: S,
    cache_references: bool,
}

impl Default for ArtifactAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactAssembler {
    /// Assembler with the bundled traitlets renderer and support files
    pub fn new() -> Self {
        Self::with_backend(TraitletsRenderer, TraitletsSupport)
    }
}

impl<R: Renderer, S: RuntimeSupport> ArtifactAssembler<R, S> {
    pub fn with_backend(renderer: R, support: S) -> Self {
        Self {
            renderer,
            support,
            cache_references: true,
        }
    }

    /// Enable or disable `$ref` memoization for subsequent runs
    pub fn cache_references(mut self, enabled: bool) -> Self {
        self.cache_references = enabled;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Build every artifact for `root`.
    ///
    /// Fails on the first unsupported construct; no partial output is returned.
    pub fn assemble(&self, root: &Rc<SchemaNode>) -> Result<ModuleSpec> {
        if !root.is_root() {
            return Err(GenError::NotRoot);
        }

        let refs = ReferenceCache::with_caching(self.cache_references);
        let mut artifacts = IndexMap::new();

        for file in self.support.files() {
            artifacts.insert(file.name.to_string(), file.contents.to_string());
        }

        artifacts.insert(self.artifact_name(root)?, self.object_code(root, &refs)?);

        let definitions = root.wrapped_definitions()?;
        let mut manifest = vec![Import::record_of(root)?];
        for node in definitions.values().filter(|node| node.is_object()) {
            manifest.push(Import::record_of(node)?);
        }
        artifacts.insert(
            self.renderer.manifest_name().to_string(),
            self.renderer.render_manifest(&manifest),
        );

        for (key, node) in &definitions {
            if !node.is_object() {
                trace!(definition = %key, kind = %node.kind(), "skipping non-object definition");
                continue;
            }
            artifacts.insert(self.artifact_name(node)?, self.object_code(node, &refs)?);
        }

        info!(
            artifacts = artifacts.len(),
            references = refs.len(),
            "assembled artifact set"
        );
        Ok(ModuleSpec { artifacts })
    }

    /// Describe the record generated for `node`
    pub fn record_spec(&self, node: &Rc<SchemaNode>, refs: &ReferenceCache) -> Result<RecordSpec> {
        let mapper = TypeMapper::new(refs);
        let fields = node
            .wrapped_properties()?
            .into_iter()
            .map(|(name, prop)| -> Result<FieldSpec> {
                let ty = mapper.type_representation(&prop)?;
                Ok(FieldSpec { name, ty })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RecordSpec {
            classname: node.classname()?,
            baseclass: self.support.base_class().to_string(),
            description: node.description().to_string(),
            fields,
            imports: self.record_imports(node, &mapper)?,
        })
    }

    /// Rendered source of the record generated for `node`
    pub fn object_code(&self, node: &Rc<SchemaNode>, refs: &ReferenceCache) -> Result<String> {
        let record = self.record_spec(node, refs)?;
        debug!(classname = %record.classname, fields = record.fields.len(), "emitting record");
        Ok(self.renderer.render_record(&record))
    }

    fn artifact_name(&self, node: &Rc<SchemaNode>) -> Result<String> {
        names::artifact_name(node, self.renderer.extension())
    }

    /// Support imports, then the object-typed `$ref` target of each property
    fn record_imports(&self, node: &Rc<SchemaNode>, mapper: &TypeMapper<'_>) -> Result<Vec<Import>> {
        let mut imports = vec![Import::Runtime, Import::base(self.support.base_class())];
        for prop in node.wrapped_properties()?.values() {
            if let Some(target) = mapper.object_target(prop)? {
                push_unique(&mut imports, Import::record_of(&target)?);
            }
        }
        Ok(imports)
    }
}
