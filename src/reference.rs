//! `$ref` Resolution
//!
//! Resolves document-local references (`#/definitions/Foo`) against the root
//! context of a [`SchemaNode`]. Resolved nodes are memoized per ref string so
//! that repeated (and self-referential) references yield the same node.
//!
//! A [`ReferenceCache`] belongs to one generation run over one document.
//! Reusing it across documents would hand back nodes from the wrong context.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

use crate::error::{GenError, Result};
use crate::schema::SchemaNode;

/// Memoizing `$ref` resolver for a single document
#[derive(Debug)]
pub struct ReferenceCache {
    entries: RefCell<HashMap<String, Rc<SchemaNode>>>,
    enabled: bool,
}

impl Default for ReferenceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceCache {
    /// Create an empty cache that memoizes resolutions
    pub fn new() -> Self {
        Self::with_caching(true)
    }

    /// Create a resolver; with `enabled == false` every call re-walks the document
    pub fn with_caching(enabled: bool) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            enabled,
        }
    }

    pub fn is_caching(&self) -> bool {
        self.enabled
    }

    /// Resolve `reference` from `from`, using the cache if enabled
    pub fn resolve(&self, from: &Rc<SchemaNode>, reference: &str) -> Result<Rc<SchemaNode>> {
        self.resolve_with(from, reference, self.enabled)
    }

    /// Resolve `reference` from `from`, overriding the cache setting for this call.
    ///
    /// The resolved node is a child of `from`, named after the last path
    /// segment so that its class name matches the reference target.
    pub fn resolve_with(
        &self,
        from: &Rc<SchemaNode>,
        reference: &str,
        use_cache: bool,
    ) -> Result<Rc<SchemaNode>> {
        if use_cache {
            if let Some(node) = self.entries.borrow().get(reference) {
                debug!(reference, "reference cache hit");
                return Ok(Rc::clone(node));
            }
        }

        let target = walk(from.context(), reference)?;
        let name = target_name(reference);
        let node = from.make_child(target.clone(), Some(&*name));

        if use_cache {
            debug!(reference, "reference cache miss");
            self.entries
                .borrow_mut()
                .insert(reference.to_string(), Rc::clone(&node));
        }
        Ok(node)
    }

    /// Number of memoized references
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Walk `context` along a `#/a/b/c` path.
fn walk<'a>(context: &'a Value, reference: &str) -> Result<&'a Value> {
    let mut segments = reference.split('/');
    if segments.next() != Some("#") {
        return Err(GenError::InvalidReference(reference.to_string()));
    }

    let mut current = context;
    for segment in segments {
        let key = unescape(segment);
        let next = match current {
            Value::Object(map) => map.get(&*key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| GenError::UnresolvedReference(reference.to_string()))?;
    }
    Ok(current)
}

/// Unescaped last segment of a reference: the class name of its target
pub(crate) fn target_name(reference: &str) -> Cow<'_, str> {
    unescape(reference.rsplit('/').next().unwrap_or(reference))
}

/// JSON Pointer segment unescaping (`~1` is `/`, `~0` is `~`)
fn unescape(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}
