//! Runtime Support Files
//!
//! Fixed content copied verbatim into every generated output set: the runtime
//! type-constraint definitions and the base record class. Generation never
//! inspects or rewrites these.

/// A support file shipped with generated records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportFile {
    /// Artifact name, e.g. `baseobject.py`
    pub name: &'static str,
    pub contents: &'static str,
}

/// Supplies the fixed files every generated package depends on
pub trait RuntimeSupport {
    /// Class every generated record derives from
    fn base_class(&self) -> &str;

    /// Runtime constraint definitions, then the base record class
    fn files(&self) -> [SupportFile; 2];
}

/// Support files for the traitlets-based Python renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct TraitletsSupport;

impl TraitletsSupport {
    pub const BASE_CLASS: &'static str = "BaseObject";

    pub const RUNTIME: SupportFile = SupportFile {
        name: "jstraitlets.py",
        contents: include_str!("../../support/jstraitlets.py"),
    };

    pub const BASE_RECORD: SupportFile = SupportFile {
        name: "baseobject.py",
        contents: include_str!("../../support/baseobject.py"),
    };
}

impl RuntimeSupport for TraitletsSupport {
    fn base_class(&self) -> &str {
        Self::BASE_CLASS
    }

    fn files(&self) -> [SupportFile; 2] {
        [Self::RUNTIME, Self::BASE_RECORD]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_files_are_embedded() {
        let [runtime, base] = TraitletsSupport.files();
        assert_eq!(runtime.name, "jstraitlets.py");
        assert!(runtime.contents.contains("class JSONUnion"));
        assert_eq!(base.name, "baseobject.py");
        assert!(base.contents.contains("class BaseObject"));
    }
}
