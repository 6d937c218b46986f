//! Record Rendering
//!
//! Turns a [`RecordSpec`] into source text. The assembler only depends on the
//! [`Renderer`] trait; [`TraitletsRenderer`] is the bundled implementation,
//! emitting Python classes whose fields are traitlets.
//!
//! Key constraint: this module ONLY receives RecordSpec / TypeRepr / Import
//! values - no raw JSON schema access.

use serde_json::Value;

use super::assemble::RecordSpec;
use super::names::Import;
use super::{Primitive, TypeRepr};

// =============================================================================
// Renderer
// =============================================================================

/// Renders records, imports and the package manifest as text
pub trait Renderer {
    /// Artifact file extension, without the dot
    fn extension(&self) -> &str;

    /// Artifact name of the package manifest
    fn manifest_name(&self) -> &str;

    fn render_import(&self, import: &Import) -> String;

    fn render_type(&self, ty: &TypeRepr) -> String;

    fn render_record(&self, record: &RecordSpec) -> String;

    /// Manifest content: one import per entry, in order
    fn render_manifest(&self, imports: &[Import]) -> String {
        imports
            .iter()
            .map(|import| self.render_import(import))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Traitlets (Python)
// =============================================================================

/// Python + traitlets output, one module per record
#[derive(Debug, Clone, Copy, Default)]
pub struct TraitletsRenderer;

impl Renderer for TraitletsRenderer {
    fn extension(&self) -> &str {
        "py"
    }

    fn manifest_name(&self) -> &str {
        "__init__.py"
    }

    fn render_import(&self, import: &Import) -> String {
        match import {
            Import::Runtime => {
                "import traitlets as T\nfrom . import jstraitlets as jst".to_string()
            }
            Import::Base { classname } => {
                format!("from .{} import {}", classname.to_lowercase(), classname)
            }
            Import::Record { module, classname } => {
                format!("from .{} import {}", module, classname)
            }
        }
    }

    fn render_type(&self, ty: &TypeRepr) -> String {
        match ty {
            TypeRepr::Primitive(p) => format!("{}()", primitive_trait(*p)),
            TypeRepr::Enum(values) => {
                format!("jst.JSONEnum({})", python_literal(&Value::Array(values.clone())))
            }
            TypeRepr::Array(item) => format!("jst.JSONArray({})", self.render_type(item)),
            TypeRepr::Union(members) => {
                let members: Vec<String> = members.iter().map(|m| self.render_type(m)).collect();
                format!("jst.JSONUnion([{}])", members.join(", "))
            }
            TypeRepr::Object(classname) => format!("jst.JSONInstance({})", classname),
        }
    }

    fn render_record(&self, record: &RecordSpec) -> String {
        let mut output = String::new();

        for import in &record.imports {
            output.push_str(&self.render_import(import));
            output.push('\n');
        }
        output.push_str("\n\n");

        output.push_str(&format!("class {}({}):\n", record.classname, record.baseclass));
        if !record.description.is_empty() {
            output.push_str(&format!("    {}\n", python_docstring(&record.description)));
        }
        for field in &record.fields {
            output.push_str(&format!("    {} = {}\n", field.name, self.render_type(&field.ty)));
        }
        if record.description.is_empty() && record.fields.is_empty() {
            output.push_str("    pass\n");
        }

        output
    }
}

fn primitive_trait(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Boolean => "jst.JSONBoolean",
        Primitive::Null => "jst.JSONNull",
        Primitive::Number => "jst.JSONNumber",
        Primitive::Integer => "jst.JSONInteger",
        Primitive::String => "jst.JSONString",
    }
}

/// Python literal for a JSON value.
///
/// JSON string escapes are valid Python escapes, so strings reuse JSON quoting.
fn python_literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), python_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn python_docstring(text: &str) -> String {
    format!("\"\"\"{}\"\"\"", text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::assemble::FieldSpec;
    use serde_json::json;

    #[test]
    fn test_render_types() {
        let r = TraitletsRenderer;
        assert_eq!(r.render_type(&TypeRepr::Primitive(Primitive::String)), "jst.JSONString()");
        assert_eq!(
            r.render_type(&TypeRepr::Array(Box::new(TypeRepr::Primitive(Primitive::Integer)))),
            "jst.JSONArray(jst.JSONInteger())"
        );
        assert_eq!(
            r.render_type(&TypeRepr::Union(vec![
                TypeRepr::Primitive(Primitive::String),
                TypeRepr::Primitive(Primitive::Null),
            ])),
            "jst.JSONUnion([jst.JSONString(), jst.JSONNull()])"
        );
        assert_eq!(r.render_type(&TypeRepr::Object("Foo".to_string())), "jst.JSONInstance(Foo)");
    }

    #[test]
    fn test_python_literals() {
        assert_eq!(
            python_literal(&json!(["a\"b", 1, 2.5, true, false, null, {"k": [1]}])),
            r#"["a\"b", 1, 2.5, True, False, None, {"k": [1]}]"#
        );
    }

    #[test]
    fn test_render_enum() {
        let r = TraitletsRenderer;
        assert_eq!(
            r.render_type(&TypeRepr::Enum(vec![json!("x"), json!(null)])),
            r#"jst.JSONEnum(["x", None])"#
        );
    }

    #[test]
    fn test_render_record() {
        let record = RecordSpec {
            classname: "Axis".to_string(),
            baseclass: "BaseObject".to_string(),
            description: "An axis".to_string(),
            fields: vec![FieldSpec {
                name: "title".to_string(),
                ty: TypeRepr::Primitive(Primitive::String),
            }],
            imports: vec![Import::Runtime, Import::base("BaseObject")],
        };
        let code = TraitletsRenderer.render_record(&record);
        assert_eq!(
            code,
            "import traitlets as T\n\
             from . import jstraitlets as jst\n\
             from .baseobject import BaseObject\n\
             \n\n\
             class Axis(BaseObject):\n    \
             \"\"\"An axis\"\"\"\n    \
             title = jst.JSONString()\n"
        );
    }

    #[test]
    fn test_empty_record_has_body() {
        let record = RecordSpec {
            classname: "Empty".to_string(),
            baseclass: "BaseObject".to_string(),
            description: String::new(),
            fields: Vec::new(),
            imports: Vec::new(),
        };
        assert!(TraitletsRenderer.render_record(&record).ends_with("class Empty(BaseObject):\n    pass\n"));
    }

    #[test]
    fn test_manifest() {
        let manifest = TraitletsRenderer.render_manifest(&[
            Import::Record { module: "rootinstance".into(), classname: "RootInstance".into() },
            Import::Record { module: "foo".into(), classname: "Foo".into() },
        ]);
        assert_eq!(
            manifest,
            "from .rootinstance import RootInstance\nfrom .foo import Foo"
        );
    }
}
