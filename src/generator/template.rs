//! Small source model for generated classes
//!
//! A [`ClassModel`] describes one class: package, imports, fields,
//! constructors and methods with their bodies as lines of text. [`render`]
//! turns it into source text. Rendering is a pure function of the model:
//! imports are sorted and de-duplicated, indentation is four spaces, and the
//! output ends with exactly one newline.

use std::collections::BTreeSet;
use std::fmt::Write;

const INDENT: &str = "    ";

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: &str, name: &str) -> Self {
        Self {
            ty: ty.to_string(),
            name: name.to_string(),
        }
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldModel {
    pub modifiers: Vec<String>,
    pub ty: String,
    pub name: String,
    pub initializer: Option<String>,
}

/// A method or constructor. Constructors have no return type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodModel {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    pub return_type: Option<String>,
    pub name: String,
    pub params: Vec<Param>,
    pub throws: Vec<String>,
    pub body: Vec<String>,
}

impl MethodModel {
    /// A method named `name` returning `return_type`.
    pub fn method(modifiers: &[&str], return_type: &str, name: &str) -> Self {
        Self {
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            return_type: Some(return_type.to_string()),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// A constructor of class `name`.
    pub fn constructor(modifiers: &[&str], name: &str) -> Self {
        Self {
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn annotated(mut self, annotation: &str) -> Self {
        self.annotations.push(annotation.to_string());
        self
    }

    pub fn param(mut self, ty: &str, name: &str) -> Self {
        self.params.push(Param::new(ty, name));
        self
    }

    pub fn throws(mut self, exception: &str) -> Self {
        self.throws.push(exception.to_string());
        self
    }

    pub fn line(mut self, statement: impl Into<String>) -> Self {
        self.body.push(statement.into());
        self
    }
}

/// One top-level class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassModel {
    pub header: Vec<String>,
    pub package: String,
    pub imports: Vec<String>,
    pub doc: Vec<String>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub superclass: Option<String>,
    pub fields: Vec<FieldModel>,
    pub constructors: Vec<MethodModel>,
    pub methods: Vec<MethodModel>,
}

/// Render a class to source text.
pub fn render(class: &ClassModel) -> String {
    let mut out = String::new();

    for line in &class.header {
        push_line(&mut out, 0, &format!("// {}", line));
    }
    if !class.package.is_empty() {
        push_line(&mut out, 0, &format!("package {};", class.package));
        out.push('\n');
    }

    let imports: BTreeSet<&str> = class.imports.iter().map(String::as_str).collect();
    if !imports.is_empty() {
        for import in &imports {
            push_line(&mut out, 0, &format!("import {};", import));
        }
        out.push('\n');
    }

    if !class.doc.is_empty() {
        push_line(&mut out, 0, "/**");
        for line in &class.doc {
            push_line(&mut out, 0, &format!(" * {}", line).trim_end().to_string());
        }
        push_line(&mut out, 0, " */");
    }

    let mut declaration = join_words(&class.modifiers);
    declaration.push_str("class ");
    declaration.push_str(&class.name);
    if let Some(superclass) = &class.superclass {
        declaration.push_str(" extends ");
        declaration.push_str(superclass);
    }
    declaration.push_str(" {");
    push_line(&mut out, 0, &declaration);

    let mut sections: Vec<String> = Vec::new();
    if !class.fields.is_empty() {
        let mut fields = String::new();
        for field in &class.fields {
            let mut declaration =
                format!("{}{} {}", join_words(&field.modifiers), field.ty, field.name);
            if let Some(initializer) = &field.initializer {
                declaration.push_str(" = ");
                declaration.push_str(initializer);
            }
            declaration.push(';');
            push_line(&mut fields, 1, &declaration);
        }
        sections.push(fields);
    }
    for member in class.constructors.iter().chain(&class.methods) {
        sections.push(render_method(member));
    }
    out.push_str(&sections.join("\n"));

    push_line(&mut out, 0, "}");
    out
}

fn render_method(method: &MethodModel) -> String {
    let mut out = String::new();
    for annotation in &method.annotations {
        push_line(&mut out, 1, &format!("@{}", annotation));
    }

    let mut signature = join_words(&method.modifiers);
    if let Some(return_type) = &method.return_type {
        signature.push_str(return_type);
        signature.push(' ');
    }
    signature.push_str(&method.name);
    signature.push('(');
    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("final {} {}", p.ty, p.name))
        .collect();
    signature.push_str(&params.join(", "));
    signature.push(')');
    if !method.throws.is_empty() {
        signature.push_str(" throws ");
        signature.push_str(&method.throws.join(", "));
    }
    signature.push_str(" {");
    push_line(&mut out, 1, &signature);

    for statement in &method.body {
        push_line(&mut out, 2, statement);
    }
    push_line(&mut out, 1, "}");
    out
}

fn join_words(words: &[String]) -> String {
    let mut out = String::new();
    for word in words {
        let _ = write!(out, "{} ", word);
    }
    out
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

/// Quote `value` as a Java string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
