use std::collections::BTreeSet;
use std::fmt::Write as _;

use cairn_inherit::{InheritanceContext, InheritanceContextBuilder, Outputs, ResolutionAborted};
use cairn_signature::{ActionParameterTypes, ActionPrototype};
use cairn_types::{OperationDescriptor, TypeDescriptor, TypeOracle};
use serde::Serialize;

use crate::names::{default_value, ImportSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StubOptions {
    /// One indentation level.
    pub indent: String,
    /// Comment placed at the top of every generated action body.
    pub action_comment: Option<String>,
    pub create_constructors: bool,
    pub create_actions: bool,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            action_comment: Some("Auto-generated action.".to_string()),
            create_constructors: true,
            create_actions: true,
        }
    }
}

/// Rendered declaration plus the qualified names it refers to by simple name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedType {
    pub text: String,
    pub imports: BTreeSet<String>,
}

impl GeneratedType {
    /// Full compilation unit: package line, sorted imports, then the declaration.
    pub fn to_source(&self, package: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(package) = package {
            let _ = writeln!(out, "package {package}");
            out.push('\n');
        }
        for import in &self.imports {
            if package.is_some_and(|p| import.rsplit_once('.').is_some_and(|(pkg, _)| pkg == p)) {
                continue;
            }
            let _ = writeln!(out, "import {import}");
        }
        out.push_str(&self.text);
        out
    }
}

pub struct StubWriter {
    options: StubOptions,
}

impl StubWriter {
    pub fn new(options: StubOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StubOptions {
        &self.options
    }

    /// Render `decl` with the members required by `ctx`.
    ///
    /// Only the name, kind, supertype and capabilities of `decl` are used. Members
    /// follow the ordering of their map keys: constructors by parameter types, then
    /// actions by prototype. A capability is rendered as its header only.
    pub fn write(
        &self,
        decl: &TypeDescriptor,
        ctx: &InheritanceContext,
        comment: Option<&str>,
    ) -> GeneratedType {
        let mut imports = ImportSet::new();
        let mut out = String::new();

        if let Some(comment) = comment {
            for line in comment.lines() {
                let _ = writeln!(out, "// {line}");
            }
        }
        self.write_header(&mut out, &mut imports, decl);

        // Capabilities inherit abstract actions as they are.
        if !decl.is_capability() {
            if self.options.create_constructors {
                for types in ctx.constructors().keys() {
                    out.push('\n');
                    self.write_constructor(&mut out, &mut imports, types);
                }
            }
            if self.options.create_actions {
                for (prototype, op) in ctx.operations_to_implement() {
                    out.push('\n');
                    self.write_action(&mut out, &mut imports, prototype, op);
                }
            }
        }
        out.push('}');

        GeneratedType {
            text: out,
            imports: imports.into_set(),
        }
    }

    fn write_header(&self, out: &mut String, imports: &mut ImportSet, decl: &TypeDescriptor) {
        let keyword = if decl.is_capability() {
            "capacity"
        } else {
            "skill"
        };
        let extended: Vec<String> = if decl.is_capability() {
            decl.capabilities.clone()
        } else {
            decl.supertype.iter().cloned().collect()
        };

        let _ = write!(out, "{keyword} {}", decl.name);
        if !extended.is_empty() {
            let names: Vec<String> = extended.iter().map(|n| imports.simple_name(n)).collect();
            let _ = write!(out, " extends {}", names.join(", "));
        }
        if !decl.is_capability() && !decl.capabilities.is_empty() {
            let names: Vec<String> = decl
                .capabilities
                .iter()
                .map(|n| imports.simple_name(n))
                .collect();
            let _ = write!(out, " implements {}", names.join(", "));
        }
        out.push_str(" {\n");
    }

    fn write_constructor(
        &self,
        out: &mut String,
        imports: &mut ImportSet,
        types: &ActionParameterTypes,
    ) {
        let indent = &self.options.indent;
        let params = parameter_list(imports, types);
        let args: Vec<String> = (0..types.len()).map(|idx| format!("arg{idx}")).collect();
        let _ = writeln!(out, "{indent}new{params} {{");
        let _ = writeln!(out, "{indent}{indent}super({})", args.join(", "));
        let _ = writeln!(out, "{indent}}}");
    }

    fn write_action(
        &self,
        out: &mut String,
        imports: &mut ImportSet,
        prototype: &ActionPrototype,
        op: &OperationDescriptor,
    ) {
        let indent = &self.options.indent;
        let _ = write!(out, "{indent}def {}", prototype.name());
        if !prototype.signature().is_empty() {
            out.push_str(&parameter_list(imports, prototype.signature()));
        }
        let return_type = op.return_type.as_deref().filter(|ty| *ty != "void");
        if let Some(ty) = return_type {
            let _ = write!(out, " : {}", imports.simple_name(ty));
        }
        out.push_str(" {\n");
        if let Some(comment) = &self.options.action_comment {
            for line in comment.lines() {
                let _ = writeln!(out, "{indent}{indent}// {line}");
            }
        }
        if let Some(value) = default_value(return_type) {
            let _ = writeln!(out, "{indent}{indent}{value}");
        }
        let _ = writeln!(out, "{indent}}}");
    }
}

impl Default for StubWriter {
    fn default() -> Self {
        Self::new(StubOptions::default())
    }
}

/// `(arg0 : int, arg1 : Object*)`
fn parameter_list(imports: &mut ImportSet, types: &ActionParameterTypes) -> String {
    let last = types.len().saturating_sub(1);
    let params: Vec<String> = types
        .types()
        .iter()
        .enumerate()
        .map(|(idx, ty)| {
            let star = if types.is_variadic() && idx == last {
                "*"
            } else {
                ""
            };
            format!("arg{idx} : {}{star}", imports.simple_name(ty))
        })
        .collect();
    format!("({})", params.join(", "))
}

/// Resolve the hierarchy of `decl` and render its stub.
///
/// Only the outputs the stub needs are kept.
pub fn generate<O: TypeOracle + ?Sized>(
    oracle: &O,
    decl: &TypeDescriptor,
    writer: &StubWriter,
    comment: Option<&str>,
) -> Result<GeneratedType, ResolutionAborted> {
    let outputs = Outputs::all()
        .discard_final_operations()
        .discard_overridable_operations()
        .discard_inherited_fields();
    let mut ctx = InheritanceContext::new(outputs);
    InheritanceContextBuilder::new(oracle).populate(
        &mut ctx,
        decl.supertype.as_deref(),
        &decl.capabilities,
    )?;

    let generated = writer.write(decl, &ctx, comment);
    tracing::debug!(
        target: "cairn.codegen",
        ty = %decl.name,
        constructors = ctx.constructors().len(),
        actions = ctx.operations_to_implement().len(),
        imports = generated.imports.len(),
        "generated stub"
    );
    Ok(generated)
}
