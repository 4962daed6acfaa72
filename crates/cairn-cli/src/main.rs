use anyhow::{bail, Context, Result};
use cairn_check::{Diagnostic, Severity, Validator};
use cairn_codegen::{generate, StubWriter};
use cairn_config::{discover_config_path, CairnConfig};
use cairn_inherit::{
    InheritanceContext, InheritanceContextBuilder, Outputs, RedundancyDetector, RedundancyReport,
    ResolutionWarning,
};
use cairn_types::{OperationDescriptor, TypeDescriptor, TypeStore};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "cairn",
    version,
    about = "Cairn CLI (inheritance resolution, checks, stub generation)"
)]
struct Cli {
    /// Config file (defaults to `CAIRN_CONFIG_PATH`, then `cairn.toml` in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one declared type of a model
    Check(CheckArgs),
    /// Print the inheritance context of a new type
    Resolve(ResolveArgs),
    /// Print a source stub for a new type
    Stubs(StubsArgs),
    /// List redundant capabilities of a new type
    Redundant(ResolveArgs),
    /// Print the JSON schema of `cairn.toml`
    Schema,
}

#[derive(Args)]
struct CheckArgs {
    /// Type model (TOML, or JSON with a `.json` extension)
    model: PathBuf,
    /// Name of the type to check
    #[arg(value_name = "TYPE")]
    ty: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct HierarchyArgs {
    /// Supertype of the new type
    #[arg(long, value_name = "TYPE")]
    extends: Option<String>,
    /// Implemented capabilities, comma separated
    #[arg(long, value_name = "CAPS", value_delimiter = ',')]
    implements: Vec<String>,
}

#[derive(Args)]
struct ResolveArgs {
    /// Type model (TOML, or JSON with a `.json` extension)
    model: PathBuf,
    #[command(flatten)]
    hierarchy: HierarchyArgs,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StubsArgs {
    /// Type model (TOML, or JSON with a `.json` extension)
    model: PathBuf,
    /// Name of the generated type
    name: String,
    #[command(flatten)]
    hierarchy: HierarchyArgs,
    /// Generate a capability instead of a skill
    #[arg(long)]
    capability: bool,
    /// Package line and import filtering for the generated unit
    #[arg(long)]
    package: Option<String>,
    /// Comment placed above the declaration
    #[arg(long)]
    comment: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    cairn_config::init_tracing(&config.logging);

    match cli.command {
        Command::Check(args) => {
            let store = load_model(&args.model)?;
            let Some(subject) = store.get(&args.ty) else {
                bail!("type `{}` is not declared in {}", args.ty, args.model.display());
            };
            let diagnostics = Validator::new(&store)
                .with_options(config.check.options())
                .check(subject)?;
            let report = CheckReport::new(&subject.name, diagnostics);
            print_output(&report, args.json)?;
            Ok(if report.summary.errors > 0 { 1 } else { 0 })
        }
        Command::Resolve(args) => {
            let store = load_model(&args.model)?;
            let mut ctx = InheritanceContext::new(Outputs::all());
            InheritanceContextBuilder::new(&store).populate(
                &mut ctx,
                args.hierarchy.extends.as_deref(),
                &args.hierarchy.implements,
            )?;
            print_output(&ResolveReport::from_context(&ctx), args.json)?;
            Ok(0)
        }
        Command::Stubs(args) => {
            let store = load_model(&args.model)?;
            let decl = args.declaration();
            let writer = StubWriter::new(config.generate.options());
            let generated = generate(&store, &decl, &writer, args.comment.as_deref())?;
            println!("{}", generated.to_source(args.package.as_deref()));
            Ok(0)
        }
        Command::Redundant(args) => {
            let store = load_model(&args.model)?;
            let report = RedundancyDetector::new(&store)
                .find_redundant(args.hierarchy.extends.as_deref(), &args.hierarchy.implements)?;
            print_output(&report, args.json)?;
            Ok(0)
        }
        Command::Schema => {
            print_output(&cairn_config::json_schema(), true)?;
            Ok(0)
        }
    }
}

impl StubsArgs {
    fn declaration(&self) -> TypeDescriptor {
        let mut decl = if self.capability {
            TypeDescriptor::capability(&self.name)
        } else {
            TypeDescriptor::class(&self.name)
        };
        decl.supertype = self.hierarchy.extends.clone();
        decl.capabilities = self.hierarchy.implements.clone();
        decl
    }
}

fn load_config(explicit: Option<&Path>) -> Result<CairnConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config_path(&std::env::current_dir()?),
    };
    let Some(path) = path else {
        return Ok(CairnConfig::default());
    };

    let (config, diagnostics) = CairnConfig::load_from_path_with_diagnostics(&path)?;
    for key in &diagnostics.unknown_keys {
        eprintln!("warning: {}: unknown config key `{key}`", path.display());
    }
    for warning in &diagnostics.warnings {
        eprintln!("warning: {}: {warning}", path.display());
    }
    Ok(config)
}

fn load_model(path: &Path) -> Result<TypeStore> {
    let store = TypeStore::load_from_path(path)
        .with_context(|| format!("failed to load type model {}", path.display()))?;
    tracing::debug!(
        target: "cairn.cli",
        path = %path.display(),
        types = store.len(),
        "loaded type model"
    );
    Ok(store)
}

#[derive(Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
}

#[derive(Serialize)]
struct CheckReport {
    #[serde(rename = "type")]
    ty: String,
    diagnostics: Vec<Diagnostic>,
    summary: Summary,
}

impl CheckReport {
    fn new(ty: &str, diagnostics: Vec<Diagnostic>) -> Self {
        let count = |severity: Severity| {
            diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        let summary = Summary {
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
        };
        Self {
            ty: ty.to_owned(),
            diagnostics,
            summary,
        }
    }
}

#[derive(Serialize)]
struct OperationEntry {
    prototype: String,
    declaring_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_type: Option<String>,
}

#[derive(Serialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    type_id: String,
    declaring_type: String,
}

#[derive(Serialize)]
struct DuplicateEntry {
    declaring_type: String,
    signature: String,
}

#[derive(Serialize)]
struct ResolveReport {
    final_operations: Vec<OperationEntry>,
    overridable_operations: Vec<OperationEntry>,
    operations_to_implement: Vec<OperationEntry>,
    inherited_fields: Vec<FieldEntry>,
    constructors: Vec<String>,
    duplicate_operations: Vec<DuplicateEntry>,
    duplicate_constructors: Vec<DuplicateEntry>,
    warnings: Vec<ResolutionWarning>,
}

impl ResolveReport {
    fn from_context(ctx: &InheritanceContext) -> Self {
        fn entries<K: ToString>(map: &BTreeMap<K, OperationDescriptor>) -> Vec<OperationEntry> {
            map.iter()
                .map(|(prototype, op)| OperationEntry {
                    prototype: prototype.to_string(),
                    declaring_type: op.declaring_type.clone(),
                    return_type: op.return_type.clone(),
                })
                .collect()
        }

        Self {
            final_operations: entries(ctx.final_operations()),
            overridable_operations: entries(ctx.overridable_operations()),
            operations_to_implement: entries(ctx.operations_to_implement()),
            inherited_fields: ctx
                .inherited_fields()
                .values()
                .map(|field| FieldEntry {
                    name: field.name.clone(),
                    type_id: field.type_id.clone(),
                    declaring_type: field.declaring_type.clone(),
                })
                .collect(),
            constructors: ctx
                .constructors()
                .keys()
                .map(|types| format!("new{types}"))
                .collect(),
            duplicate_operations: ctx
                .duplicate_operations()
                .iter()
                .map(|dup| DuplicateEntry {
                    declaring_type: dup.declaring_type.clone(),
                    signature: dup.prototype.to_string(),
                })
                .collect(),
            duplicate_constructors: ctx
                .duplicate_constructors()
                .iter()
                .map(|dup| DuplicateEntry {
                    declaring_type: dup.declaring_type.clone(),
                    signature: format!("new{}", dup.parameter_types),
                })
                .collect(),
            warnings: ctx.warnings().to_vec(),
        }
    }
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }

    // Human output for key types. Everything else falls back to pretty JSON.
    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<CheckReport>() {
        for d in &report.diagnostics {
            let severity = match d.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "info",
            };
            println!("{}: {severity}[{}] {}", report.ty, d.code, d.message);
        }
        println!(
            "summary: {} errors, {} warnings",
            report.summary.errors, report.summary.warnings
        );
    } else if let Some(report) = any.downcast_ref::<ResolveReport>() {
        let sections = [
            ("final", &report.final_operations),
            ("overridable", &report.overridable_operations),
            ("to implement", &report.operations_to_implement),
        ];
        for (label, entries) in sections {
            for entry in entries {
                println!("{label}: {} ({})", entry.prototype, entry.declaring_type);
            }
        }
        for field in &report.inherited_fields {
            println!(
                "field: {} : {} ({})",
                field.name, field.type_id, field.declaring_type
            );
        }
        for ctor in &report.constructors {
            println!("constructor: {ctor}");
        }
        let duplicates = report
            .duplicate_operations
            .iter()
            .chain(&report.duplicate_constructors);
        for dup in duplicates {
            println!("duplicate: {} ({})", dup.signature, dup.declaring_type);
        }
        print_warnings(&report.warnings)?;
    } else if let Some(report) = any.downcast_ref::<RedundancyReport>() {
        for entry in &report.redundant {
            println!(
                "redundant: {} (provided by {}, {})",
                entry.capability, entry.subsumed_by, entry.mode
            );
        }
        print_warnings(&report.warnings)?;
    } else {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    }
    Ok(())
}

fn print_warnings(warnings: &[ResolutionWarning]) -> Result<()> {
    for warning in warnings {
        let line = match warning {
            ResolutionWarning::UnresolvedType {
                name,
                referenced_from: Some(from),
            } => format!("unresolved type {name} (referenced from {from})"),
            ResolutionWarning::UnresolvedType { name, .. } => format!("unresolved type {name}"),
            other => serde_json::to_string(other)?,
        };
        println!("warning: {line}");
    }
    Ok(())
}
