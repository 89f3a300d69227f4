use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use blueprint_schema_core::{
    Blueprint, ExternalInputs, FieldDecl, ModuleDecl, SchemaNode, compile_fields, resolve,
    validate,
};
use blueprint_schema_loader::{BlueprintCatalog, bundle_hash};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for reports and resolved trees.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "blueprint-check")]
#[command(about = "Blueprint schema validation, resolution, and bundling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a blueprint's modules against external input values.
    Validate(ValidateArgs),
    /// Resolve a single input schema against a values file.
    Resolve(ResolveArgs),
    /// Print the instantiation order of a blueprint's modules.
    Order(OrderArgs),
    /// Bundle module declaration files into a single blueprint file.
    Bundle(BundleArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Module declaration files, directories, and/or bundle files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// JSON or YAML file of external input values, keyed module.field
    /// (dotted) or nested per module.
    #[arg(long)]
    values: Option<PathBuf>,
    /// Output format for the validation report.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// JSON or YAML file containing an ordered list of field declarations.
    #[arg(long)]
    schema: PathBuf,
    /// JSON or YAML file of raw input values.
    #[arg(long)]
    values: Option<PathBuf>,
    /// Output format for the resolved tree.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Module declaration files, directories, and/or bundle files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Module declaration files and/or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output blueprint path (.json, .yaml, or .yml).
    #[arg(long)]
    output: PathBuf,
    /// Optional blueprint name metadata.
    #[arg(long)]
    name: Option<String>,
    /// Optional blueprint description metadata.
    #[arg(long)]
    description: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Order(args) => run_order(args),
        Command::Bundle(args) => run_bundle(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.inputs)?;
    let graph = catalog.compile().map_err(|e| e.to_string())?;

    let inputs = match &args.values {
        Some(path) => ExternalInputs::from_json(&read_value_file(path)?),
        None => ExternalInputs::new(),
    };

    let report = validate(&graph, &inputs);
    println!("{}", render(&report, args.format)?);

    if report.is_success() {
        Ok(())
    } else {
        Err(format!(
            "validation failed with {} error(s)",
            report.errors.len()
        ))
    }
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let raw = read_value_file(&args.schema)?;
    let fields: Vec<FieldDecl> =
        serde_json::from_value(raw).map_err(|e| format!("invalid schema declaration: {e}"))?;
    let schema = SchemaNode::object(compile_fields(&fields).map_err(|e| e.to_string())?);

    let values = match &args.values {
        Some(path) => Some(read_value_file(path)?),
        None => None,
    };

    match resolve(&schema, values.as_ref()) {
        Ok(resolved) => {
            println!("{}", render(&resolved, args.format)?);
            Ok(())
        }
        Err(errors) => {
            println!("{}", render(&errors, args.format)?);
            Err(format!("resolution failed with {} error(s)", errors.len()))
        }
    }
}

fn run_order(args: OrderArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.inputs)?;
    let graph = catalog.compile().map_err(|e| e.to_string())?;
    let order = graph.resolve_order().map_err(|e| e.to_string())?;
    for name in order {
        println!("{name}");
    }
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.inputs)?;
    if catalog.is_empty() {
        return Err("no module declarations found in the given inputs".to_string());
    }
    // Reject malformed declarations before writing the bundle.
    catalog.compile().map_err(|e| e.to_string())?;

    let mut blueprint = Blueprint::new(PACKAGE_VERSION, chrono::Utc::now().to_rfc3339());
    blueprint.name = args.name;
    blueprint.description = args.description;
    blueprint.modules = catalog.modules().to_vec();
    blueprint.bundle_hash = Some(bundle_hash(&blueprint.modules).map_err(|e| e.to_string())?);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    let raw = if is_yaml(&args.output) {
        serde_yaml::to_string(&blueprint).map_err(|e| e.to_string())?
    } else {
        serde_json::to_string_pretty(&blueprint).map_err(|e| e.to_string())?
    };
    fs::write(&args.output, raw)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} module(s) into {}.",
        blueprint.module_count(),
        args.output.display()
    );
    Ok(())
}

/// Merges declaration files, directories, and bundles into one catalog.
fn load_catalog(inputs: &[PathBuf]) -> Result<BlueprintCatalog, String> {
    let mut catalog = BlueprintCatalog::new();
    for path in inputs {
        if path.is_dir() {
            let loaded = BlueprintCatalog::from_dir(path).map_err(|e| e.to_string())?;
            for decl in loaded.modules() {
                catalog.insert(decl.clone());
            }
        } else {
            for decl in read_decl_file(path)? {
                catalog.insert(decl);
            }
        }
    }
    Ok(catalog)
}

/// Reads a declaration file: either a blueprint bundle or one module.
fn read_decl_file(path: &Path) -> Result<Vec<ModuleDecl>, String> {
    let value = read_value_file(path)?;
    // Bundles carry a `version` field; bare module declarations do not.
    if value.get("version").is_some() {
        let blueprint: Blueprint = serde_json::from_value(value)
            .map_err(|e| format!("invalid blueprint bundle '{}': {e}", path.display()))?;
        Ok(blueprint.modules)
    } else {
        let decl: ModuleDecl = serde_json::from_value(value)
            .map_err(|e| format!("invalid module declaration '{}': {e}", path.display()))?;
        Ok(vec![decl])
    }
}

/// Reads a JSON or YAML file into a JSON value tree.
fn read_value_file(path: &Path) -> Result<serde_json::Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&raw).map_err(|e| format!("invalid YAML '{}': {e}", path.display()))
    } else {
        serde_json::from_str(&raw).map_err(|e| format!("invalid JSON '{}': {e}", path.display()))
    }
}

fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}
