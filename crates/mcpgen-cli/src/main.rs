use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use mcpgen_core::config::{self, CONFIG_FILE_NAME, McpgenConfig};
use mcpgen_core::ir::Ir;
use mcpgen_core::parse::{self, Dialect, Document};
use mcpgen_core::transform::{self, TransformOptions, Transformed};

#[derive(Parser)]
#[command(name = "mcpgen", about = "OpenAPI 2.x/3.x to IR transformer", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform an OpenAPI document and write the IR as JSON
    Parse {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long = "in", alias = "input")]
        input: Option<PathBuf>,

        /// Where to write the IR (stdout when omitted)
        #[arg(short, long = "out", alias = "output")]
        output: Option<PathBuf>,

        /// Report integrity findings as warnings instead of failing
        #[arg(long)]
        lenient: bool,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,

        /// Leave out the meta block
        #[arg(long)]
        no_meta: bool,
    },

    /// Validate an OpenAPI document by transforming it
    Validate {
        /// Path to the OpenAPI document
        #[arg(short, long = "in", alias = "input")]
        input: PathBuf,

        /// Report integrity findings without failing
        #[arg(long)]
        lenient: bool,
    },

    /// Print a compact summary of the IR
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long = "in", alias = "input")]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new mcpgen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            lenient,
            compact,
            no_meta,
        } => {
            let mut cfg = try_load_config()?.unwrap_or_default();
            if let Some(input) = input {
                cfg.input = input.display().to_string();
            }
            if let Some(output) = output {
                cfg.output = Some(output.display().to_string());
            }
            cfg.strict &= !lenient;
            cfg.output_options.pretty &= !compact;
            cfg.output_options.meta &= !no_meta;
            cmd_parse(&cfg)
        }

        Commands::Validate { input, lenient } => {
            let cfg = try_load_config()?.unwrap_or_default();
            cmd_validate(&input, cfg.strict && !lenient)
        }

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "mcpgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<McpgenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Read and parse a document, choosing the format by extension.
fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let doc = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(doc)
}

fn load_ir(path: &Path, options: &TransformOptions) -> Result<Transformed> {
    let doc = load_document(path)?;
    let out = transform::transform_with_options(&doc, options)
        .with_context(|| format!("failed to transform {}", path.display()))?;
    for warning in &out.warnings {
        eprintln!("  warning: {warning}");
    }
    Ok(out)
}

fn cmd_parse(cfg: &McpgenConfig) -> Result<()> {
    let input = PathBuf::from(&cfg.input);
    let options = TransformOptions {
        meta: cfg.output_options.meta,
        source: Some(cfg.input.clone()),
        strict: cfg.strict,
    };
    let out = load_ir(&input, &options)?;
    for finding in &out.findings {
        eprintln!("  warning: {finding}");
    }

    let mut json = if cfg.output_options.pretty {
        serde_json::to_string_pretty(&out.ir)?
    } else {
        serde_json::to_string(&out.ir)?
    };
    json.push('\n');

    match &cfg.output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "Wrote IR for {} ({} types, {} operations) to {}",
                out.ir.service.title,
                out.ir.types.len(),
                out.ir.operations.len(),
                path.display()
            );
        }
        None => print!("{json}"),
    }
    Ok(())
}

fn cmd_validate(input: &Path, strict: bool) -> Result<()> {
    let doc = load_document(input)?;
    let version = match doc.dialect() {
        Dialect::V2 => "2.x",
        Dialect::V3 => "3.x",
    };
    eprintln!("Valid OpenAPI {version} document: {}", doc.info().title);
    eprintln!("  Version: {}", doc.info().version);
    eprintln!("  Paths: {}", doc.paths().map_or(0, |p| p.len()));
    eprintln!("  Schemas: {}", doc.schemas().map_or(0, |s| s.len()));

    let options = TransformOptions {
        meta: false,
        ..TransformOptions::default()
    };
    let out = transform::transform_with_options(&doc, &options)
        .with_context(|| format!("failed to transform {}", input.display()))?;
    for warning in &out.warnings {
        eprintln!("  warning: {warning}");
    }
    eprintln!("  Operations: {}", out.ir.operations.len());
    eprintln!("  IR Types: {}", out.ir.types.len());
    eprintln!("  Security schemes: {}", out.ir.security_schemes.len());

    for finding in &out.findings {
        eprintln!("  finding: {finding}");
    }
    if strict && !out.findings.is_empty() {
        anyhow::bail!("{} integrity finding(s)", out.findings.len());
    }

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let options = TransformOptions {
        meta: false,
        ..TransformOptions::default()
    };
    let out = load_ir(input, &options)?;

    let summary = build_inspect_summary(&out.ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(ir: &Ir) -> serde_json::Value {
    let types: Vec<serde_json::Value> = ir
        .types
        .iter()
        .map(|t| {
            serde_json::json!({
                "name": t.name,
                "kind": t.kind.as_str(),
            })
        })
        .collect();

    let operations: Vec<serde_json::Value> = ir
        .operations
        .iter()
        .map(|op| {
            serde_json::json!({
                "name": op.name,
                "method": op.method.as_str(),
                "path": op.path_template,
                "safe": op.semantics.safe,
                "paginated": op.semantics.paginated.as_ref().map(|p| p.mode),
                "tags": op.tags,
            })
        })
        .collect();

    serde_json::json!({
        "service": {
            "id": ir.service.id,
            "title": ir.service.title,
            "version": ir.service.version,
        },
        "servers": ir.service.base_urls,
        "types": types,
        "operations": operations,
        "securitySchemes": ir.security_schemes.iter().map(|s| &s.name).collect::<Vec<_>>(),
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
