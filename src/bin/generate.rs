//! Schema Records CLI
//!
//! Generates record packages from JSON Schema documents and inspects how a
//! document's definitions would be mapped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use schema_records::{
    root_node, ArtifactAssembler, GeneratorConfig, NodeKind, ReferenceCache, TypeMapper,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "schema-records")]
#[command(about = "Generate validated record classes from JSON Schema")]
struct Cli {
    /// Config file (layered over schema-records.toml and RECORDS__* variables)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a record package from a schema file, or one per file in a directory
    Generate {
        /// Schema file or directory of *.json schemas
        input: PathBuf,

        /// Output directory (overrides export.out_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Re-resolve every $ref instead of memoizing
        #[arg(long)]
        no_cache: bool,

        /// List the artifacts without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show how each definition and root property is classified and mapped
    Inspect {
        /// Schema file
        input: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = GeneratorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Generate { input, out, no_cache, dry_run } => {
            if let Some(out) = out {
                config.export.out_dir = out;
            }
            if no_cache {
                config.generator.cache_references = false;
            }

            let out_dir = config.out_dir();
            if input.is_dir() {
                let schemas = collect_schemas(&input)?;
                if schemas.is_empty() {
                    bail!("no *.json schemas found in {}", input.display());
                }
                println!("🔍 Found {} schemas in {}", schemas.len(), input.display());
                for schema in schemas {
                    let target = out_dir.join(package_name(&schema));
                    generate_one(&schema, &target, &config, dry_run)?;
                }
            } else {
                generate_one(&input, &out_dir, &config, dry_run)?;
            }
        }

        Commands::Inspect { input } => {
            inspect(&input, &config)?;
        }
    }

    Ok(())
}

fn load_document(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON in {}", path.display()))
}

fn generate_one(input: &Path, out_dir: &Path, config: &GeneratorConfig, dry_run: bool) -> Result<()> {
    let document = load_document(input)?;
    let spec = schema_records::generate_with(document, &config.generator)
        .with_context(|| format!("failed to generate records for {}", input.display()))?;

    if dry_run {
        println!("📦 {} → {} ({} artifacts)", input.display(), out_dir.display(), spec.len());
        for name in spec.names() {
            println!("  {}", name);
        }
        return Ok(());
    }

    if config.export.clean && out_dir.exists() {
        info!(dir = %out_dir.display(), "removing previous output");
        fs::remove_dir_all(out_dir)
            .with_context(|| format!("failed to clean {}", out_dir.display()))?;
    }

    let written = spec
        .write_to(out_dir, config.export.include_checksums)
        .with_context(|| format!("failed to write {}", out_dir.display()))?;
    println!("✅ {} → {} ({} files)", input.display(), out_dir.display(), written.len());
    Ok(())
}

fn inspect(input: &Path, config: &GeneratorConfig) -> Result<()> {
    let root = root_node(load_document(input)?, &config.generator);
    let refs = ReferenceCache::with_caching(config.generator.cache_references);
    let mapper = TypeMapper::new(&refs);
    let assembler = ArtifactAssembler::new();

    println!("Definitions:");
    for (key, node) in root.wrapped_definitions()? {
        let mapped = match node.kind() {
            NodeKind::Object => {
                let record = assembler.record_spec(&node, &refs)?;
                format!("record {} ({} fields)", record.classname, record.fields.len())
            }
            NodeKind::Reference | NodeKind::Trait => mapper.type_representation(&node)?.to_string(),
        };
        println!("  {:<28} {:<10} {}", key, node.kind(), mapped);
    }

    println!("Properties of {}:", root.classname()?);
    for (name, prop) in root.wrapped_properties()? {
        println!("  {:<28} {}", name, mapper.type_representation(&prop)?);
    }

    println!("{} references resolved", refs.len());
    Ok(())
}

/// Every *.json file under `dir`, sorted by path
fn collect_schemas(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut schemas = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
            schemas.push(path.to_path_buf());
        }
    }
    Ok(schemas)
}

/// Output package name for a schema file: `Vega.schema.json` → `vega`
fn package_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema")
        .trim_end_matches(".schema")
        .to_lowercase()
}
