use crate::config::{
    load_options_file, resolve_config_path, BaseUrl, Environment, GeneratorOptions,
    DEFAULT_ENTITY_PATH_INDEX,
};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::generator::{format_output, generate_mocks, GenerationReport};
use crate::scenario::{load_scenarios, select_response, ResponseCandidate, Selection, SCENARIO_HEADER};
use crate::spec::{document_title, group_by_entity, load_operations, FilterOptions};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use http::{HeaderMap, HeaderValue};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Command-line interface for oas-mockgen
#[derive(Parser, Debug)]
#[command(name = "oas-mockgen")]
#[command(about = "Generate MSW mock handlers and TypeScript types from OpenAPI v3", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate handlers, types and server entry points
    Generate(GenerateArgs),
    /// List the operations of a document grouped by entity
    Inspect(InspectArgs),
    /// Show which response a scenario selects for one endpoint
    Select(SelectArgs),
}

/// Flags of `generate`. Anything left unset falls back to the config file,
/// then to the built-in defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI document (YAML or JSON)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for the generated mocks
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to `oas-mockgen.toml`; auto-detected when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma-separated document paths to keep, e.g. `/users,/users/{id}`
    #[arg(long)]
    pub includes: Option<String>,

    /// Comma-separated document paths to drop, applied after `--includes`
    #[arg(long)]
    pub excludes: Option<String>,

    /// Comma-separated status codes to keep
    #[arg(long)]
    pub codes: Option<String>,

    /// Literal prefix for every handler route
    #[arg(long, conflicts_with = "use_server_url")]
    pub base_url: Option<String>,

    /// Prefix handler routes with the document's first server URL
    #[arg(long, default_value_t = false)]
    pub use_server_url: bool,

    /// Emit literal JSON bodies instead of faker calls
    #[arg(long = "static", default_value_t = false)]
    pub static_data: bool,

    /// Upper bound for generated arrays
    #[arg(long)]
    pub max_array_length: Option<usize>,

    /// Path segment used to group operations into entities
    #[arg(long)]
    pub entity_index: Option<usize>,

    /// Target runtime; decides which server entry points are written
    #[arg(long, value_enum)]
    pub environment: Option<Environment>,

    /// Module the generated handlers import `controllers` from
    #[arg(long)]
    pub controller_path: Option<String>,

    /// Response identifiers or operation ids served by user controllers
    #[arg(long, value_delimiter = ',')]
    pub controllers: Vec<String>,

    /// Leave existing generated files untouched
    #[arg(long, default_value_t = false)]
    pub skip_existing: bool,

    /// Run prettier over the output afterwards
    #[arg(long, default_value_t = false)]
    pub format: bool,
}

impl GenerateArgs {
    /// Layer the command-line flags over options loaded from a file
    pub fn apply(&self, mut options: GeneratorOptions) -> GeneratorOptions {
        if let Some(input) = &self.input {
            options.input = Some(input.clone());
        }
        if let Some(output) = &self.output {
            options.output_dir = output.clone();
        }
        if self.includes.is_some() {
            options.includes = self.includes.clone();
        }
        if self.excludes.is_some() {
            options.excludes = self.excludes.clone();
        }
        if self.codes.is_some() {
            options.codes = self.codes.clone();
        }
        if let Some(url) = &self.base_url {
            options.base_url = Some(BaseUrl::Literal(url.clone()));
        } else if self.use_server_url {
            options.base_url = Some(BaseUrl::UseServer(true));
        }
        options.static_data |= self.static_data;
        if let Some(max) = self.max_array_length {
            options.max_array_length = max;
        }
        if let Some(index) = self.entity_index {
            options.entity_path_index = index;
        }
        if self.environment.is_some() {
            options.environment = self.environment;
        }
        if let Some(path) = &self.controller_path {
            options.controller_path = path.clone();
        }
        if !self.controllers.is_empty() {
            options.controllers = self.controllers.clone();
        }
        options.skip_existing |= self.skip_existing;
        options
    }

    /// Config file options (if any) with the flags applied on top
    ///
    /// # Errors
    ///
    /// Fails when a config file exists but does not parse.
    pub fn resolve_options(&self) -> anyhow::Result<GeneratorOptions> {
        let config_path = resolve_config_path(self.config.as_deref(), self.input.as_deref());
        if self.config.is_some() && config_path.as_deref() != self.config.as_deref() {
            warn!(path = ?self.config, "config file not found, using defaults");
        }
        let from_file = match config_path {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                load_options_file(&path)?
            }
            None => None,
        };
        Ok(self.apply(from_file.unwrap_or_default()))
    }
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Path to the OpenAPI document (YAML or JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path segment used to group operations into entities
    #[arg(long, default_value_t = DEFAULT_ENTITY_PATH_INDEX)]
    pub entity_index: usize,

    #[arg(long)]
    pub includes: Option<String>,

    #[arg(long)]
    pub excludes: Option<String>,

    #[arg(long)]
    pub codes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Scenario file (JSON or YAML)
    #[arg(long)]
    pub scenarios: PathBuf,

    /// Request method
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Route in colon form, e.g. `/users/:id`
    #[arg(long)]
    pub path: String,

    /// Documented statuses in document order
    #[arg(long = "status", value_delimiter = ',', required = true)]
    pub statuses: Vec<u16>,

    /// Scenario id sent in the `x-scenario` header
    #[arg(long)]
    pub scenario: Option<String>,
}

/// Parse the process arguments, install logging and run the chosen command
///
/// # Errors
///
/// Whatever the command fails with.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_env().with_verbosity(cli.verbose);
    if let Err(e) = init_logging_with_config(&log_config) {
        eprintln!("Warning: {e:#}");
    }
    run(cli)
}

/// Run an already parsed command line
///
/// # Errors
///
/// Returns an error if:
/// - The OpenAPI document cannot be loaded or a reference does not resolve
/// - The config or scenario file is invalid
/// - Writing the output fails
/// - `--format` was given and prettier fails
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            let options = args.resolve_options()?;
            let report = generate_mocks(&options)?;
            print_report(&report, &options);
            if args.format {
                format_output(&options.output_dir)?;
            }
            Ok(())
        }
        Commands::Inspect(args) => {
            let filters = FilterOptions {
                includes: args.includes,
                excludes: args.excludes,
                codes: args.codes,
            };
            let (document, operations) = load_operations(&args.input, &filters)?;
            if let Some(title) = document_title(&document) {
                println!("# {title} ({} operations)", operations.len());
            }
            for (entity, bucket) in group_by_entity(&operations, args.entity_index) {
                println!("{entity}");
                for op in bucket {
                    let codes: Vec<&str> = op.responses.iter().map(|r| r.code.as_str()).collect();
                    println!(
                        "  {:<7} {:<40} {} [{}]",
                        op.verb.as_str(),
                        op.path,
                        op.id,
                        codes.join(", ")
                    );
                }
            }
            Ok(())
        }
        Commands::Select(args) => {
            let scenarios = load_scenarios(&args.scenarios)?;
            let mut headers = HeaderMap::new();
            if let Some(id) = &args.scenario {
                let value = HeaderValue::from_str(id)
                    .with_context(|| format!("scenario id '{id}' is not a valid header value"))?;
                headers.insert(SCENARIO_HEADER, value);
            }
            let candidates: Vec<ResponseCandidate> =
                args.statuses.iter().copied().map(ResponseCandidate::new).collect();
            let selection =
                select_response(&args.method, &args.path, &candidates, &headers, Some(&scenarios));
            let chosen = selection
                .resolve(&candidates)
                .ok_or_else(|| anyhow::anyhow!("no documented status to select from"))?;
            match &selection {
                Selection::Index(index) => {
                    println!("{} (documented, index {index})", chosen.status);
                }
                Selection::Custom(_) => {
                    let body = chosen.body.as_ref().map(ToString::to_string).unwrap_or_default();
                    println!("{} (synthesized) {body}", chosen.status);
                }
            }
            Ok(())
        }
    }
}

fn print_report(report: &GenerationReport, options: &GeneratorOptions) {
    println!(
        "Generated mocks for {} operations in {} entities into {}",
        report.operations,
        report.entities.len(),
        options.output_dir.display()
    );
    println!("  written: {}, skipped: {}", report.written.len(), report.skipped.len());
    if report.scenario_skeleton_written {
        println!("  created {}", options.scenario_path().display());
    }
    if !report.override_scenarios.is_empty() {
        println!("  replay scenarios: {}", report.override_scenarios.join(", "));
    }
}
