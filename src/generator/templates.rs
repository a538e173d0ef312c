use askama::Template;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One `{ status, responseType, body }` entry of a handler's result array,
/// with every field already rendered as TypeScript
#[derive(Debug, Clone)]
pub struct CandidateView {
    pub status: u16,
    /// `'application/json'` or `undefined`
    pub response_type: String,
    /// Expression producing the body
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct HandlerView {
    /// Lowercase verb for `http.<verb>`
    pub verb: String,
    /// Uppercase verb used for scenario lookup
    pub scenario_verb: String,
    /// Route in colon form
    pub path: String,
    pub candidates: Vec<CandidateView>,
}

/// Response body function emitted next to the handlers
#[derive(Debug, Clone)]
pub struct ResultFunctionView {
    pub name: String,
    /// Body comes from the user's controller of the same name
    pub delegated: bool,
    /// Expression returned when not delegated
    pub body: String,
}

/// Template data for `__handlers__/{entity}.handlers.ts`
#[derive(Template)]
#[template(path = "handlers.ts.txt", escape = "none")]
pub struct EntityHandlersTemplate {
    pub identifier: String,
    pub base_url: String,
    pub max_array_length: usize,
    pub max_string_length: usize,
    pub controller_path: String,
    pub uses_controllers: bool,
    pub uses_faker: bool,
    pub operations: Vec<HandlerView>,
    pub functions: Vec<ResultFunctionView>,
}

#[derive(Debug, Clone)]
pub struct EntityImportView {
    pub identifier: String,
    pub file_stem: String,
}

/// Template data for `__handlers__/index.ts`
#[derive(Template)]
#[template(path = "handlers_index.ts.txt", escape = "none")]
pub struct HandlersIndexTemplate {
    pub entities: Vec<EntityImportView>,
}

#[derive(Debug, Clone)]
pub struct ControllerSignatureView {
    pub name: String,
    pub path_params: String,
    pub request_type: String,
    pub response_type: String,
}

/// Template data for `__types__/controllers/{entity}.type.ts`
#[derive(Template)]
#[template(path = "controller_type.ts.txt", escape = "none")]
pub struct ControllerTypeTemplate {
    pub type_name: String,
    /// Comma-separated DTO names, empty when there are none
    pub dto_imports: String,
    pub dto_import_path: String,
    pub has_streaming: bool,
    pub controllers: Vec<ControllerSignatureView>,
}

#[derive(Debug, Clone)]
pub struct EntityTypeImportView {
    pub type_name: String,
    pub file_stem: String,
}

/// Template data for `__types__/controllers/index.ts`
#[derive(Template)]
#[template(path = "controllers_index.ts.txt", escape = "none")]
pub struct ControllersIndexTemplate {
    pub entities: Vec<EntityTypeImportView>,
    /// `A & B`, or `Record<string, never>` without entities
    pub intersection: String,
}

#[derive(Debug, Clone)]
pub struct MethodStatusesView {
    pub verb: String,
    /// `200 | 404`, or `never`
    pub codes: String,
}

#[derive(Debug, Clone)]
pub struct EndpointView {
    pub path: String,
    /// `'GET' | 'POST'`
    pub methods: String,
    pub statuses: Vec<MethodStatusesView>,
}

/// Template data for `__types__/scenarios/scenarios.type.ts`
#[derive(Template)]
#[template(path = "scenarios_type.ts.txt", escape = "none")]
pub struct ScenarioTypesTemplate {
    pub endpoints: Vec<EndpointView>,
}

/// Template data for `runtime.ts`
#[derive(Template)]
#[template(path = "runtime.ts.txt", escape = "none")]
pub struct RuntimeTemplate {
    pub scenario_header: String,
    pub default_scenario: String,
    pub stream_media_type: String,
}

#[derive(Debug, Clone)]
pub struct RecordedGroupView {
    pub verb: String,
    /// Quoted url literal
    pub url: String,
    /// Quoted `METHOD:url` literal
    pub key: String,
    /// JSON array of recorded responses
    pub responses: String,
}

/// Template data for `__handlers__/override/{scenario}.handlers.ts`
#[derive(Template)]
#[template(path = "override_handlers.ts.txt", escape = "none")]
pub struct OverrideHandlersTemplate {
    pub export_name: String,
    pub groups: Vec<RecordedGroupView>,
}

#[derive(Debug, Clone)]
pub struct OverrideImportView {
    /// Quoted scenario id
    pub key: String,
    pub export_name: String,
    pub file_stem: String,
}

/// Template data for `__handlers__/override/index.ts`
#[derive(Template)]
#[template(path = "override_index.ts.txt", escape = "none")]
pub struct OverrideIndexTemplate {
    pub scenarios: Vec<OverrideImportView>,
}

/// Template data for `node.ts`, `browser.ts` and `native.ts`
#[derive(Template)]
#[template(path = "server.ts.txt", escape = "none")]
pub struct ServerTemplate {
    pub import_name: String,
    pub module: String,
    pub export_name: String,
}

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped,
}

/// Write `contents` to `path`, creating parent directories.
///
/// # Arguments
///
/// * `path` - Output file path
/// * `contents` - Rendered file contents
/// * `skip_existing` - Leave the file alone if it already exists
///
/// # Errors
///
/// Returns an error if a directory cannot be created or the write fails
pub fn write_output(path: &Path, contents: &str, skip_existing: bool) -> anyhow::Result<WriteOutcome> {
    if skip_existing && path.exists() {
        debug!(path = %path.display(), "skipping existing file");
        return Ok(WriteOutcome::Skipped);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!(path = %path.display(), "generated");
    Ok(WriteOutcome::Written)
}

/// Render a template and write it with [`write_output`]
///
/// # Errors
///
/// Rendering or I/O failures
pub fn write_template<T: Template>(
    path: &Path,
    template: &T,
    skip_existing: bool,
) -> anyhow::Result<WriteOutcome> {
    let rendered = template.render()?;
    write_output(path, &rendered, skip_existing)
}

/// Files written and skipped during one generation run
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl OutputLog {
    pub fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written.push(path),
            WriteOutcome::Skipped => self.skipped.push(path),
        }
    }

    /// Render and write, recording the outcome
    ///
    /// # Errors
    ///
    /// Same as [`write_template`]
    pub fn template<T: Template>(
        &mut self,
        path: PathBuf,
        template: &T,
        skip_existing: bool,
    ) -> anyhow::Result<()> {
        let outcome = write_template(&path, template, skip_existing)?;
        self.record(path, outcome);
        Ok(())
    }
}
