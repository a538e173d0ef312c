mod format;
mod generate;

pub use format::format_output;
pub use generate::{
    entity_identifier, file_stem, generate_from_document, generate_mocks, GenerationReport,
    CONTROLLER_TYPES_DIR, HANDLERS_DIR, OVERRIDE_DIR, SCENARIO_TYPES_DIR,
};
