//! # oas-mockgen
//!
//! Generates [MSW](https://mswjs.io) request handlers and TypeScript types
//! from an OpenAPI v3 document, with scenario-driven response selection.
//!
//! ## Overview
//!
//! A single run turns every path/verb pair of the document into a mock handler
//! that answers with generated data. Which of the documented responses a
//! handler returns is decided at runtime by the `x-scenario` request header
//! and a user-maintained `scenarios.json`. Captured traffic stored in that
//! file can be replayed verbatim through override handlers.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Document loading, `$ref` resolution with cycle detection,
//!   operation extraction and entity grouping
//! - **[`generator`]** - Response classification, fake data, template
//!   rendering and file output
//! - **[`scenario`]** - Scenario file model and response selection
//! - **[`recorder`]** - Captured traffic and its conversion into replayable
//!   request groups
//! - **[`config`]** - Generator options and `oas-mockgen.toml` loading
//! - **[`naming`]** - Identifier derivation shared by all generated files
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - The `oas-mockgen` command line
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as oas-mockgen generate
//!     participant Spec as spec::build_operations
//!     participant Group as spec::group_by_entity
//!     participant Gen as generator
//!     participant FS as File System
//!
//!     CLI->>Spec: document + filters
//!     Spec->>Spec: resolve $refs, apply includes/excludes/codes
//!     Spec-->>CLI: Vec<OperationRecord>
//!     CLI->>Group: records, entity index
//!     Group-->>CLI: ordered entity buckets
//!     CLI->>Gen: buckets + options
//!     Gen->>FS: runtime.ts, handlers, controller types
//!     Gen->>FS: scenarios.json (first run only)
//!     Gen->>FS: override handlers for api-recorder scenarios
//!     Gen->>FS: node.ts / browser.ts / native.ts
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oas_mockgen::config::GeneratorOptions;
//! use oas_mockgen::generator::generate_mocks;
//!
//! let report = generate_mocks(&GeneratorOptions {
//!     input: Some("openapi.yaml".into()),
//!     ..GeneratorOptions::default()
//! })?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod recorder;
pub mod scenario;
pub mod spec;

pub use error::MockGenError;
pub use spec::{build_operations, load_document, resolve_schema, OperationRecord};
