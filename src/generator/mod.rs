//! # Generator Module
//!
//! Turns an OpenAPI v3 document into a tree of MSW handlers and TypeScript
//! types.
//!
//! ## Pipeline
//!
//! ```text
//! OpenAPI document → Operation records → Entity buckets → Template rendering → Files
//! ```
//!
//! 1. **Extraction** ([`crate::spec`]) resolves `$ref`s and flattens every
//!    path/verb pair into an operation record
//! 2. **Grouping** buckets operations by one path segment (the entity)
//! 3. **Classification** ([`classify`]) decides how each response body is
//!    typed for the controller signatures
//! 4. **Body generation** ([`faker`]) writes either faker expressions or
//!    static JSON for each documented response
//! 5. **Rendering** fills the Askama templates in `templates/` and writes
//!    them out
//!
//! ## Generated Structure
//!
//! ```text
//! <output>/
//! ├── runtime.ts                      # Scenario selection and response helpers
//! ├── scenarios.json                  # Written once, then owned by the user
//! ├── node.ts | browser.ts | native.ts
//! ├── __handlers__/
//! │   ├── index.ts                    # baseHandlers
//! │   ├── <entity>.handlers.ts
//! │   └── override/
//! │       ├── index.ts                # overrideHandlers keyed by scenario id
//! │       └── <scenario>.handlers.ts  # Replay of recorded traffic
//! └── __types__/
//!     ├── controllers/
//!     │   ├── index.ts                # TControllers
//!     │   └── <entity>.type.ts
//!     └── scenarios/
//!         └── scenarios.type.ts
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oas_mockgen::config::GeneratorOptions;
//! use oas_mockgen::generator::generate_mocks;
//!
//! let options = GeneratorOptions {
//!     input: Some("openapi.yaml".into()),
//!     output_dir: "src/app/mocks".into(),
//!     ..GeneratorOptions::default()
//! };
//! let report = generate_mocks(&options)?;
//! println!("{} operations", report.operations);
//! ```

pub mod classify;
pub mod faker;
mod project;
mod templates;

pub use project::*;
pub use templates::*;
