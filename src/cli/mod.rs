//! # CLI Module
//!
//! Command-line front end for the mock generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate MSW handlers and TypeScript types from an OpenAPI document:
//!
//! ```bash
//! oas-mockgen generate --input openapi.yaml --output src/app/mocks
//! ```
//!
//! Every option can also live in `oas-mockgen.toml` (looked up next to the
//! document, then in the working directory). Flags given on the command line
//! win over the file.
//!
//! ### `inspect`
//!
//! Print the operations the generator would see, grouped by entity:
//!
//! ```bash
//! oas-mockgen inspect --input openapi.yaml --entity-index 2
//! ```
//!
//! ### `select`
//!
//! Ask which response a scenario picks for one endpoint, without running
//! the generated code:
//!
//! ```bash
//! oas-mockgen select --scenarios src/app/mocks/scenarios.json \
//!     --method GET --path /users/:id --status 200,404 --scenario TC-1.2
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands, GenerateArgs, InspectArgs, SelectArgs};
