//! Application surface for the OSCAL exchange document store
//!
//! What the external collaborators touch:
//! - `config`: the startup configuration collaborator (`oxp.toml`)
//! - `search`: the read-only facade used by the validation workflow
//!
//! The transport adapter itself lives outside this repository; it calls the
//! store through these types and maps outcomes to response codes
//! (`NotFound` → 404, `AlreadyExists` → 400, `Unavailable` → 5xx).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod search;

pub use config::{Config, CONFIG_FILE_NAME};
pub use search::SearchFacade;
