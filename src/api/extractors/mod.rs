//! Custom request extractors.

mod account_path;
mod validated_json;

pub use account_path::AccountPath;
pub use validated_json::ValidatedJson;
