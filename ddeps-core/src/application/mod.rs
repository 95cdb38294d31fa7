// ddeps-core/src/application/mod.rs

pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI fait `use ddeps_core::application::validate_file;`
// sans connaître la structure interne des fichiers.

pub use validation::{run_validation, validate_file, validate_source};
