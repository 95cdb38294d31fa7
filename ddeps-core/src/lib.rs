// ddeps-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Domain (Cœur du métier)
// Document, Shape Schema, Rule Engine, Reporter.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 2. Infrastructure (Adapters)
// Lecture de fichiers, parsing YAML, configuration.
pub mod infrastructure;

// 3. Application (Use Cases)
// Orchestration : loader -> schema -> rules -> report.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::DdepsError;
