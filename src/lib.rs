//! # paramgen-rs
//!
//! `paramgen-rs` is the resolution engine for model parameter databases
//! (DPDs): nested, user-authored trees of parameters whose values are chosen
//! by guard expressions evaluated against a model configuration.
//!
//! The library provides:
//! - A canonical, order-preserving tree model with typed scalars and formulas
//! - Variable expansion with `$name` (quoted) and `${name}` (raw) references
//! - A closed, sandboxed expression language for guards and formulas
//! - Reduction of a tree against an environment with first/last match policies
//! - Top-level merging of databases
//! - Attribute-condition translation and a Fortran namelist writer
//!
//! ## Basic Usage
//!
//! ```
//! use paramgen_rs::environment::SimpleEnvironment;
//! use paramgen_rs::{ParamGen, Scalar};
//!
//! let pg = ParamGen::from_json(r#"{
//!     "dt": {"$NX > 100": "= 3600 / 4", "else": 3600},
//!     "grid_file": "${ROOT}/grid.${NX}.nc"
//! }"#).unwrap();
//!
//! let env = SimpleEnvironment::new().with("NX", 320).with("ROOT", "/inputdata");
//! let reduced = pg.reduce(&env).unwrap();
//!
//! assert_eq!(reduced["dt"].as_scalar(), Some(&Scalar::Float(900.0)));
//! assert_eq!(reduced["grid_file"].as_scalar(), Some(&Scalar::from("/inputdata/grid.320.nc")));
//! ```

// Public modules
pub mod error;

// Tree model and environment
pub mod environment;
pub mod tree;

// Expansion and evaluation
pub mod expand;
pub mod expression;
pub mod formula;
pub mod guard;

// Engine
pub mod append;
pub mod attributes;
pub mod config;
pub mod paramgen;
pub mod reduce;

// Output
pub mod writer;

// Re-exports for convenience
pub use config::{MatchPolicy, ParamGenConfig};
pub use environment::Environment;
pub use error::{ErrorKind, ParamGenError, Result};
pub use paramgen::ParamGen;
pub use tree::{Group, Node, Scalar};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
