//! # Canonical Tree Model
//!
//! The in-memory form of a default parameters database (DPD): nested groups
//! whose keys are parameter names or guard expressions, and whose leaves are
//! typed scalars or formulas.
//!
//! ## Core Components
//!
//! - [`Scalar`]: typed leaf values, including formulas and the null absence value
//! - [`Node`]: a scalar or a group
//! - [`Group`]: an insertion-ordered map from keys to nodes
//!
//! Trees read from and write to plain JSON with serde:
//!
//! ```rust
//! use paramgen_rs::tree::{Group, Node, Scalar};
//!
//! let dpd: Group = serde_json::from_str(r#"{
//!     "days_per_year": 365,
//!     "ice_ic": {
//!         "$ICE_GRID .startswith(\"gx1v\")": "b.e11.gx1v6.cice.nc",
//!         "else": "default"
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(dpd["days_per_year"], Node::Scalar(Scalar::Integer(365)));
//! assert_eq!(dpd["ice_ic"].as_group().unwrap().len(), 2);
//! ```

pub mod node;
pub mod scalar;

pub use node::{Group, Node};
pub use scalar::{formula_body, Scalar};
