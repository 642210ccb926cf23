//! Output writers for reduced parameter trees.

pub mod namelist;

pub use namelist::{to_namelist_string, write_namelist};
