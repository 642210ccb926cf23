//! Fortran namelist writer
//!
//! Renders a reduced tree of parameter records. Each top-level entry is a
//! group holding at least a `group` string (the namelist it belongs to) and a
//! `values` scalar; other keys are metadata and are ignored.
//!
//! ```text
//! &cice_nml
//!   days_per_year = 365
//!   ice_ic = 'b.e15.nc'
//! /
//! ```

use std::io::Write;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ParamGenError, Result};
use crate::tree::scalar::format_float;
use crate::tree::{Group, Node, Scalar};

/// Key naming the namelist group of a record
pub const GROUP_KEY: &str = "group";

/// Key holding the value of a record
pub const VALUES_KEY: &str = "values";

fn render(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Null => None,
        Scalar::Boolean(true) => Some(".true.".to_string()),
        Scalar::Boolean(false) => Some(".false.".to_string()),
        Scalar::Integer(i) => Some(i.to_string()),
        Scalar::Float(f) => Some(format_float(*f)),
        Scalar::String(s) | Scalar::Formula(s) => Some(s.clone()),
    }
}

fn record<'a>(name: &str, node: &'a Node) -> Result<(&'a str, &'a Scalar)> {
    let fields = node.as_group().ok_or_else(|| {
        ParamGenError::structural("parameter entry is not a record").at(name)
    })?;

    let group = match fields.get(GROUP_KEY).and_then(Node::as_scalar) {
        Some(Scalar::String(group)) => group.as_str(),
        _ => {
            return Err(ParamGenError::structural(format!(
                "record has no '{}' string",
                GROUP_KEY
            ))
            .at(name))
        }
    };

    let value = fields
        .get(VALUES_KEY)
        .and_then(Node::as_scalar)
        .ok_or_else(|| {
            ParamGenError::structural(format!("record '{}' is not a scalar", VALUES_KEY))
                .at(&format!("{}/{}", name, VALUES_KEY))
        })?;

    Ok((group, value))
}

/// Write `tree` as namelist blocks, one per group in first-appearance order.
///
/// Parameters whose value is null are omitted and groups left empty are not
/// written.
pub fn write_namelist<W: Write>(tree: &Group, out: &mut W) -> Result<()> {
    let mut groups: IndexMap<&str, Vec<(&str, String)>> = IndexMap::new();

    for (name, node) in tree {
        let (group, value) = record(name, node)?;
        let lines = groups.entry(group).or_default();
        if let Some(rendered) = render(value) {
            lines.push((name.as_str(), rendered));
        }
    }

    let mut first = true;
    for (group, lines) in groups.iter().filter(|(_, lines)| !lines.is_empty()) {
        if !first {
            writeln!(out)?;
        }
        first = false;

        writeln!(out, "&{}", group)?;
        for (name, value) in lines {
            writeln!(out, "  {} = {}", name, value)?;
        }
        writeln!(out, "/")?;
    }

    debug!(groups = groups.len(), "wrote namelist");
    Ok(())
}

/// Render `tree` as a namelist string
pub fn to_namelist_string(tree: &Group) -> Result<String> {
    let mut buffer = Vec::new();
    write_namelist(tree, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| ParamGenError::structural(format!("namelist is not valid UTF-8: {}", e)))
}
