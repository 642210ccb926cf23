//! The resolution engine instance
//!
//! A [`ParamGen`] owns one parameter database (DPD) in canonical tree form,
//! together with the configuration used to reduce it.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use crate::append::append;
use crate::config::ParamGenConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::reduce::reduce;
use crate::tree::Group;
use crate::writer::namelist;

/// A parameter database together with its reduction options.
///
/// # Examples
///
/// ```
/// use paramgen_rs::environment::SimpleEnvironment;
/// use paramgen_rs::ParamGen;
///
/// let pg = ParamGen::from_json(r#"{
///     "days_per_year": 365,
///     "ice_ic": {
///         "$ICE_GRID .startswith(\"gx1v\")": "b.e15.B1850G.f09_g16.pi_control.25.cice.r.0041-01-01-00000.nc",
///         "else": "default"
///     }
/// }"#).unwrap();
///
/// let env = SimpleEnvironment::new().with("ICE_GRID", "gx1v6");
/// let reduced = pg.reduce(&env).unwrap();
/// assert_eq!(reduced["days_per_year"].as_scalar().unwrap().as_i64(), Some(365));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamGen {
    data: Group,
    config: ParamGenConfig,
}

impl ParamGen {
    /// Create an engine over `data` with the default configuration
    pub fn new(data: Group) -> Self {
        Self::with_config(data, ParamGenConfig::default())
    }

    /// Create an engine over `data` with an explicit configuration
    pub fn with_config(data: Group, config: ParamGenConfig) -> Self {
        Self { data, config }
    }

    /// Build an engine from a JSON document whose root is an object
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Group = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    /// Load an engine from a JSON file whose root is an object
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// The owned parameter database
    pub fn data(&self) -> &Group {
        &self.data
    }

    /// The reduction options
    pub fn config(&self) -> &ParamGenConfig {
        &self.config
    }

    /// Mutable access to the reduction options
    pub fn config_mut(&mut self) -> &mut ParamGenConfig {
        &mut self.config
    }

    /// Reduce the database against `env`, returning a new tree
    pub fn reduce<E: Environment + ?Sized>(&self, env: &E) -> Result<Group> {
        reduce(&self.data, env, self.config.match_policy)
    }

    /// Replace the database with its reduction.
    ///
    /// On error the database is left unchanged.
    pub fn reduce_in_place<E: Environment + ?Sized>(&mut self, env: &E) -> Result<()> {
        self.data = self.reduce(env)?;
        Ok(())
    }

    /// Reduce the database against each environment concurrently.
    ///
    /// Results are returned in the order of `envs`. If any reduction fails,
    /// the error of the earliest failing environment is returned.
    pub fn reduce_all<E: Environment + Sync>(&self, envs: &[E]) -> Result<Vec<Group>> {
        debug!(environments = envs.len(), "reducing against several environments");

        let results: Vec<Result<Group>> = envs.par_iter().map(|env| self.reduce(env)).collect();
        results.into_iter().collect()
    }

    /// Merge another database into this one; see [`crate::append::append`]
    pub fn append(&mut self, other: &ParamGen) -> Result<()> {
        append(&mut self.data, &other.data)
    }

    /// The database as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.data)?;
        Ok(json)
    }

    /// Save the database as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.data)?;
        writer.flush()?;
        Ok(())
    }

    /// Render the (already reduced) database as Fortran namelists
    pub fn write_namelist<W: Write>(&self, out: &mut W) -> Result<()> {
        namelist::write_namelist(&self.data, out)
    }
}

impl From<Group> for ParamGen {
    fn from(data: Group) -> Self {
        Self::new(data)
    }
}
