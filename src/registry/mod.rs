//! Static practice data: word pools, sentence templates and keyboard rows.
//!
//! The data ships inside the binary as JSON and is validated once, on first
//! access. Any inconsistency is a bug in the data and aborts immediately.

pub mod pools;
pub mod rows;
pub mod templates;

pub use pools::WordPools;
pub use rows::{RowDefinition, RowId, RowInfo, RowRegistry};
pub use templates::{Segment, SentenceTemplate};

use include_dir::{include_dir, Dir};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/data");

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    Registry::embedded().unwrap_or_else(|err| panic!("invalid practice data: {err}"))
});

/// The process-wide registry built from the embedded data
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Built-in rows in cycle order
pub fn list_rows() -> Vec<RowInfo<'static>> {
    registry().rows().list()
}

#[derive(Debug, Clone)]
pub struct Registry {
    pools: WordPools,
    templates: Vec<SentenceTemplate>,
    rows: RowRegistry,
}

impl Registry {
    pub fn new(
        pools: WordPools,
        templates: Vec<SentenceTemplate>,
        rows: Vec<RowDefinition>,
    ) -> ConfigResult<Self> {
        if templates.is_empty() {
            return Err(ConfigError::NoTemplates);
        }

        for template in &templates {
            for slot in template.slots() {
                match pools.get(slot) {
                    None => {
                        return Err(ConfigError::UnknownSlot {
                            slot: slot.to_string(),
                            template: template.source().to_string(),
                        })
                    }
                    Some(words) if words.is_empty() => {
                        return Err(ConfigError::EmptyPool(slot.to_string()))
                    }
                    Some(_) => {}
                }
            }
        }

        let rows = RowRegistry::new(rows)?;

        Ok(Self {
            pools,
            templates,
            rows,
        })
    }

    pub fn from_json(pools: &str, templates: &str, rows: &str) -> ConfigResult<Self> {
        Self::new(
            parse("pools.json", pools)?,
            parse("templates.json", templates)?,
            parse("rows.json", rows)?,
        )
    }

    pub fn embedded() -> ConfigResult<Self> {
        Self::from_json(
            read_data_file("pools.json")?,
            read_data_file("templates.json")?,
            read_data_file("rows.json")?,
        )
    }

    /// Candidates for a slot referenced by one of the templates
    pub fn pool(&self, slot: &str) -> &[String] {
        // every referenced slot was checked in `new`
        self.pools
            .get(slot)
            .unwrap_or_else(|| panic!("{}", ConfigError::EmptyPool(slot.to_string())))
    }

    pub fn pools(&self) -> &WordPools {
        &self.pools
    }

    pub fn templates(&self) -> &[SentenceTemplate] {
        &self.templates
    }

    pub fn rows(&self) -> &RowRegistry {
        &self.rows
    }
}

fn parse<T: DeserializeOwned>(file: &'static str, json: &str) -> ConfigResult<T> {
    serde_json::from_str(json).map_err(|source| ConfigError::Malformed { file, source })
}

fn read_data_file(name: &'static str) -> ConfigResult<&'static str> {
    DATA_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or(ConfigError::MissingData(name))
}
