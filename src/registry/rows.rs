use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Keyboard rows that can be drilled
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RowId {
    Home,
    Top,
    Bottom,
    Numbers,
    Caps,
    Symbols,
    Mixed,
}

impl RowId {
    pub const ALL: [RowId; 7] = [
        RowId::Home,
        RowId::Top,
        RowId::Bottom,
        RowId::Numbers,
        RowId::Caps,
        RowId::Symbols,
        RowId::Mixed,
    ];
}

impl FromStr for RowId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RowId::ALL
            .into_iter()
            .find(|id| id.to_string() == s)
            .ok_or_else(|| ConfigError::UnknownRow(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RowDefinition {
    pub id: RowId,
    pub label: String,
    pub characters: Vec<char>,
}

/// Row id and display label, in drill order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowInfo<'a> {
    pub id: RowId,
    pub label: &'a str,
}

/// Every row exactly once, in the order drills cycle through them.
#[derive(Debug, Clone)]
pub struct RowRegistry {
    rows: Vec<RowDefinition>,
}

impl RowRegistry {
    pub fn new(rows: Vec<RowDefinition>) -> ConfigResult<Self> {
        for id in RowId::ALL {
            match rows.iter().filter(|row| row.id == id).count() {
                0 => return Err(ConfigError::MissingRow(id.to_string())),
                1 => {}
                _ => return Err(ConfigError::DuplicateRow(id.to_string())),
            }
        }

        if let Some(empty) = rows.iter().find(|row| row.characters.is_empty()) {
            return Err(ConfigError::EmptyRow(empty.id.to_string()));
        }

        Ok(Self { rows })
    }

    pub fn get(&self, id: RowId) -> &RowDefinition {
        // `new` guarantees every RowId is present
        self.rows
            .iter()
            .find(|row| row.id == id)
            .unwrap_or_else(|| panic!("{}", ConfigError::MissingRow(id.to_string())))
    }

    pub fn first(&self) -> RowId {
        self.rows[0].id
    }

    /// The row after `id`, wrapping from the last back to the first
    pub fn next(&self, id: RowId) -> RowId {
        let index = self.position(id);
        self.rows[(index + 1) % self.rows.len()].id
    }

    pub fn list(&self) -> Vec<RowInfo<'_>> {
        self.rows
            .iter()
            .map(|row| RowInfo {
                id: row.id,
                label: &row.label,
            })
            .collect()
    }

    fn position(&self, id: RowId) -> usize {
        self.rows.iter().position(|row| row.id == id).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn row(id: RowId, characters: &str) -> RowDefinition {
        RowDefinition {
            id,
            label: format!("{id} label"),
            characters: characters.chars().collect(),
        }
    }

    fn all_rows() -> Vec<RowDefinition> {
        RowId::ALL.into_iter().map(|id| row(id, "ab")).collect()
    }

    #[test]
    fn test_row_id_display_and_parse() {
        for id in RowId::ALL {
            assert_eq!(id.to_string().parse::<RowId>().unwrap(), id);
        }
        assert_eq!(RowId::Numbers.to_string(), "numbers");
    }

    #[test]
    fn test_unknown_row_id_is_rejected() {
        assert_matches!("qwerty".parse::<RowId>(), Err(ConfigError::UnknownRow(id)) if id == "qwerty");
        assert!("Home".parse::<RowId>().is_err());
    }

    #[test]
    fn test_missing_row_is_rejected() {
        let mut rows = all_rows();
        rows.retain(|r| r.id != RowId::Caps);

        assert_matches!(RowRegistry::new(rows), Err(ConfigError::MissingRow(id)) if id == "caps");
    }

    #[test]
    fn test_duplicate_row_is_rejected() {
        let mut rows = all_rows();
        rows.push(row(RowId::Top, "xy"));

        assert_matches!(RowRegistry::new(rows), Err(ConfigError::DuplicateRow(id)) if id == "top");
    }

    #[test]
    fn test_empty_row_is_rejected() {
        let mut rows = all_rows();
        rows[2].characters.clear();

        assert_matches!(RowRegistry::new(rows), Err(ConfigError::EmptyRow(_)));
    }

    #[test]
    fn test_next_row_wraps() {
        let registry = RowRegistry::new(all_rows()).unwrap();

        assert_eq!(registry.first(), RowId::Home);
        assert_eq!(registry.next(RowId::Home), RowId::Top);
        assert_eq!(registry.next(RowId::Symbols), RowId::Mixed);
        assert_eq!(registry.next(RowId::Mixed), RowId::Home);
    }

    #[test]
    fn test_cycle_follows_definition_order() {
        let mut rows = all_rows();
        rows.reverse();
        let registry = RowRegistry::new(rows).unwrap();

        assert_eq!(registry.first(), RowId::Mixed);
        assert_eq!(registry.next(RowId::Mixed), RowId::Symbols);
        assert_eq!(registry.next(RowId::Home), RowId::Mixed);
    }

    #[test]
    fn test_list_preserves_order_and_labels() {
        let registry = RowRegistry::new(all_rows()).unwrap();
        let listed = registry.list();

        assert_eq!(listed.len(), RowId::ALL.len());
        assert_eq!(listed[0].id, RowId::Home);
        assert_eq!(listed[0].label, "home label");
    }
}
