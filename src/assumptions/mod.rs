//! Mortality assumptions: the law catalogue and custom coefficients

mod mortality;
pub mod loader;

pub use mortality::{Gender, GompertzMakeham, LawSet, TableType, MAX_AGE};
pub use loader::{load_custom_law, read_custom_law};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CalcError, Result};

/// Metadata describing one selectable mortality table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Container for the mortality bases a calculation may select from
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub standard: LawSet,
    pub annuitant: LawSet,
    /// Only present once coefficients have been supplied
    pub custom: Option<LawSet>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            standard: LawSet::standard(),
            annuitant: LawSet::annuitant(),
            custom: None,
        }
    }
}

impl Assumptions {
    /// Built-in tables plus a custom law set
    pub fn with_custom(custom: LawSet) -> Self {
        Self {
            custom: Some(custom),
            ..Self::default()
        }
    }

    /// Built-in tables plus a custom law set loaded from CSV
    pub fn with_custom_csv(path: &Path) -> Result<Self> {
        Ok(Self::with_custom(load_custom_law(path)?))
    }

    /// Resolve the law for a table and gender
    pub fn law(&self, table: TableType, gender: Gender) -> Result<&GompertzMakeham> {
        let laws = match table {
            TableType::Standard => &self.standard,
            TableType::Annuitant => &self.annuitant,
            TableType::Custom => self.custom.as_ref().ok_or_else(|| {
                CalcError::validation("table_type", "no custom mortality law has been loaded")
            })?,
            TableType::FixedTerm => {
                return Err(CalcError::validation(
                    "table_type",
                    "fixed-term selector has no mortality law",
                ))
            }
        };
        Ok(laws.for_gender(gender))
    }

    /// Tables that can currently be selected
    pub fn available_tables(&self) -> Vec<TableInfo> {
        let mut tables = available_mortality_tables();
        if self.custom.is_some() {
            tables.push(TableInfo {
                id: "custom".to_string(),
                name: TableType::Custom.name().to_string(),
                description: "User-supplied Gompertz-Makeham coefficients".to_string(),
            });
        }
        tables
    }
}

/// Built-in mortality tables
pub fn available_mortality_tables() -> Vec<TableInfo> {
    vec![
        TableInfo {
            id: "standard".to_string(),
            name: TableType::Standard.name().to_string(),
            description: "General population Gompertz-Makeham basis (accepts cso_2001)".to_string(),
        },
        TableInfo {
            id: "annuitant".to_string(),
            name: TableType::Annuitant.name().to_string(),
            description: "Annuitant Gompertz-Makeham basis with lighter mortality (accepts soa_2012)"
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue() {
        let tables = available_mortality_tables();
        assert_eq!(tables.len(), 2);
        for info in &tables {
            let table: TableType = info.id.parse().unwrap();
            assert_eq!(table.name(), info.name);
        }
    }

    #[test]
    fn test_custom_requires_loading() {
        let assumptions = Assumptions::default();
        let err = assumptions.law(TableType::Custom, Gender::Male).unwrap_err();
        assert_eq!(err.field(), Some("table_type"));

        let custom = LawSet::annuitant();
        let assumptions = Assumptions::with_custom(custom);
        assert_eq!(assumptions.law(TableType::Custom, Gender::Male).unwrap(), &custom.male);
        assert_eq!(assumptions.available_tables().len(), 3);
    }

    #[test]
    fn test_fixed_term_has_no_law() {
        let assumptions = Assumptions::default();
        assert!(assumptions.law(TableType::FixedTerm, Gender::Unisex).is_err());
    }
}
