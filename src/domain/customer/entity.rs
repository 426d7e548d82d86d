//! Customer identifiers and the raw feature table

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Customer identifier as found in the dataset id column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    /// Sentinel meaning "not a specific customer"
    pub const ALL: i64 = -1;

    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a path identifier refers to once parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerRef {
    /// The `-1` sentinel: every customer, or a sample of them
    All,
    Customer(CustomerId),
}

impl From<i64> for CustomerRef {
    fn from(value: i64) -> Self {
        if value == CustomerId::ALL {
            Self::All
        } else {
            Self::Customer(CustomerId::new(value))
        }
    }
}

/// Raw customer table: one row per customer, columns in dataset order.
///
/// Identifier and label columns are already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    ids: Vec<CustomerId>,
    rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    /// Build a table, checking shape and identifier uniqueness
    pub fn new(
        feature_names: Vec<String>,
        ids: Vec<CustomerId>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, DomainError> {
        if feature_names.is_empty() {
            return Err(DomainError::configuration("dataset has no feature columns"));
        }

        if ids.is_empty() {
            return Err(DomainError::configuration("dataset has no customers"));
        }

        if ids.len() != rows.len() {
            return Err(DomainError::configuration(format!(
                "dataset has {} identifiers but {} rows",
                ids.len(),
                rows.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ids.len());

        for (id, row) in ids.iter().zip(&rows) {
            if id.value() == CustomerId::ALL {
                return Err(DomainError::configuration(
                    "customer identifier -1 is reserved",
                ));
            }

            if !seen.insert(*id) {
                return Err(DomainError::configuration(format!(
                    "duplicate customer identifier {}",
                    id
                )));
            }

            if row.len() != feature_names.len() {
                return Err(DomainError::configuration(format!(
                    "customer {} has {} values, expected {}",
                    id,
                    row.len(),
                    feature_names.len()
                )));
            }
        }

        Ok(Self {
            feature_names,
            ids,
            rows,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn ids(&self) -> &[CustomerId] {
        &self.ids
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Values of one column, in row order
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[index])
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<CustomerId>, Vec<Vec<f64>>) {
        (self.feature_names, self.ids, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["AMT_INCOME".to_string(), "AGE".to_string()]
    }

    #[test]
    fn test_customer_ref_sentinel() {
        assert_eq!(CustomerRef::from(-1), CustomerRef::All);
        assert_eq!(
            CustomerRef::from(100),
            CustomerRef::Customer(CustomerId::new(100))
        );
    }

    #[test]
    fn test_customer_id_serializes_as_integer() {
        let json = serde_json::to_string(&CustomerId::new(100)).unwrap();
        assert_eq!(json, "100");
    }

    #[test]
    fn test_feature_table_rejects_duplicates() {
        let result = FeatureTable::new(
            names(),
            vec![CustomerId::new(1), CustomerId::new(1)],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_feature_table_rejects_sentinel_and_ragged_rows() {
        let sentinel = FeatureTable::new(names(), vec![CustomerId::new(-1)], vec![vec![1.0, 2.0]]);
        assert!(sentinel.is_err());

        let ragged = FeatureTable::new(names(), vec![CustomerId::new(7)], vec![vec![1.0]]);
        assert!(ragged.is_err());
    }

    #[test]
    fn test_feature_table_column() {
        let table = FeatureTable::new(
            names(),
            vec![CustomerId::new(1), CustomerId::new(2)],
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        )
        .unwrap();

        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![2.0, 4.0]);
        assert_eq!(table.len(), 2);
    }
}
