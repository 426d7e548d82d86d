//! Immutable in-memory customer store

use std::collections::{BTreeMap, HashMap};

use super::{CustomerId, FeatureTable};
use crate::domain::scaling::{FittedRobustScaler, RobustScaler};
use crate::domain::DomainError;

/// Feature name to value mapping returned to callers
pub type FeatureMap = BTreeMap<String, f64>;

/// Customers with raw and scaled feature rows, built once at startup.
///
/// The scaler is fitted over every raw row while the store is built and the
/// scaled rows are computed in the same pass; nothing here is mutable after
/// `build` returns.
#[derive(Debug)]
pub struct CustomerStore {
    feature_names: Vec<String>,
    ids: Vec<CustomerId>,
    positions: HashMap<CustomerId, usize>,
    raw: Vec<Vec<f64>>,
    scaled: Vec<Vec<f64>>,
    scaler: FittedRobustScaler,
}

impl CustomerStore {
    pub fn build(table: FeatureTable) -> Result<Self, DomainError> {
        let scaler = RobustScaler::new().fit(&table)?;
        let (feature_names, ids, raw) = table.into_parts();

        let scaled = raw.iter().map(|row| scaler.transform(row)).collect();
        let positions = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (*id, position))
            .collect();

        Ok(Self {
            feature_names,
            ids,
            positions,
            raw,
            scaled,
            scaler,
        })
    }

    /// Every customer id, in dataset load order
    pub fn list_ids(&self) -> &[CustomerId] {
        &self.ids
    }

    pub fn exists(&self, id: CustomerId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &FittedRobustScaler {
        &self.scaler
    }

    pub fn raw_features(&self, id: CustomerId) -> Result<FeatureMap, DomainError> {
        Ok(self.named(&self.raw[self.position(id)?]))
    }

    pub fn scaled_features(&self, id: CustomerId) -> Result<FeatureMap, DomainError> {
        Ok(self.named(self.scaled_row(id)?))
    }

    /// Scaled row in feature order, as the classifier consumes it
    pub fn scaled_row(&self, id: CustomerId) -> Result<&[f64], DomainError> {
        Ok(&self.scaled[self.position(id)?])
    }

    /// Scaled row by load position
    pub fn scaled_row_at(&self, position: usize) -> Option<(CustomerId, &[f64])> {
        Some((*self.ids.get(position)?, self.scaled.get(position)?.as_slice()))
    }

    /// Mean of each scaled column over observed values
    pub fn scaled_means(&self) -> Vec<f64> {
        (0..self.feature_names.len())
            .map(|index| {
                let (sum, count) = self
                    .scaled
                    .iter()
                    .map(|row| row[index])
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

                if count == 0 { 0.0 } else { sum / count as f64 }
            })
            .collect()
    }

    fn position(&self, id: CustomerId) -> Result<usize, DomainError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or_else(DomainError::customer_not_found)
    }

    fn named(&self, row: &[f64]) -> FeatureMap {
        self.feature_names
            .iter()
            .cloned()
            .zip(row.iter().copied())
            .collect()
    }
}
