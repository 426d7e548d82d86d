use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::CustomerId;

/// Attribution payload for one customer (local) or a sample (global).
///
/// `shap_values` has one row per entry of `customer_ids` and one column per
/// entry of `feature_names`, in those orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    #[serde(rename = "id_", skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub customer_ids: Vec<CustomerId>,
    pub feature_names: Vec<String>,
    /// Scaled features keyed by feature name, then customer id
    pub interp_data: BTreeMap<String, BTreeMap<CustomerId, f64>>,
    pub shap_values: Vec<Vec<f64>>,
    pub expected_value: f64,
}

impl Explanation {
    pub fn new(
        id: Option<CustomerId>,
        customer_ids: Vec<CustomerId>,
        feature_names: &[String],
        rows: &[Vec<f64>],
        shap_values: Vec<Vec<f64>>,
        expected_value: f64,
    ) -> Self {
        let interp_data = feature_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let by_customer = customer_ids
                    .iter()
                    .zip(rows)
                    .map(|(customer, row)| (*customer, row[index]))
                    .collect();
                (name.clone(), by_customer)
            })
            .collect();

        Self {
            id,
            customer_ids,
            feature_names: feature_names.to_vec(),
            interp_data,
            shap_values,
            expected_value,
        }
    }

    pub fn is_local(&self) -> bool {
        self.id.is_some()
    }
}
