//! Scoring service - customer lookup, loan decision and explanations
//!
//! Every operation takes the raw path identifier and query parameters and
//! validates them in a fixed order: identifier parse, membership, query
//! parameters, then the model call. The first failure is returned as is;
//! failures from the classifier or explainer are folded into `Internal`.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    parse_customer_ref, parse_sample_size, parse_threshold, parse_view, sample_positions,
    Additivity, Classifier, CustomerId, CustomerRef, CustomerStore, DomainError, Explainer,
    Explanation, FeatureMap, FeatureView, Prediction, QueryParams,
};
use crate::infrastructure::observability::{record_decision, record_explanation};

/// Customer endpoint result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CustomerData {
    Ids(Vec<CustomerId>),
    Features(FeatureMap),
}

/// Scoring service over the process-wide immutable model state
#[derive(Debug, Clone)]
pub struct ScoringService {
    store: Arc<CustomerStore>,
    classifier: Arc<dyn Classifier>,
    explainer: Arc<dyn Explainer>,
    sample_seed: u64,
}

impl ScoringService {
    pub fn new(
        store: Arc<CustomerStore>,
        classifier: Arc<dyn Classifier>,
        explainer: Arc<dyn Explainer>,
        sample_seed: u64,
    ) -> Self {
        Self {
            store,
            classifier,
            explainer,
            sample_seed,
        }
    }

    pub fn store(&self) -> &CustomerStore {
        &self.store
    }

    pub fn expected_value(&self) -> f64 {
        self.explainer.expected_value()
    }

    /// `-1` lists every id; otherwise one customer's feature vector
    pub fn customer(&self, raw_id: &str, params: &QueryParams) -> Result<CustomerData, DomainError> {
        match self.resolve(raw_id)? {
            CustomerRef::All => Ok(CustomerData::Ids(self.store.list_ids().to_vec())),
            CustomerRef::Customer(id) => {
                let features = match parse_view(params)? {
                    FeatureView::Scaled => self.store.scaled_features(id)?,
                    FeatureView::Raw => self.store.raw_features(id)?,
                };
                Ok(CustomerData::Features(features))
            }
        }
    }

    /// Loan decision for one customer at the caller's threshold
    pub fn predict(&self, raw_id: &str, params: &QueryParams) -> Result<Prediction, DomainError> {
        let id = match self.resolve(raw_id)? {
            CustomerRef::Customer(id) => id,
            CustomerRef::All => return Err(DomainError::customer_not_found()),
        };

        let threshold = parse_threshold(params)?;
        let row = self.store.scaled_row(id)?;

        let probability = self
            .classifier
            .predict_proba(row)
            .map_err(DomainError::into_internal)?;

        if !(0.0..=1.0).contains(&probability) {
            return Err(DomainError::internal(format!(
                "classifier returned probability {} outside [0, 1]",
                probability
            )));
        }

        let prediction = Prediction::new(id, threshold, probability);
        debug!(
            customer = %id,
            threshold,
            probability,
            decision = prediction.decision.as_str(),
            "Prediction computed"
        );
        record_decision(prediction.decision);

        Ok(prediction)
    }

    /// `-1` explains a seeded sample of `n_customers`; otherwise one customer
    pub fn explain(&self, raw_id: &str, params: &QueryParams) -> Result<Explanation, DomainError> {
        match self.resolve(raw_id)? {
            CustomerRef::Customer(id) => self.explain_one(id),
            CustomerRef::All => {
                let sample_size = parse_sample_size(params)?;
                self.explain_sample(sample_size.get())
            }
        }
    }

    pub fn explain_one(&self, id: CustomerId) -> Result<Explanation, DomainError> {
        let row = self.store.scaled_row(id)?.to_vec();
        let explanation = self.attribute(Some(id), vec![id], vec![row])?;

        record_explanation("local", 1);
        Ok(explanation)
    }

    pub fn explain_sample(&self, sample_size: usize) -> Result<Explanation, DomainError> {
        let positions = sample_positions(self.sample_seed, self.store.len(), sample_size)?;

        let (ids, rows): (Vec<CustomerId>, Vec<Vec<f64>>) = positions
            .into_iter()
            .map(|position| {
                self.store
                    .scaled_row_at(position)
                    .map(|(id, row)| (id, row.to_vec()))
                    .ok_or_else(|| DomainError::internal(format!("no customer at position {}", position)))
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .unzip();

        let explanation = self.attribute(None, ids, rows)?;

        record_explanation("global", sample_size);
        Ok(explanation)
    }

    fn attribute(
        &self,
        id: Option<CustomerId>,
        ids: Vec<CustomerId>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Explanation, DomainError> {
        let shap_values = self
            .explainer
            .shap_values(&rows, Additivity::Relaxed)
            .map_err(DomainError::into_internal)?;

        if shap_values.len() != rows.len() {
            return Err(DomainError::internal(format!(
                "explainer returned {} attribution rows for {} customers",
                shap_values.len(),
                rows.len()
            )));
        }

        Ok(Explanation::new(
            id,
            ids,
            self.store.feature_names(),
            &rows,
            shap_values,
            self.explainer.expected_value(),
        ))
    }

    /// Parse the identifier and check it names a customer or the sentinel
    fn resolve(&self, raw_id: &str) -> Result<CustomerRef, DomainError> {
        let target = parse_customer_ref(raw_id)?;

        match target {
            CustomerRef::Customer(id) if !self.store.exists(id) => {
                Err(DomainError::customer_not_found())
            }
            _ => Ok(target),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::classifier::MockClassifier;
    use crate::domain::explain::MockExplainer;
    use crate::domain::{Decision, FeatureTable, DEFAULT_SAMPLE_SEED};

    pub(crate) fn sample_store() -> Arc<CustomerStore> {
        let table = FeatureTable::new(
            vec!["AMT_INCOME".to_string(), "DAYS_BIRTH".to_string()],
            vec![CustomerId::new(100), CustomerId::new(101), CustomerId::new(102)],
            vec![
                vec![1000.0, -12000.0],
                vec![2000.0, -15000.0],
                vec![3000.0, -9000.0],
            ],
        )
        .unwrap();

        Arc::new(CustomerStore::build(table).unwrap())
    }

    /// Explainer that attributes each feature its own scaled value.
    /// Only answers calls made with relaxed additivity.
    pub(crate) fn echo_explainer(baseline: f64) -> MockExplainer {
        let mut explainer = MockExplainer::new();
        explainer.expect_expected_value().return_const(baseline);
        explainer
            .expect_shap_values()
            .withf(|_, additivity| *additivity == Additivity::Relaxed)
            .returning(|rows, _| Ok(rows.to_vec()));
        explainer
    }

    pub(crate) fn fixed_classifier(probability: f64) -> MockClassifier {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_predict_proba()
            .returning(move |_| Ok(probability));
        classifier
    }

    pub(crate) fn service(probability: f64) -> ScoringService {
        ScoringService::new(
            sample_store(),
            Arc::new(fixed_classifier(probability)),
            Arc::new(echo_explainer(-2.0)),
            DEFAULT_SAMPLE_SEED,
        )
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_list_customers() {
        let data = service(0.5).customer("-1", &params(&[])).unwrap();
        assert_eq!(
            data,
            CustomerData::Ids(vec![
                CustomerId::new(100),
                CustomerId::new(101),
                CustomerId::new(102)
            ])
        );
    }

    #[test]
    fn test_customer_features_scaled_and_raw() {
        let service = service(0.5);

        let CustomerData::Features(scaled) = service.customer("100", &params(&[])).unwrap() else {
            panic!("expected features");
        };
        assert_eq!(scaled["AMT_INCOME"], -1.0);

        let CustomerData::Features(raw) = service
            .customer("100", &params(&[("view", "raw")]))
            .unwrap()
        else {
            panic!("expected features");
        };
        assert_eq!(raw["AMT_INCOME"], 1000.0);
    }

    #[test]
    fn test_unknown_customer_not_found_everywhere() {
        let service = service(0.5);
        let threshold = params(&[("threshold", "0.5")]);

        assert!(matches!(
            service.customer("999", &threshold),
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.predict("999", &threshold),
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.explain("999", &threshold),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_id_is_internal() {
        assert!(matches!(
            service(0.5).predict("12a", &params(&[("threshold", "0.5")])),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_membership_checked_before_parameters() {
        // unknown id without threshold is still 404
        assert!(matches!(
            service(0.5).predict("999", &params(&[])),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_predict_rejects_sentinel() {
        assert!(matches!(
            service(0.5).predict("-1", &params(&[("threshold", "0.5")])),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_predict_decision() {
        let prediction = service(0.42)
            .predict("100", &params(&[("threshold", "0.5")]))
            .unwrap();

        assert_eq!(prediction.id, CustomerId::new(100));
        assert_eq!(prediction.threshold, 0.5);
        assert_eq!(prediction.probability, 0.42);
        assert_eq!(prediction.decision, Decision::Grant);
    }

    #[test]
    fn test_predict_tie_is_granted() {
        let prediction = service(0.5)
            .predict("101", &params(&[("threshold", "0.5")]))
            .unwrap();
        assert_eq!(prediction.decision, Decision::Grant);
    }

    #[test]
    fn test_predict_parameter_errors() {
        let service = service(0.5);

        assert_eq!(
            service.predict("100", &params(&[])).unwrap_err(),
            DomainError::missing_parameter("threshold")
        );
        assert!(matches!(
            service.predict("100", &params(&[("threshold", "abc")])),
            Err(DomainError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_classifier_failure_is_internal() {
        let mut classifier = MockClassifier::new();
        classifier
            .expect_predict_proba()
            .returning(|_| Err(DomainError::not_found("leaf index out of range")));

        let service = ScoringService::new(
            sample_store(),
            Arc::new(classifier),
            Arc::new(echo_explainer(0.0)),
            DEFAULT_SAMPLE_SEED,
        );

        assert_eq!(
            service.predict("100", &params(&[("threshold", "0.5")])).unwrap_err(),
            DomainError::internal("leaf index out of range")
        );
    }

    #[test]
    fn test_out_of_range_probability_is_internal() {
        assert!(matches!(
            service(1.5).predict("100", &params(&[("threshold", "0.5")])),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_local_explanation() {
        let explanation = service(0.5).explain("101", &params(&[])).unwrap();

        assert_eq!(explanation.id, Some(CustomerId::new(101)));
        assert_eq!(explanation.customer_ids, vec![CustomerId::new(101)]);
        assert_eq!(explanation.shap_values, vec![vec![0.0, -1.0]]);
        assert_eq!(explanation.expected_value, -2.0);
    }

    #[test]
    fn test_global_explanation_is_deterministic() {
        let service = service(0.5);
        let sample = params(&[("n_customers", "2")]);

        let first = service.explain("-1", &sample).unwrap();
        let second = service.explain("-1", &sample).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, None);
        assert_eq!(first.customer_ids.len(), 2);
        assert_eq!(first.shap_values.len(), 2);
    }

    #[test]
    fn test_global_and_local_share_baseline() {
        let service = service(0.5);

        let global = service.explain("-1", &params(&[("n_customers", "3")])).unwrap();
        let local = service.explain("100", &params(&[])).unwrap();

        assert_eq!(global.expected_value, local.expected_value);
    }

    #[test]
    fn test_global_rows_match_sampled_customers() {
        let service = service(0.5);
        let explanation = service.explain("-1", &params(&[("n_customers", "3")])).unwrap();

        for (id, attributions) in explanation.customer_ids.iter().zip(&explanation.shap_values) {
            assert_eq!(attributions.as_slice(), service.store().scaled_row(*id).unwrap());
        }
    }

    #[test]
    fn test_global_sample_size_errors() {
        let service = service(0.5);

        assert!(matches!(
            service.explain("-1", &params(&[])),
            Err(DomainError::MissingParameter { .. })
        ));
        assert!(matches!(
            service.explain("-1", &params(&[("n_customers", "zero")])),
            Err(DomainError::InvalidParameter { .. })
        ));
        assert!(matches!(
            service.explain("-1", &params(&[("n_customers", "4")])),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_drifting_attributions_are_still_served() {
        // All-zero attributions reconstruct the baseline, not the model output
        let mut explainer = MockExplainer::new();
        explainer.expect_expected_value().return_const(-2.0);
        explainer
            .expect_shap_values()
            .times(2)
            .withf(|_, additivity| *additivity == Additivity::Relaxed)
            .returning(|rows, _| Ok(vec![vec![0.0; 2]; rows.len()]));

        let service = ScoringService::new(
            sample_store(),
            Arc::new(fixed_classifier(0.5)),
            Arc::new(explainer),
            DEFAULT_SAMPLE_SEED,
        );

        let local = service.explain("100", &params(&[])).unwrap();
        assert_eq!(local.shap_values, vec![vec![0.0, 0.0]]);

        let global = service.explain("-1", &params(&[("n_customers", "3")])).unwrap();
        assert_eq!(global.shap_values.len(), 3);
        assert_eq!(global.expected_value, -2.0);
    }

    #[test]
    fn test_explainer_failure_is_internal() {
        let mut explainer = MockExplainer::new();
        explainer.expect_expected_value().return_const(0.0);
        explainer
            .expect_shap_values()
            .returning(|_, _| Err(DomainError::configuration("tree mismatch")));

        let service = ScoringService::new(
            sample_store(),
            Arc::new(fixed_classifier(0.5)),
            Arc::new(explainer),
            DEFAULT_SAMPLE_SEED,
        );

        assert_eq!(
            service.explain("100", &params(&[])).unwrap_err(),
            DomainError::internal("tree mismatch")
        );
    }
}
