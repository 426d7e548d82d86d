use serde::Serialize;

use crate::domain::CustomerId;

/// Loan decision: `Deny` is emitted when default risk is above threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Grant,
    Deny,
}

impl Decision {
    pub fn as_flag(&self) -> u8 {
        match self {
            Self::Grant => 0,
            Self::Deny => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grant => "grant",
            Self::Deny => "deny",
        }
    }
}

impl Serialize for Decision {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_flag())
    }
}

/// Strict comparison: a probability equal to the threshold is granted.
pub fn decide(probability: f64, threshold: f64) -> Decision {
    if probability > threshold {
        Decision::Deny
    } else {
        Decision::Grant
    }
}

/// Outcome of a single prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(rename = "id_")]
    pub id: CustomerId,
    pub threshold: f64,
    #[serde(rename = "predict")]
    pub decision: Decision,
    pub probability: f64,
}

impl Prediction {
    pub fn new(id: CustomerId, threshold: f64, probability: f64) -> Self {
        Self {
            id,
            threshold,
            decision: decide(probability, threshold),
            probability,
        }
    }
}
