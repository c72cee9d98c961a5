use std::fmt;

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::domain::{Field, FIELD_COUNT};

/// Fully numeric request body: every registered field mapped to a finite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementVector {
    values: [f64; FIELD_COUNT],
}

impl MeasurementVector {
    /// Builds a vector from a per-field producer. Non-finite values become `0.0`.
    pub fn from_fn(mut value_of: impl FnMut(Field) -> f64) -> Self {
        let mut values = [0.0; FIELD_COUNT];
        for field in Field::ALL {
            values[field.index()] = finite_or_zero(value_of(field));
        }
        Self { values }
    }

    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL
            .into_iter()
            .map(move |field| (field, self.values[field.index()]))
    }
}

impl Serialize for MeasurementVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.name(), &value)?;
        }
        map.end()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler_loaded: Option<bool>,
}

/// Classification returned by the service. Unrecognized labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionLabel {
    Malignant,
    Benign,
    Other(String),
}

impl PredictionLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Malignant => "Malignant",
            Self::Benign => "Benign",
            Self::Other(label) => label,
        }
    }

    pub fn is_malignant(&self) -> bool {
        matches!(self, Self::Malignant)
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Malignant => {
                "The cell type is predicted to be malignant. Please consult with a healthcare professional."
            }
            Self::Benign => {
                "The cell type is predicted to be benign. However, please consult with a healthcare professional for confirmation."
            }
            Self::Other(_) => {
                "The service returned an unrecognized classification. Please consult with a healthcare professional."
            }
        }
    }
}

impl From<String> for PredictionLabel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Malignant" => Self::Malignant,
            "Benign" => Self::Benign,
            _ => Self::Other(value),
        }
    }
}

impl From<PredictionResponse> for PredictionLabel {
    fn from(value: PredictionResponse) -> Self {
        value.prediction.into()
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
