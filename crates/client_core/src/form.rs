use shared::{
    domain::{DefaultFill, Field, FIELD_COUNT},
    protocol::MeasurementVector,
};

/// Raw, unvalidated values for every registered field in one form session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; FIELD_COUNT],
}

impl FieldSet {
    pub fn new(fill: DefaultFill) -> Self {
        Self {
            values: std::array::from_fn(|_| fill.raw_value().to_string()),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, raw: impl Into<String>) {
        self.values[field.index()] = raw.into();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .into_iter()
            .map(move |field| (field, self.values[field.index()].as_str()))
    }

    /// Never fails: entries that do not parse to a finite number are sent as `0.0`.
    pub fn to_measurement_vector(&self) -> MeasurementVector {
        MeasurementVector::from_fn(|field| parse_measurement(self.get(field)))
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self::new(DefaultFill::default())
    }
}

pub fn parse_measurement(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_uses_one_fill_for_every_field() {
        let blank = FieldSet::new(DefaultFill::Blank);
        assert!(blank.iter().all(|(_, raw)| raw.is_empty()));
        assert_eq!(blank.iter().count(), FIELD_COUNT);

        let zeroed = FieldSet::new(DefaultFill::Zero);
        assert!(zeroed.iter().all(|(_, raw)| raw == "0"));
    }

    #[test]
    fn unparseable_values_convert_to_zero() {
        for raw in ["", "abc", "NaN", "nan", "inf", "-infinity", "1.2.3", "3.5abc", "   "] {
            assert_eq!(parse_measurement(raw), 0.0, "raw value {raw:?}");
        }
    }

    #[test]
    fn parseable_values_convert_exactly() {
        assert_eq!(parse_measurement("3.14"), 3.14);
        assert_eq!(parse_measurement(" 17.99 "), 17.99);
        assert_eq!(parse_measurement("-0.5"), -0.5);
        assert_eq!(parse_measurement("1e-3"), 0.001);
        assert_eq!(parse_measurement(".07871"), 0.07871);
        assert_eq!(parse_measurement("0.1189").to_string(), "0.1189");
    }

    #[test]
    fn all_blank_set_converts_to_all_zero_vector() {
        let vector = FieldSet::default().to_measurement_vector();
        assert_eq!(vector.iter().count(), FIELD_COUNT);
        assert!(vector.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn conversion_keeps_values_keyed_by_field() {
        let mut fields = FieldSet::default();
        fields.set(Field::RadiusMean, "17.99");
        fields.set(Field::TextureWorst, "not a number");
        fields.set(Field::FractalDimensionSe, "0.006193");

        let vector = fields.to_measurement_vector();
        assert_eq!(vector.get(Field::RadiusMean), 17.99);
        assert_eq!(vector.get(Field::TextureWorst), 0.0);
        assert_eq!(vector.get(Field::FractalDimensionSe), 0.006193);
        assert!(vector.iter().all(|(_, value)| value.is_finite()));
    }
}
