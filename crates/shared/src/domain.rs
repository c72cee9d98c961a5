use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownField;

pub const FIELD_COUNT: usize = 30;

macro_rules! measurement_fields {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// One of the registered diagnostic measurements, in registry order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Field {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Field {
            pub const ALL: [Field; FIELD_COUNT] = [$(Field::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)+
                }
            }
        }
    };
}

measurement_fields! {
    RadiusMean => "radius_mean",
    TextureMean => "texture_mean",
    PerimeterMean => "perimeter_mean",
    AreaMean => "area_mean",
    SmoothnessMean => "smoothness_mean",
    CompactnessMean => "compactness_mean",
    ConcavityMean => "concavity_mean",
    ConcavePointsMean => "concave_points_mean",
    SymmetryMean => "symmetry_mean",
    FractalDimensionMean => "fractal_dimension_mean",
    RadiusSe => "radius_se",
    TextureSe => "texture_se",
    PerimeterSe => "perimeter_se",
    AreaSe => "area_se",
    SmoothnessSe => "smoothness_se",
    CompactnessSe => "compactness_se",
    ConcavitySe => "concavity_se",
    ConcavePointsSe => "concave_points_se",
    SymmetrySe => "symmetry_se",
    FractalDimensionSe => "fractal_dimension_se",
    RadiusWorst => "radius_worst",
    TextureWorst => "texture_worst",
    PerimeterWorst => "perimeter_worst",
    AreaWorst => "area_worst",
    SmoothnessWorst => "smoothness_worst",
    CompactnessWorst => "compactness_worst",
    ConcavityWorst => "concavity_worst",
    ConcavePointsWorst => "concave_points_worst",
    SymmetryWorst => "symmetry_worst",
    FractalDimensionWorst => "fractal_dimension_worst",
}

impl Field {
    /// Position of the field in registry order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> String {
        format_label(self.name())
    }

    pub fn placeholder(self) -> String {
        placeholder(self.name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Raw value every field starts with when a form session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFill {
    #[default]
    Blank,
    Zero,
}

impl DefaultFill {
    pub fn raw_value(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::Zero => "0",
        }
    }
}

impl FromStr for DefaultFill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blank" | "empty" => Ok(Self::Blank),
            "zero" | "0" => Ok(Self::Zero),
            other => Err(format!("unknown default fill '{other}' (expected 'blank' or 'zero')")),
        }
    }
}

/// `concave_points_mean` -> `Concave Points Mean`.
pub fn format_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn placeholder(name: &str) -> String {
    format!("Enter {}", format_label(name).to_lowercase())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn registry_has_thirty_unique_names() {
        let names: HashSet<&str> = Field::ALL.iter().map(|field| field.name()).collect();
        assert_eq!(names.len(), FIELD_COUNT);
    }

    #[test]
    fn index_matches_registry_position() {
        for (position, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), position);
        }
        assert_eq!(Field::ALL[0], Field::RadiusMean);
        assert_eq!(Field::ALL[FIELD_COUNT - 1], Field::FractalDimensionWorst);
    }

    #[test]
    fn formats_labels_from_snake_case() {
        assert_eq!(format_label("concave_points_worst"), "Concave Points Worst");
        assert_eq!(format_label("concave_points_mean"), "Concave Points Mean");
        assert_eq!(format_label("area_se"), "Area Se");
        assert_eq!(format_label("radius"), "Radius");
        assert_eq!(format_label(""), "");
    }

    #[test]
    fn placeholder_uses_lowercased_label() {
        assert_eq!(
            Field::FractalDimensionMean.placeholder(),
            "Enter fractal dimension mean"
        );
    }

    #[test]
    fn parses_field_names_and_rejects_unknown_keys() {
        assert_eq!(
            "symmetry_se".parse::<Field>().expect("field"),
            Field::SymmetrySe
        );
        let err = "diagnosis".parse::<Field>().expect_err("unknown");
        assert_eq!(err, UnknownField("diagnosis".to_string()));
    }

    #[test]
    fn serializes_as_snake_case_name() {
        let json = serde_json::to_string(&Field::ConcavePointsSe).expect("json");
        assert_eq!(json, "\"concave_points_se\"");
        let back: Field = serde_json::from_str(&json).expect("field");
        assert_eq!(back, Field::ConcavePointsSe);
    }

    #[test]
    fn default_fill_parses_from_config_strings() {
        assert_eq!("blank".parse::<DefaultFill>(), Ok(DefaultFill::Blank));
        assert_eq!(" Zero ".parse::<DefaultFill>(), Ok(DefaultFill::Zero));
        assert!("prefilled".parse::<DefaultFill>().is_err());
        assert_eq!(DefaultFill::Zero.raw_value(), "0");
        assert_eq!(DefaultFill::default().raw_value(), "");
    }
}
