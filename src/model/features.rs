use serde::{Deserialize, Serialize};

/// Names of every `CarFeatures` field, in declaration order.
pub const FEATURE_NAMES: [&str; 5] = ["name", "company", "year", "kms_driven", "fuel_type"];

/// The categorical subset of `FEATURE_NAMES`.
pub const TEXT_FEATURES: [&str; 3] = ["name", "company", "fuel_type"];

/// One car to price, exactly as submitted by the client.
///
/// `year` and `kms_driven` are strict JSON integers: `"2015"` and `2015.0`
/// are rejected rather than coerced.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CarFeatures {
    pub name: String,
    pub company: String,
    pub year: i64,
    pub kms_driven: i64,
    pub fuel_type: String,
}

/// A single input column of the feature record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureValue<'a> {
    Text(&'a str),
    Integer(i64),
}

impl CarFeatures {
    /// Looks up a field by its column name.
    pub fn value(&self, field: &str) -> Option<FeatureValue<'_>> {
        match field {
            "name" => Some(FeatureValue::Text(&self.name)),
            "company" => Some(FeatureValue::Text(&self.company)),
            "year" => Some(FeatureValue::Integer(self.year)),
            "kms_driven" => Some(FeatureValue::Integer(self.kms_driven)),
            "fuel_type" => Some(FeatureValue::Text(&self.fuel_type)),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PricePrediction {
    pub predicted_price: f64,
}

impl PricePrediction {
    pub fn from_raw(price: f64) -> Self {
        Self {
            predicted_price: round2(price),
        }
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    // From 2^52 up every f64 is integral; scaling there could overflow.
    if value.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swift() -> CarFeatures {
        CarFeatures {
            name: "Maruti Suzuki Swift".to_string(),
            company: "Maruti".to_string(),
            year: 2015,
            kms_driven: 40000,
            fuel_type: "Petrol".to_string(),
        }
    }

    #[test]
    fn test_value_lookup() {
        let car = swift();
        assert_eq!(car.value("company"), Some(FeatureValue::Text("Maruti")));
        assert_eq!(car.value("year"), Some(FeatureValue::Integer(2015)));
        assert_eq!(car.value("kms_driven"), Some(FeatureValue::Integer(40000)));
        assert_eq!(car.value("colour"), None);
    }

    #[test]
    fn test_every_feature_name_resolves() {
        let car = swift();
        for name in FEATURE_NAMES {
            assert!(car.value(name).is_some(), "{name} did not resolve");
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(345678.456), 345678.46);
        assert_eq!(round2(-1234.561), -1234.56);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_round2_huge_values_stay_finite() {
        for raw in [1e15, 3.5e307, -f64::MAX, f64::MAX] {
            let rounded = round2(raw);
            assert!(rounded.is_finite(), "{raw} rounded to {rounded}");
            assert_eq!(rounded, raw);
        }

        let body = serde_json::to_value(PricePrediction::from_raw(1.7e308)).unwrap();
        assert_eq!(body["predicted_price"].as_f64(), Some(1.7e308));
    }

    #[test]
    fn test_integer_fields_are_strict() {
        for body in [
            r#"{"name":"Swift","company":"Maruti","year":"2015","kms_driven":1,"fuel_type":"Petrol"}"#,
            r#"{"name":"Swift","company":"Maruti","year":2015.0,"kms_driven":1,"fuel_type":"Petrol"}"#,
        ] {
            assert!(serde_json::from_str::<CarFeatures>(body).is_err(), "{body} was accepted");
        }
    }

    #[test]
    fn test_prediction_keeps_negative_values() {
        assert_eq!(PricePrediction::from_raw(-50.004).predicted_price, -50.0);
    }

    #[test]
    fn test_rounded_value_has_two_decimals_at_most() {
        for raw in [0.1234, 987654.321987, 1.005, 42.0, -7.777] {
            let price = PricePrediction::from_raw(raw).predicted_price;
            let rendered = serde_json::to_string(&price).unwrap();
            let decimals = rendered.split('.').nth(1).map_or(0, str::len);
            assert!(decimals <= 2, "{raw} rendered as {rendered}");
        }
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let car: CarFeatures = serde_json::from_str(
            r#"{"name":"Swift","company":"Maruti","year":2015,"kms_driven":1,"fuel_type":"Petrol","colour":"red"}"#,
        )
        .unwrap();
        assert_eq!(car.name, "Swift");
    }
}
