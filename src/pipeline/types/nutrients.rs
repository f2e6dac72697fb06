use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The fixed set of nutrients the pipeline reports. The lookup service
/// returns many more; everything outside this set is dropped at the client
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutrientKey {
    Energy,
    Protein,
    Carbohydrate,
    Fat,
    Fiber,
    Sugar,
}

impl NutrientKey {
    pub const ALL: [NutrientKey; 6] = [
        NutrientKey::Energy,
        NutrientKey::Protein,
        NutrientKey::Carbohydrate,
        NutrientKey::Fat,
        NutrientKey::Fiber,
        NutrientKey::Sugar,
    ];

    /// The nutrient code used on the wire by the lookup service.
    pub fn service_code(self) -> &'static str {
        match self {
            NutrientKey::Energy => "ENERC_KCAL",
            NutrientKey::Protein => "PROCNT",
            NutrientKey::Carbohydrate => "CHOCDF",
            NutrientKey::Fat => "FAT",
            NutrientKey::Fiber => "FIBTG",
            NutrientKey::Sugar => "SUGAR",
        }
    }

    pub fn from_service_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.service_code() == code)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NutrientKey::Energy => "Calories",
            NutrientKey::Protein => "Protein",
            NutrientKey::Carbohydrate => "Carbs",
            NutrientKey::Fat => "Fat",
            NutrientKey::Fiber => "Fiber",
            NutrientKey::Sugar => "Sugar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrient {
    pub quantity: f64,
    pub unit: String,
}

/// Sparse nutrient mapping. A missing key means the service did not report
/// that nutrient; it is never conflated with a zero quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientSet {
    nutrients: IndexMap<NutrientKey, Nutrient>,
}

impl NutrientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: NutrientKey, nutrient: Nutrient) {
        self.nutrients.insert(key, nutrient);
    }

    pub fn get(&self, key: NutrientKey) -> Option<&Nutrient> {
        self.nutrients.get(&key)
    }

    pub fn len(&self) -> usize {
        self.nutrients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nutrients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NutrientKey, &Nutrient)> {
        self.nutrients.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_codes_round_trip() {
        for key in NutrientKey::ALL {
            assert_eq!(NutrientKey::from_service_code(key.service_code()), Some(key));
        }
    }

    #[test]
    fn unknown_service_code_is_not_a_key() {
        assert_eq!(NutrientKey::from_service_code("CHOLE"), None);
        assert_eq!(NutrientKey::from_service_code(""), None);
    }

    #[test]
    fn absent_nutrient_reads_as_none() {
        let mut set = NutrientSet::new();
        set.insert(
            NutrientKey::Energy,
            Nutrient {
                quantity: 52.0,
                unit: "kcal".to_string(),
            },
        );
        assert!(set.get(NutrientKey::Protein).is_none());
        assert_eq!(set.get(NutrientKey::Energy).unwrap().quantity, 52.0);
    }
}
