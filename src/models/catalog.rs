use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

/// A streaming service the user can select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformRef {
    /// Key used in API calls (`provider` parameter) and in selections
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// Ordered country code -> display name mapping
///
/// Deserializes from a JSON object and keeps the object's key order, which is
/// the order countries are scanned in. Serializes as a list of [`Country`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryMap {
    entries: Vec<Country>,
}

impl CountryMap {
    /// Builds a map from `(code, name)` pairs. A repeated code keeps its first
    /// position and name.
    pub fn from_pairs<I, C, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let mut map = CountryMap::default();
        for (code, name) in pairs {
            map.insert(code.into(), name.into());
        }
        map
    }

    fn insert(&mut self, code: String, name: String) {
        if self.name_of(&code).is_none() {
            self.entries.push(Country { code, name });
        }
    }

    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|country| country.code == code)
            .map(|country| country.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.entries.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|country| country.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CountryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

impl<'de> Deserialize<'de> for CountryMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountryMapVisitor;

        impl<'de> Visitor<'de> for CountryMapVisitor {
            type Value = CountryMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping country codes to names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CountryMap, A::Error> {
                let mut map = CountryMap::default();
                while let Some((code, name)) = access.next_entry::<String, String>()? {
                    map.insert(code, name);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(CountryMapVisitor)
    }
}
