use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One source row: field name → value, in source column order.
///
/// Only fields actually present in the source are stored, so two rows of the same
/// topic may carry different field sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.insert(key, value);
        }
        record
    }

    /// Set `field`, replacing an existing value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Searchable text: the values of `fields` joined by single spaces, a missing field
    /// contributing an empty string.
    pub fn document_text(&self, fields: &[String]) -> String {
        fields
            .iter()
            .map(|field| self.get(field).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Keep `fields` in the given order, omitting the ones this row does not have.
    pub fn project(&self, fields: &[String]) -> ProjectedRecord {
        ProjectedRecord {
            fields: fields
                .iter()
                .filter_map(|field| {
                    self.get(field)
                        .map(|value| (field.clone(), value.to_string()))
                })
                .collect(),
        }
    }
}

/// Output view of a [`Record`]; serializes as a JSON object in projection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedRecord {
    fields: Vec<(String, String)>,
}

impl ProjectedRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ProjectedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Which fields feed the searchable text and which are returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    pub search_fields: Vec<String>,
    pub output_fields: Vec<String>,
}

impl FieldSet {
    pub fn new<S: Into<String>>(
        search_fields: impl IntoIterator<Item = S>,
        output_fields: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            output_fields: output_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Configured fields (search or output) that are not among `available`, in
    /// configuration order without duplicates.
    pub fn missing_from(&self, available: &[String]) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for field in self.search_fields.iter().chain(&self.output_fields) {
            if !available.contains(field) && !missing.contains(field) {
                missing.push(field.clone());
            }
        }
        missing
    }
}
