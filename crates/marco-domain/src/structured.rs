//! Structured extraction results
//!
//! A [`StructuredResult`] holds fields that appeared before any section
//! header (the top level) and an ordered list of [`Section`]s. Both keep
//! insertion order; writing an existing key replaces its value in place.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Normalize a section name or field key.
///
/// Trims surrounding whitespace, lower-cases, and replaces each space with an
/// underscore. Distinct inputs such as "Net Income" and "net_income"
/// normalize to the same key.
///
/// # Examples
///
/// ```
/// use marco_domain::normalize_key;
///
/// assert_eq!(normalize_key("  Basic Information "), "basic_information");
/// assert_eq!(normalize_key("- Company Name"), "-_company_name");
/// ```
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// A named group of extracted fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    name: String,
    fields: Vec<(String, String)>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Normalized section name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in first-insertion order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Look up a field value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert a field; an existing key keeps its position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        upsert(&mut self.fields, key.into(), value.into());
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the section has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn clear(&mut self) {
        self.fields.clear();
    }
}

/// Nested key-value output of an analysis run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredResult {
    top_level: Vec<(String, String)>,
    sections: Vec<Section>,
}

impl StructuredResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields stored outside any section
    pub fn top_level(&self) -> &[(String, String)] {
        &self.top_level
    }

    /// Sections in first-encounter order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by normalized name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up a top-level field
    pub fn top_level_value(&self, key: &str) -> Option<&str> {
        self.top_level
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a field inside a section
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Set a top-level field (last write wins)
    pub fn insert_top_level(&mut self, key: impl Into<String>, value: impl Into<String>) {
        upsert(&mut self.top_level, key.into(), value.into());
    }

    /// Open a section, returning its index.
    ///
    /// Opening a name that already exists empties that section but keeps its
    /// position, matching a mapping that is re-assigned under the same key.
    pub fn open_section(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            self.sections[idx].clear();
            idx
        } else {
            self.sections.push(Section::new(name));
            self.sections.len() - 1
        }
    }

    /// Insert a field into the section at `index` (as returned by [`open_section`](Self::open_section))
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn insert_in_section(&mut self, index: usize, key: impl Into<String>, value: impl Into<String>) {
        self.sections[index].insert(key, value);
    }

    /// Mutable access to a section by name
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Whether no fields and no sections were extracted
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty() && self.sections.is_empty()
    }

    /// Total number of fields, top level and sectioned
    pub fn field_count(&self) -> usize {
        self.top_level.len() + self.sections.iter().map(Section::len).sum::<usize>()
    }

    /// Render in the canonical `key: value` / `# section` line format.
    ///
    /// Top-level fields come first so that re-parsing does not pull them into
    /// a section.
    pub fn to_canonical_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.top_level {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        for section in &self.sections {
            out.push_str(&format!("# {}\n", section.name));
            for (key, value) in &section.fields {
                out.push_str(&format!("{}: {}\n", key, value));
            }
        }
        out
    }

    /// Convert to a JSON object: string members for top-level fields, object
    /// members for sections. A section shadows a top-level field of the same name.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.top_level {
            if self.section(key).is_none() {
                map.insert(key.clone(), Value::String(value.clone()));
            }
        }
        for section in &self.sections {
            let fields: Map<String, Value> = section
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            map.insert(section.name.clone(), Value::Object(fields));
        }
        Value::Object(map)
    }

    /// Rebuild a result from its JSON form (e.g. a saved artifact).
    ///
    /// Scalars other than strings are kept as their JSON text; nulls become
    /// empty strings. Nested objects deeper than one level are rejected.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let object = value
            .as_object()
            .ok_or_else(|| "Expected a JSON object at the top level".to_string())?;

        let mut result = StructuredResult::new();
        for (key, member) in object {
            match member {
                Value::Object(fields) => {
                    let idx = result.open_section(key.clone());
                    for (field, field_value) in fields {
                        let text = scalar_text(field_value).ok_or_else(|| {
                            format!("Field '{}.{}' is not a scalar value", key, field)
                        })?;
                        result.insert_in_section(idx, field.clone(), text);
                    }
                }
                other => {
                    let text = scalar_text(other)
                        .ok_or_else(|| format!("Field '{}' is not a scalar value", key))?;
                    result.insert_top_level(key.clone(), text);
                }
            }
        }
        Ok(result)
    }
}

impl Serialize for StructuredResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = self
            .top_level
            .iter()
            .filter(|(k, _)| self.section(k).is_some())
            .count();
        let mut map = serializer.serialize_map(Some(self.top_level.len() - shadowed + self.sections.len()))?;
        for (key, value) in &self.top_level {
            if self.section(key).is_none() {
                map.serialize_entry(key, value)?;
            }
        }
        for section in &self.sections {
            map.serialize_entry(&section.name, &SectionFields(&section.fields))?;
        }
        map.end()
    }
}

struct SectionFields<'a>(&'a [(String, String)]);

impl Serialize for SectionFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn upsert(entries: &mut Vec<(String, String)>, key: String, value: String) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        entries.push((key, value));
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => Some(String::new()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(", ")),
        Value::Object(_) => None,
    }
}
