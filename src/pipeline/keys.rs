use std::collections::HashMap;

/// Maps label strings to dense numeric keys, assigned in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueToKey {
    values: Vec<String>,
    keys: HashMap<String, usize>,
}

impl ValueToKey {
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut mapping = ValueToKey::default();
        for label in labels {
            if !mapping.keys.contains_key(label) {
                mapping.keys.insert(label.to_string(), mapping.values.len());
                mapping.values.push(label.to_string());
            }
        }
        mapping
    }

    pub fn key(&self, value: &str) -> Option<usize> {
        self.keys.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The decoding step that undoes this mapping
    pub fn inverse(&self) -> KeyToValue {
        KeyToValue {
            values: self.values.clone(),
        }
    }
}

/// Maps numeric keys back to the label strings they were assigned from.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyToValue {
    values: Vec<String>,
}

impl KeyToValue {
    pub fn value(&self, key: usize) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Labels indexed by key
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
