//! Key Selection
//!
//! A read or delete addresses either one key or an ordered list of keys.

/// One key, or several keys in caller order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keys {
    One(String),
    Many(Vec<String>),
}

impl Keys {
    /// True when there is nothing usable to address: an empty key, an empty
    /// list, or a list containing an empty key.
    pub fn is_blank(&self) -> bool {
        match self {
            Keys::One(key) => key.is_empty(),
            Keys::Many(keys) => keys.is_empty() || keys.iter().any(String::is_empty),
        }
    }

    /// Normalizes to a list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Keys::One(key) => vec![key],
            Keys::Many(keys) => keys,
        }
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Keys::One(key.to_string())
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Keys::One(key)
    }
}

impl From<Vec<String>> for Keys {
    fn from(keys: Vec<String>) -> Self {
        Keys::Many(keys)
    }
}

impl From<Vec<&str>> for Keys {
    fn from(keys: Vec<&str>) -> Self {
        Keys::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Keys {
    fn from(keys: &[&str]) -> Self {
        Keys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<&[String]> for Keys {
    fn from(keys: &[String]) -> Self {
        Keys::Many(keys.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(keys: [&str; N]) -> Self {
        Keys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}
