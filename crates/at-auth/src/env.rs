//! Environment lookup used as a fallback for unset credentials.

use std::collections::HashMap;
use std::sync::Arc;

/// Environment variables consulted for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["AIRTABLE_API_KEY", "AIRTABLE_KEY"];

/// Environment variables consulted for the API base URL, in order.
pub const API_BASE_VARS: [&str; 2] = ["AIRTABLE_API_BASE", "AIRTABLE_API"];

/// Source of fallback configuration values.
///
/// `System` reads the process environment at lookup time, so a variable set
/// after the credentials were built is still picked up. `Fixed` holds a
/// snapshot and never touches the process environment.
#[derive(Clone, Default)]
pub enum Environment {
    #[default]
    System,
    Fixed(Arc<HashMap<String, String>>),
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::System => f.write_str("Environment::System"),
            Environment::Fixed(vars) => f
                .debug_tuple("Environment::Fixed")
                .field(&vars.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl Environment {
    /// The process environment.
    pub fn system() -> Self {
        Environment::System
    }

    /// A fixed set of variables.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Environment::Fixed(Arc::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// An environment with no variables at all.
    pub fn empty() -> Self {
        Environment::Fixed(Arc::new(HashMap::new()))
    }

    /// Look up a variable. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self {
            Environment::System => std::env::var(key).ok(),
            Environment::Fixed(vars) => vars.get(key).cloned(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// First non-empty value among `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.get(key))
    }
}
