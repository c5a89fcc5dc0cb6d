//! 🔐 Token resolver: pairing a microservice's `tokenOcp` with an actual secret.
//!
//! 🎬 *[the config says `ocTokenApp`. the catalog says `OCTOKENAPPuat`. they were
//! always meant to be together. they just needed an environment suffix and a
//! lowercase comparison.]*
//!
//! The catalog is a flat JSON object of token name → secret, loaded once per run
//! and never mutated. Resolution glues the environment's token suffix onto the
//! base name and looks it up case-insensitively. A miss is not an error: tokens
//! are optional, so a miss resolves to two empty strings. 🦆

use std::collections::HashMap;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::environment::Environment;
use crate::keys::value_text;

/// 🎟️ What a lookup produced: the catalog key as spelled in the catalog, plus its secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResolvedToken {
    pub key: String,
    pub secret: String,
}

impl ResolvedToken {
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.secret.is_empty()
    }
}

/// 📚 The read-only token catalog.
#[derive(Debug, Clone, Default)]
pub struct TokenCatalog {
    entries: IndexMap<String, String>,
    // -- lowercase key → position in `entries`; first spelling wins on collisions
    index: HashMap<String, usize>,
}

impl TokenCatalog {
    /// 🔧 Parse the catalog from its JSON text. Anything but a flat object is fatal.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(text)
            .context("💀 The token catalog is not a JSON object of name → secret. Nothing downstream can resolve a token without it.")?;
        Ok(Self::from_entries(
            raw.into_iter().map(|(name, secret)| (name, value_text(&secret))),
        ))
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries: IndexMap<String, String> = entries.into_iter().collect();
        let mut index = HashMap::with_capacity(entries.len());
        for (position, name) in entries.keys().enumerate() {
            index.entry(name.to_lowercase()).or_insert(position);
        }
        Self { entries, index }
    }

    /// 🎯 Resolve `base_name` for `env`, e.g. `ocTokenApp` + qa → `ocTokenAppuat`.
    pub fn resolve(&self, base_name: &str, env: Environment) -> ResolvedToken {
        if base_name.is_empty() {
            return ResolvedToken::default();
        }
        let candidate = format!("{}{}", base_name, env.token_suffix()).to_lowercase();
        self.index
            .get(&candidate)
            .and_then(|position| self.entries.get_index(*position))
            .map(|(key, secret)| ResolvedToken {
                key: key.clone(),
                secret: secret.clone(),
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
