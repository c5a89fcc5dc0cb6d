//! 🧮 Cartesian-product catalogs for small boolean feature sets.
//!
//! Some dimensions are not discovered, they are declared: every combination of a
//! handful of booleans gets a row whether or not any microservice uses it. That
//! way a fact row's combination always has somewhere to point.
//!
//! Enumeration is nested over `(true, false)` per field, first field outermost,
//! and ids are 1-based enumeration positions:
//!
//! ```text
//!  id  secrets configmap volume
//!   1   True    True     True
//!   2   True    True     False
//!   3   True    False    True
//!  ...
//!   8   False   False    False
//! ```

use crate::keys::bool_text;

/// 🧱 OpenShift capabilities, in catalog column order.
pub const OPENSHIFT_FIELDS: [&str; 3] = ["secrets_enabled", "configmap_enabled", "volume_enabled"];

/// 🚦 Pipeline gates, in catalog column order.
pub const PIPELINE_FIELDS: [&str; 4] = ["securitygate", "unittests", "sonarqube", "qualitygate"];

/// 📚 A fully materialised boolean combination catalog.
#[derive(Debug, Clone)]
pub struct BoolCatalog {
    fields: &'static [&'static str],
    rows: Vec<Vec<bool>>,
}

impl BoolCatalog {
    /// 🔄 Enumerate all `2^n` combinations of `fields`.
    pub fn enumerate(fields: &'static [&'static str]) -> Self {
        let width = fields.len();
        let mut rows = Vec::with_capacity(1 << width);
        for position in 0..(1usize << width) {
            // -- bit set = false, most significant bit = first field
            let row = (0..width)
                .map(|field| position & (1 << (width - 1 - field)) == 0)
                .collect();
            rows.push(row);
        }
        Self { fields, rows }
    }

    pub fn openshift() -> Self {
        Self::enumerate(&OPENSHIFT_FIELDS)
    }

    pub fn pipeline() -> Self {
        Self::enumerate(&PIPELINE_FIELDS)
    }

    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    /// 🎯 The id of a combination. `None` only when the width does not match the catalog.
    pub fn id_of(&self, combination: &[bool]) -> Option<u64> {
        if combination.len() != self.fields.len() {
            return None;
        }
        let width = combination.len();
        let position = combination
            .iter()
            .enumerate()
            .filter(|(_, enabled)| !**enabled)
            .fold(0usize, |acc, (field, _)| acc | (1 << (width - 1 - field)));
        Some(position as u64 + 1)
    }

    /// 📜 `(id, combination)` in id order.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &[bool])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(position, row)| (position as u64 + 1, row.as_slice()))
    }

    /// 🖨️ Rows rendered for a directory table: id first, then `True`/`False` per field.
    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|(id, row)| {
                std::iter::once(id.to_string())
                    .chain(row.iter().map(|flag| bool_text(*flag).to_string()))
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
