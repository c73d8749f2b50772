//! Algorithm catalog: which mechanisms a session should try to benchmark.
//!
//! ```json
//! {
//!   "kems":       { "ml-kem": ["ML-KEM-512", ...], "hqc": ["HQC-128", ...] },
//!   "signatures": { "ml-dsa": ["ML-DSA-44", ...], "slh-dsa": [...] }
//! }
//! ```
//!
//! Category keys are kept as plain strings so a catalog naming a category this
//! build does not know still loads; the validator reports such entries as
//! disabled. Sections keep the file's category order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{BenchError, Result};
use crate::schema::{Category, OperationShape};

/// One cryptographic mechanism to benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlgorithmDescriptor {
    pub name: String,
    pub category: Category,
}

impl AlgorithmDescriptor {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    pub fn shape(&self) -> OperationShape {
        self.category.shape()
    }
}

/// Category key to mechanism names, in the order the catalog lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct CatalogSection(Vec<(String, Vec<String>)>);

impl CatalogSection {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, names)| names.as_slice())
    }

    /// Set the names under `key`, keeping its position if already present.
    pub fn insert(&mut self, key: impl Into<String>, names: Vec<String>) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = names,
            None => self.0.push((key, names)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, names)| (k.as_str(), names.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for CatalogSection {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        map.into_iter()
            .map(|(key, names)| Ok((key, serde_json::from_value(names)?)))
            .collect::<std::result::Result<Vec<_>, Self::Error>>()
            .map(Self)
    }
}

impl From<CatalogSection> for Map<String, Value> {
    fn from(section: CatalogSection) -> Self {
        section
            .0
            .into_iter()
            .map(|(key, names)| (key, Value::from(names)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmCatalog {
    #[serde(default)]
    pub kems: CatalogSection,
    #[serde(default)]
    pub signatures: CatalogSection,
}

impl AlgorithmCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BenchError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| BenchError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Every NIST parameter set this crate knows how to benchmark.
    pub fn builtin() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        let mut kems = CatalogSection::default();
        kems.insert(
            "ml-kem",
            names(&["ML-KEM-512", "ML-KEM-768", "ML-KEM-1024"]),
        );
        kems.insert(
            "hqc",
            names(&["HQC-128", "HQC-192", "HQC-256"]),
        );

        let mut signatures = CatalogSection::default();
        signatures.insert(
            "ml-dsa",
            names(&["ML-DSA-44", "ML-DSA-65", "ML-DSA-87"]),
        );
        signatures.insert(
            "slh-dsa",
            names(&[
                "SLH-DSA-SHA2-128s",
                "SLH-DSA-SHA2-128f",
                "SLH-DSA-SHA2-192s",
                "SLH-DSA-SHA2-192f",
                "SLH-DSA-SHA2-256s",
                "SLH-DSA-SHA2-256f",
                "SLH-DSA-SHAKE-128s",
                "SLH-DSA-SHAKE-128f",
                "SLH-DSA-SHAKE-192s",
                "SLH-DSA-SHAKE-192f",
                "SLH-DSA-SHAKE-256s",
                "SLH-DSA-SHAKE-256f",
            ]),
        );

        Self { kems, signatures }
    }

    /// Names listed under `category`, in catalog order.
    pub fn names(&self, category: Category) -> &[String] {
        let Some(key) = category.catalog_key() else {
            return &[];
        };
        let section = match category.shape() {
            OperationShape::Kem => &self.kems,
            OperationShape::Signature => &self.signatures,
        };
        section.get(key).unwrap_or(&[])
    }
}
