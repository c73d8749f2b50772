//! Algorithm availability: which catalog entries the provider can actually run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use tracing::{info, warn};

use crate::catalog::{AlgorithmCatalog, AlgorithmDescriptor};
use crate::provider::Provider;
use crate::schema::{Category, OperationShape};

/// Status of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Key the name was listed under in the catalog.
    pub catalog_key: String,
    /// `None` when the key is not a category of this section.
    pub category: Option<Category>,
    pub enabled: bool,
}

/// Catalog entries partitioned per category, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct Availability {
    kems: Vec<Entry>,
    signatures: Vec<Entry>,
    enabled: BTreeMap<Category, Vec<String>>,
}

impl Availability {
    /// Enabled names for `category`, in catalog order.
    pub fn enabled(&self, category: Category) -> &[String] {
        self.enabled.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn descriptors(&self, category: Category) -> Vec<AlgorithmDescriptor> {
        self.enabled(category)
            .iter()
            .map(|name| AlgorithmDescriptor::new(name.clone(), category))
            .collect()
    }

    pub fn disabled(&self) -> impl Iterator<Item = &Entry> {
        self.entries().filter(|e| !e.enabled)
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.kems.iter().chain(&self.signatures)
    }

    /// Human-readable enabled/disabled listing.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        for (title, entries) in [
            (" Key Encapsulation Mechanisms (KEMs) ", &self.kems),
            (" Signature Algorithms ", &self.signatures),
        ] {
            let _ = writeln!(out, "{title:-^80}");
            for entry in entries {
                let status = if entry.enabled { "enabled" } else { "disabled" };
                let _ = writeln!(out, "{:>30}: {status}", entry.name);
            }
        }
        out
    }
}

/// Partition `catalog` against the provider's enabled mechanism sets.
///
/// Names the provider has never heard of are classified disabled. So is every
/// name under a category key this build does not know, or a key listed in the
/// wrong section; both are warned about.
pub fn validate(
    catalog: &AlgorithmCatalog,
    enabled_kems: &BTreeSet<String>,
    enabled_sigs: &BTreeSet<String>,
) -> Availability {
    let mut availability = Availability::default();

    let sections = [
        (OperationShape::Kem, &catalog.kems, enabled_kems),
        (OperationShape::Signature, &catalog.signatures, enabled_sigs),
    ];

    for (shape, section, enabled) in sections {
        for (key, names) in section.iter() {
            let category = match Category::from_catalog_key(key) {
                Some(c) if c.shape() == shape => Some(c),
                Some(c) => {
                    warn!(key = %key, category = %c, "catalog category listed under the wrong section, disabling its entries");
                    None
                }
                None => {
                    warn!(key = %key, "unknown catalog category, disabling its entries");
                    None
                }
            };

            for name in names {
                let is_enabled = category.is_some() && enabled.contains(name);
                if let Some(category) = category.filter(|_| is_enabled) {
                    availability
                        .enabled
                        .entry(category)
                        .or_default()
                        .push(name.clone());
                }
                let entry = Entry {
                    name: name.clone(),
                    catalog_key: key.to_string(),
                    category,
                    enabled: is_enabled,
                };
                match shape {
                    OperationShape::Kem => availability.kems.push(entry),
                    OperationShape::Signature => availability.signatures.push(entry),
                }
            }
        }
    }

    availability
}

/// Validate against `provider` and log the report.
pub fn validate_with(catalog: &AlgorithmCatalog, provider: &dyn Provider) -> Availability {
    let availability = validate(
        catalog,
        &provider.enabled_kem_mechanisms(),
        &provider.enabled_sig_mechanisms(),
    );
    for line in availability.render_report().lines() {
        info!("{line}");
    }
    let disabled = availability.disabled().count();
    if disabled > 0 {
        warn!(disabled, "some catalog entries are not enabled in this build");
    }
    availability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_names_are_disabled_not_errors() {
        let catalog = AlgorithmCatalog::from_json(r#"{"kems":{"ml-kem":["X","Y"]}}"#).unwrap();
        let availability = validate(&catalog, &set(&["X"]), &set(&[]));

        assert_eq!(availability.enabled(Category::MlKem), ["X".to_string()]);
        let report = availability.render_report();
        assert!(report.contains("X: enabled"));
        assert!(report.contains("Y: disabled"));
        let disabled: Vec<_> = availability.disabled().map(|e| e.name.as_str()).collect();
        assert_eq!(disabled, ["Y"]);
    }

    #[test]
    fn catalog_order_is_preserved() {
        let catalog = AlgorithmCatalog::from_json(
            r#"{"signatures":{"slh-dsa":["C","A","B"],"ml-dsa":["M"]}}"#,
        )
        .unwrap();
        let availability = validate(&catalog, &set(&[]), &set(&["A", "B", "C", "M"]));
        assert_eq!(availability.enabled(Category::SlhDsa), ["C", "A", "B"]);
        assert_eq!(availability.enabled(Category::MlDsa), ["M"]);
        assert!(availability.enabled(Category::MlKem).is_empty());
    }

    #[test]
    fn unknown_and_misplaced_categories_are_listed_disabled() {
        let catalog = AlgorithmCatalog::from_json(
            r#"{"kems":{"bike":["BIKE-L1"],"ml-dsa":["ML-DSA-44"],"ml-kem":["ML-KEM-512"]}}"#,
        )
        .unwrap();
        let availability = validate(
            &catalog,
            &set(&["BIKE-L1", "ML-DSA-44", "ML-KEM-512"]),
            &set(&["ML-DSA-44"]),
        );

        let entries: Vec<_> = availability
            .entries()
            .map(|e| (e.name.as_str(), e.catalog_key.as_str(), e.category, e.enabled))
            .collect();
        assert_eq!(
            entries,
            [
                ("BIKE-L1", "bike", None, false),
                ("ML-DSA-44", "ml-dsa", None, false),
                ("ML-KEM-512", "ml-kem", Some(Category::MlKem), true),
            ]
        );
        assert!(availability.enabled(Category::MlDsa).is_empty());

        let report = availability.render_report();
        assert!(report.contains("BIKE-L1: disabled"));
        assert!(report.contains("ML-DSA-44: disabled"));
    }

    #[test]
    fn report_follows_catalog_order() {
        let catalog = AlgorithmCatalog::from_json(
            r#"{"kems":{"ml-kem":["ML-KEM-512"],"hqc":["HQC-128"]}}"#,
        )
        .unwrap();
        let report = validate(&catalog, &set(&[]), &set(&[])).render_report();
        assert!(report.find("ML-KEM-512").unwrap() < report.find("HQC-128").unwrap());
    }

    #[test]
    fn sets_are_checked_per_section() {
        // A KEM name enabled only as a signature mechanism is still disabled.
        let catalog = AlgorithmCatalog::from_json(r#"{"kems":{"hqc":["HQC-128"]}}"#).unwrap();
        let availability = validate(&catalog, &set(&[]), &set(&["HQC-128"]));
        assert!(availability.enabled(Category::Hqc).is_empty());
        assert_eq!(availability.descriptors(Category::Hqc), vec![]);
    }

    #[test]
    fn report_has_both_section_headers() {
        let report = validate(&AlgorithmCatalog::builtin(), &set(&[]), &set(&[])).render_report();
        let first = report.lines().next().unwrap();
        assert_eq!(first.len(), 80);
        assert!(first.contains(" Key Encapsulation Mechanisms (KEMs) "));
        assert!(report.contains(" Signature Algorithms "));
        assert!(report.contains("SLH-DSA-SHAKE-256f: disabled"));
    }
}
