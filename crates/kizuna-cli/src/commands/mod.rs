use anyhow::{bail, Context, Result};
use kizuna_core::Item;
use kizuna_etl::{Config, Dataset};

pub mod browse;
pub mod catalog;
pub mod config;
pub mod graph;

/// Load the configured dataset, reporting skipped rows at info level.
pub fn load_dataset(config: &Config) -> Result<Dataset> {
    let dataset = Dataset::load(config).with_context(|| {
        format!(
            "Failed to load dataset {}",
            config.dataset_path.display()
        )
    })?;
    for (reason, count) in dataset.report.skips_by_reason() {
        log::info!("skipped {count} rows: {reason}");
    }
    Ok(dataset)
}

/// Find a title by exact name, falling back to a case-insensitive match.
///
/// A case-insensitive query that matches several titles is an error listing
/// them, rather than a silent pick.
pub fn resolve<'d>(dataset: &'d Dataset, name: &str) -> Result<&'d Item> {
    let missing = match dataset.catalog.require(name) {
        Ok(item) => return Ok(item),
        Err(e) => e,
    };

    let matches = dataset.names.search_all(name);
    match matches.as_slice() {
        [only] => {
            if let Some(item) = dataset.catalog.get(only.value) {
                return Ok(item);
            }
        }
        [] => {}
        several => {
            let names: Vec<&str> = several.iter().map(|s| s.name.as_str()).collect();
            bail!(
                "{name:?} matches several titles:\n  {}",
                names.join("\n  ")
            );
        }
    }

    let hints: Vec<String> = dataset
        .names
        .get_suggestions_sorted(name, 5)
        .into_iter()
        .map(|s| s.name)
        .collect();
    if hints.is_empty() {
        return Err(missing.into());
    }
    bail!("{missing}. Did you mean:\n  {}", hints.join("\n  "));
}

/// One-line summary used by list-style commands.
pub fn summary_line(item: &Item) -> String {
    format!(
        "{} [{}, {} ep, {:.2}]",
        item.name(),
        item.kind(),
        item.episodes(),
        item.rating()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kizuna_core::Catalog;
    use kizuna_etl::LoadReport;

    fn dataset(names: &[&str]) -> Dataset {
        let mut catalog = Catalog::new();
        for (id, name) in (1..).zip(names) {
            catalog.insert(Item::new(id, *name).with_categories(["Drama"]).with_kind("TV"));
        }
        Dataset::from_catalog(catalog, LoadReport::default())
    }

    #[test]
    fn test_resolve_exact_then_folded() {
        let dataset = dataset(&["Shirobako", "Shiki"]);
        assert_eq!(resolve(&dataset, "Shiki").unwrap().name(), "Shiki");
        assert_eq!(resolve(&dataset, "SHIROBAKO").unwrap().name(), "Shirobako");
    }

    #[test]
    fn test_resolve_keeps_case_variants_reachable() {
        let dataset = dataset(&["Akira", "AKIRA"]);
        assert_eq!(dataset.names.len(), 2);
        assert_eq!(resolve(&dataset, "Akira").unwrap().name(), "Akira");
        assert_eq!(resolve(&dataset, "AKIRA").unwrap().name(), "AKIRA");

        let err = resolve(&dataset, "akira").unwrap_err().to_string();
        assert!(err.contains("matches several titles"), "{err}");
        assert!(err.contains("Akira") && err.contains("AKIRA"), "{err}");
    }

    #[test]
    fn test_resolve_missing_suggests() {
        let dataset = dataset(&["Shirobako", "Shiki"]);
        let err = resolve(&dataset, "Shi").unwrap_err().to_string();
        assert!(err.starts_with("not found: item named Shi"), "{err}");
        assert!(err.contains("Did you mean"), "{err}");

        let err = resolve(&dataset, "Naruto").unwrap_err().to_string();
        assert_eq!(err, "not found: item named Naruto");
    }
}
