//! Load a dataset and build the structures queried on top of it.

use std::time::Instant;

use kizuna_core::{Catalog, ItemIndex};
use kizuna_graph::{GraphResult, SimilarityGraph};
use kizuna_search::{name_index, CategoryIndex, PrefixIndex};

use crate::config::Config;
use crate::error::IngestResult;
use crate::loader::{load_catalog, LoadReport};

/// A loaded catalog with its lookup indices.
#[derive(Debug)]
pub struct Dataset {
    pub catalog: Catalog,
    pub report: LoadReport,
    pub names: PrefixIndex<ItemIndex>,
    pub categories: CategoryIndex,
}

impl Dataset {
    /// Read the configured dataset and index it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a row is malformed.
    pub fn load(config: &Config) -> IngestResult<Self> {
        let started = Instant::now();
        let (catalog, report) = load_catalog(&config.dataset_path, &config.load_options())?;
        log::info!(
            "catalog: {} items in {:.2?}",
            catalog.len(),
            started.elapsed()
        );
        Ok(Self::from_catalog(catalog, report))
    }

    pub fn from_catalog(catalog: Catalog, report: LoadReport) -> Self {
        let started = Instant::now();
        let names = name_index(&catalog);
        let categories = CategoryIndex::build(&catalog);
        log::info!(
            "indices: {} names, {} categories in {:.2?}",
            names.len(),
            categories.len(),
            started.elapsed()
        );
        Self {
            catalog,
            report,
            names,
            categories,
        }
    }

    /// Link every pair of items at least `config.similarity_threshold`
    /// similar. Quadratic in the catalog size.
    ///
    /// # Errors
    /// Returns an error if the threshold or weights are out of range.
    pub fn build_graph(&self, config: &Config) -> GraphResult<SimilarityGraph> {
        self.build_graph_with_threshold(config, config.similarity_threshold)
    }

    pub fn build_graph_with_threshold(
        &self,
        config: &Config,
        threshold: f64,
    ) -> GraphResult<SimilarityGraph> {
        let started = Instant::now();
        let graph = SimilarityGraph::build(
            self.catalog.items().iter().cloned(),
            threshold,
            &config.weights,
        )?;
        log::info!(
            "graph: {} vertices, {} edges at threshold {threshold} in {:.2?}",
            graph.vertex_count(),
            graph.edge_count(),
            started.elapsed()
        );
        Ok(graph)
    }
}
