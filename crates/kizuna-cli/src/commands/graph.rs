use std::path::PathBuf;

use anyhow::{Context, Result};
use kizuna_etl::Config;
use kizuna_graph::{similarity as score, SimilarityBreakdown, Traversal};

use super::{load_dataset, resolve, summary_line};

pub fn neighbors(config: &Config, name: &str) -> Result<()> {
    let dataset = load_dataset(config)?;
    let item = resolve(&dataset, name)?;
    let graph = dataset.build_graph(config)?;

    let mut neighbors: Vec<(f64, &kizuna_core::Item)> = graph
        .neighbors(item.name())
        .into_iter()
        .filter_map(|n| graph.weight(item.name(), n.name()).map(|w| (w, n)))
        .collect();
    neighbors.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    println!("\n{} ({} neighbors)\n", item.name(), neighbors.len());
    for (weight, neighbor) in neighbors {
        println!("  {:.3}  {}", 1.0 - weight, summary_line(neighbor));
    }
    Ok(())
}

pub fn traverse(config: &Config, name: &str, order: Traversal) -> Result<()> {
    let dataset = load_dataset(config)?;
    let item = resolve(&dataset, name)?;
    let graph = dataset.build_graph(config)?;

    let visited = graph.traverse(item.name(), order);
    println!("\n{} titles reachable from {}\n", visited.len(), item.name());
    for (step, item) in visited.iter().enumerate() {
        println!("  {:>4}. {}", step + 1, item.name());
    }
    Ok(())
}

pub fn path(config: &Config, from: &str, to: &str, order: Traversal, json: bool) -> Result<()> {
    let dataset = load_dataset(config)?;
    let start = resolve(&dataset, from)?;
    let end = resolve(&dataset, to)?;
    let graph = dataset.build_graph(config)?;

    let path = graph.find_path(start.name(), end.name(), order);

    if json {
        println!("{}", serde_json::to_string_pretty(&path)?);
        return Ok(());
    }

    if path.is_empty() {
        println!(
            "No path between {} and {} at threshold {}",
            start.name(),
            end.name(),
            config.similarity_threshold
        );
        return Ok(());
    }

    println!();
    for pair in path.windows(2) {
        let weight = graph.weight(pair[0].name(), pair[1].name()).unwrap_or(0.0);
        println!("  {}\n    | {weight:.3}", pair[0].name());
    }
    if let Some(last) = path.last() {
        println!("  {}", last.name());
    }
    println!(
        "\n{} hops, total distance {:.3}",
        path.len() - 1,
        graph.path_weight(&path).unwrap_or(0.0)
    );
    Ok(())
}

pub fn similarity(config: &Config, a: &str, b: &str) -> Result<()> {
    let dataset = load_dataset(config)?;
    let a = resolve(&dataset, a)?;
    let b = resolve(&dataset, b)?;

    let parts = SimilarityBreakdown::between(a, b);
    let total = score(a, b, &config.weights);
    let w = &config.weights;

    println!("\n{} vs {}\n", a.name(), b.name());
    let row = |label: &str, part: f64, weight: f64| {
        println!("  {label:<12} {part:>6.3} x {weight:.2}");
    };
    row("categories", parts.categories, w.categories);
    row("type", parts.kind, w.kind);
    row("episodes", parts.episodes, w.episodes);
    row("rating", parts.rating, w.rating);
    row("popularity", parts.popularity, w.popularity);
    println!("\n  similarity {total:.3}, distance {:.3}", 1.0 - total);

    let linked = total >= config.similarity_threshold && total < 1.0;
    println!(
        "  {} at threshold {}",
        if linked { "linked" } else { "not linked" },
        config.similarity_threshold
    );
    Ok(())
}

pub fn export_dot(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let dataset = load_dataset(config)?;
    let graph = dataset.build_graph(config)?;
    let dot = graph.to_dot();

    match output {
        Some(path) => {
            std::fs::write(&path, dot)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "✓ Wrote {} vertices and {} edges to {}",
                graph.vertex_count(),
                graph.edge_count(),
                path.display()
            );
        }
        None => print!("{dot}"),
    }
    Ok(())
}
