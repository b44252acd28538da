use anyhow::Result;
use kizuna_core::Item;
use kizuna_etl::Config;

use super::{load_dataset, resolve, summary_line};

pub fn search(config: &Config, prefix: &str, limit: Option<usize>, json: bool) -> Result<()> {
    let dataset = load_dataset(config)?;
    let limit = limit.unwrap_or(config.suggestion_limit);

    let items: Vec<&Item> = dataset
        .names
        .get_suggestions_sorted(prefix, limit)
        .into_iter()
        .filter_map(|s| dataset.catalog.get(s.value))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No titles start with {prefix:?}");
        return Ok(());
    }
    for item in items {
        println!("  {}", summary_line(item));
    }
    Ok(())
}

pub fn show(config: &Config, name: &str, json: bool) -> Result<()> {
    let dataset = load_dataset(config)?;
    let item = resolve(&dataset, name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
        return Ok(());
    }

    println!("\n{}\n", item.name());
    println!("  ID:         {}", item.id());
    println!("  Categories: {}", item.categories().join(", "));
    println!("  Type:       {}", item.kind());
    println!("  Episodes:   {}", item.episodes());
    println!("  Rating:     {:.2}", item.rating());
    println!("  Members:    {}", item.popularity());
    Ok(())
}

pub fn categories(config: &Config) -> Result<()> {
    let dataset = load_dataset(config)?;

    println!("\n{} categories\n", dataset.categories.len());
    for (category, count) in dataset.categories.counts() {
        println!("  {category:<20} {count:>6}");
    }
    Ok(())
}

pub fn stats(config: &Config) -> Result<()> {
    let dataset = load_dataset(config)?;
    let graph = dataset.build_graph(config)?;

    println!("\nKizuna Status\n");
    println!("  Dataset:    {}", config.dataset_path.display());
    println!(
        "  Rows:       {} read, {} loaded, {} skipped",
        dataset.report.rows_read,
        dataset.report.loaded,
        dataset.report.skipped_count()
    );
    for (reason, count) in dataset.report.skips_by_reason() {
        println!("              {count:>6} {reason}");
    }
    println!("  Categories: {}", dataset.categories.len());
    println!("  Types:      {}", dataset.catalog.unique_kinds().join(", "));

    println!("\n  Graph at threshold {}", config.similarity_threshold);
    println!("  Vertices:   {}", graph.vertex_count());
    println!("  Edges:      {}", graph.edge_count());
    println!("  Linked:     {}", graph.connected_vertex_count());
    println!("  Components: {}", graph.component_count());
    Ok(())
}
