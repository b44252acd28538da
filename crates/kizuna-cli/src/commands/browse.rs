use anyhow::Result;
use kizuna_etl::Config;
use kizuna_search::CategoryFilter;

use super::{load_dataset, summary_line};

/// Narrow by each category in turn, then print the best-rated results.
pub fn browse(config: &Config, categories: &[String], limit: usize) -> Result<()> {
    let dataset = load_dataset(config)?;
    let mut filter = CategoryFilter::new(&dataset.catalog, &dataset.categories);

    for category in categories {
        let remaining = filter.select(category)?;
        println!("  {category}: {remaining} titles");
    }

    let ranked = filter.ranked();
    if ranked.is_empty() {
        println!("\nNo title carries all of: {}", categories.join(", "));
        return Ok(());
    }

    println!();
    for (rank, item) in ranked.iter().take(limit).enumerate() {
        println!("  {:>3}. {}", rank + 1, summary_line(item));
    }
    if ranked.len() > limit {
        println!("  ... and {} more", ranked.len() - limit);
    }

    let available = filter.available_categories();
    if !available.is_empty() {
        println!("\nNarrow further with: {}", available.join(", "));
    }
    Ok(())
}
