//! Both indices built over the same catalog resolve back to its items.

use kizuna_core::{Catalog, Item};
use kizuna_search::{name_index, CategoryFilter, CategoryIndex};

fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    for (id, name, categories, rating) in [
        (1, "Fullmetal Alchemist", "Action, Adventure, Drama, Fantasy", 8.3),
        (2, "Fullmetal Alchemist: Brotherhood", "Action, Adventure, Drama, Fantasy", 9.3),
        (3, "Full Moon wo Sagashite", "Comedy, Drama, Romance", 8.0),
        (4, "Mob Psycho 100", "Action, Comedy, Supernatural", 8.7),
    ] {
        catalog.insert(
            Item::new(id, name)
                .with_categories(categories.split(','))
                .with_rating(rating),
        );
    }
    catalog
}

#[test]
fn test_name_index_resolves_handles() {
    let catalog = catalog();
    let index = name_index(&catalog);
    assert_eq!(index.len(), catalog.len());

    let found: Vec<&str> = index
        .get_suggestions_sorted("full", 10)
        .into_iter()
        .filter_map(|s| catalog.get(s.value))
        .map(Item::name)
        .collect();
    assert_eq!(
        found,
        [
            "Full Moon wo Sagashite",
            "Fullmetal Alchemist",
            "Fullmetal Alchemist: Brotherhood",
        ]
    );

    let handle = index.search("MOB PSYCHO 100").copied();
    assert_eq!(handle, catalog.index_of("Mob Psycho 100"));
}

#[test]
fn test_browse_then_rank() {
    let catalog = catalog();
    let index = CategoryIndex::build(&catalog);
    assert!(index.contains("Supernatural"));
    assert_eq!(index.bucket("Drama").len(), 3);

    let mut filter = CategoryFilter::new(&catalog, &index);
    filter.select("Drama").unwrap();
    filter.select("Fantasy").unwrap();
    let ranked: Vec<&str> = filter.ranked().into_iter().map(Item::name).collect();
    assert_eq!(
        ranked,
        ["Fullmetal Alchemist: Brotherhood", "Fullmetal Alchemist"]
    );
    assert_eq!(filter.available_categories(), ["Action", "Adventure"]);
}

#[test]
fn test_name_index_keeps_every_catalog_item() {
    let mut catalog = Catalog::new();
    catalog.insert(Item::new(1, "Akira"));
    catalog.insert(Item::new(2, "AKIRA"));
    let index = name_index(&catalog);
    assert_eq!(index.len(), catalog.len());

    let mut found: Vec<&str> = index
        .get_suggestions("aki")
        .into_iter()
        .filter_map(|s| catalog.get(s.value))
        .map(Item::name)
        .collect();
    found.sort_unstable();
    assert_eq!(found, ["AKIRA", "Akira"]);
}
