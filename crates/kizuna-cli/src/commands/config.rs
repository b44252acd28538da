use anyhow::{bail, Context, Result};
use kizuna_etl::{config, Config};
use std::path::Path;
use toml_edit::{DocumentMut, Item, Table, Value};

/// Show the current effective configuration.
pub fn show_config(config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path)?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());

    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  dataset_path: {}", config.dataset_path.display());
    println!("  similarity_threshold: {}", config.similarity_threshold);
    println!("  min_popularity: {}", config.min_popularity);
    println!("  suggestion_limit: {}", config.suggestion_limit);
    println!("  weights.categories: {}", config.weights.categories);
    println!("  weights.kind: {}", config.weights.kind);
    println!("  weights.episodes: {}", config.weights.episodes);
    println!("  weights.rating: {}", config.weights.rating);
    println!("  weights.popularity: {}", config.weights.popularity);
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (KIZUNA_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(config_path: &Path, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load_from(config_path)?;
        let effective: toml::Value = toml::from_str(&config.to_toml()?)
            .context("Failed to read back configuration")?;
        match lookup(&effective, &key) {
            Some(toml::Value::String(s)) => println!("{s}"),
            Some(value) => println!("{value}"),
            None => bail!("Unknown config key: {key}\n\n{}", valid_keys_hint()),
        }
    } else {
        // No key provided, show entire config file contents
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'kizuna config init' to create it.");
        }
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included) as is.
pub fn set_config(config_path: &Path, key: &str, value: &str) -> Result<()> {
    config::ensure_config_file_at(config_path)?;

    let contents = std::fs::read_to_string(config_path).context("Failed to read config file")?;
    let updated = set_in_document(&contents, key, value)?;

    std::fs::write(config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {key} = {value}");
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config(config_path: &Path) -> Result<()> {
    let created = config::ensure_config_file_at(config_path)?;

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure kizuna.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

fn valid_keys_hint() -> String {
    let keys: Vec<String> = toml::from_str::<toml::Table>(config::example_config())
        .map(|table| {
            let mut keys = Vec::new();
            collect_keys(&table, "", &mut keys);
            keys
        })
        .unwrap_or_default();
    format!("Valid keys: {}", keys.join(", "))
}

fn collect_keys(table: &toml::Table, prefix: &str, keys: &mut Vec<String>) {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        match value {
            toml::Value::Table(inner) => collect_keys(inner, &key, keys),
            _ => keys.push(key),
        }
    }
}

/// Resolve a dotted key such as `weights.rating`.
fn lookup<'v>(value: &'v toml::Value, key: &str) -> Option<&'v toml::Value> {
    key.split('.').try_fold(value, |current, part| current.get(part))
}

/// Interpret a command-line value as the most specific TOML scalar it spells.
fn parse_scalar(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = raw.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = raw.parse::<f64>() {
        return f.into();
    }
    raw.into()
}

/// Write `value` under the dotted `key` in `contents`, creating tables as
/// needed. The result must still load as a valid [`Config`].
fn set_in_document(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;

    let mut parts: Vec<&str> = key.split('.').collect();
    let Some(leaf) = parts.pop() else {
        bail!("Empty config key");
    };
    if leaf.is_empty() || parts.iter().any(|p| p.is_empty()) {
        bail!("Malformed config key: {key}");
    }

    let mut table: &mut Table = doc.as_table_mut();
    for part in parts {
        let entry = table.entry(part).or_insert(Item::Table(Table::new()));
        table = entry
            .as_table_mut()
            .with_context(|| format!("{part} is not a table in the config file"))?;
    }

    let mut scalar = parse_scalar(value);
    if let Some(existing) = table.get(leaf).and_then(Item::as_value) {
        // Keep the spacing and trailing comment of the line being replaced.
        *scalar.decor_mut() = existing.decor().clone();
    }
    table.insert(leaf, Item::Value(scalar));

    let updated = doc.to_string();
    let parsed: Config = toml::from_str(&updated)
        .with_context(|| format!("{key} = {value} does not fit the configuration"))?;
    parsed.validate()?;

    let known: toml::Value = toml::from_str(&parsed.to_toml()?)?;
    if lookup(&known, key).is_none() {
        bail!("Unknown config key: {key}\n\n{}", valid_keys_hint());
    }

    Ok(updated)
}
