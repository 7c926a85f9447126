use std::path::Path;

use anyhow::{Context, Result};
use roster::state::open_store;
use roster::Config;

/// One row of the countries TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    pub code: String,
    pub name: String,
    pub is_under_represented: bool,
}

/// Parse `code<TAB>name<TAB>flag` rows after a header line. The flag is
/// true only for `1`. Blank lines are skipped.
pub fn parse(contents: &str) -> Result<Vec<CountryRow>> {
    contents
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let mut columns = line.split('\t').map(str::trim);
            let (Some(code), Some(name), Some(flag)) =
                (columns.next(), columns.next(), columns.next())
            else {
                anyhow::bail!("line {}: expected 3 tab-separated columns", index + 1);
            };
            Ok(CountryRow {
                code: code.to_string(),
                name: name.to_string(),
                is_under_represented: flag == "1",
            })
        })
        .collect()
}

pub async fn run(config: &Config, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rows = parse(&contents)?;

    let (store, _) = open_store(config).await?;
    for row in &rows {
        store
            .upsert_country(&row.code, &row.name, row.is_under_represented)
            .await
            .with_context(|| format!("Failed to import country {}", row.code))?;
    }

    tracing::info!(count = rows.len(), path = %path.display(), "Countries imported");
    Ok(())
}
