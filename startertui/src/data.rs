use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::dex::DexRecords;
use crate::effect::Starter;
use crate::error::DataError;
use crate::species::{Species, SpeciesCatalog};

const BUILTIN_SPECIES: &str = include_str!("../assets/species.ron");
const BUILTIN_DEX: &str = include_str!("../assets/dex.ron");

pub fn data_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("startertui")
}

pub fn default_party_path() -> PathBuf {
    data_dir().join("party.json")
}

pub fn parse_catalog(text: &str, origin: &str) -> Result<SpeciesCatalog, DataError> {
    let species: Vec<Species> = ron::de::from_str(text).map_err(|source| DataError::Ron {
        path: origin.to_string(),
        source,
    })?;
    Ok(SpeciesCatalog::from_species(species))
}

pub fn parse_dex(text: &str, origin: &str) -> Result<DexRecords, DataError> {
    ron::de::from_str(text).map_err(|source| DataError::Ron {
        path: origin.to_string(),
        source,
    })
}

pub fn builtin_catalog() -> Result<SpeciesCatalog, DataError> {
    parse_catalog(BUILTIN_SPECIES, "<builtin species>")
}

pub fn builtin_dex() -> Result<DexRecords, DataError> {
    parse_dex(BUILTIN_DEX, "<builtin dex>")
}

async fn read_text(path: &Path) -> Result<String, DataError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DataError::Read {
            path: path.display().to_string(),
            source,
        })
}

pub async fn load_catalog(path: Option<&Path>) -> Result<SpeciesCatalog, DataError> {
    match path {
        Some(path) => {
            let text = read_text(path).await?;
            parse_catalog(&text, &path.display().to_string())
        }
        None => builtin_catalog(),
    }
}

/// Explicit path, then `<data dir>/dex.ron`, then the demo records.
pub async fn load_dex(path: Option<&Path>) -> Result<DexRecords, DataError> {
    if let Some(path) = path {
        let text = read_text(path).await?;
        return parse_dex(&text, &path.display().to_string());
    }

    let fallback = data_dir().join("dex.ron");
    if tokio::fs::try_exists(&fallback).await.unwrap_or(false) {
        let text = read_text(&fallback).await?;
        return parse_dex(&text, &fallback.display().to_string());
    }

    info!("no dex records found, using demo records");
    builtin_dex()
}

pub async fn save_party(path: &Path, party: &[Starter]) -> Result<(), DataError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| DataError::Write {
                path: parent.display().to_string(),
                source,
            })?;
    }
    let json = serde_json::to_string_pretty(party)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| DataError::Write {
            path: path.display().to_string(),
            source,
        })?;
    Ok(())
}

/// Reports dex records for species the catalog doesn't offer.
pub fn check_records(catalog: &SpeciesCatalog, dex: &DexRecords) -> usize {
    dex.recorded_ids()
        .filter(|id| catalog.find(*id).is_none())
        .inspect(|id| warn!(species = id, "dex records for a species not on the grid"))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::GENERATION_COUNT;

    #[test]
    fn builtin_catalog_fills_every_generation() {
        let catalog = builtin_catalog().expect("builtin species parse");
        for generation in 0..GENERATION_COUNT {
            assert!(
                catalog.species_count(generation) > 0,
                "generation {generation} is empty"
            );
        }
        // Evolved species are filtered out.
        assert!(catalog.find(2).is_none());
        assert!(catalog.find(1).is_some());
    }

    #[test]
    fn builtin_dex_only_names_offered_species() {
        let catalog = builtin_catalog().expect("species");
        let dex = builtin_dex().expect("dex");
        assert!(dex.species_recorded() > 0);
        assert_eq!(check_records(&catalog, &dex), 0);
    }

    #[test]
    fn malformed_species_reports_origin() {
        let error = parse_catalog("[(id: 1)]", "custom.ron").expect_err("missing fields");
        assert!(error.to_string().contains("custom.ron"));
    }

    #[tokio::test]
    async fn save_party_writes_pretty_json() {
        let dir = std::env::temp_dir().join(format!("startertui-test-{}", std::process::id()));
        let path = dir.join("party.json");
        let party = vec![Starter {
            species_id: 4,
            name: "charmander".into(),
            shiny: true,
            form_index: 0,
            female: false,
        }];

        save_party(&path, &party).await.expect("save");
        let text = tokio::fs::read_to_string(&path).await.expect("read back");
        let parsed: Vec<Starter> = serde_json::from_str(&text).expect("json");
        assert_eq!(parsed, party);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
