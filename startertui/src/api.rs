use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use crate::assets::AssetRequest;

const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";
const CRY_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/latest";

#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// Serve from the cache only.
    pub offline: bool,
    pub cache_dir: Option<PathBuf>,
}

static CONFIG: OnceLock<ApiConfig> = OnceLock::new();

/// First call wins; later calls are ignored.
pub fn configure(config: ApiConfig) {
    let _ = CONFIG.set(config);
}

fn config() -> &'static ApiConfig {
    CONFIG.get_or_init(ApiConfig::default)
}

pub fn is_offline() -> bool {
    config().offline
}

/// Candidate sprite URLs, most specific first. Female and form sprites are
/// missing for many species, so each falls back to the plainer path.
pub fn sprite_urls(request: &AssetRequest) -> Vec<String> {
    let shiny = if request.variant.shiny { "shiny/" } else { "" };
    let genders: &[&str] = if request.variant.female {
        &["female/", ""]
    } else {
        &[""]
    };
    let forms: Vec<String> = match &request.form_slug {
        Some(slug) => vec![format!("-{slug}"), String::new()],
        None => vec![String::new()],
    };

    let mut urls = Vec::new();
    for gender in genders {
        for form in &forms {
            urls.push(format!(
                "{SPRITE_BASE}/{shiny}{gender}{}{form}.png",
                request.species_id
            ));
        }
    }
    urls
}

pub fn cry_url(species_id: u16) -> String {
    format!("{CRY_BASE}/{species_id}.ogg")
}

pub async fn fetch_sprite(request: &AssetRequest) -> Result<Vec<u8>, String> {
    let mut last_error = String::from("no sprite candidates");
    for url in sprite_urls(request) {
        match fetch_bytes(&url).await {
            Ok(bytes) => return Ok(bytes),
            Err(error) => {
                debug!(%url, %error, "sprite candidate failed");
                last_error = error;
            }
        }
    }
    Err(last_error)
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let cache_path = cache_path("http", url);
    if let Some(bytes) = read_cache(&cache_path).await {
        return Ok(bytes);
    }
    if config().offline {
        return Err(format!("offline and not cached: {url}"));
    }

    let client = http_client();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let response = response.error_for_status().map_err(|err| err.to_string())?;
    let bytes = response
        .bytes()
        .await
        .map_err(|err| err.to_string())?
        .to_vec();
    write_cache(&cache_path, &bytes).await;
    Ok(bytes)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn cache_root() -> PathBuf {
    if let Some(dir) = &config().cache_dir {
        return dir.clone();
    }
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("startertui")
}

fn cache_path(kind: &str, url: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    cache_root().join(kind).join(digest)
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    let _ = fs::write(path, bytes).await;
}
