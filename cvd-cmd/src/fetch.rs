//! Download of the four source files from a static mirror.

use cvd_db::{
    Database, DatasetConfig, COUNTRY_DAILY_FILE, COUNTRY_DEMOGRAPHIC_FILE, COUNTRY_LATEST_FILE,
    DAILY_GLOBAL_FILE,
};
use log::info;
use std::path::Path;

const SOURCE_FILES: [&str; 4] = [
    DAILY_GLOBAL_FILE,
    COUNTRY_DAILY_FILE,
    COUNTRY_LATEST_FILE,
    COUNTRY_DEMOGRAPHIC_FILE,
];

/// `base_url` joined with `file`, tolerating a trailing slash.
fn source_url(base_url: &str, file: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), file)
}

/// Fetch every source file into `out_dir`, then load them once to make
/// sure the download is usable.
///
/// Files are written only after all four downloads succeed, so a failed
/// fetch leaves an existing data directory untouched.
pub async fn run_fetch(base_url: &str, out_dir: &Path) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    let mut bodies = Vec::with_capacity(SOURCE_FILES.len());
    for file in SOURCE_FILES {
        let url = source_url(base_url, file);
        info!("Fetching {}", url);
        let response = client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("Bad response for {}: {}", url, response.status());
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            anyhow::bail!("Empty response for {}", url);
        }
        bodies.push((file, body));
    }

    tokio::fs::create_dir_all(out_dir).await?;
    for (file, body) in &bodies {
        let path = out_dir.join(file);
        tokio::fs::write(&path, body).await?;
        info!("Wrote {} ({} bytes)", path.display(), body.len());
    }

    let db = Database::open(&DatasetConfig::from_dir(out_dir))
        .map_err(|e| anyhow::anyhow!("Downloaded files do not load: {}", e))?;
    match db.query_date_range()? {
        Some(range) => info!("Fetch complete. Data covers {} to {}", range.first, range.last),
        None => info!("Fetch complete. No daily rows"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_with_single_slash() {
        assert_eq!(
            source_url("https://mirror.example/covid/", DAILY_GLOBAL_FILE),
            "https://mirror.example/covid/day_wise.csv"
        );
        assert_eq!(
            source_url("https://mirror.example/covid", COUNTRY_DEMOGRAPHIC_FILE),
            "https://mirror.example/covid/worldometer_data.csv"
        );
    }

    #[tokio::test]
    async fn unreachable_mirror_fails() {
        let dir = std::env::temp_dir().join(format!("cvd-fetch-{}", std::process::id()));
        assert!(run_fetch("http://127.0.0.1:9", &dir).await.is_err());
        assert!(!dir.join(DAILY_GLOBAL_FILE).exists());
    }
}
