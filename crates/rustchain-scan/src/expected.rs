//! Expected miners list
//!
//! The file holds one miner id per line. Blank lines and `#` comment lines
//! are skipped, inline `# ...` comments are stripped, and commas or
//! whitespace may separate several ids on one line.

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Parse the contents of an expected-miners file
pub fn parse_expected_miners(text: &str) -> BTreeSet<String> {
    let mut expected = BTreeSet::new();

    for line in text.lines() {
        let content = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        };

        for token in content.split(|c: char| c == ',' || c.is_whitespace()) {
            let token = token.trim();
            if !token.is_empty() {
                expected.insert(token.to_string());
            }
        }
    }

    expected
}

/// Load an expected-miners file
///
/// A missing file is a configuration error, not an empty list.
pub async fn load_expected_miners(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Err(ScanError::ExpectedMinersNotFound {
            path: path.display().to_string(),
        });
    }

    debug!("Loading expected miners from: {}", path.display());
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        ScanError::config(format!(
            "failed to read expected miners file {}: {e}",
            path.display()
        ))
    })?;

    Ok(parse_expected_miners(&content))
}

/// Merge every configured source of expected miners into one set
pub async fn resolve_expected_miners(config: &ScanConfig) -> Result<BTreeSet<String>> {
    let mut expected: BTreeSet<String> = config
        .expected_miners
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(path) = &config.expected_miners_file {
        expected.extend(load_expected_miners(path).await?);
    }

    if !expected.is_empty() {
        info!("Cross-referencing against {} expected miners", expected.len());
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_comments_commas_and_blank_lines() {
        let text = "# known miners\nalpha-miner\nbeta-miner, gamma-miner\n\ndelta-miner # inline comment\n";
        assert_eq!(
            parse_expected_miners(text),
            set(&["alpha-miner", "beta-miner", "gamma-miner", "delta-miner"])
        );
    }

    #[test]
    fn test_parse_deduplicates() {
        let text = "alpha-miner\nalpha-miner\n  alpha-miner  \n";
        assert_eq!(parse_expected_miners(text), set(&["alpha-miner"]));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_expected_miners("").is_empty());
        assert!(parse_expected_miners("# nothing here\n\n").is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "minerA\nminerB").unwrap();

        let loaded = load_expected_miners(file.path()).await.unwrap();
        assert_eq!(loaded, set(&["minerA", "minerB"]));
    }

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let err = load_expected_miners(Path::new("/nonexistent/expected_miners.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::ExpectedMinersNotFound { .. }));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_resolve_merges_config_and_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "from-file").unwrap();

        let config = ScanConfig {
            expected_miners: vec!["from-flag".to_string(), " ".to_string()],
            expected_miners_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let expected = resolve_expected_miners(&config).await.unwrap();
        assert_eq!(expected, set(&["from-file", "from-flag"]));
    }
}
