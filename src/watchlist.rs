use anyhow::{Context, Result};
use std::fs;
use tracing::info;

/// Load tickers from a watchlist file.
///
/// One ticker per line; lines starting with `#` are comments and blank
/// lines are ignored. Only the first whitespace-delimited token on a line
/// is taken (inline comments after the ticker are allowed), upper-cased.
pub fn load_watchlist(path: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Watchlist file '{}' not found", path))?;

    let mut tickers = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(token) = line.split_whitespace().next() {
            tickers.push(token.to_uppercase());
        }
    }

    info!("Loaded {} tickers from {}", tickers.len(), path);
    Ok(tickers)
}

/// Save tickers to a watchlist file, with a generated-on header.
pub fn save_watchlist(tickers: &[String], path: &str) -> Result<()> {
    let mut content = String::from("# Stock Watchlist\n");
    content.push_str(&format!(
        "# Generated on {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    for ticker in tickers {
        content.push_str(ticker);
        content.push('\n');
    }

    fs::write(path, content).with_context(|| format!("Error saving watchlist to '{}'", path))?;
    info!("Saved {} tickers to {}", tickers.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_skips_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.txt");
        fs::write(
            &path,
            "# My favorite dividend stocks\nJNJ\npg\nKO\n\n# Tech stocks\nMSFT  keep an eye on this one\n",
        )
        .unwrap();

        let tickers = load_watchlist(path.to_str().unwrap()).unwrap();
        assert_eq!(tickers, vec!["JNJ", "PG", "KO", "MSFT"]);
    }

    #[test]
    fn test_round_trip_preserves_order_and_case_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.txt");
        let path = path.to_str().unwrap();

        let tickers: Vec<String> = ["JNJ", "PG", "KO", "XOM"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        save_watchlist(&tickers, path).unwrap();

        let loaded = load_watchlist(path).unwrap();
        assert_eq!(loaded, tickers);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_watchlist("/nonexistent/watchlist.txt");
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("not found"), "got: {message}");
    }
}
