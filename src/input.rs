//! Links file reader
//!
//! The extractor hands over its raw links as plain text, one per line. Blank
//! lines and lines starting with `#` are ignored; everything else is passed on
//! untouched, since normalization happens when the link set is built.

use crate::Result;
use std::path::Path;

/// Splits links file content into raw link lines
pub fn parse_links(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Reads a links file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Raw link lines, in file order
/// * `Err(ArchiveError::Io)` - The file could not be read
pub fn read_links_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let links: Vec<String> = parse_links(&text).into_iter().map(String::from).collect();

    tracing::debug!("Read {} raw link(s) from {}", links.len(), path.display());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_links_skips_comments_and_blanks() {
        let text = "# extracted from draft.pdf\nexample.org/paper \n\n   \nhttps://doi.org/10.1000/182\n  # indented comment\nhxxps://example.com/a).\n";

        assert_eq!(
            parse_links(text),
            vec![
                "example.org/paper",
                "https://doi.org/10.1000/182",
                "hxxps://example.com/a).",
            ]
        );
    }

    #[test]
    fn test_parse_links_crlf() {
        assert_eq!(
            parse_links("https://example.org/a\r\nhttps://example.org/b\r\n"),
            vec!["https://example.org/a", "https://example.org/b"]
        );
    }

    #[test]
    fn test_read_links_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# links").unwrap();
        writeln!(file, "https://example.org/a").unwrap();
        writeln!(file, "www.example.com").unwrap();

        let links = read_links_file(file.path()).unwrap();
        assert_eq!(links, vec!["https://example.org/a", "www.example.com"]);
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_links_file(Path::new("/nonexistent/links.txt"));
        assert!(matches!(result, Err(crate::ArchiveError::Io(_))));
    }
}
