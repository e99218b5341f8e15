//! CSV export of per-link results

use crate::state::{LinkSet, PreservationItem};
use crate::Result;
use std::path::Path;

const HEADER: [&str; 5] = [
    "original_url",
    "preserved_link",
    "status",
    "included",
    "skip_reason",
];

/// Quotes a cell, doubling any embedded quotes
pub fn escape_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(item: &PreservationItem) -> [String; 5] {
    [
        item.original_url().to_string(),
        item.archived_url().unwrap_or_default().to_string(),
        item.status().as_str().to_string(),
        item.is_included().to_string(),
        item.skip_reason()
            .map(|reason| reason.as_str())
            .unwrap_or_default()
            .to_string(),
    ]
}

fn join<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|cell| escape_cell(cell.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders every link, in order, as CSV text
pub fn to_csv_string(links: &LinkSet) -> String {
    let mut lines = vec![join(&HEADER)];
    lines.extend(links.items().iter().map(|item| join(&row(item))));
    lines.join("\n")
}

/// Writes the CSV export to a file
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(ArchiveError::Io)` - The file could not be written
pub fn write_csv(links: &LinkSet, path: &Path) -> Result<()> {
    std::fs::write(path, to_csv_string(links))?;
    tracing::info!("Wrote {} result row(s) to {}", links.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Outcome;
    use crate::state::RunKind;
    use tempfile::TempDir;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "\"plain\"");
        assert_eq!(escape_cell(""), "\"\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_csv_rows() {
        let mut links = LinkSet::from_extracted([
            "https://example.org/paper",
            "https://example.org/slow",
            "https://doi.org/10.1000/182",
        ]);
        {
            let mut targets = links.prepare_run(RunKind::Full);
            targets[0].record_outcome(Outcome::Saved(
                "https://web.archive.org/web/2024/https://example.org/paper".into(),
            ));
            targets[1].record_outcome(Outcome::TimedOut);
        }

        let csv = to_csv_string(&links);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                r#""original_url","preserved_link","status","included","skip_reason""#,
                r#""https://example.org/paper","https://web.archive.org/web/2024/https://example.org/paper","saved","true","""#,
                r#""https://example.org/slow","","timed_out","true","""#,
                r#""https://doi.org/10.1000/182","","skipped","false","doi""#,
            ]
        );
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        let links = LinkSet::from_extracted(["https://example.org/a"]);

        write_csv(&links, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&links));
        assert_eq!(written.lines().count(), 2);
    }
}
