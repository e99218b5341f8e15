use url::Url;

/// Returns true if the URL points at a DOI resolver or a DOI-shaped path
///
/// DOI links are already persistent identifiers, so they are skipped by
/// default instead of being sent to the archive.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use archivelinks::url::is_doi_url;
///
/// let url = Url::parse("https://doi.org/10.1000/xyz123").unwrap();
/// assert!(is_doi_url(&url));
///
/// let url = Url::parse("https://example.com/paper").unwrap();
/// assert!(!is_doi_url(&url));
/// ```
pub fn is_doi_url(url: &Url) -> bool {
    let host = url.host_str().unwrap_or("").to_lowercase();
    if host == "doi.org" || host.ends_with(".doi.org") {
        return true;
    }

    let path = url.path().to_lowercase();
    if format!("{}{}", host, path).contains("doi.org/") {
        return true;
    }

    let path = path.strip_prefix("/doi").unwrap_or(&path);
    path.strip_prefix("/10.")
        .map(is_registrant_prefix)
        .unwrap_or(false)
}

/// Checks for the `NNNN/` registrant code (4 to 9 digits) that follows `10.`
fn is_registrant_prefix(rest: &str) -> bool {
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    (4..=9).contains(&digits) && rest[digits..].starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doi(s: &str) -> bool {
        is_doi_url(&Url::parse(s).unwrap())
    }

    #[test]
    fn test_doi_hosts() {
        assert!(doi("https://doi.org/10.1000/182"));
        assert!(doi("https://dx.doi.org/10.1000/182"));
        assert!(doi("https://DOI.ORG/abc"));
    }

    #[test]
    fn test_doi_paths() {
        assert!(doi("https://journals.example.com/10.1234/abcd"));
        assert!(doi("https://journals.example.com/doi/10.123456789/abcd"));
        assert!(!doi("https://journals.example.com/10.123/abcd"));
        assert!(!doi("https://journals.example.com/10.1234567890/abcd"));
        assert!(!doi("https://journals.example.com/doi/about"));
    }

    #[test]
    fn test_regular_links() {
        assert!(!doi("https://example.org/paper"));
        assert!(!doi("https://example.org/v10.2/docs"));
    }
}
