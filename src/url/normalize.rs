use crate::{UrlError, UrlResult};
use url::Url;

/// Characters stripped from the end of a link, left over from surrounding prose
const TRAILING_PUNCTUATION: &[char] = &[')', ',', '.', ';', ':'];

/// Normalizes a raw link string into an absolute HTTP(S) URL
///
/// # Normalization Steps
///
/// 1. Trim the input and remove all whitespace (links broken across lines)
/// 2. Repair defanged schemes: `hxxp://` and `hxxps://`
/// 3. Strip trailing punctuation (`)`, `,`, `.`, `;`, `:`)
/// 4. Prefix `https://` for `www.` links and bare domains
/// 5. Parse the URL; reject anything that is not HTTP or HTTPS
/// 6. Remove the fragment (everything after #)
///
/// # Arguments
///
/// * `raw` - The link as it appeared in the source document
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The link is empty, malformed, or not HTTP(S)
///
/// # Examples
///
/// ```
/// use archivelinks::url::normalize_link;
///
/// let url = normalize_link("example.org/paper ").unwrap();
/// assert_eq!(url.as_str(), "https://example.org/paper");
/// ```
pub fn normalize_link(raw: &str) -> UrlResult<Url> {
    let mut candidate: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();

    candidate = repair_defanged_scheme(&candidate);
    candidate = candidate.trim_end_matches(TRAILING_PUNCTUATION).to_string();

    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }

    if candidate.starts_with("www.") || (!has_http_scheme(&candidate) && looks_like_domain(&candidate))
    {
        candidate = format!("https://{}", candidate);
    }

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS links can be archived, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Rewrites a leading `hxxp://` or `hxxps://` (any case) to its lowercase HTTP form
fn repair_defanged_scheme(candidate: &str) -> String {
    for (defanged, repaired) in [("hxxps://", "https://"), ("hxxp://", "http://")] {
        if let Some(prefix) = candidate.get(..defanged.len()) {
            if prefix.eq_ignore_ascii_case(defanged) {
                return format!("{}{}", repaired, &candidate[defanged.len()..]);
            }
        }
    }
    candidate.to_string()
}

fn has_http_scheme(candidate: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        candidate
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Returns true if the candidate starts with something shaped like `name.tld`
///
/// The leading run of ASCII word characters, dots, and hyphens must contain a dot
/// that is preceded by at least one character and followed by two letters.
fn looks_like_domain(candidate: &str) -> bool {
    let head: Vec<char> = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.' || *c == '-')
        .collect();

    (1..head.len()).any(|i| {
        head[i] == '.'
            && head.get(i + 1).is_some_and(char::is_ascii_alphabetic)
            && head.get(i + 2).is_some_and(char::is_ascii_alphabetic)
    })
}
