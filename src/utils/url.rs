//! URL helpers

/// Join `base` and `path` with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

/// True when `locator` starts with a scheme (`https:`, `data:`, ...).
///
/// A scheme appearing later, as in `/proxy?src=https://origin/x`, does not
/// count.
pub fn is_absolute_url(locator: &str) -> bool {
    let locator = locator.trim();
    let head_end = locator.find(['/', '?', '#']).unwrap_or(locator.len());
    let Some((scheme, _)) = locator[..head_end].split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Rewrite a relative locator onto `base`; absolute ones pass through.
///
/// Protocol-relative locators (`//cdn/x.png`) take the scheme of `base`.
pub fn absolutize_url(base: &str, locator: &str) -> String {
    let locator = locator.trim();
    if is_absolute_url(locator) {
        return locator.to_string();
    }
    if locator.starts_with("//") {
        let scheme = reqwest::Url::parse(base)
            .map(|url| url.scheme().to_string())
            .unwrap_or_else(|_| "https".to_string());
        return format!("{scheme}:{locator}");
    }
    join_url(base, locator)
}
