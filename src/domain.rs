// Domain normalization: operators usually type a school's vanity name
// ("utah") rather than the full Canvas URL, so expand it here.

const LOCAL_DEV_URL: &str = "http://localhost:3000";
const VANITY_SUFFIX: &str = ".instructure.com";

/// Expand a raw `--domain` value into a base URL with no trailing slash.
///
/// - `localhost` maps to the local development server.
/// - Anything without an `http` prefix gets `https://`, and unless it
///   already ends in `com` or `/` it is treated as a vanity name and gets
///   `.instructure.com` appended.
/// - A single trailing `/` is stripped.
pub fn normalize(domain: &str) -> String {
    if domain == "localhost" {
        return LOCAL_DEV_URL.to_string();
    }

    let mut url = domain.to_string();
    if !url.starts_with("http") {
        url = format!("https://{url}");
        if !url.ends_with("com") && !url.ends_with('/') {
            url.push_str(VANITY_SUFFIX);
        }
    }

    match url.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => url,
    }
}
