use url::Url;

/// Drops the last path segment of `detail_url`, keeping scheme, host,
/// query and fragment exactly as written. A path with at most one segment
/// becomes empty, so `https://host/alert` maps to `https://host`.
pub fn base_url(detail_url: &str) -> String {
    let path_start = match Url::parse(detail_url) {
        Ok(url) if url.has_host() => authority_end(detail_url),
        _ => 0,
    };
    let (prefix, rest) = detail_url.split_at(path_start);
    let path_end = rest.find(|c: char| c == '?' || c == '#').unwrap_or(rest.len());
    let (path, suffix) = rest.split_at(path_end);
    format!("{prefix}{}{suffix}", parent_path(path))
}

/// Byte offset where the path begins in an absolute URL.
fn authority_end(raw: &str) -> usize {
    let start = raw.find("://").map_or(0, |idx| idx + 3);
    raw[start..]
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .map_or(raw.len(), |idx| start + idx)
}

fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}
