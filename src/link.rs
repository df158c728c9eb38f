use std::path::PathBuf;

/// A configured link, classified by where it points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Link<'a> {
    /// A root-relative path on this site, e.g. `/rust/ownership`.
    Internal(&'a str),
    /// An absolute URL with a host, passed through unmodified.
    External(url::Url),
}

impl<'a> Link<'a> {
    /// Returns `None` for anything that is neither a root-relative path nor an absolute URL with
    /// a host. Protocol-relative links (`//host/path`) and paths with `.` or `..` segments are
    /// rejected.
    pub fn classify(link: &'a str) -> Option<Link<'a>> {
        if link.starts_with('/') {
            if link.starts_with("//") || has_dot_segments(link) {
                return None;
            }
            return Some(Link::Internal(link));
        }

        let url = url::Url::parse(link).ok()?;
        url.host_str()?;
        Some(Link::External(url))
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Link::External(_))
    }
}

fn has_dot_segments(path: &str) -> bool {
    path.split(['#', '?'])
        .next()
        .unwrap_or_default()
        .split('/')
        .any(|segment| matches!(segment, "." | ".."))
}

/// Normalize a page path so that equivalent spellings compare equal: a leading `/` is ensured,
/// query and fragment are dropped, `.html` and `.md` extensions are stripped and a trailing
/// `index` becomes `/`.
pub fn normalize_page_path(path: &str) -> String {
    let path = path
        .split(['#', '?'])
        .next()
        .unwrap_or_default();

    let mut normalized = String::with_capacity(path.len() + 1);
    if !path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(path);

    for ext in [".html", ".md"] {
        if normalized.ends_with(ext) {
            normalized.truncate(normalized.len() - ext.len());
            break;
        }
    }
    if normalized.ends_with("/index") {
        normalized.truncate(normalized.len() - "index".len());
    }

    normalized
}

/// Join a site base (e.g. `/docs/`) and a root-relative path.
pub fn with_base(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path.to_owned();
    }
    format!("{base}{path}")
}

/// Remove a site base from a requested path. Paths outside the base are returned as they are.
pub fn strip_base<'a>(base: &str, path: &'a str) -> &'a str {
    let base = base.trim_end_matches('/');
    match path.strip_prefix(base) {
        Some(rest) if !base.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
            if rest.is_empty() {
                "/"
            } else {
                rest
            }
        }
        _ => path,
    }
}

/// Whether an internal link points at the given page.
pub fn is_active(page: &str, link: &str) -> bool {
    normalize_page_path(page) == normalize_page_path(link)
}

/// The file, relative to a root directory, that an internal path is served from, using the given
/// extension. `/rust/` maps to `rust/index.<ext>` and `/rust/ownership` to `rust/ownership.<ext>`.
pub fn route_file(path: &str, extension: &str) -> anyhow::Result<PathBuf> {
    if has_dot_segments(path) {
        anyhow::bail!("path {path:?} does not stay below the site root");
    }

    let normalized = normalize_page_path(path);
    let mut file = PathBuf::new();
    let mut segments = normalized.trim_start_matches('/').split('/').peekable();

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            let name = if segment.is_empty() { "index" } else { segment };
            file.push(format!("{name}.{extension}"));
        } else if !segment.is_empty() {
            file.push(segment);
        }
    }

    Ok(file)
}

/// The markdown content file an internal link refers to.
pub fn content_file(path: &str) -> anyhow::Result<PathBuf> {
    route_file(path, "md")
}
