use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::link::{self, Link};

#[derive(Debug, PartialEq, Eq)]
pub struct BrokenLink {
    /// Where the link is configured, e.g. `nav[0]` or `sidebar."/rust/"[0].items[2]`.
    pub location: String,
    pub link: String,
    /// The content file that was expected to exist.
    pub expected: PathBuf,
}

#[derive(Debug, Default)]
pub struct LinkReport {
    pub pages: usize,
    pub internal: usize,
    pub external: usize,
    pub broken: Vec<BrokenLink>,
}

impl LinkReport {
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty()
    }
}

/// Collect the markdown pages below `content_dir`, as paths relative to it.
fn collect_pages(content_dir: &Path) -> anyhow::Result<BTreeSet<PathBuf>> {
    let mut pages = BTreeSet::new();

    for entry in walkdir::WalkDir::new(content_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path().strip_prefix(content_dir)?;
        if path.extension().is_some_and(|ext| ext == "md") {
            pages.insert(path.to_owned());
        }
    }

    Ok(pages)
}

/// Check every internal link of the configuration against the markdown pages in `content_dir`.
/// External links are counted, not fetched.
pub fn check_links(site_config: &SiteConfig, content_dir: impl AsRef<Path>) -> anyhow::Result<LinkReport> {
    let content_dir = content_dir.as_ref();
    if !content_dir.is_dir() {
        anyhow::bail!("content directory does not exist: {:?}", content_dir);
    }

    let pages = collect_pages(content_dir)?;
    log::debug!("Found {} page(s) in {:?}", pages.len(), content_dir);

    let mut report = LinkReport {
        pages: pages.len(),
        ..LinkReport::default()
    };

    for (location, nav_link) in site_config.links() {
        match Link::classify(&nav_link.link) {
            Some(Link::Internal(path)) => {
                report.internal += 1;
                let expected = link::content_file(path)?;
                if !pages.contains(&expected) {
                    report.broken.push(BrokenLink {
                        location,
                        link: nav_link.link.clone(),
                        expected,
                    });
                }
            }
            Some(Link::External(_)) => report.external += 1,
            // validated on load
            None => {}
        }
    }

    Ok(report)
}

#[cfg(test)]
mod test {
    use super::check_links;
    use crate::config::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn broken_links_are_reported() {
        let dir = std::env::temp_dir().join(format!("quire-check-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("rust")).unwrap();
        for page in [
            "index.md",
            "common-concepts.md",
            "ownership.md",
            "struct.md",
            "match.md",
            "project-management.md",
            "common-collection.md",
            "error-handling.md",
            "generic.md",
        ] {
            std::fs::write(dir.join("rust").join(page), "# page\n").unwrap();
        }
        std::fs::write(dir.join("rust").join("notes.txt"), "").unwrap();

        let report = check_links(&SiteConfig::rust_notes(), &dir).unwrap();

        assert_eq!(report.pages, 9);
        assert_eq!(report.internal, 10);
        assert_eq!(report.external, 1);
        assert!(!report.is_ok());
        assert_eq!(report.broken.len(), 1);
        assert_eq!(report.broken[0].link, "/rust/trait");
        assert_eq!(report.broken[0].location, r#"sidebar."/rust/"[0].items[8]"#);
        assert_eq!(
            report.broken[0].expected,
            PathBuf::from("rust").join("trait.md")
        );

        std::fs::write(dir.join("rust").join("trait.md"), "# Trait\n").unwrap();
        assert!(check_links(&SiteConfig::rust_notes(), &dir).unwrap().is_ok());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_content_dir() {
        let dir = std::env::temp_dir().join("quire-check-does-not-exist");
        assert!(check_links(&SiteConfig::rust_notes(), dir).is_err());
    }
}
