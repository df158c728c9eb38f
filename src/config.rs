use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::link::Link;

/// File names searched for, in order, when locating a site configuration.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["quire.toml", "quire.yaml", "quire.yml"];

/// A labelled link. `link` is either a root-relative path or an absolute URL.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct NavLink {
    pub text: String,
    pub link: String,
}

impl NavLink {
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        NavLink {
            text: text.into(),
            link: link.into(),
        }
    }
}

/// A sidebar group heading with its ordered child links.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SidebarSection {
    pub text: String,
    /// `None`: the group is not collapsible. `Some(true)`: collapsible and initially closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default)]
    pub items: Vec<NavLink>,
}

/// Sidebars keyed by the path prefix of the pages they are shown on.
pub type SidebarMap = BTreeMap<String, Vec<SidebarSection>>;

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    /// The path the site is served under, e.g. `/docs/`. Defaults to `/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    #[serde(default)]
    pub sidebar: SidebarMap,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("site title is empty")]
    EmptyTitle,
    #[error("site description is empty")]
    EmptyDescription,
    #[error("link text is empty at {location}")]
    EmptyLinkText { location: String },
    #[error("link {link:?} at {location} is neither a root-relative path nor an absolute URL")]
    InvalidLink { location: String, link: String },
    #[error("sidebar key {0:?} is not a path prefix starting with `/`")]
    InvalidSidebarPrefix(String),
    #[error("base {0:?} must start and end with `/`")]
    InvalidBase(String),
}

impl SiteConfig {
    /// Locate the configuration file inside `dir`.
    pub fn find(dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let dir = dir.as_ref();
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no site configuration found in {:?} (looked for {})",
                    dir,
                    CONFIG_FILE_NAMES.join(", ")
                )
            })
    }

    /// Read, parse and validate a configuration file. The format is picked by file extension.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<SiteConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("Reading {path:?}"))?;

        let site_config: SiteConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).with_context(|| format!("Parsing {path:?}"))?
            }
            _ => toml::from_str(&content).with_context(|| format!("Parsing {path:?}"))?,
        };
        site_config
            .validate()
            .with_context(|| format!("Validating {path:?}"))?;

        Ok(site_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ConfigError::EmptyDescription);
        }
        if let Some(base) = &self.base {
            if !base.starts_with('/') || !base.ends_with('/') {
                return Err(ConfigError::InvalidBase(base.clone()));
            }
        }

        for (idx, nav_link) in self.nav.iter().enumerate() {
            validate_link(nav_link, || format!("nav[{idx}]"))?;
        }

        for (prefix, sections) in &self.sidebar {
            if !prefix.starts_with('/') {
                return Err(ConfigError::InvalidSidebarPrefix(prefix.clone()));
            }
            for (section_idx, section) in sections.iter().enumerate() {
                for (idx, item) in section.items.iter().enumerate() {
                    validate_link(item, || {
                        format!("sidebar.{prefix:?}[{section_idx}].items[{idx}]")
                    })?;
                }
            }
        }

        Ok(())
    }

    pub fn base(&self) -> &str {
        self.base.as_deref().unwrap_or("/")
    }

    /// All links of the configuration with their location, nav first, then sidebars in key
    /// order.
    pub fn links(&self) -> impl Iterator<Item = (String, &NavLink)> {
        let nav = self
            .nav
            .iter()
            .enumerate()
            .map(|(idx, nav_link)| (format!("nav[{idx}]"), nav_link));
        let sidebar = self.sidebar.iter().flat_map(|(prefix, sections)| {
            sections
                .iter()
                .enumerate()
                .flat_map(move |(section_idx, section)| {
                    section.items.iter().enumerate().map(move |(idx, item)| {
                        (
                            format!("sidebar.{prefix:?}[{section_idx}].items[{idx}]"),
                            item,
                        )
                    })
                })
        });
        nav.chain(sidebar)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The "Rust Notes" site.
    pub fn rust_notes() -> SiteConfig {
        let items = [
            ("基本概念", "/rust/common-concepts"),
            ("Ownership", "/rust/ownership"),
            ("Struct", "/rust/struct"),
            ("枚举和 Match", "/rust/match"),
            ("项目管理", "/rust/project-management"),
            ("数据集合", "/rust/common-collection"),
            ("错误处理", "/rust/error-handling"),
            ("Generic", "/rust/generic"),
            ("Trait", "/rust/trait"),
        ]
        .into_iter()
        .map(|(text, link)| NavLink::new(text, link))
        .collect();

        SiteConfig {
            title: "Rust Notes".to_owned(),
            description: "Just Rust Notes.".to_owned(),
            base: None,
            nav: vec![
                NavLink::new("Rust", "/rust/"),
                NavLink::new("GitHub", "https://github.com/ssshooter"),
            ],
            sidebar: SidebarMap::from([(
                "/rust/".to_owned(),
                vec![SidebarSection {
                    text: "Rust".to_owned(),
                    collapsed: None,
                    items,
                }],
            )]),
        }
    }
}

fn validate_link(nav_link: &NavLink, location: impl Fn() -> String) -> Result<(), ConfigError> {
    if nav_link.text.trim().is_empty() {
        return Err(ConfigError::EmptyLinkText {
            location: location(),
        });
    }
    match Link::classify(&nav_link.link) {
        Some(_) => Ok(()),
        None => Err(ConfigError::InvalidLink {
            location: location(),
            link: nav_link.link.clone(),
        }),
    }
}

/// Flatten the items of a sequence of sections, keeping declaration order.
pub fn flatten(sections: &[SidebarSection]) -> impl Iterator<Item = &NavLink> {
    sections.iter().flat_map(|section| section.items.iter())
}

/// Whether a sidebar item points at a page on this site.
pub fn is_internal(nav_link: &NavLink) -> bool {
    matches!(Link::classify(&nav_link.link), Some(Link::Internal(_)))
}
