use crate::config::{self, NavLink, SidebarMap, SidebarSection};
use crate::ctx::Ctx;
use crate::link::{self, Link};

/// Find the sidebar shown on `page`. When several path prefixes match, the one with the most
/// path segments wins, then the longest.
pub fn sidebar_for<'a>(
    sidebar: &'a SidebarMap,
    page: &str,
) -> Option<(&'a str, &'a [SidebarSection])> {
    let page = link::normalize_page_path(page);

    sidebar
        .iter()
        .filter(|(prefix, _)| page.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| (prefix.matches('/').count(), prefix.len()))
        .map(|(prefix, sections)| (prefix.as_str(), sections.as_slice()))
}

/// A link as it is rendered.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LinkView {
    pub text: String,
    pub href: String,
    pub external: bool,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SectionView {
    pub text: String,
    pub collapsible: bool,
    pub collapsed: bool,
    pub items: Vec<LinkView>,
}

/// Everything a page needs to render its navigation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PageNav {
    pub page: String,
    pub title: String,
    pub description: String,
    pub nav: Vec<LinkView>,
    pub sidebar_prefix: Option<String>,
    pub sidebar: Vec<SectionView>,
    pub prev: Option<LinkView>,
    pub next: Option<LinkView>,
}

fn link_view(ctx: &Ctx, nav_link: &NavLink, active: bool) -> LinkView {
    LinkView {
        text: nav_link.text.clone(),
        href: ctx.resolve_link(&nav_link.link),
        external: Link::classify(&nav_link.link).is_some_and(|link| link.is_external()),
        active,
    }
}

/// Nav links ending in `/` are active for every page below them, other internal links only for
/// the page itself. The site root is only active on the root page.
fn nav_link_active(page: &str, nav_link: &NavLink) -> bool {
    match Link::classify(&nav_link.link) {
        Some(Link::Internal(path)) => {
            let path = link::normalize_page_path(path);
            if path != "/" && path.ends_with('/') {
                page.starts_with(&path)
            } else {
                page == path
            }
        }
        _ => false,
    }
}

fn sidebar_item_active(page: &str, nav_link: &NavLink) -> bool {
    config::is_internal(nav_link) && link::is_active(page, &nav_link.link)
}

/// The nav bar as shown on pages that are not below any nav link.
pub fn site_nav(ctx: &Ctx) -> Vec<LinkView> {
    ctx.site_config()
        .nav
        .iter()
        .map(|nav_link| link_view(ctx, nav_link, false))
        .collect()
}

impl PageNav {
    /// Resolve the navigation of a page. `page` may carry the site base and a `.html`/`.md`
    /// extension.
    pub fn resolve(ctx: &Ctx, page: &str) -> PageNav {
        let site_config = ctx.site_config();
        let page = link::normalize_page_path(link::strip_base(ctx.base(), page));

        let nav = site_config
            .nav
            .iter()
            .map(|nav_link| link_view(ctx, nav_link, nav_link_active(&page, nav_link)))
            .collect();

        let (sidebar_prefix, sections) = match sidebar_for(&site_config.sidebar, &page) {
            Some((prefix, sections)) => (Some(prefix.to_owned()), sections),
            None => (None, &[][..]),
        };

        let sidebar = sections
            .iter()
            .map(|section| {
                let items: Vec<LinkView> = section
                    .items
                    .iter()
                    .map(|item| link_view(ctx, item, sidebar_item_active(&page, item)))
                    .collect();
                let has_active = items.iter().any(|item| item.active);
                SectionView {
                    text: section.text.clone(),
                    collapsible: section.collapsed.is_some(),
                    collapsed: section.collapsed.unwrap_or(false) && !has_active,
                    items,
                }
            })
            .collect();

        let (prev, next) = {
            let pages: Vec<&NavLink> = config::flatten(sections)
                .filter(|item| config::is_internal(item))
                .collect();
            match pages.iter().position(|item| link::is_active(&page, &item.link)) {
                Some(idx) => (
                    idx.checked_sub(1).map(|idx| link_view(ctx, pages[idx], false)),
                    pages.get(idx + 1).map(|item| link_view(ctx, item, false)),
                ),
                None => (None, None),
            }
        };

        PageNav {
            page,
            title: site_config.title.clone(),
            description: site_config.description.clone(),
            nav,
            sidebar_prefix,
            sidebar,
            prev,
            next,
        }
    }
}
