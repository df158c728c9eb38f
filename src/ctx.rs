use std::sync::Arc;

use crate::{cli::BuildKind, config::SiteConfig, link};

struct InnerCtx {
    build_kind: BuildKind,
    base: String,
    site_config: SiteConfig,
}

/// Site build context. The context is cheap to clone.
#[derive(Clone)]
pub struct Ctx {
    inner: Arc<InnerCtx>,
}

impl Ctx {
    /// Develop builds are served from the root, so the configured base only applies to
    /// production builds.
    pub fn from_site_config(build_kind: BuildKind, site_config: SiteConfig) -> Self {
        let base = if build_kind.is_production() {
            site_config.base().to_owned()
        } else {
            "/".to_owned()
        };
        Ctx {
            inner: Arc::new(InnerCtx {
                build_kind,
                base,
                site_config,
            }),
        }
    }

    pub fn build_kind(&self) -> BuildKind {
        self.inner.build_kind
    }

    pub fn base(&self) -> &str {
        &self.inner.base
    }

    pub fn site_config(&self) -> &SiteConfig {
        &self.inner.site_config
    }

    /// Turn a configured link into the `href` it is rendered with. Internal links get the base
    /// prepended, external links are passed through.
    pub fn resolve_link(&self, target: &str) -> String {
        match link::Link::classify(target) {
            Some(link::Link::Internal(path)) => link::with_base(self.base(), path),
            _ => target.to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn resolve_link() {
        use super::{BuildKind, Ctx, SiteConfig};

        let site_config: SiteConfig = toml::from_str(
            r#"
                title = "Notes"
                description = "Some notes."
                base = "/notes/"
            "#,
        )
        .unwrap();

        let ctx = Ctx::from_site_config(BuildKind::Production, site_config.clone());
        assert_eq!(ctx.base(), "/notes/");
        assert_eq!(ctx.resolve_link("/rust/"), "/notes/rust/");
        assert_eq!(ctx.resolve_link("/rust/trait"), "/notes/rust/trait");
        assert_eq!(
            ctx.resolve_link("https://github.com/ssshooter"),
            "https://github.com/ssshooter"
        );

        let ctx = Ctx::from_site_config(BuildKind::Develop, site_config);
        assert_eq!(ctx.base(), "/");
        assert_eq!(ctx.resolve_link("/rust/trait"), "/rust/trait");
    }
}
