#![cfg(test)]

mod rust_notes {
    use crate::cli::BuildKind;
    use crate::config::{self, SiteConfig};
    use crate::link::Link;
    use crate::nav::PageNav;
    use crate::Ctx;

    fn write_site(name: &str, file_name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("quire-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file_name), content).unwrap();
        dir
    }

    #[test]
    fn nav_links_are_well_formed() {
        let site_config = SiteConfig::rust_notes();
        for (location, nav_link) in site_config.links() {
            assert!(!nav_link.text.is_empty(), "empty text at {location}");
            assert!(
                Link::classify(&nav_link.link).is_some(),
                "malformed link at {location}"
            );
        }
    }

    #[test]
    fn nav_renders_in_declared_order() {
        let ctx = Ctx::from_site_config(BuildKind::Production, SiteConfig::rust_notes());
        let page_nav = PageNav::resolve(&ctx, "/");

        let nav: Vec<_> = page_nav
            .nav
            .iter()
            .map(|link| (link.text.as_str(), link.href.as_str(), link.external))
            .collect();
        assert_eq!(
            nav,
            [
                ("Rust", "/rust/", false),
                ("GitHub", "https://github.com/ssshooter", true),
            ]
        );
    }

    #[test]
    fn sidebar_flattens_to_declared_items() {
        let site_config = SiteConfig::rust_notes();
        let items: Vec<_> = config::flatten(&site_config.sidebar["/rust/"])
            .map(|item| (item.text.as_str(), item.link.as_str()))
            .collect();

        assert_eq!(
            items,
            [
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
        );
    }

    #[test]
    fn ownership_page_gets_rust_sidebar() {
        let ctx = Ctx::from_site_config(BuildKind::Production, SiteConfig::rust_notes());
        let page_nav = PageNav::resolve(&ctx, "/rust/ownership");

        assert_eq!(page_nav.sidebar_prefix.as_deref(), Some("/rust/"));
        let items = &page_nav.sidebar[0].items;
        assert_eq!(items[0].text, "基本概念");
        assert_eq!(items[1].text, "Ownership");
        assert_eq!(items[2].text, "Struct");
        assert!(items[1].active);
        assert_eq!(items.iter().filter(|item| item.active).count(), 1);

        assert_eq!(page_nav.prev.unwrap().href, "/rust/common-concepts");
        assert_eq!(page_nav.next.unwrap().href, "/rust/struct");
        assert!(page_nav.nav[0].active);
        assert!(!page_nav.nav[1].active);
    }

    #[test]
    fn loading_twice_is_identical() {
        let site_config = SiteConfig::rust_notes();
        let dir = write_site("load", "quire.toml", &site_config.to_toml().unwrap());

        let path = SiteConfig::find(&dir).unwrap();
        let first = SiteConfig::load(&path).unwrap();
        let second = SiteConfig::load(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, site_config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn yaml_is_found_and_validated() {
        let dir = write_site(
            "yaml",
            "quire.yml",
            "title: Rust Notes\ndescription: ''\n",
        );

        let path = SiteConfig::find(&dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "quire.yml");
        let err = SiteConfig::load(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<config::ConfigError>(),
            Some(&config::ConfigError::EmptyDescription)
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_required_field_fails_to_load() {
        let dir = write_site("missing", "quire.toml", "description = \"Just Rust Notes.\"\n");
        assert!(SiteConfig::load(dir.join("quire.toml")).is_err());
        std::fs::remove_dir_all(&dir).unwrap();

        let dir = std::env::temp_dir().join(format!("quire-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        assert!(SiteConfig::find(&dir).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
