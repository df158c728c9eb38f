use anyhow::Context;
use clap::Parser;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use notify_debouncer_full::{new_debouncer, notify::*, DebounceEventResult};

mod check;
mod cli;
mod config;
mod ctx;
mod link;
mod nav;
mod out;
mod render;
mod tests;

use ctx::Ctx;
use out::Out;

/// Internal pages referenced by the configuration, deduplicated and in a stable order.
fn internal_pages(site_config: &config::SiteConfig) -> BTreeSet<String> {
    site_config
        .links()
        .filter_map(|(_, nav_link)| match link::Link::classify(&nav_link.link) {
            Some(link::Link::Internal(path)) => Some(link::normalize_page_path(path)),
            _ => None,
        })
        .collect()
}

/// Render `nav.html` and a navigation partial for every internal page into `out`. Returns the
/// number of files written.
fn render(renderer: &render::Renderer, out: &Out) -> anyhow::Result<usize> {
    let mut written = 0;

    let mut nav = Vec::new();
    renderer.nav(&mut nav)?;
    out.update_file(&mut &*nav, "nav.html")?;
    written += 1;

    for page in internal_pages(renderer.ctx().site_config()) {
        let mut content = Vec::new();
        renderer
            .page_nav(&mut content, &page)
            .with_context(|| format!("Rendering navigation of {page}"))?;

        let out_file = link::route_file(&page, "html")?;
        log::debug!("  {page} -> {:?}", out_file);
        out.update_file(&mut &*content, out_file)?;
        written += 1;
    }

    Ok(written)
}

fn load_site_config(path: &Path) -> anyhow::Result<(PathBuf, config::SiteConfig)> {
    let site_config_path = config::SiteConfig::find(path)?;
    let site_config = config::SiteConfig::load(&site_config_path)?;
    Ok((site_config_path, site_config))
}

fn init(args: cli::InitCommand) -> anyhow::Result<()> {
    let site_config_path = args.path.join(config::CONFIG_FILE_NAMES[0]);
    if site_config_path.exists() && !args.force {
        anyhow::bail!(
            "{:?} already exists, pass --force to overwrite it",
            site_config_path
        );
    }

    std::fs::create_dir_all(&args.path)?;
    std::fs::write(&site_config_path, config::SiteConfig::rust_notes().to_toml()?)
        .with_context(|| format!("Writing {site_config_path:?}"))?;
    log::info!("Wrote {:?}.", site_config_path);

    Ok(())
}

fn check(args: cli::CheckCommand) -> anyhow::Result<()> {
    let (site_config_path, site_config) = load_site_config(&args.path)?;
    log::info!(
        "{:?} is valid: {} nav link(s), {} sidebar(s).",
        site_config_path,
        site_config.nav.len(),
        site_config.sidebar.len()
    );

    let Some(content_dir) = args.content else {
        return Ok(());
    };

    let report = check::check_links(&site_config, &content_dir)?;
    log::info!(
        "Checked {} internal and skipped {} external link(s) against {} page(s).",
        report.internal,
        report.external,
        report.pages
    );
    for broken in report.broken.iter() {
        log::warn!(
            "Broken link {} at {}: {:?} does not exist",
            broken.link,
            broken.location,
            content_dir.join(&broken.expected)
        );
    }

    if args.strict && !report.is_ok() {
        anyhow::bail!("{} broken link(s)", report.broken.len());
    }

    Ok(())
}

fn sidebar(args: cli::SidebarCommand) -> anyhow::Result<()> {
    let (_, site_config) = load_site_config(&args.path)?;
    let ctx = Ctx::from_site_config(cli::BuildKind::Production, site_config);
    let page_nav = nav::PageNav::resolve(&ctx, &args.page);

    let Some(prefix) = &page_nav.sidebar_prefix else {
        log::info!("No sidebar is shown on {}.", page_nav.page);
        return Ok(());
    };

    println!("{prefix}");
    for section in page_nav.sidebar.iter() {
        println!("  {}", section.text);
        for item in section.items.iter() {
            let marker = if item.active { '*' } else { ' ' };
            println!("  {marker} {} ({})", item.text, item.href);
        }
    }

    Ok(())
}

enum FsChange {
    Any,
    None,
}

fn render_command(args: cli::RenderCommand) -> anyhow::Result<()> {
    let build_kind = args.build_kind();

    let build = |site_config: config::SiteConfig| -> anyhow::Result<()> {
        let ctx = Ctx::from_site_config(build_kind, site_config);
        let renderer = render::Renderer::build(&ctx, args.templates.as_deref())?;

        log::info!("Rendering ({:?})…", ctx.build_kind());
        let instant = std::time::Instant::now();
        let out = Out::at(&args.out)?;
        let written = render(&renderer, &out)?;
        log::info!(
            "Wrote {} file(s) to {:?} in {}ms.",
            written,
            out.prefix(),
            instant.elapsed().as_millis()
        );

        Ok(())
    };

    if !args.watch {
        let (_, site_config) = load_site_config(&args.path)?;
        return build(site_config);
    }

    let cvar_pair = Arc::new((Mutex::new(FsChange::Any), Condvar::new()));
    let cvar_pair2 = cvar_pair.clone();
    let out_dir = std::path::absolute(&args.out)?;
    let mut debouncer = new_debouncer(
        Duration::from_millis(250),
        None,
        move |ev: DebounceEventResult| {
            let Ok(evs) = ev else {
                return;
            };
            // writing partials must not trigger another render
            if evs
                .into_iter()
                .flat_map(|e| e.event.paths.into_iter())
                .all(|path| path.starts_with(&out_dir))
            {
                return;
            }

            let (lock, cvar) = &*cvar_pair2;
            if let Ok(mut change) = lock.lock() {
                *change = FsChange::Any;
                cvar.notify_one();
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(&args.path, RecursiveMode::Recursive)?;
    debouncer
        .cache()
        .add_root(&args.path, RecursiveMode::Recursive);
    if let Some(templates) = &args.templates {
        debouncer
            .watcher()
            .watch(templates, RecursiveMode::Recursive)?;
        debouncer
            .cache()
            .add_root(templates, RecursiveMode::Recursive);
    }

    let mut site_config: Option<config::SiteConfig> = None;
    loop {
        {
            let (lock, cvar) = &*cvar_pair;
            let mut change = lock
                .lock()
                .map_err(|_| anyhow::anyhow!("watcher lock poisoned"))?;
            while matches!(&*change, &FsChange::None) {
                log::info!("Waiting for file change…");
                change = cvar
                    .wait(change)
                    .map_err(|_| anyhow::anyhow!("watcher lock poisoned"))?;
            }
            *change = FsChange::None;
        }

        let reloaded = load_site_config(&args.path).map(|(_, site_config_)| {
            if site_config.is_some() && Some(&site_config_) != site_config.as_ref() {
                log::info!("Reloaded site configuration.");
            }
            site_config = Some(site_config_.clone());
            site_config_
        });

        if let Err(err) = reloaded.and_then(build) {
            log::error!("{:?}", err);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    {
        use simplelog as s;
        let level = if args.verbose {
            s::LevelFilter::Debug
        } else {
            s::LevelFilter::Info
        };
        s::TermLogger::init(
            level,
            s::Config::default(),
            s::TerminalMode::Mixed,
            s::ColorChoice::Auto,
        )?;
    }

    match args.command {
        cli::Commands::Init(args) => init(args),
        cli::Commands::Check(args) => check(args),
        cli::Commands::Sidebar(args) => sidebar(args),
        cli::Commands::Render(args) => render_command(args),
    }
}
