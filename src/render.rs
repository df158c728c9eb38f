use minijinja::{context, Environment};
use std::path::Path;

use crate::nav::{self, PageNav};
use crate::Ctx;

/// Templates shipped with quire. A template directory passed to [`Renderer::build`] can
/// override any of them by file name.
fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        "_nav.html" => Some(include_str!("../templates/_nav.html")),
        "_sidebar.html" => Some(include_str!("../templates/_sidebar.html")),
        "_pager.html" => Some(include_str!("../templates/_pager.html")),
        "_page-nav.html" => Some(include_str!("../templates/_page-nav.html")),
        _ => None,
    }
}

fn escape_error<E>(_: E) -> minijinja::Error {
    minijinja::Error::new(
        minijinja::ErrorKind::InvalidOperation,
        "could not escape value",
    )
}

/// Minijinja filter escaping a URL for use as an `href`. Unlike minijinja's own HTML escaping, `/`
/// is kept as is.
fn href(value: &str) -> Result<minijinja::Value, minijinja::Error> {
    let mut buf = String::with_capacity(value.len());
    pulldown_cmark_escape::escape_href(&mut buf, value).map_err(escape_error)?;
    Ok(minijinja::Value::from_safe_string(buf))
}

/// Minijinja filter escaping any other attribute value.
fn attr(value: &str) -> Result<minijinja::Value, minijinja::Error> {
    let mut buf = String::with_capacity(value.len());
    pulldown_cmark_escape::escape_html(&mut buf, value).map_err(escape_error)?;
    Ok(minijinja::Value::from_safe_string(buf))
}

pub struct Renderer {
    ctx: Ctx,
    t: Environment<'static>,
}

impl Renderer {
    pub fn build(ctx: &Ctx, template_path: Option<&Path>) -> anyhow::Result<Renderer> {
        let mut t = Environment::new();
        t.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);

        {
            let ctx = ctx.clone();
            t.add_filter("link", move |target: String| href(&ctx.resolve_link(&target)));
        }
        t.add_filter("href", |value: String| href(&value));
        t.add_filter("attr", |value: String| attr(&value));

        let user_loader = template_path.map(minijinja::path_loader);
        t.set_loader(move |name| {
            if let Some(user_loader) = &user_loader {
                if let Some(source) = user_loader(name)? {
                    return Ok(Some(source));
                }
            }
            Ok(builtin_template(name).map(str::to_owned))
        });

        Ok(Renderer {
            ctx: ctx.clone(),
            t,
        })
    }

    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    /// Render the nav bar, sidebar and pager of `page`.
    pub fn page_nav(&self, write: impl std::io::Write, page: &str) -> anyhow::Result<()> {
        let page_nav = PageNav::resolve(&self.ctx, page);
        let template = self.t.get_template("_page-nav.html")?;

        template.render_to_write(
            context! {
                base => self.ctx.base(),
                ..minijinja::Value::from_serialize(&page_nav)
            },
            write,
        )?;

        Ok(())
    }

    /// Render the site-wide nav bar, with no link marked active.
    pub fn nav(&self, write: impl std::io::Write) -> anyhow::Result<()> {
        let site_config = self.ctx.site_config();
        let template = self.t.get_template("_nav.html")?;

        template.render_to_write(
            context! {
                base => self.ctx.base(),
                title => site_config.title,
                description => site_config.description,
                nav => nav::site_nav(&self.ctx),
            },
            write,
        )?;

        Ok(())
    }
}
