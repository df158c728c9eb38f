use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug)]
pub enum BuildKind {
    Production,
    Develop,
}

#[allow(unused)]
impl BuildKind {
    pub fn is_production(self) -> bool {
        matches!(self, BuildKind::Production)
    }

    pub fn is_develop(self) -> bool {
        matches!(self, BuildKind::Develop)
    }
}

#[derive(Debug, Parser)]
pub struct InitCommand {
    /// Overwrite an existing quire.toml.
    #[arg(short, long, default_value = "false")]
    pub force: bool,
    #[arg(default_value = "./")]
    pub path: PathBuf,
}

#[derive(Debug, Parser)]
pub struct CheckCommand {
    /// Directory holding the markdown pages internal links refer to.
    #[arg(short, long)]
    pub content: Option<PathBuf>,
    /// Fail when links are broken instead of only warning.
    #[arg(short, long, default_value = "false")]
    pub strict: bool,
    #[arg(default_value = "./")]
    pub path: PathBuf,
}

#[derive(Debug, Parser)]
pub struct SidebarCommand {
    /// Page path, e.g. `/rust/ownership`.
    pub page: String,
    #[arg(default_value = "./")]
    pub path: PathBuf,
}

#[derive(Debug, Parser)]
pub struct RenderCommand {
    #[arg(short, long, default_value = "false")]
    pub watch: bool,
    #[arg(short, long, default_value = "false")]
    pub develop: bool,
    #[arg(short, long, default_value = "./out")]
    pub out: PathBuf,
    /// Directory with templates overriding the built-in ones.
    #[arg(short, long)]
    pub templates: Option<PathBuf>,
    #[arg(default_value = "./")]
    pub path: PathBuf,
}

impl RenderCommand {
    pub fn build_kind(&self) -> BuildKind {
        if self.develop {
            BuildKind::Develop
        } else {
            BuildKind::Production
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the built-in Rust Notes configuration.
    Init(InitCommand),
    /// Load and validate the configuration, optionally checking internal links.
    Check(CheckCommand),
    /// Print the sidebar shown on a page.
    Sidebar(SidebarCommand),
    /// Render navigation partials.
    Render(RenderCommand),
}

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}
