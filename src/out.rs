use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Writer for the directory navigation partials are rendered into.
pub struct Out {
    prefix: PathBuf,
}

impl Out {
    /// Create a new out writer at `path`.
    ///
    /// # Warning
    ///
    /// This recursively removes everything currently at `path`.
    pub fn at(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let _ = fs::remove_dir_all(path);
        fs::create_dir_all(path)?;

        Ok(Out {
            prefix: path.canonicalize()?,
        })
    }

    /// Write `content` to `out_file`, relative to the out directory, creating its parent
    /// directories when needed. `out_file` must be a relative path without `.` or `..`
    /// components.
    pub fn update_file(&self, content: &mut impl Read, out_file: impl AsRef<Path>) -> anyhow::Result<()> {
        let out_file = out_file.as_ref();
        if !out_file
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            anyhow::bail!("refusing to write outside the out directory: {:?}", out_file);
        }

        let out_file = self.prefix.join(out_file);
        if let Some(parent) = out_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut fw = File::create(out_file)?;
        io::copy(content, &mut fw)?;

        Ok(())
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }
}
