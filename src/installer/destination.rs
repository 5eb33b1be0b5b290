//! Destination-path collaborator
//!
//! Maps a resource to the local file it installs into. The default layout
//! puts every type in its own directory under `.claude/`:
//!
//! ```text
//! <root>/.claude/agents/react-expert.md        dev/frontend/react-expert (agent)
//! <root>/.claude/hooks/auth.json               auth (hook)
//! <root>/.claude/commands/react/hooks-pro.md   dev/frontend/react/hooks-pro (command)
//! ```

use std::path::{Component, Path, PathBuf};

use crate::domain::Resource;
use crate::error::{Result, fetch};

/// Directory under the root that receives installed resources
pub const INSTALL_DIR: &str = ".claude";

pub trait DestinationResolver: Send + Sync {
    /// Validated destination of `resource`
    ///
    /// # Errors
    ///
    /// `DestinationRejected` when the resource cannot be placed safely.
    fn destination(&self, resource: &Resource) -> Result<PathBuf>;
}

/// `<root>/.claude/<type dir>/<leaf>.<ext>`
#[derive(Debug, Clone)]
pub struct TypedLayout {
    root: PathBuf,
}

impl TypedLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DestinationResolver for TypedLayout {
    fn destination(&self, resource: &Resource) -> Result<PathBuf> {
        let leaf = resource.category().leaf;
        let relative = Path::new(&leaf);

        let safe = !leaf.is_empty()
            && !leaf.contains('\\')
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            return Err(fetch::destination_rejected(
                &resource.id,
                format!("'{leaf}' is not a safe relative file name"),
            ));
        }

        let kind = resource.resource_type;
        Ok(self
            .root
            .join(INSTALL_DIR)
            .join(kind.dir_name())
            .join(format!("{leaf}.{}", kind.extension())))
    }
}
