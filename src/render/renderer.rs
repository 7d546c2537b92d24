use std::path::Path;

use crate::{composition::spec::Specification, foundation::error::VineResult};

/// Hand-off point for finished specifications.
///
/// Implementations own decoding, compositing and encoding. The specification they receive is a
/// snapshot; nothing they do feeds back into the builder that produced it.
pub trait Renderer {
    type Output;

    fn render(&mut self, spec: &Specification) -> VineResult<Self::Output>;

    fn export(&mut self, spec: &Specification, path: &Path, opts: &ExportOptions)
    -> VineResult<()>;
}

/// Output options passed through to [`Renderer::export`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    /// Encoder bitrate string such as `"8M"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    pub overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            codec: None,
            bitrate: None,
            overwrite: true,
        }
    }
}

pub fn ensure_parent_dir(path: &Path) -> VineResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
