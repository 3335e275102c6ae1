//! # Import Boundary
//!
//! The vector-graphics parser is an external collaborator; the core only
//! fixes its interface. An importer turns source text into layers plus
//! optional canvas dimensions, reporting unsupported embedded content as
//! warnings rather than failures.

use tracing::warn;

use crate::errors::ImportError;
use crate::scene::{Layer, Project};

/// Default canvas and timing for sources that carry no dimensions.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_FRAME_RATE: f64 = 30.0;
pub const DEFAULT_DURATION: f64 = 5.0;

/// The result of a successful parse.
#[derive(Clone, Debug, Default)]
pub struct ImportedDocument {
    pub layers: Vec<Layer>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Non-fatal findings (e.g. embedded raster content that was skipped).
    pub warnings: Vec<String>,
}

/// A pure parsing strategy for some vector source format.
pub trait VectorImporter {
    fn parse(&self, source: &str) -> Result<ImportedDocument, ImportError>;
}

impl Project {
    /// Builds a project from an import result.
    ///
    /// An empty layer set is a structured failure, never a crash; warnings
    /// are logged and otherwise ignored by the core.
    pub fn from_import(name: &str, doc: ImportedDocument) -> Result<Project, ImportError> {
        if doc.layers.is_empty() {
            return Err(ImportError::NoRenderableContent);
        }
        for w in &doc.warnings {
            warn!(warning = %w, "vector import warning");
        }
        let mut project = Project::new(
            name,
            doc.width.unwrap_or(DEFAULT_WIDTH),
            doc.height.unwrap_or(DEFAULT_HEIGHT),
            DEFAULT_FRAME_RATE,
            DEFAULT_DURATION,
        );
        project.layers = doc.layers;
        // Adopted ids may share the minting scheme (`layer-N`, `el-N`);
        // advance the counter so future mints stay unique.
        project.rebuild_id_counter();
        Ok(project)
    }
}
