//! Structure viewer bridge
//!
//! A [`StructureViewer`] turns a structure-file URL and a display preset
//! into a live [`ViewerSession`]. A [`ViewerContainer`] owns at most one
//! session at a time: mounting a different structure releases the current
//! session before the new one is built, and dropping the container releases
//! whatever is still mounted.

pub mod coordinates;

pub use coordinates::{CoordinateFormat, CoordinateViewer, Scene};

use crate::api::types::{ModelCategory, StructureCandidate};
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// The structure handed to the viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedStructure {
    pub identifier: String,
    pub file_url: String,
    pub category: ModelCategory,
}

impl From<&StructureCandidate> for SelectedStructure {
    fn from(candidate: &StructureCandidate) -> Self {
        Self {
            identifier: candidate.identifier.clone(),
            file_url: candidate.file_url.clone(),
            category: candidate.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    Cartoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Per-residue model confidence (pLDDT)
    Confidence,
    Chain,
}

/// How a structure is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayPreset {
    pub representation: Representation,
    pub color: ColorScheme,
}

impl DisplayPreset {
    /// Cartoon; colored by confidence for predicted models, by chain otherwise
    pub fn default_for(category: &ModelCategory) -> Self {
        Self {
            representation: Representation::Cartoon,
            color: if category.is_predicted() {
                ColorScheme::Confidence
            } else {
                ColorScheme::Chain
            },
        }
    }
}

impl std::fmt::Display for DisplayPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let representation = match self.representation {
            Representation::Cartoon => "cartoon",
        };
        let color = match self.color {
            ColorScheme::Confidence => "confidence (pLDDT)",
            ColorScheme::Chain => "chain",
        };
        write!(f, "{}, colored by {}", representation, color)
    }
}

/// A live rendering of one structure
#[derive(Debug, Serialize)]
pub struct ViewerSession {
    id: u64,
    identifier: String,
    url: String,
    scene: Scene,
    preset: DisplayPreset,
}

impl ViewerSession {
    pub fn new(structure: &SelectedStructure, scene: Scene, preset: DisplayPreset) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            identifier: structure.identifier.clone(),
            url: structure.file_url.clone(),
            scene,
            preset,
        }
    }

    /// Unique, increasing per process
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn preset(&self) -> DisplayPreset {
        self.preset
    }
}

/// Builds and releases viewer sessions
#[async_trait]
pub trait StructureViewer: Send + Sync {
    /// Fetch the structure and build a session for it
    async fn open(&self, structure: &SelectedStructure, preset: DisplayPreset) -> Result<ViewerSession>;

    /// Release a session built by [`open`](Self::open)
    fn close(&self, session: ViewerSession);
}

/// Holds the single live session of one view
pub struct ViewerContainer {
    viewer: Arc<dyn StructureViewer>,
    active: Option<ViewerSession>,
}

impl ViewerContainer {
    pub fn new(viewer: Arc<dyn StructureViewer>) -> Self {
        Self { viewer, active: None }
    }

    /// Show `structure`, replacing whatever is mounted
    ///
    /// Mounting the URL that is already shown does nothing. A structure that
    /// cannot be loaded leaves the container empty; the failure is logged
    /// and not returned.
    pub async fn mount(&mut self, structure: &SelectedStructure) -> Option<&ViewerSession> {
        if self.active.as_ref().is_some_and(|s| s.url() == structure.file_url) {
            debug!(identifier = %structure.identifier, "Structure already mounted");
            return self.active.as_ref();
        }

        self.dispose();

        let preset = DisplayPreset::default_for(&structure.category);
        match self.viewer.open(structure, preset).await {
            Ok(session) => {
                debug!(session = session.id(), identifier = %structure.identifier, "Viewer session opened");
                self.active = Some(session);
            },
            Err(e) => {
                warn!(
                    identifier = %structure.identifier,
                    url = %structure.file_url,
                    error = %e,
                    "Failed to build structure view"
                );
            },
        }

        self.active.as_ref()
    }

    /// Release the mounted session, if any
    pub fn dispose(&mut self) {
        if let Some(session) = self.active.take() {
            self.viewer.close(session);
        }
    }

    pub fn session(&self) -> Option<&ViewerSession> {
        self.active.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}

impl Drop for ViewerContainer {
    fn drop(&mut self) {
        self.dispose();
    }
}
