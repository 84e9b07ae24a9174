//! Coordinate-file viewer
//!
//! Downloads a structure file, parses its atom sites into a [`Scene`] and
//! hands out sessions over it. mmCIF (`_atom_site` loop) and legacy PDB
//! (`ATOM`/`HETATM` records) are both understood.

use super::{DisplayPreset, SelectedStructure, StructureViewer, ViewerSession};
use crate::error::{CliError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, instrument};

/// Largest coordinate file the viewer will download
pub const MAX_COORDINATE_BYTES: usize = 64 * 1024 * 1024;

/// Detected coordinate file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateFormat {
    Mmcif,
    Pdb,
}

impl std::fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateFormat::Mmcif => f.write_str("mmCIF"),
            CoordinateFormat::Pdb => f.write_str("PDB"),
        }
    }
}

/// In-memory summary of a parsed structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub format: CoordinateFormat,
    /// Polymer (`ATOM`) atom count
    pub atoms: usize,
    /// Ligand and solvent (`HETATM`) atom count
    pub hetero_atoms: usize,
    /// Chain identifiers in file order
    pub chains: Vec<String>,
    /// Distinct polymer residues
    pub residues: usize,
    /// Mean B-factor; pLDDT for predicted models
    pub mean_b_factor: Option<f64>,
}

#[derive(Default)]
struct SceneBuilder {
    atoms: usize,
    hetero_atoms: usize,
    chains: Vec<String>,
    residues: BTreeSet<(String, String)>,
    b_sum: f64,
    b_count: usize,
}

impl SceneBuilder {
    fn add(&mut self, hetero: bool, chain: &str, residue: &str, b_factor: Option<f64>) {
        if hetero {
            self.hetero_atoms += 1;
        } else {
            self.atoms += 1;
            self.residues.insert((chain.to_string(), residue.to_string()));
        }

        if !chain.is_empty() && !self.chains.iter().any(|c| c == chain) {
            self.chains.push(chain.to_string());
        }

        if let Some(b) = b_factor {
            self.b_sum += b;
            self.b_count += 1;
        }
    }

    fn build(self, format: CoordinateFormat) -> Result<Scene> {
        if self.atoms + self.hetero_atoms == 0 {
            return Err(CliError::viewer(format!("no atom sites found in {} file", format)));
        }

        Ok(Scene {
            format,
            atoms: self.atoms,
            hetero_atoms: self.hetero_atoms,
            chains: self.chains,
            residues: self.residues.len(),
            mean_b_factor: (self.b_count > 0).then(|| self.b_sum / self.b_count as f64),
        })
    }
}

impl Scene {
    /// Parse coordinate text, detecting the format from its content
    pub fn parse(text: &str) -> Result<Self> {
        match detect_format(text) {
            Some(CoordinateFormat::Mmcif) => parse_mmcif(text),
            Some(CoordinateFormat::Pdb) => parse_pdb(text),
            None => Err(CliError::viewer("unrecognized coordinate file format")),
        }
    }
}

fn detect_format(text: &str) -> Option<CoordinateFormat> {
    let mut saw_pdb_record = false;
    for line in text.lines().map(str::trim_start) {
        if line.starts_with("data_") || line.starts_with("_atom_site.") {
            return Some(CoordinateFormat::Mmcif);
        }
        if line.starts_with("ATOM  ") || line.starts_with("HETATM") {
            saw_pdb_record = true;
        }
    }
    saw_pdb_record.then_some(CoordinateFormat::Pdb)
}

fn parse_pdb(text: &str) -> Result<Scene> {
    let mut scene = SceneBuilder::default();

    for line in text.lines() {
        // Only the first model of a multi-model file is shown.
        if line.starts_with("ENDMDL") {
            break;
        }

        let hetero = match line.get(0..6) {
            Some("ATOM  ") => false,
            Some("HETATM") => true,
            _ => continue,
        };

        let chain = line.get(21..22).unwrap_or("").trim();
        let residue = line.get(22..27).unwrap_or("").trim();
        let b_factor = line.get(60..66).and_then(|s| s.trim().parse::<f64>().ok());

        scene.add(hetero, chain, residue, b_factor);
    }

    scene.build(CoordinateFormat::Pdb)
}

fn parse_mmcif(text: &str) -> Result<Scene> {
    let mut lines = text.lines().peekable();
    let mut scene = SceneBuilder::default();
    // Only the first model of a multi-model file is shown.
    let mut first_model: Option<String> = None;
    let mut skipped = 0usize;

    while let Some(line) = lines.next() {
        if line.trim() != "loop_" {
            continue;
        }

        let mut columns: HashMap<String, usize> = HashMap::new();
        while let Some(tag) = lines.peek().copied().map(str::trim) {
            let Some(name) = tag.strip_prefix("_atom_site.") else {
                break;
            };
            columns.insert(name.to_string(), columns.len());
            lines.next();
        }

        if columns.is_empty() {
            continue;
        }

        let width = columns.len();
        let column = |names: &[&str]| names.iter().find_map(|n| columns.get(*n).copied());
        let group = column(&["group_PDB"]);
        let chain = column(&["auth_asym_id", "label_asym_id"]);
        let residue = column(&["auth_seq_id", "label_seq_id"]);
        let b_factor = column(&["B_iso_or_equiv"]);
        let model = column(&["pdbx_PDB_model_num"]);

        let mut row: Vec<String> = Vec::with_capacity(width);
        while let Some(&line) = lines.peek() {
            let trimmed = line.trim();
            if trimmed.starts_with('_') || trimmed.starts_with("loop_") || trimmed.starts_with("data_") {
                break;
            }
            lines.next();
            if trimmed.starts_with('#') {
                break;
            }

            for token in tokenize(trimmed) {
                row.push(token);
                if row.len() == width {
                    let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(String::as_str);
                    let in_first_model = match field(model) {
                        Some(m) => *first_model.get_or_insert_with(|| m.to_string()) == m,
                        None => true,
                    };
                    if in_first_model {
                        let hetero = field(group) == Some("HETATM");
                        let b = field(b_factor).and_then(|s| s.parse::<f64>().ok());
                        scene.add(
                            hetero,
                            field(chain).unwrap_or(""),
                            field(residue).unwrap_or(""),
                            b,
                        );
                    } else {
                        skipped += 1;
                    }
                    row.clear();
                }
            }
        }

        if !row.is_empty() {
            debug!(dangling = row.len(), "Ignoring incomplete atom_site row");
        }
    }

    if skipped > 0 {
        debug!(skipped, "Ignoring atom sites beyond the first model");
    }

    scene.build(CoordinateFormat::Mmcif)
}

/// Split a CIF data line into values, honoring single and double quotes
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '\'' || c == '"' {
            chars.next();
            let mut value = String::new();
            while let Some((_, ch)) = chars.next() {
                let closes = ch == c && chars.peek().is_none_or(|(_, next)| next.is_whitespace());
                if closes {
                    break;
                }
                value.push(ch);
            }
            tokens.push(value);
            continue;
        }

        let mut end = line.len();
        while let Some(&(i, ch)) = chars.peek() {
            if ch.is_whitespace() {
                end = i;
                break;
            }
            chars.next();
        }
        tokens.push(line[start..end].to_string());
    }

    tokens
}

/// Default viewer: fetches the file over HTTP and builds a [`Scene`]
pub struct CoordinateViewer {
    client: Client,
    live: AtomicUsize,
}

impl CoordinateViewer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            live: AtomicUsize::new(0),
        }
    }

    /// Sessions opened and not yet closed
    pub fn live_sessions(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructureViewer for CoordinateViewer {
    #[instrument(skip(self, structure), fields(identifier = %structure.identifier))]
    async fn open(&self, structure: &SelectedStructure, preset: DisplayPreset) -> Result<ViewerSession> {
        debug!(url = %structure.file_url, "Downloading structure file");
        let response = self
            .client
            .get(&structure.file_url)
            .send()
            .await?
            .error_for_status()?;

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > MAX_COORDINATE_BYTES {
                return Err(CliError::viewer(format!(
                    "{} is larger than {} MiB",
                    structure.file_url,
                    MAX_COORDINATE_BYTES / (1024 * 1024)
                )));
            }
            body.extend_from_slice(&chunk);
        }

        let scene = Scene::parse(&String::from_utf8_lossy(&body))?;
        debug!(
            atoms = scene.atoms,
            chains = scene.chains.len(),
            format = %scene.format,
            "Scene built"
        );

        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(ViewerSession::new(structure, scene, preset))
    }

    fn close(&self, session: ViewerSession) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        debug!(session = session.id(), "Viewer session released");
    }
}
