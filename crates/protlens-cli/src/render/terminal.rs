//! Terminal rendering of the search view

use crate::api::endpoints::{doi_url, pubmed_url};
use crate::api::types::{LiteratureReference, ProteinRecord, StructureCandidate};
use crate::links::{render_links, to_terminal, Segment};
use crate::search::{SearchState, ViewState};
use crate::viewer::{DisplayPreset, SelectedStructure, ViewerSession};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use std::fmt::Write;

/// References shown in the literature panel
pub const RECENT_LITERATURE_LIMIT: usize = 5;

const INDENT: &str = "  ";

/// What the viewer panel has to show
pub enum ViewerPanel<'a> {
    /// Viewer bridge not used for this render
    Disabled,
    Mounted(&'a ViewerSession),
    /// Selection exists but no session could be built
    Empty,
}

/// Render the whole view: header, annotation panels, structures, viewer
pub fn render_view(view: &ViewState, viewer: ViewerPanel<'_>, hyperlinks: bool) -> String {
    let mut out = String::new();

    match &view.state {
        SearchState::Idle => {
            let _ = writeln!(out, "Enter a gene symbol or UniProt accession.");
            return out;
        },
        SearchState::Loading => {
            let _ = writeln!(out, "{} {}", "Searching".cyan(), view.query);
            return out;
        },
        SearchState::Error { message, .. } => {
            let _ = writeln!(out, "{} {}", "✗".red(), message);
            return out;
        },
        SearchState::Ready => {},
    }

    let Some(record) = view.record.as_ref() else {
        return out;
    };

    out.push_str(&render_header(record));
    out.push('\n');
    out.push_str(&render_panel("Function", record.function.as_deref(), hyperlinks));
    out.push_str(&render_panel("Subunit", record.subunit.as_deref(), hyperlinks));
    out.push_str(&render_literature(record, hyperlinks));
    out.push_str(&render_structures(&record.accession.to_string(), &view.structures, view.selected.as_ref()));

    if !matches!(viewer, ViewerPanel::Disabled) {
        out.push_str(&render_viewer(view.selected.as_ref(), viewer));
    }

    out
}

/// Identity card of the protein
pub fn render_header(record: &ProteinRecord) -> String {
    let mut out = String::new();
    let title = match &record.entry_name {
        Some(name) => format!("{} · {}", record.accession, name),
        None => record.accession.to_string(),
    };
    let _ = writeln!(out, "{}", title.bold().green());

    if let Some(description) = &record.description {
        let _ = writeln!(out, "{}", description.bold());
    }

    let mut facts = Vec::new();
    if let Some(gene) = &record.gene {
        facts.push(format!("Gene: {}", gene));
    }
    if let Some(organism) = &record.organism {
        facts.push(format!("Organism: {}", organism.italic()));
    }
    if let Some(length) = record.sequence_length {
        facts.push(format!("Length: {} aa", length));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "{}", facts.join("   "));
    }

    out
}

/// A titled annotation panel with links rendered
pub fn render_panel(title: &str, text: Option<&str>, hyperlinks: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title.cyan().bold());

    match text {
        Some(text) => {
            let rendered = to_terminal(&render_links(text), hyperlinks);
            for line in rendered.lines() {
                let _ = writeln!(out, "{}{}", INDENT, line);
            }
        },
        None => {
            let _ = writeln!(out, "{}{}", INDENT, "No annotation available.".dimmed());
        },
    }

    out.push('\n');
    out
}

/// The most recent references, newest first
pub fn render_literature(record: &ProteinRecord, hyperlinks: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Recent literature".cyan().bold());

    let references = record.recent_references(RECENT_LITERATURE_LIMIT);
    if references.is_empty() {
        let _ = writeln!(out, "{}{}", INDENT, "No references listed.".dimmed());
    }

    for (i, reference) in references.iter().enumerate() {
        let title = reference.title.as_deref().unwrap_or("Untitled");
        let _ = writeln!(out, "{}{}. {}", INDENT, i + 1, title);

        let details = reference_details(reference);
        if !details.is_empty() {
            let _ = writeln!(out, "{}   {}", INDENT, details.dimmed());
        }

        let links = reference_links(reference);
        if !links.is_empty() {
            let _ = writeln!(out, "{}   {}", INDENT, to_terminal(&links, hyperlinks));
        }
    }

    out.push('\n');
    out
}

fn reference_details(reference: &LiteratureReference) -> String {
    [
        reference.byline(),
        reference.journal.clone(),
        reference.publication_date.clone(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ")
}

/// PubMed and DOI links of a reference
pub fn reference_links(reference: &LiteratureReference) -> Vec<Segment> {
    let mut segments = Vec::new();
    if let Some(id) = &reference.pubmed_id {
        segments.push(Segment::text("PubMed "));
        segments.push(Segment::link(id, pubmed_url(id)));
    }
    if let Some(doi) = &reference.doi {
        if !segments.is_empty() {
            segments.push(Segment::text("  "));
        }
        segments.push(Segment::text("DOI "));
        segments.push(Segment::link(doi, doi_url(doi)));
    }
    segments
}

/// Candidate table; the selected row is marked
pub fn render_structures(
    accession: &str,
    structures: &[StructureCandidate],
    selected: Option<&SelectedStructure>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format!("Structures ({})", structures.len()).cyan().bold());

    if structures.is_empty() {
        let _ = writeln!(out, "{}No structures available for {}.", INDENT, accession);
        out.push('\n');
        return out;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["", "Model", "Category", "Method", "Resolution", "Provider"]);

    for candidate in structures {
        let marker = if selected.is_some_and(|s| s.identifier == candidate.identifier) {
            "▶"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            candidate.identifier.clone(),
            candidate.category.to_string(),
            candidate.experimental_method.clone().unwrap_or_else(|| "-".to_string()),
            format_resolution(candidate.resolution),
            candidate.provider.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }

    let _ = writeln!(out, "{}", table);
    out.push('\n');
    out
}

/// Resolution in Ångström, or a dash
pub fn format_resolution(resolution: Option<f64>) -> String {
    resolution
        .map(|r| format!("{:.2} Å", r))
        .unwrap_or_else(|| "-".to_string())
}

/// Viewer panel for the selected structure
pub fn render_viewer(selected: Option<&SelectedStructure>, viewer: ViewerPanel<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Viewer".cyan().bold());

    match (selected, viewer) {
        (_, ViewerPanel::Mounted(session)) => {
            let scene = session.scene();
            let _ = writeln!(out, "{}{} ({})", INDENT, session.identifier().bold(), scene.format);
            let _ = writeln!(
                out,
                "{}{} chains ({}), {} residues, {} atoms, {} hetero atoms",
                INDENT,
                scene.chains.len(),
                scene.chains.join(", "),
                scene.residues,
                scene.atoms,
                scene.hetero_atoms
            );
            if let Some(b) = scene.mean_b_factor {
                let _ = writeln!(out, "{}Mean B-factor/pLDDT: {:.1}", INDENT, b);
            }
            let _ = writeln!(out, "{}Display: {}", INDENT, session.preset());
        },
        (Some(selected), _) => {
            let _ = writeln!(
                out,
                "{}{} could not be loaded. Preset would be {}.",
                INDENT,
                selected.identifier,
                DisplayPreset::default_for(&selected.category)
            );
        },
        (None, _) => {
            let _ = writeln!(out, "{}{}", INDENT, "Nothing to display.".dimmed());
        },
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::types::ModelCategory;
    use protlens_common::types::Accession;

    fn record() -> ProteinRecord {
        ProteinRecord {
            accession: Accession::new("P01308").unwrap(),
            entry_name: Some("INS_HUMAN".into()),
            description: Some("Insulin".into()),
            gene: Some("INS".into()),
            organism: Some("Homo sapiens".into()),
            sequence_length: Some(110),
            function: Some("Lowers glucose (PubMed:123). Acts fast.".into()),
            subunit: None,
            references: vec![LiteratureReference {
                title: Some("Insulin structure".into()),
                authors: vec!["Smith J.".into()],
                journal: Some("Nature".into()),
                publication_date: Some("2004".into()),
                pubmed_id: Some("15146197".into()),
                doi: None,
            }],
        }
    }

    fn candidate(id: &str) -> StructureCandidate {
        StructureCandidate {
            identifier: id.into(),
            category: ModelCategory::ExperimentallyDetermined,
            experimental_method: Some("X-RAY DIFFRACTION".into()),
            resolution: Some(1.5),
            file_url: format!("http://files.test/{}.cif", id),
            page_url: None,
            provider: Some("PDBe".into()),
            format: None,
            coverage: None,
        }
    }

    fn ready(structures: Vec<StructureCandidate>) -> ViewState {
        ViewState {
            state: SearchState::Ready,
            query: "INS".into(),
            record: Some(record()),
            selected: structures.first().map(SelectedStructure::from),
            structures,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_render_ready_view() {
        colored::control::set_override(false);
        let out = render_view(&ready(vec![candidate("1a7f")]), ViewerPanel::Disabled, false);

        assert!(out.contains("P01308 · INS_HUMAN"));
        assert!(out.contains("Gene: INS"));
        assert!(out.contains("Length: 110 aa"));
        assert!(out.contains("Lowers glucose (123 ↗ <https://pubmed.ncbi.nlm.nih.gov/123>)."));
        assert!(out.contains("  Acts fast."));
        assert!(out.contains("No annotation available."));
        assert!(out.contains("1. Insulin structure"));
        assert!(out.contains("Smith J., Nature, 2004"));
        assert!(out.contains("1a7f"));
        assert!(out.contains("1.50 Å"));
        assert!(!out.contains("Viewer"));
    }

    #[test]
    fn test_zero_candidates_still_render_panels() {
        colored::control::set_override(false);
        let out = render_view(&ready(vec![]), ViewerPanel::Empty, false);
        assert!(out.contains("Function"));
        assert!(out.contains("No structures available for P01308."));
        assert!(out.contains("Nothing to display."));
    }

    #[test]
    fn test_error_view_is_message_only() {
        colored::control::set_override(false);
        let view = ViewState {
            state: SearchState::Error {
                message: "No mapping found for 'FOO'.".into(),
                kind: crate::error::ErrorKind::Resolution,
            },
            ..ViewState::default()
        };
        let out = render_view(&view, ViewerPanel::Empty, false);
        assert_eq!(out.trim(), "✗ No mapping found for 'FOO'.");
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(format_resolution(None), "-");
        assert_eq!(format_resolution(Some(2.0)), "2.00 Å");
    }
}
