//! Standalone HTML page for a search result
//!
//! Annotation text goes through the link transform and is escaped there;
//! every other value is escaped by the template.

use super::terminal::{format_resolution, reference_links, RECENT_LITERATURE_LIMIT};
use crate::api::types::ProteinRecord;
use crate::error::Result;
use crate::links::{render_links, to_html};
use crate::search::ViewState;
use crate::viewer::{DisplayPreset, ViewerSession};
use askama::Template;

struct Panel {
    title: &'static str,
    html: Option<String>,
}

struct ReferenceView {
    title: String,
    details: String,
    links_html: String,
}

struct StructureRow {
    selected: bool,
    identifier: String,
    category: String,
    method: String,
    resolution: String,
    provider: String,
    page_url: Option<String>,
}

struct ViewerView {
    identifier: String,
    file_url: String,
    summary: String,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>ProtLens • {{ heading }}</title>
    <style>
      body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; color: #1f2933; }
      h1 { margin-bottom: 0.25rem; }
      .facts { color: #52606d; }
      section { margin-top: 1.5rem; }
      .empty { color: #9aa5b1; }
      table { border-collapse: collapse; width: 100%; }
      th, td { border-bottom: 1px solid #e4e7eb; padding: 0.35rem 0.5rem; text-align: left; }
      tr.selected { background: #f0f4f8; font-weight: 600; }
      footer { margin-top: 2rem; font-size: 0.8rem; color: #9aa5b1; }
    </style>
  </head>
  <body>
    <header>
      <h1>{{ heading }}</h1>
      {% match description %}{% when Some with (text) %}<p>{{ text }}</p>{% when None %}{% endmatch %}
      <p class="facts">{{ facts }}</p>
    </header>
    {% for panel in panels %}
    <section>
      <h2>{{ panel.title }}</h2>
      {% match panel.html %}{% when Some with (html) %}<p>{{ html|safe }}</p>{% when None %}<p class="empty">No annotation available.</p>{% endmatch %}
    </section>
    {% endfor %}
    <section>
      <h2>Recent literature</h2>
      {% if references.is_empty() %}
      <p class="empty">No references listed.</p>
      {% else %}
      <ol>
        {% for reference in references %}
        <li>
          <strong>{{ reference.title }}</strong><br>
          <span class="facts">{{ reference.details }}</span><br>
          {{ reference.links_html|safe }}
        </li>
        {% endfor %}
      </ol>
      {% endif %}
    </section>
    <section>
      <h2>Structures ({{ structures.len() }})</h2>
      {% if structures.is_empty() %}
      <p class="empty">No structures available for {{ accession }}.</p>
      {% else %}
      <table>
        <thead><tr><th>Model</th><th>Category</th><th>Method</th><th>Resolution</th><th>Provider</th></tr></thead>
        <tbody>
          {% for row in structures %}
          <tr{% if row.selected %} class="selected"{% endif %}>
            <td>{% match row.page_url %}{% when Some with (url) %}<a href="{{ url }}" target="_blank" rel="noopener noreferrer">{{ row.identifier }}</a>{% when None %}{{ row.identifier }}{% endmatch %}</td>
            <td>{{ row.category }}</td>
            <td>{{ row.method }}</td>
            <td>{{ row.resolution }}</td>
            <td>{{ row.provider }}</td>
          </tr>
          {% endfor %}
        </tbody>
      </table>
      {% endif %}
    </section>
    <section>
      <h2>Viewer</h2>
      {% match viewer %}{% when Some with (v) %}
      <p><a href="{{ v.file_url }}">{{ v.identifier }}</a>: {{ v.summary }}</p>
      {% when None %}<p class="empty">Nothing to display.</p>{% endmatch %}
    </section>
    <footer>Generated by ProtLens {{ version }} on {{ generated_at }}</footer>
  </body>
</html>
"#
)]
struct ProteinPage {
    heading: String,
    accession: String,
    description: Option<String>,
    facts: String,
    panels: Vec<Panel>,
    references: Vec<ReferenceView>,
    structures: Vec<StructureRow>,
    viewer: Option<ViewerView>,
    version: &'static str,
    generated_at: String,
}

/// Render a ready view as a complete HTML document
pub fn render_page(
    record: &ProteinRecord,
    view: &ViewState,
    session: Option<&ViewerSession>,
) -> Result<String> {
    let heading = match &record.entry_name {
        Some(name) => format!("{} · {}", record.accession, name),
        None => record.accession.to_string(),
    };

    let facts = [
        record.gene.as_ref().map(|g| format!("Gene: {}", g)),
        record.organism.as_ref().map(|o| format!("Organism: {}", o)),
        record.sequence_length.map(|l| format!("Length: {} aa", l)),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" · ");

    let panels = vec![
        Panel {
            title: "Function",
            html: record.function.as_deref().map(|t| to_html(&render_links(t))),
        },
        Panel {
            title: "Subunit",
            html: record.subunit.as_deref().map(|t| to_html(&render_links(t))),
        },
    ];

    let references = record
        .recent_references(RECENT_LITERATURE_LIMIT)
        .into_iter()
        .map(|r| ReferenceView {
            title: r.title.clone().unwrap_or_else(|| "Untitled".to_string()),
            details: [r.byline(), r.journal.clone(), r.publication_date.clone()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", "),
            links_html: to_html(&reference_links(r)),
        })
        .collect();

    let selected_id = view.selected.as_ref().map(|s| s.identifier.as_str());
    let structures = view
        .structures
        .iter()
        .map(|c| StructureRow {
            selected: selected_id == Some(c.identifier.as_str()),
            identifier: c.identifier.clone(),
            category: c.category.to_string(),
            method: c.experimental_method.clone().unwrap_or_else(|| "-".to_string()),
            resolution: format_resolution(c.resolution),
            provider: c.provider.clone().unwrap_or_else(|| "-".to_string()),
            page_url: c.page_url.clone(),
        })
        .collect();

    let viewer = match (session, view.selected.as_ref()) {
        (Some(session), _) => Some(ViewerView {
            identifier: session.identifier().to_string(),
            file_url: session.url().to_string(),
            summary: format!(
                "{} atoms in {} chains, {}",
                session.scene().atoms,
                session.scene().chains.len(),
                session.preset()
            ),
        }),
        (None, Some(selected)) => Some(ViewerView {
            identifier: selected.identifier.clone(),
            file_url: selected.file_url.clone(),
            summary: DisplayPreset::default_for(&selected.category).to_string(),
        }),
        (None, None) => None,
    };

    let page = ProteinPage {
        heading,
        accession: record.accession.to_string(),
        description: record.description.clone(),
        facts,
        panels,
        references,
        structures,
        viewer,
        version: env!("CARGO_PKG_VERSION"),
        generated_at: chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
    };

    Ok(page.render()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::search::SearchState;
    use protlens_common::types::Accession;

    fn record(function: &str) -> ProteinRecord {
        ProteinRecord {
            accession: Accession::new("P01308").unwrap(),
            entry_name: Some("INS_HUMAN".into()),
            description: Some("Insulin <precursor>".into()),
            gene: Some("INS".into()),
            organism: None,
            sequence_length: Some(110),
            function: Some(function.into()),
            subunit: None,
            references: vec![],
        }
    }

    #[test]
    fn test_page_escapes_and_links() {
        let record = record("Binds <b>receptor</b> (PubMed:123). Lowers glucose.");
        let view = ViewState {
            state: SearchState::Ready,
            record: Some(record.clone()),
            ..ViewState::default()
        };
        let html = render_page(&record, &view, None).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Insulin &lt;precursor&gt;"));
        assert!(html.contains("Binds &lt;b&gt;receptor&lt;"));
        assert!(!html.contains("<b>receptor"));
        assert!(html.contains("target=\"_blank\" rel=\"noopener noreferrer\">123 ↗</a>).<br>Lowers glucose."));
        assert!(html.contains("No structures available for P01308."));
        assert!(html.contains("No references listed."));
        assert!(html.contains("Nothing to display."));
    }
}
