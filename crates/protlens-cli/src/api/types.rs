//! API request and response types
//!
//! The `Uniprot*` and `Beacons*` structs mirror the remote JSON; only the
//! fields ProtLens displays are decoded. [`ProteinRecord`] and
//! [`StructureCandidate`] are the normalized forms held in view state.

use protlens_common::types::Accession;
use serde::{Deserialize, Serialize};

// ============================================================================
// Knowledge base (UniProtKB REST) wire types
// ============================================================================

/// A UniProtKB entry as returned by `GET /uniprotkb/<accession>`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotEntry {
    pub primary_accession: String,
    #[serde(rename = "uniProtkbId", default)]
    pub uniprotkb_id: Option<String>,
    #[serde(default)]
    pub protein_description: Option<UniprotProteinDescription>,
    #[serde(default)]
    pub genes: Vec<UniprotGene>,
    #[serde(default)]
    pub organism: Option<UniprotOrganism>,
    #[serde(default)]
    pub comments: Vec<UniprotComment>,
    #[serde(default)]
    pub sequence: Option<UniprotSequence>,
    #[serde(default)]
    pub references: Vec<UniprotReference>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotProteinDescription {
    #[serde(default)]
    pub recommended_name: Option<UniprotName>,
    #[serde(default)]
    pub submission_names: Vec<UniprotName>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotName {
    pub full_name: UniprotValue,
}

/// The `{ "value": ... }` wrapper UniProt uses for most text
#[derive(Debug, Clone, Deserialize)]
pub struct UniprotValue {
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotGene {
    #[serde(default)]
    pub gene_name: Option<UniprotValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotOrganism {
    #[serde(default)]
    pub scientific_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotComment {
    pub comment_type: String,
    #[serde(default)]
    pub texts: Vec<UniprotValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniprotSequence {
    pub length: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniprotReference {
    pub citation: UniprotCitation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniprotCitation {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub citation_cross_references: Vec<UniprotCrossReference>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UniprotCrossReference {
    pub database: String,
    pub id: String,
}

// ============================================================================
// Structure summary (3D-Beacons) wire types
// ============================================================================

/// Response of `GET /uniprot/summary/<accession>.json`
#[derive(Debug, Clone, Deserialize)]
pub struct BeaconsSummary {
    #[serde(default)]
    pub structures: Vec<BeaconsStructure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconsStructure {
    pub summary: BeaconsModel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BeaconsModel {
    pub model_identifier: String,
    #[serde(default)]
    pub model_category: Option<String>,
    #[serde(default)]
    pub experimental_method: Option<String>,
    #[serde(default)]
    pub resolution: Option<f64>,
    pub model_url: String,
    #[serde(default)]
    pub model_page_url: Option<String>,
    #[serde(default)]
    pub model_format: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub coverage: Option<f64>,
}

// ============================================================================
// Normalized view types
// ============================================================================

/// Descriptive annotation for one protein
///
/// Built once per search from a [`UniprotEntry`] and replaced wholesale by
/// the next search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinRecord {
    pub accession: Accession,
    pub entry_name: Option<String>,
    pub description: Option<String>,
    pub gene: Option<String>,
    pub organism: Option<String>,
    pub sequence_length: Option<u32>,
    /// Joined text of all FUNCTION comments
    pub function: Option<String>,
    /// Joined text of all SUBUNIT comments
    pub subunit: Option<String>,
    pub references: Vec<LiteratureReference>,
}

/// One literature citation attached to an entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteratureReference {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub journal: Option<String>,
    pub publication_date: Option<String>,
    pub pubmed_id: Option<String>,
    pub doi: Option<String>,
}

impl ProteinRecord {
    /// Normalize a knowledge-base entry
    ///
    /// `requested` is used when the entry's own primary accession does not
    /// satisfy the accession pattern.
    pub fn from_entry(entry: UniprotEntry, requested: &Accession) -> Self {
        let accession =
            Accession::new(entry.primary_accession.clone()).unwrap_or_else(|_| requested.clone());

        let description = entry.protein_description.as_ref().and_then(|d| {
            d.recommended_name
                .as_ref()
                .or_else(|| d.submission_names.first())
                .map(|n| n.full_name.value.clone())
        });

        let gene = entry
            .genes
            .iter()
            .find_map(|g| g.gene_name.as_ref().map(|n| n.value.clone()));

        let references = entry
            .references
            .into_iter()
            .map(|r| LiteratureReference::from_citation(r.citation))
            .collect();

        Self {
            accession,
            entry_name: entry.uniprotkb_id,
            description,
            gene,
            organism: entry.organism.and_then(|o| o.scientific_name),
            sequence_length: entry.sequence.map(|s| s.length),
            function: joined_comment(&entry.comments, "FUNCTION"),
            subunit: joined_comment(&entry.comments, "SUBUNIT"),
            references,
        }
    }

    /// The `limit` most recent references, newest first; undated ones last
    pub fn recent_references(&self, limit: usize) -> Vec<&LiteratureReference> {
        let mut refs: Vec<&LiteratureReference> = self.references.iter().collect();
        // Stable sort keeps the entry's own order among equal dates.
        refs.sort_by(|a, b| match (&a.publication_date, &b.publication_date) {
            (Some(x), Some(y)) => y.cmp(x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        refs.truncate(limit);
        refs
    }
}

fn joined_comment(comments: &[UniprotComment], comment_type: &str) -> Option<String> {
    let text = comments
        .iter()
        .filter(|c| c.comment_type == comment_type)
        .flat_map(|c| c.texts.iter().map(|t| t.value.trim()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!text.is_empty()).then_some(text)
}

impl LiteratureReference {
    fn from_citation(citation: UniprotCitation) -> Self {
        let xref = |db: &str| {
            citation
                .citation_cross_references
                .iter()
                .find(|x| x.database.eq_ignore_ascii_case(db))
                .map(|x| x.id.clone())
        };
        let pubmed_id = xref("PubMed");
        let doi = xref("DOI");

        Self {
            title: citation.title,
            authors: citation.authors,
            journal: citation.journal,
            publication_date: citation.publication_date,
            pubmed_id,
            doi,
        }
    }

    /// "First Author et al." style byline
    pub fn byline(&self) -> Option<String> {
        match self.authors.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            [first, second] => Some(format!("{} and {}", first, second)),
            [first, ..] => Some(format!("{} et al.", first)),
        }
    }
}

/// How a 3D model was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelCategory {
    ExperimentallyDetermined,
    TemplateBased,
    AbInitio,
    ConformationalEnsemble,
    Other(String),
}

impl ModelCategory {
    /// Computed rather than measured; coloring by confidence makes sense
    pub fn is_predicted(&self) -> bool {
        matches!(self, ModelCategory::TemplateBased | ModelCategory::AbInitio)
    }
}

impl From<String> for ModelCategory {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EXPERIMENTALLY DETERMINED" => ModelCategory::ExperimentallyDetermined,
            "TEMPLATE-BASED" => ModelCategory::TemplateBased,
            "AB-INITIO" | "DEEP-LEARNING" => ModelCategory::AbInitio,
            "CONFORMATIONAL ENSEMBLE" => ModelCategory::ConformationalEnsemble,
            _ => ModelCategory::Other(raw),
        }
    }
}

impl From<ModelCategory> for String {
    fn from(category: ModelCategory) -> Self {
        category.to_string()
    }
}

impl std::fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelCategory::ExperimentallyDetermined => f.write_str("EXPERIMENTALLY DETERMINED"),
            ModelCategory::TemplateBased => f.write_str("TEMPLATE-BASED"),
            ModelCategory::AbInitio => f.write_str("AB-INITIO"),
            ModelCategory::ConformationalEnsemble => f.write_str("CONFORMATIONAL ENSEMBLE"),
            ModelCategory::Other(raw) => f.write_str(raw),
        }
    }
}

/// One available 3D model for an accession
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureCandidate {
    pub identifier: String,
    pub category: ModelCategory,
    pub experimental_method: Option<String>,
    /// Resolution in Ångström, experimental models only
    pub resolution: Option<f64>,
    pub file_url: String,
    pub page_url: Option<String>,
    pub provider: Option<String>,
    pub format: Option<String>,
    /// Fraction of the sequence covered by the model
    pub coverage: Option<f64>,
}

impl From<BeaconsModel> for StructureCandidate {
    fn from(model: BeaconsModel) -> Self {
        Self {
            identifier: model.model_identifier,
            category: model
                .model_category
                .map(ModelCategory::from)
                .unwrap_or_else(|| ModelCategory::Other("UNKNOWN".to_string())),
            experimental_method: model.experimental_method,
            resolution: model.resolution,
            file_url: model.model_url,
            page_url: model.model_page_url,
            provider: model.provider,
            format: model.model_format,
            coverage: model.coverage,
        }
    }
}

impl BeaconsSummary {
    /// Candidates in the order the service listed them
    pub fn into_candidates(self) -> Vec<StructureCandidate> {
        self.structures
            .into_iter()
            .map(|s| StructureCandidate::from(s.summary))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn insulin_entry() -> serde_json::Value {
        serde_json::json!({
            "primaryAccession": "P01308",
            "uniProtkbId": "INS_HUMAN",
            "proteinDescription": {
                "recommendedName": { "fullName": { "value": "Insulin" } }
            },
            "genes": [{ "geneName": { "value": "INS" } }],
            "organism": { "scientificName": "Homo sapiens" },
            "comments": [
                { "commentType": "FUNCTION", "texts": [{ "value": "Insulin decreases blood glucose concentration (PubMed:123)." }] },
                { "commentType": "SUBUNIT", "texts": [{ "value": "Heterodimer of a B chain and an A chain." }] },
                { "commentType": "TISSUE SPECIFICITY", "texts": [{ "value": "Pancreas." }] }
            ],
            "sequence": { "length": 110 },
            "references": [
                { "citation": { "title": "Old", "authors": ["Bell G.I."], "publicationDate": "1980" } },
                { "citation": {
                    "title": "New",
                    "authors": ["A", "B", "C"],
                    "journal": "Nature",
                    "publicationDate": "2004-05",
                    "citationCrossReferences": [
                        { "database": "PubMed", "id": "15146197" },
                        { "database": "DOI", "id": "10.1038/nature02465" }
                    ]
                } },
                { "citation": { "title": "Undated" } }
            ]
        })
    }

    #[test]
    fn test_protein_record_from_entry() {
        let entry: UniprotEntry = serde_json::from_value(insulin_entry()).unwrap();
        let requested = Accession::new("P01308").unwrap();
        let record = ProteinRecord::from_entry(entry, &requested);

        assert_eq!(record.accession.as_str(), "P01308");
        assert_eq!(record.entry_name.as_deref(), Some("INS_HUMAN"));
        assert_eq!(record.description.as_deref(), Some("Insulin"));
        assert_eq!(record.gene.as_deref(), Some("INS"));
        assert_eq!(record.organism.as_deref(), Some("Homo sapiens"));
        assert_eq!(record.sequence_length, Some(110));
        assert!(record.function.as_deref().unwrap().contains("PubMed:123"));
        assert_eq!(
            record.subunit.as_deref(),
            Some("Heterodimer of a B chain and an A chain.")
        );
        assert_eq!(record.references.len(), 3);
        assert_eq!(record.references[1].pubmed_id.as_deref(), Some("15146197"));
        assert_eq!(record.references[1].doi.as_deref(), Some("10.1038/nature02465"));
    }

    #[test]
    fn test_minimal_entry_decodes() {
        let entry: UniprotEntry =
            serde_json::from_value(serde_json::json!({ "primaryAccession": "Q9Y6K9" })).unwrap();
        let record = ProteinRecord::from_entry(entry, &Accession::new("Q9Y6K9").unwrap());
        assert!(record.function.is_none());
        assert!(record.subunit.is_none());
        assert!(record.references.is_empty());
    }

    #[test]
    fn test_submission_name_fallback() {
        let entry: UniprotEntry = serde_json::from_value(serde_json::json!({
            "primaryAccession": "A0A024R161",
            "proteinDescription": {
                "submissionNames": [{ "fullName": { "value": "Uncharacterized protein" } }]
            }
        }))
        .unwrap();
        let record = ProteinRecord::from_entry(entry, &Accession::new("A0A024R161").unwrap());
        assert_eq!(record.description.as_deref(), Some("Uncharacterized protein"));
    }

    #[test]
    fn test_recent_references_order() {
        let entry: UniprotEntry = serde_json::from_value(insulin_entry()).unwrap();
        let record = ProteinRecord::from_entry(entry, &Accession::new("P01308").unwrap());

        let titles: Vec<_> = record
            .recent_references(5)
            .iter()
            .map(|r| r.title.clone().unwrap())
            .collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);

        assert_eq!(record.recent_references(1).len(), 1);
    }

    #[test]
    fn test_byline() {
        let mut reference = LiteratureReference {
            title: None,
            authors: vec![],
            journal: None,
            publication_date: None,
            pubmed_id: None,
            doi: None,
        };
        assert_eq!(reference.byline(), None);
        reference.authors = vec!["Smith J.".into(), "Doe J.".into()];
        assert_eq!(reference.byline().unwrap(), "Smith J. and Doe J.");
        reference.authors.push("Roe R.".into());
        assert_eq!(reference.byline().unwrap(), "Smith J. et al.");
    }

    #[test]
    fn test_structure_candidates_keep_service_order() {
        let summary: BeaconsSummary = serde_json::from_value(serde_json::json!({
            "uniprot_entry": { "ac": "P01308" },
            "structures": [
                { "summary": {
                    "model_identifier": "AF-P01308-F1",
                    "model_category": "AB-INITIO",
                    "model_url": "https://alphafold.ebi.ac.uk/files/AF-P01308-F1-model_v4.cif",
                    "model_format": "MMCIF",
                    "provider": "AlphaFold DB",
                    "coverage": 1.0
                } },
                { "summary": {
                    "model_identifier": "1a7f",
                    "model_category": "EXPERIMENTALLY DETERMINED",
                    "experimental_method": "SOLUTION NMR",
                    "model_url": "https://www.ebi.ac.uk/pdbe/static/entry/1a7f_updated.cif",
                    "model_page_url": "https://www.ebi.ac.uk/pdbe/entry/pdb/1a7f",
                    "resolution": null
                } }
            ]
        }))
        .unwrap();

        let candidates = summary.into_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].identifier, "AF-P01308-F1");
        assert!(candidates[0].category.is_predicted());
        assert_eq!(candidates[1].category, ModelCategory::ExperimentallyDetermined);
        assert_eq!(candidates[1].experimental_method.as_deref(), Some("SOLUTION NMR"));
        assert!(candidates[1].resolution.is_none());
    }

    #[test]
    fn test_empty_summary() {
        let summary: BeaconsSummary = serde_json::from_str("{}").unwrap();
        assert!(summary.into_candidates().is_empty());
    }

    #[test]
    fn test_unknown_category_round_trips() {
        let category = ModelCategory::from("HYBRID".to_string());
        assert_eq!(category, ModelCategory::Other("HYBRID".to_string()));
        assert_eq!(String::from(category), "HYBRID");
    }
}
