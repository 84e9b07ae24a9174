//! API endpoint URL builders
//!
//! Helper functions to construct remote service URLs.

use protlens_common::types::{join_url, Accession};

/// Literature service that PubMed citations link to.
pub const PUBMED_BASE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov";

/// Build knowledge-base entry URL
pub fn protein_url(base_url: &str, accession: &Accession) -> String {
    join_url(base_url, accession.as_str())
}

/// Build structure-summary URL
pub fn structure_summary_url(base_url: &str, accession: &Accession) -> String {
    join_url(base_url, &format!("{}.json", accession))
}

/// Build literature link for a PubMed id
pub fn pubmed_url(pubmed_id: &str) -> String {
    join_url(PUBMED_BASE_URL, pubmed_id)
}

/// Build DOI resolver link
pub fn doi_url(doi: &str) -> String {
    join_url("https://doi.org", doi)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_protein_url() {
        let accession = Accession::new("P01308").unwrap();
        let url = protein_url("https://rest.uniprot.org/uniprotkb", &accession);
        assert_eq!(url, "https://rest.uniprot.org/uniprotkb/P01308");
    }

    #[test]
    fn test_structure_summary_url() {
        let accession = Accession::new("P69905").unwrap();
        let url = structure_summary_url("http://localhost:8000/summary/", &accession);
        assert_eq!(url, "http://localhost:8000/summary/P69905.json");
    }

    #[test]
    fn test_pubmed_url() {
        assert_eq!(pubmed_url("123"), "https://pubmed.ncbi.nlm.nih.gov/123");
    }

    #[test]
    fn test_doi_url() {
        assert_eq!(doi_url("10.1038/75556"), "https://doi.org/10.1038/75556");
    }
}
