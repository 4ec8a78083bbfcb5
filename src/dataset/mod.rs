//! Dataset loading.
//!
//! Companies come either from JSON snapshots on disk (a single file or a
//! directory of files) or from the built-in sample dataset.

pub mod sample;

use crate::analysis::{validate_companies, Violation};
use crate::error::DataError;
use crate::models::{Company, Contact, SlideCatalog};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Accepted top-level shapes of a dataset file.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    List(Vec<Company>),
    Wrapped { companies: Vec<Company> },
}

impl DatasetFile {
    fn into_companies(self) -> Vec<Company> {
        match self {
            DatasetFile::List(companies) => companies,
            DatasetFile::Wrapped { companies } => companies,
        }
    }
}

/// Read-only collection of companies and where it came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub companies: Vec<Company>,
    pub source: String,
}

impl Dataset {
    pub fn new(companies: Vec<Company>, source: impl Into<String>) -> Self {
        Self {
            companies,
            source: source.into(),
        }
    }

    /// Every contact of every company, in order.
    pub fn all_contacts(&self) -> impl Iterator<Item = &Contact> {
        self.companies.iter().flat_map(|c| &c.contacts)
    }

    pub fn contact_count(&self) -> usize {
        self.companies.iter().map(|c| c.contacts.len()).sum()
    }

    pub fn find_company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    /// Find a contact and the company that owns it.
    pub fn find_contact(&self, id: &str) -> Option<(&Company, &Contact)> {
        self.companies.iter().find_map(|company| {
            company
                .contacts
                .iter()
                .find(|c| c.id == id)
                .map(|contact| (company, contact))
        })
    }

    /// Check the dataset against the data model invariants.
    pub fn validate(&self, catalog: &SlideCatalog) -> Vec<Violation> {
        validate_companies(&self.companies, catalog)
    }
}

/// Parse companies from a single JSON file.
pub fn load_file(path: &Path) -> Result<Vec<Company>, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: DatasetFile = serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let companies = file.into_companies();
    debug!("Loaded {} companies from {}", companies.len(), path.display());
    Ok(companies)
}

/// Load every `*.json` file under a directory, in path order.
pub fn load_dir(dir: &Path) -> Result<Vec<Company>, DataError> {
    let mut companies = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| DataError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;

        let path = entry.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");

        if entry.file_type().is_file() && is_json {
            companies.extend(load_file(path)?);
        }
    }

    Ok(companies)
}

/// Load a dataset from a file or directory.
pub fn load_path(path: &Path) -> Result<Dataset, DataError> {
    let companies = if path.is_dir() {
        load_dir(path)?
    } else {
        load_file(path)?
    };

    if companies.is_empty() {
        return Err(DataError::Empty(path.to_path_buf()));
    }

    Ok(Dataset::new(companies, path.display().to_string()))
}

/// Slide catalog a dataset is aggregated against.
///
/// The built-in sample is recorded against the default slides, so it keeps
/// them whatever catalog is configured.
pub fn catalog_for(path: Option<&Path>, configured: SlideCatalog) -> SlideCatalog {
    match path {
        Some(_) => configured,
        None => SlideCatalog::default(),
    }
}

/// Load a dataset (or the sample when no path is given) and check it.
///
/// Violations are logged; with `strict` they fail the load instead.
pub fn load_dataset(
    path: Option<&Path>,
    catalog: &SlideCatalog,
    strict: bool,
) -> Result<Dataset, DataError> {
    let catalog = &catalog_for(path, catalog.clone());

    let dataset = match path {
        Some(path) => {
            info!("Loading dataset from: {}", path.display());
            load_path(path)?
        }
        None => {
            info!("No dataset given, using the built-in sample");
            sample::sample_dataset()
        }
    };

    let violations = dataset.validate(catalog);
    if !violations.is_empty() {
        if strict {
            return Err(DataError::Invalid {
                count: violations.len(),
                first: violations[0].to_string(),
            });
        }

        for violation in &violations {
            warn!("Invalid record {}", violation);
        }
    }

    info!(
        "Dataset ready: {} companies, {} contacts",
        dataset.companies.len(),
        dataset.contact_count()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const ONE_COMPANY: &str = r#"[
        {
            "id": "comp_9",
            "name": "Nordwind",
            "industry": "Logistics",
            "contacts": [
                {
                    "id": "c_90",
                    "firstName": "Ana",
                    "lastName": "Silva",
                    "email": "a.silva@nordwind.io",
                    "role": "CISO",
                    "scorecardName": "Nordwind_Audit.pdf",
                    "link": null,
                    "status": "sent",
                    "engagement": null,
                    "createdAt": "2024-02-01T08:00:00Z"
                }
            ]
        }
    ]"#;

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/companies.json")
    }

    #[test]
    fn test_load_fixture_file() {
        let dataset = load_path(&fixture_path()).unwrap();

        assert_eq!(dataset.companies.len(), 2);
        assert_eq!(dataset.contact_count(), 4);
        assert!(dataset.find_contact("c_2").is_some());
    }

    #[test]
    fn test_load_wrapped_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wrapped.json");
        fs::write(&path, format!("{{\"companies\": {}}}", ONE_COMPANY)).unwrap();

        let companies = load_file(&path).unwrap();

        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Nordwind");
    }

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/b.json"), ONE_COMPANY).unwrap();
        fs::copy(fixture_path(), dir.path().join("a.json")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a dataset").unwrap();

        let dataset = load_path(dir.path()).unwrap();

        assert_eq!(dataset.companies.len(), 3);
        assert_eq!(dataset.companies[2].id, "comp_9");
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();

        let missing = load_path(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(DataError::Io { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(load_path(&bad), Err(DataError::Parse { .. })));

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "[]").unwrap();
        assert!(matches!(load_path(&empty), Err(DataError::Empty(_))));
    }

    #[test]
    fn test_strict_rejects_violations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("one.json");
        fs::write(&path, ONE_COMPANY).unwrap();
        let catalog = SlideCatalog::default();

        // Sent without a link.
        assert!(load_dataset(Some(path.as_path()), &catalog, false).is_ok());
        assert!(matches!(
            load_dataset(Some(path.as_path()), &catalog, true),
            Err(DataError::Invalid { count: 1, .. })
        ));
    }

    #[test]
    fn test_sample_keeps_default_slides() {
        let custom = SlideCatalog::new(vec!["Intro".to_string(), "Outro".to_string()]);

        assert_eq!(catalog_for(None, custom.clone()), SlideCatalog::default());
        assert_eq!(catalog_for(Some(Path::new("data.json")), custom.clone()), custom);

        let dataset = load_dataset(None, &custom, true).unwrap();
        assert_eq!(dataset.contact_count(), 17);
    }

    #[test]
    fn test_default_is_sample() {
        let dataset = load_dataset(None, &SlideCatalog::default(), true).unwrap();
        assert_eq!(dataset.companies.len(), 5);
        assert_eq!(dataset.source, "built-in sample");
    }
}
