//! Source document discovery and text extraction.
//!
//! The data directory is optionally subdivided into category folders
//! (`theory/`, `psychology/`, `fiction/`); files directly under the root are
//! indexed without a category. Supported formats: PDF and plain text.

use crate::error::{Result, SluglineError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Knowledge library category, assigned by folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Screenwriting methodology and structure.
    Theory,
    /// Psychology of motive and behavior.
    Psychology,
    /// Classic fiction, studied for technique.
    Fiction,
}

impl Category {
    /// All categories, in folder-scan order.
    pub const ALL: [Category; 3] = [Category::Theory, Category::Psychology, Category::Fiction];

    /// Folder name under the data root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Theory => "theory",
            Category::Psychology => "psychology",
            Category::Fiction => "fiction",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "theory" => Ok(Category::Theory),
            "psychology" => Ok(Category::Psychology),
            "fiction" => Ok(Category::Fiction),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// A source file scheduled for ingestion.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Filesystem path of the source file.
    pub path: PathBuf,
    /// Category from the containing folder, if any.
    pub category: Option<Category>,
}

impl SourceDocument {
    /// File name component, used for chunk ids and display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Check whether a path has a supported extension.
fn is_supported(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("pdf") | Some("txt")
    )
}

/// Enumerate ingestible documents under the data root.
///
/// Creates missing category folders as a side effect, then collects supported
/// files per category plus any loose files directly under the root. Results
/// are sorted by path for a deterministic ingestion order.
pub fn discover_documents(data_dir: &Path) -> Result<Vec<SourceDocument>> {
    let mut documents = Vec::new();

    for category in Category::ALL {
        let cat_dir = data_dir.join(category.dir_name());
        if !cat_dir.exists() {
            std::fs::create_dir_all(&cat_dir)?;
            continue;
        }

        for entry in WalkDir::new(&cat_dir)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_supported(entry.path()) {
                documents.push(SourceDocument {
                    path: entry.path().to_path_buf(),
                    category: Some(category),
                });
            }
        }
    }

    // Loose files directly under the root get no category
    for entry in WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file() && is_supported(entry.path()) {
            documents.push(SourceDocument {
                path: entry.path().to_path_buf(),
                category: None,
            });
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    debug!("Discovered {} documents", documents.len());

    Ok(documents)
}

/// Extract the full text of a source file.
///
/// PDF pages are concatenated in page order, separated by a blank line.
pub fn extract_text(path: &Path) -> Result<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") => Ok(std::fs::read_to_string(path)?),
        Some("pdf") => extract_pdf_text(path),
        _ => Err(SluglineError::InvalidInput(format!(
            "Unsupported file type: {}",
            path.display()
        ))),
    }
}

fn extract_pdf_text(path: &Path) -> Result<String> {
    let document = lopdf::Document::load(path)
        .map_err(|e| SluglineError::Extract(format!("{}: {}", path.display(), e)))?;

    let mut pages = Vec::new();
    for (page_no, _page_id) in document.get_pages() {
        let text = document
            .extract_text(&[page_no])
            .map_err(|e| SluglineError::Extract(format!("{}: {}", path.display(), e)))?;

        if !text.trim().is_empty() {
            pages.push(text);
        }
    }

    Ok(pages.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!("theory".parse::<Category>().unwrap(), Category::Theory);
        assert_eq!("PSYCHOLOGY".parse::<Category>().unwrap(), Category::Psychology);
        assert!("poetry".parse::<Category>().is_err());
    }

    #[test]
    fn test_discover_creates_category_folders() {
        let dir = tempfile::tempdir().unwrap();

        let documents = discover_documents(dir.path()).unwrap();
        assert!(documents.is_empty());

        for category in Category::ALL {
            assert!(dir.path().join(category.dir_name()).is_dir());
        }
    }

    #[test]
    fn test_discover_categorized_and_loose_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("theory")).unwrap();
        std::fs::write(dir.path().join("theory/story.txt"), "structure").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "loose").unwrap();
        std::fs::write(dir.path().join("ignore.md"), "unsupported").unwrap();

        let documents = discover_documents(dir.path()).unwrap();
        assert_eq!(documents.len(), 2);

        let loose = documents
            .iter()
            .find(|d| d.file_name() == "notes.txt")
            .unwrap();
        assert_eq!(loose.category, None);

        let themed = documents
            .iter()
            .find(|d| d.file_name() == "story.txt")
            .unwrap();
        assert_eq!(themed.category, Some(Category::Theory));
    }

    #[test]
    fn test_extract_text_from_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, "A confronts B.").unwrap();

        let text = extract_text(&path).unwrap();
        assert_eq!(text, "A confronts B.");
    }

    #[test]
    fn test_extract_text_rejects_unknown_extension() {
        assert!(extract_text(Path::new("draft.docx")).is_err());
    }
}
