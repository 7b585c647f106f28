//! Store management
//!
//! The store is the root directory containing all tally data.
//! Default location: `.tally/` (hidden, git-trackable)
//!
//! Layout:
//!   .tally/
//!     config.toml
//!     rubrics/   one JSON document per rubric
//!     scores/    one JSON document per score card
//!     courses/   one JSON document per course

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::course::Course;
use crate::error::{Result, TallyError};
use crate::id::{filename, ID_PREFIX};
use crate::rubric::{Rubric, RubricScore};

/// Default store directory name (hidden)
pub const DEFAULT_STORE_DIR: &str = ".tally";

/// Visible store directory name
pub const VISIBLE_STORE_DIR: &str = "tally";

/// Store subdirectories
pub const RUBRICS_DIR: &str = "rubrics";
pub const SCORES_DIR: &str = "scores";
pub const COURSES_DIR: &str = "courses";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// A document kind the store can persist
///
/// Files are named `<id>-<slug>.json`; the id embedded in the document
/// is authoritative, the filename is a convenience for humans and fast
/// lookup.
trait Document: Serialize + DeserializeOwned {
    const DIR: &'static str;

    fn doc_id(&self) -> &str;
    fn doc_name(&self) -> &str;
    fn doc_created(&self) -> Option<DateTime<Utc>>;
    fn not_found(id: &str) -> TallyError;
}

impl Document for Rubric {
    const DIR: &'static str = RUBRICS_DIR;

    fn doc_id(&self) -> &str {
        &self.id
    }
    fn doc_name(&self) -> &str {
        &self.name
    }
    fn doc_created(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn not_found(id: &str) -> TallyError {
        TallyError::RubricNotFound { id: id.to_string() }
    }
}

impl Document for RubricScore {
    const DIR: &'static str = SCORES_DIR;

    fn doc_id(&self) -> &str {
        &self.id
    }
    fn doc_name(&self) -> &str {
        &self.name
    }
    fn doc_created(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn not_found(id: &str) -> TallyError {
        TallyError::ScoreNotFound { id: id.to_string() }
    }
}

impl Document for Course {
    const DIR: &'static str = COURSES_DIR;

    fn doc_id(&self) -> &str {
        &self.id
    }
    fn doc_name(&self) -> &str {
        &self.name
    }
    fn doc_created(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    fn not_found(id: &str) -> TallyError {
        TallyError::CourseNotFound { id: id.to_string() }
    }
}

/// Find a store by walking up from the given root directory
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let store_path = current.join(DEFAULT_STORE_DIR);
        if store_path.is_dir() {
            return Ok(store_path);
        }

        let visible_path = current.join(VISIBLE_STORE_DIR);
        if visible_path.is_dir() {
            return Ok(visible_path);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(TallyError::StoreNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}

/// The tally store
#[derive(Debug)]
pub struct Store {
    /// Root path of the store
    root: PathBuf,
    /// Store configuration
    config: StoreConfig,
}

impl Store {
    /// Discover a store by walking up from the given root directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(TallyError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            StoreConfig::default()
        };

        Ok(Store {
            root: path.to_path_buf(),
            config,
        })
    }

    /// Initialize a new store under the given project root
    ///
    /// Fails if a store already exists there.
    pub fn init(project_root: &Path, visible: bool) -> Result<Self> {
        let store_name = if visible {
            VISIBLE_STORE_DIR
        } else {
            DEFAULT_STORE_DIR
        };
        Self::init_at(&project_root.join(store_name))
    }

    /// Initialize a store at an explicit store root path
    #[tracing::instrument(skip(store_root), fields(path = %store_root.display()))]
    pub fn init_at(store_root: &Path) -> Result<Self> {
        if store_root.join(CONFIG_FILE).exists() {
            return Err(TallyError::StoreExists {
                path: store_root.to_path_buf(),
            });
        }

        fs::create_dir_all(store_root)?;
        fs::create_dir_all(store_root.join(RUBRICS_DIR))?;
        fs::create_dir_all(store_root.join(SCORES_DIR))?;
        fs::create_dir_all(store_root.join(COURSES_DIR))?;

        let config = StoreConfig::default();
        config.save(&store_root.join(CONFIG_FILE))?;

        tracing::info!(store = %store_root.display(), "initialized store");

        Ok(Store {
            root: store_root.to_path_buf(),
            config,
        })
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn rubrics_dir(&self) -> PathBuf {
        self.root.join(RUBRICS_DIR)
    }

    pub fn scores_dir(&self) -> PathBuf {
        self.root.join(SCORES_DIR)
    }

    pub fn courses_dir(&self) -> PathBuf {
        self.root.join(COURSES_DIR)
    }

    /// Collect every document id in the store, from filenames
    pub fn existing_ids(&self) -> Result<HashSet<String>> {
        let mut ids = HashSet::new();

        for dir in [self.rubrics_dir(), self.scores_dir(), self.courses_dir()] {
            if !dir.exists() {
                continue;
            }

            for entry in WalkDir::new(&dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.path().extension().is_some_and(|e| e == "json") {
                    if let Some(name) = entry.path().file_stem() {
                        let name = name.to_string_lossy();
                        if let Some(rest) = name.strip_prefix(ID_PREFIX) {
                            // Filename format: ty-xxxx-slug.json, or bare ty-xxxx.json
                            match rest.find('-') {
                                Some(end) => {
                                    ids.insert(name[..ID_PREFIX.len() + end].to_string());
                                }
                                None => {
                                    ids.insert(name.to_string());
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(ids)
    }

    pub fn save_rubric(&self, rubric: &Rubric) -> Result<PathBuf> {
        self.save_document(rubric)
    }

    pub fn load_rubric(&self, id: &str) -> Result<Rubric> {
        self.load_document(id)
    }

    pub fn list_rubrics(&self) -> Result<Vec<Rubric>> {
        self.list_documents()
    }

    /// Save a score card, stamping its updated timestamp
    pub fn save_score(&self, score: &mut RubricScore) -> Result<PathBuf> {
        score.updated_at = Some(Utc::now());
        self.save_document(score)
    }

    pub fn load_score(&self, id: &str) -> Result<RubricScore> {
        self.load_document(id)
    }

    pub fn list_scores(&self) -> Result<Vec<RubricScore>> {
        self.list_documents()
    }

    pub fn save_course(&self, course: &Course) -> Result<PathBuf> {
        self.save_document(course)
    }

    pub fn load_course(&self, id: &str) -> Result<Course> {
        self.load_document(id)
    }

    pub fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_documents()
    }

    /// Write a document, reusing its existing file when one matches its id
    fn save_document<T: Document>(&self, doc: &T) -> Result<PathBuf> {
        let dir = self.root.join(T::DIR);
        fs::create_dir_all(&dir)?;

        let path = match self.find_document_path(&dir, doc.doc_id()) {
            Some(existing) => existing,
            None => dir.join(filename(doc.doc_id(), doc.doc_name())),
        };

        let mut content = serde_json::to_string_pretty(doc)?;
        content.push('\n');
        fs::write(&path, content)?;
        Ok(path)
    }

    #[tracing::instrument(skip(self), fields(doc_id = %id, dir = T::DIR))]
    fn load_document<T: Document>(&self, id: &str) -> Result<T> {
        let dir = self.root.join(T::DIR);

        // Fast path: filename carries the id
        if let Some(path) = self.find_document_path(&dir, id) {
            return parse_document(&path);
        }

        // Slow path: a renamed file still matches on its embedded id
        for doc in self.list_documents::<T>()? {
            if doc.doc_id() == id {
                return Ok(doc);
            }
        }

        Err(T::not_found(id))
    }

    fn list_documents<T: Document>(&self) -> Result<Vec<T>> {
        let dir = self.root.join(T::DIR);
        let mut docs: Vec<T> = Vec::new();

        if !dir.exists() {
            return Ok(docs);
        }

        for entry in WalkDir::new(&dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match parse_document(path) {
                    Ok(doc) => docs.push(doc),
                    Err(e) => {
                        // Log but continue, one bad file must not hide the rest
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                    }
                }
            }
        }

        // Newest first, then by id for stability
        docs.sort_by(|a, b| {
            match (b.doc_created(), a.doc_created()) {
                (Some(b_created), Some(a_created)) => b_created.cmp(&a_created),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then_with(|| a.doc_id().cmp(b.doc_id()))
        });

        Ok(docs)
    }

    /// Find a document file whose name starts with the given id
    fn find_document_path(&self, dir: &Path, id: &str) -> Option<PathBuf> {
        if !dir.exists() {
            return None;
        }

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(name) = path.file_stem() {
                    let name = name.to_string_lossy();
                    if name.starts_with(id)
                        && (name.len() == id.len() || name.chars().nth(id.len()) == Some('-'))
                    {
                        return Some(path.to_path_buf());
                    }
                }
            }
        }

        None
    }
}

fn parse_document<T: Document>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| TallyError::InvalidDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::make_rubric_score;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_layout() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        assert_eq!(store.root(), dir.path().join(DEFAULT_STORE_DIR));
        assert!(store.rubrics_dir().is_dir());
        assert!(store.scores_dir().is_dir());
        assert!(store.courses_dir().is_dir());
        assert!(store.root().join(CONFIG_FILE).is_file());
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempdir().unwrap();
        Store::init(dir.path(), false).unwrap();

        let err = Store::init(dir.path(), false).unwrap_err();
        assert!(matches!(err, TallyError::StoreExists { .. }));
    }

    #[test]
    fn test_discover_from_nested_directory() {
        let dir = tempdir().unwrap();
        Store::init(dir.path(), false).unwrap();

        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let store = Store::discover(&nested).unwrap();
        assert_eq!(store.root(), dir.path().join(DEFAULT_STORE_DIR));
    }

    #[test]
    fn test_discover_visible_store() {
        let dir = tempdir().unwrap();
        Store::init(dir.path(), true).unwrap();

        let store = Store::discover(dir.path()).unwrap();
        assert_eq!(store.root(), dir.path().join(VISIBLE_STORE_DIR));
    }

    #[test]
    fn test_discover_missing_store() {
        let dir = tempdir().unwrap();
        let err = Store::discover(dir.path()).unwrap_err();
        assert!(matches!(err, TallyError::StoreNotFound { .. }));
    }

    #[test]
    fn test_save_and_load_rubric() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        let rubric = Rubric::new().with_name("Homework 1");
        let path = store.save_rubric(&rubric).unwrap();
        assert!(path.starts_with(store.rubrics_dir()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("-homework-1.json"));

        let loaded = store.load_rubric(&rubric.id).unwrap();
        assert_eq!(loaded, rubric);
    }

    #[test]
    fn test_load_missing_rubric() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        let err = store.load_rubric("ty-missing1").unwrap_err();
        assert!(matches!(err, TallyError::RubricNotFound { .. }));
    }

    #[test]
    fn test_resave_keeps_one_file() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        let mut rubric = Rubric::new().with_name("Homework 1");
        let first = store.save_rubric(&rubric).unwrap();
        rubric.name = "Homework 1 (revised)".to_string();
        let second = store.save_rubric(&rubric).unwrap();

        assert_eq!(first, second);
        assert_eq!(store.list_rubrics().unwrap().len(), 1);
        assert_eq!(
            store.load_rubric(&rubric.id).unwrap().name,
            "Homework 1 (revised)"
        );
    }

    #[test]
    fn test_load_by_embedded_id_after_rename() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        let rubric = Rubric::new().with_name("Homework 1");
        let path = store.save_rubric(&rubric).unwrap();
        fs::rename(&path, store.rubrics_dir().join("renamed-by-hand.json")).unwrap();

        let loaded = store.load_rubric(&rubric.id).unwrap();
        assert_eq!(loaded.id, rubric.id);
    }

    #[test]
    fn test_save_score_stamps_updated() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        let rubric = Rubric::new().with_name("Homework 1");
        let mut score = make_rubric_score(&rubric);
        assert!(score.updated_at.is_none());

        store.save_score(&mut score).unwrap();
        assert!(score.updated_at.is_some());

        let loaded = store.load_score(&score.id).unwrap();
        assert_eq!(loaded.updated_at, score.updated_at);
    }

    #[test]
    fn test_list_skips_unreadable_documents() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        store
            .save_rubric(&Rubric::new().with_name("Good"))
            .unwrap();
        fs::write(store.rubrics_dir().join("ty-bad-doc.json"), "{ not json").unwrap();

        let rubrics = store.list_rubrics().unwrap();
        assert_eq!(rubrics.len(), 1);
        assert_eq!(rubrics[0].name, "Good");
    }

    #[test]
    fn test_existing_ids_spans_all_kinds() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path(), false).unwrap();

        let rubric = Rubric::new().with_name("Homework 1");
        store.save_rubric(&rubric).unwrap();
        let mut score = make_rubric_score(&rubric);
        store.save_score(&mut score).unwrap();
        let course = crate::course::Course::new("Systems");
        store.save_course(&course).unwrap();

        let ids = store.existing_ids().unwrap();
        assert!(ids.contains(&rubric.id));
        assert!(ids.contains(&score.id));
        assert!(ids.contains(&course.id));
    }
}
