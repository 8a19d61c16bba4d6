//! The asynchronous project store.
//!
//! [`ProjectStore`] mirrors the operations the web editor's persistence
//! layer exposed: create, fetch by id, the published and per-author listing
//! queries, partial update, and delete. [`JsonFileStore`] keeps the whole
//! project table in one pretty-printed JSON file, loaded at open and
//! rewritten atomically (temp file + rename) after every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::project::{Project, ProjectPatch};

/// Listing queries return at most this many projects, newest first.
const LIST_LIMIT: usize = 100;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project record.
    async fn create(&self, project: Project) -> Result<Project, StoreError>;

    /// Fetch a project by id; `NotFound` when no such record exists.
    async fn get(&self, id: Uuid) -> Result<Project, StoreError>;

    /// Published projects, newest first.
    async fn list_published(&self) -> Result<Vec<Project>, StoreError>;

    /// One author's projects, newest first.
    async fn list_by_author(&self, author: &str) -> Result<Vec<Project>, StoreError>;

    /// Apply a partial update and return the updated record.
    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError>;

    /// Delete and return the removed record.
    async fn delete(&self, id: Uuid) -> Result<Project, StoreError>;
}

/// A [`ProjectStore`] backed by a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    projects: RwLock<BTreeMap<Uuid, Project>>,
}

impl JsonFileStore {
    /// Open the store, loading any existing project table from `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let projects = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let records: Vec<Project> = serde_json::from_str(&contents)?;
            records.into_iter().map(|p| (p.id, p)).collect()
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            projects: RwLock::new(projects),
        })
    }

    fn persist(&self, projects: &BTreeMap<Uuid, Project>) -> Result<(), StoreError> {
        let records: Vec<&Project> = projects.values().collect();
        let json = serde_json::to_string_pretty(&records)?;
        write_atomically(&self.path, &json)?;
        Ok(())
    }

    fn sorted_recent<F>(&self, keep: F) -> Vec<Project>
    where
        F: Fn(&Project) -> bool,
    {
        let projects = self.projects.read();
        let mut matches: Vec<Project> = projects.values().filter(|p| keep(p)).cloned().collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(LIST_LIMIT);
        matches
    }
}

#[async_trait]
impl ProjectStore for JsonFileStore {
    async fn create(&self, project: Project) -> Result<Project, StoreError> {
        let mut projects = self.projects.write();
        projects.insert(project.id, project.clone());
        self.persist(&projects)?;
        Ok(project)
    }

    async fn get(&self, id: Uuid) -> Result<Project, StoreError> {
        self.projects
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn list_published(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.sorted_recent(|p| p.published))
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<Project>, StoreError> {
        Ok(self.sorted_recent(|p| p.author.as_deref() == Some(author)))
    }

    async fn update(&self, id: Uuid, patch: ProjectPatch) -> Result<Project, StoreError> {
        let mut projects = self.projects.write();
        let project = projects.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        patch.apply(project);
        let updated = project.clone();
        self.persist(&projects)?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<Project, StoreError> {
        let mut projects = self.projects.write();
        let removed = projects.remove(&id).ok_or(StoreError::NotFound { id })?;
        self.persist(&projects)?;
        Ok(removed)
    }
}

/// Write via a sibling temp file and rename, so a crash mid-write never
/// leaves a truncated store behind.
fn write_atomically(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::open(dir.path().join("projects.json")).unwrap()
    }

    #[tokio::test]
    async fn create_then_get() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let project = store.create(Project::new(None)).await.unwrap();
        let fetched = store.get(project.id).await.unwrap();
        assert_eq!(fetched, project);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let id = Uuid::new_v4();
        assert!(matches!(
            store.get(id).await,
            Err(StoreError::NotFound { id: missing }) if missing == id
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn records_survive_a_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let project = {
            let store = JsonFileStore::open(&path).unwrap();
            store.create(Project::new(Some("user-1".into()))).await.unwrap()
        };

        let store = JsonFileStore::open(&path).unwrap();
        let fetched = store.get(project.id).await.unwrap();
        assert_eq!(fetched, project);
    }

    #[tokio::test]
    async fn listings_filter_and_order() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let mut published = Project::new(Some("alice".into()));
        published.published = true;
        published.title = "public".into();
        let private = Project::new(Some("alice".into()));
        let other = Project::new(Some("bob".into()));

        store.create(published.clone()).await.unwrap();
        store.create(private.clone()).await.unwrap();
        store.create(other).await.unwrap();

        let public = store.list_published().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].title, "public");

        let alices = store.list_by_author("alice").await.unwrap();
        assert_eq!(alices.len(), 2);
    }

    #[tokio::test]
    async fn update_applies_only_the_patch() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let project = store.create(Project::new(None)).await.unwrap();
        let updated = store
            .update(
                project.id,
                ProjectPatch {
                    title: Some("Family tree".into()),
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Family tree");
        assert!(updated.published);
        assert_eq!(updated.program, project.program);
    }
}
