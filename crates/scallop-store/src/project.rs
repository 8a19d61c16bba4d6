//! The stored project record and its partial-update form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored project, as the persistence store sees it.
///
/// `inputs` and `outputs` are the serialized relation collections (JSON
/// arrays of relation records, see [`crate::transform`]); they are kept as
/// strings here so the record round-trips byte-for-byte regardless of what
/// the relations contain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub program: String,
    pub inputs: String,
    pub outputs: String,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// A fresh untitled project with empty program and relation collections.
    pub fn new(author: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Untitled project".to_string(),
            description: None,
            program: String::new(),
            inputs: "[]".to_string(),
            outputs: "[]".to_string(),
            published: false,
            author,
            created_at: Utc::now(),
        }
    }
}

/// A partial update: only the present fields are written, so a publish
/// toggle can be saved without resubmitting the program or relation data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub program: Option<String>,
    pub inputs: Option<String>,
    pub outputs: Option<String>,
    pub published: Option<bool>,
}

impl ProjectPatch {
    pub fn apply(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = Some(description.clone());
        }
        if let Some(program) = &self.program {
            project.program = program.clone();
        }
        if let Some(inputs) = &self.inputs {
            project.inputs = inputs.clone();
        }
        if let Some(outputs) = &self.outputs {
            project.outputs = outputs.clone();
        }
        if let Some(published) = self.published {
            project.published = published;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.program.is_none()
            && self.inputs.is_none()
            && self.outputs.is_none()
            && self.published.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_present_fields() {
        let mut project = Project::new(Some("user-1".to_string()));
        project.program = "rel a(x) = b(x)".to_string();

        let patch = ProjectPatch {
            published: Some(true),
            ..Default::default()
        };
        patch.apply(&mut project);

        assert!(project.published);
        assert_eq!(project.program, "rel a(x) = b(x)");
        assert_eq!(project.title, "Untitled project");
    }

    #[test]
    fn record_round_trips_through_json() {
        let project = Project::new(None);
        let json = serde_json::to_string(&project).unwrap();
        let back: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(back, project);
    }
}
