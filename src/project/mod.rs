//! Project files: the conceptual model, column name overrides and
//! presentation data, persisted as JSON.

mod document;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::mcd::{ConceptualModel, ElementId, ModelError};
use crate::mld::{self, LogicalTable, NameOverrideStore, NameResolver};
use crate::sql::{SqlEmitter, SqlOptions};
use crate::validate::{self, Diagnostic};
use document::{DocumentIn, DocumentOut, McdOut, MldOut};

/// Version written to new files.
pub const FORMAT_VERSION: &str = "2.0";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Attribute '{attribute}' of '{owner}' has unknown type '{data_type}'")]
    UnknownDataType {
        owner: String,
        attribute: String,
        data_type: String,
    },
    #[error("Link {link}: {source}")]
    Link { link: ElementId, source: ModelError },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Free-form descriptive data. Nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub author: String,
    pub created: String,
    pub modified: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub metadata: Metadata,
    pub model: ConceptualModel,
    pub overrides: NameOverrideStore,
    /// Presentation colours, kept as read.
    pub colors: Value,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

impl Project {
    pub fn new() -> Self {
        let stamp = now();
        Self {
            metadata: Metadata {
                created: stamp.clone(),
                modified: stamp,
                ..Metadata::default()
            },
            model: ConceptualModel::new(),
            overrides: NameOverrideStore::new(),
            colors: Value::Object(Default::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let document: DocumentIn = serde_json::from_str(json)?;
        if major_version(&document.version) > major_version(FORMAT_VERSION) {
            warn!(
                "Project format {} is newer than {}, loading anyway",
                document.version, FORMAT_VERSION
            );
        }
        let (model, overrides, metadata, colors) = document.into_model()?;
        Ok(Self {
            metadata,
            model,
            overrides,
            colors,
        })
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        let document = DocumentOut {
            version: FORMAT_VERSION,
            metadata: &self.metadata,
            mcd: McdOut {
                entities: self.model.entities().map(Into::into).collect(),
                associations: self.model.associations().map(Into::into).collect(),
                links: self.model.links().collect(),
            },
            mld: MldOut {
                column_names: &self.overrides,
            },
            colors: &self.colors,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let project = Self::from_json(&json)?;
        info!(
            "Loaded {} ({} entities, {} associations, {} links)",
            path.display(),
            project.model.entity_count(),
            project.model.association_count(),
            project.model.link_count()
        );
        Ok(project)
    }

    /// Replace this project with the one stored at `path`. On failure the
    /// current state is kept.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Write the project to `path`, stamping `metadata.modified`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        self.metadata.modified = now();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ProjectError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::validate(&self.model)
    }

    pub fn transform(&self) -> Vec<LogicalTable> {
        mld::transform(&self.model)
    }

    pub fn to_sql(&self, options: SqlOptions) -> String {
        SqlEmitter::new(options).emit(&self.transform(), &self.overrides)
    }
}

impl NameResolver for Project {
    fn resolve(&self, table: &str, column: &str) -> String {
        self.overrides.get(table, column)
    }
}

fn major_version(version: &str) -> u32 {
    version
        .split('.')
        .next()
        .and_then(|major| major.trim().parse().ok())
        .unwrap_or(0)
}
