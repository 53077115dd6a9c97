//! Repository entity - metadata of a repository returned by the search API.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Repository model - one row per fetched (and cloned) GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // ─── Identity ────────────────────────────────────────────────────────────
    /// Numeric repository ID assigned by GitHub.
    #[sea_orm(unique)]
    pub github_id: i64,
    /// Repository name; also the name of the clone directory.
    pub name: String,
    /// `owner/name`.
    #[sea_orm(unique)]
    pub full_name: String,
    /// HTTPS clone URL.
    #[sea_orm(column_type = "Text")]
    pub clone_url: String,

    // ─── Statistics ──────────────────────────────────────────────────────────
    #[sea_orm(default_value = 0)]
    pub stars: i32,
    #[sea_orm(default_value = 0)]
    pub forks: i32,

    // ─── Content ─────────────────────────────────────────────────────────────
    /// Primary language as reported by GitHub.
    pub language: Option<String>,
    /// Free-form description; may be long.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(default_value = false)]
    pub is_fork: bool,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    /// When the repository was created on GitHub.
    pub created_at: Option<DateTimeWithTimeZone>,
    /// When the repository was last updated on GitHub.
    pub updated_at: Option<DateTimeWithTimeZone>,
    /// When this row was stored.
    pub fetched_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A repository has at most one analyzed project.
    #[sea_orm(has_one = "super::project::Entity")]
    Project,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Owner login, taken from `full_name`.
    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_test_model(full_name: &str) -> Model {
        Model {
            id: Uuid::new_v4(),
            github_id: 12345,
            name: full_name.rsplit('/').next().unwrap_or_default().to_string(),
            full_name: full_name.to_string(),
            clone_url: format!("https://github.com/{full_name}.git"),
            stars: 900,
            forks: 40,
            language: Some("Python".to_string()),
            description: Some("A test repository".to_string()),
            is_fork: false,
            created_at: None,
            updated_at: None,
            fetched_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn owner_is_taken_from_full_name() {
        let model = make_test_model("psf/requests");
        assert_eq!(model.owner(), "psf");
        assert_eq!(model.name, "requests");
    }

    #[test]
    fn owner_is_empty_without_separator() {
        let model = make_test_model("orphan");
        assert_eq!(model.owner(), "");
    }
}
