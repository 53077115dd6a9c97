//! Model conversion from search results to repository rows.

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use super::types::SearchRepo;
use crate::entity::repository::ActiveModel as RepositoryActiveModel;

/// Build a new repository row from a search result.
pub fn to_active_model(repo: &SearchRepo) -> RepositoryActiveModel {
    RepositoryActiveModel {
        id: Set(Uuid::new_v4()),
        github_id: Set(repo.id),
        name: Set(repo.name.clone()),
        full_name: Set(repo.full_name.clone()),
        clone_url: Set(repo.clone_url.clone()),
        stars: Set(saturating_i32(repo.stargazers_count)),
        forks: Set(saturating_i32(repo.forks_count)),
        language: Set(repo.language.clone()),
        description: Set(repo.description.clone()),
        is_fork: Set(repo.fork),
        created_at: Set(repo.created_at.map(|t| t.fixed_offset())),
        updated_at: Set(repo.updated_at.map(|t| t.fixed_offset())),
        fetched_at: Set(Utc::now().fixed_offset()),
    }
}

fn saturating_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn sample() -> SearchRepo {
        SearchRepo {
            id: 42,
            name: "flask".to_string(),
            full_name: "pallets/flask".to_string(),
            clone_url: "https://github.com/pallets/flask.git".to_string(),
            stargazers_count: u32::MAX,
            forks_count: 16000,
            language: Some("Python".to_string()),
            description: Some("The Python micro framework".to_string()),
            fork: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn copies_identity_and_statistics() {
        let model = to_active_model(&sample());
        assert_eq!(model.github_id, ActiveValue::Set(42));
        assert_eq!(model.full_name, ActiveValue::Set("pallets/flask".to_string()));
        assert_eq!(model.forks, ActiveValue::Set(16000));
        assert_eq!(model.language, ActiveValue::Set(Some("Python".to_string())));
    }

    #[test]
    fn star_count_saturates() {
        let model = to_active_model(&sample());
        assert_eq!(model.stars, ActiveValue::Set(i32::MAX));
    }
}
