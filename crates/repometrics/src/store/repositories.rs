//! Repository rows written by the fetch pipeline.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::entity::repository::{ActiveModel, Column, Entity as Repository, Model};

use super::errors::Result;

/// Insert a new repository.
///
/// # Errors
/// Returns `StoreError::Database` if the insert fails (e.g., duplicate natural key).
pub async fn insert<C: ConnectionTrait>(conn: &C, model: ActiveModel) -> Result<Model> {
    Ok(model.insert(conn).await?)
}

/// Find a repository by its GitHub ID.
pub async fn find_by_github_id<C: ConnectionTrait>(
    conn: &C,
    github_id: i64,
) -> Result<Option<Model>> {
    Ok(Repository::find()
        .filter(Column::GithubId.eq(github_id))
        .one(conn)
        .await?)
}

/// Find a repository by `owner/name`.
pub async fn find_by_full_name<C: ConnectionTrait>(
    conn: &C,
    full_name: &str,
) -> Result<Option<Model>> {
    Ok(Repository::find()
        .filter(Column::FullName.eq(full_name))
        .one(conn)
        .await?)
}

/// Find a repository by its short name, which is also its clone directory name.
///
/// Short names are not unique across owners; the earliest fetched row wins.
pub async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> Result<Option<Model>> {
    Ok(Repository::find()
        .filter(Column::Name.eq(name))
        .order_by_asc(Column::FetchedAt)
        .one(conn)
        .await?)
}

/// True if a row with the same GitHub ID or full name exists.
pub async fn exists<C: ConnectionTrait>(
    conn: &C,
    github_id: i64,
    full_name: &str,
) -> Result<bool> {
    let count = Repository::find()
        .filter(
            Condition::any()
                .add(Column::GithubId.eq(github_id))
                .add(Column::FullName.eq(full_name)),
        )
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Count all repositories.
pub async fn count<C: ConnectionTrait>(conn: &C) -> Result<u64> {
    Ok(Repository::find().count(conn).await?)
}

/// List all repositories, most starred first.
pub async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<Model>> {
    Ok(Repository::find()
        .order_by_desc(Column::Stars)
        .order_by_asc(Column::FullName)
        .all(conn)
        .await?)
}

#[cfg(all(test, feature = "sqlite", feature = "migrate"))]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseConnection, Set};
    use uuid::Uuid;

    use super::*;
    use crate::connect_and_migrate;
    use crate::store::StoreError;

    async fn setup_db() -> DatabaseConnection {
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate")
    }

    fn model(github_id: i64, full_name: &str, stars: i32) -> ActiveModel {
        let name = full_name.rsplit('/').next().unwrap_or_default();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            github_id: Set(github_id),
            name: Set(name.to_string()),
            full_name: Set(full_name.to_string()),
            clone_url: Set(format!("https://github.com/{full_name}.git")),
            stars: Set(stars),
            forks: Set(0),
            language: Set(Some("Python".to_string())),
            description: Set(None),
            is_fork: Set(false),
            created_at: Set(None),
            updated_at: Set(None),
            fetched_at: Set(Utc::now().fixed_offset()),
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_each_key() {
        let db = setup_db().await;
        let stored = insert(&db, model(10, "psf/requests", 100))
            .await
            .expect("insert");

        let by_id = find_by_github_id(&db, 10).await.expect("query");
        assert_eq!(by_id.map(|m| m.id), Some(stored.id));

        let by_full = find_by_full_name(&db, "psf/requests").await.expect("query");
        assert_eq!(by_full.map(|m| m.id), Some(stored.id));

        let by_name = find_by_name(&db, "requests").await.expect("query");
        assert_eq!(by_name.map(|m| m.id), Some(stored.id));

        assert!(find_by_github_id(&db, 11).await.expect("query").is_none());
    }

    #[tokio::test]
    async fn duplicate_github_id_is_rejected() {
        let db = setup_db().await;
        insert(&db, model(10, "psf/requests", 100))
            .await
            .expect("first insert");

        let err = insert(&db, model(10, "someone/requests", 1))
            .await
            .expect_err("unique github_id should reject");
        assert!(matches!(err, StoreError::Database(_)));
        assert_eq!(count(&db).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn exists_matches_either_key() {
        let db = setup_db().await;
        insert(&db, model(10, "psf/requests", 100))
            .await
            .expect("insert");

        assert!(exists(&db, 10, "other/name").await.expect("query"));
        assert!(exists(&db, 99, "psf/requests").await.expect("query"));
        assert!(!exists(&db, 99, "other/name").await.expect("query"));
    }

    #[tokio::test]
    async fn list_orders_by_stars() {
        let db = setup_db().await;
        insert(&db, model(1, "a/low", 5)).await.expect("insert");
        insert(&db, model(2, "b/high", 500)).await.expect("insert");

        let names: Vec<_> = list(&db)
            .await
            .expect("list")
            .into_iter()
            .map(|m| m.full_name)
            .collect();
        assert_eq!(names, vec!["b/high", "a/low"]);
    }
}
