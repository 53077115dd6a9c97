use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::directory::{ActiveModel, Column, Entity as Directory, Model};

use super::errors::Result;

/// Find a directory of a project by path, creating it if missing.
pub async fn find_or_create<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    path: &str,
) -> Result<Model> {
    let existing = Directory::find()
        .filter(Column::ProjectId.eq(project_id))
        .filter(Column::Path.eq(path))
        .one(conn)
        .await?;

    match existing {
        Some(dir) => Ok(dir),
        None => {
            let model = ActiveModel {
                id: Set(Uuid::new_v4()),
                project_id: Set(project_id),
                path: Set(path.to_string()),
            };
            Ok(model.insert(conn).await?)
        }
    }
}
