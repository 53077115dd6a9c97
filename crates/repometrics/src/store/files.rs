use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::source_file::{ActiveModel, Column, Entity as SourceFile, Model};

use super::errors::Result;

/// File attributes written on every analysis run.
#[derive(Debug, Clone, Copy)]
pub struct FileRow<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub lines_of_code: i64,
    pub cyclomatic_complexity: f64,
}

/// Insert or update a file by `(directory, path)`.
pub async fn upsert<C: ConnectionTrait>(
    conn: &C,
    directory_id: Uuid,
    row: FileRow<'_>,
) -> Result<Model> {
    let existing = SourceFile::find()
        .filter(Column::DirectoryId.eq(directory_id))
        .filter(Column::Path.eq(row.path))
        .one(conn)
        .await?;

    match existing {
        Some(file) => {
            let mut model = file.into_active_model();
            model.name = Set(row.name.to_string());
            model.lines_of_code = Set(row.lines_of_code);
            model.cyclomatic_complexity = Set(row.cyclomatic_complexity);
            Ok(model.update(conn).await?)
        }
        None => {
            let model = ActiveModel {
                id: Set(Uuid::new_v4()),
                directory_id: Set(directory_id),
                name: Set(row.name.to_string()),
                path: Set(row.path.to_string()),
                lines_of_code: Set(row.lines_of_code),
                cyclomatic_complexity: Set(row.cyclomatic_complexity),
            };
            Ok(model.insert(conn).await?)
        }
    }
}
