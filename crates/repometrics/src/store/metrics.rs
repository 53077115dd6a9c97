use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::metric::{ActiveModel, Column, Entity as Metric};

use super::errors::Result;

/// Replace all metric rows of a file.
///
/// Returns the number of rows inserted.
pub async fn replace_for_file<C: ConnectionTrait>(
    conn: &C,
    file_id: Uuid,
    metrics: &[(String, f64)],
) -> Result<usize> {
    Metric::delete_many()
        .filter(Column::FileId.eq(file_id))
        .exec(conn)
        .await?;

    if metrics.is_empty() {
        return Ok(0);
    }

    let rows = metrics.iter().map(|(name, value)| ActiveModel {
        id: Set(Uuid::new_v4()),
        file_id: Set(file_id),
        metric_name: Set(name.clone()),
        metric_value: Set(*value),
    });
    Metric::insert_many(rows).exec(conn).await?;

    Ok(metrics.len())
}
