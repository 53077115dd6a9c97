use repometrics::db;
use repometrics::migration::{Migrator, MigratorTrait};
use repometrics::store::repositories;
use sea_orm::DatabaseConnection;

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect(database_url).await?;

    match action {
        MigrateAction::Up => {
            println!("Applying metrics schema migrations...");
            Migrator::up(&db, None).await?;
            println!("Schema is up to date.");
            print_tracked(&db).await?;
        }
        MigrateAction::Down => {
            println!("Rolling back the most recent migration...");
            Migrator::down(&db, Some(1)).await?;
            println!("Rollback complete.");
        }
        MigrateAction::Status => {
            println!("Migration status:");
            Migrator::status(&db).await?;
        }
        MigrateAction::Fresh => {
            println!("Dropping repository, project and metric tables, then recreating them...");
            Migrator::fresh(&db).await?;
            println!("Fresh schema created; run `repometrics fetch` to repopulate it.");
        }
    }

    Ok(())
}

async fn print_tracked(db: &DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
    let tracked = repositories::count(db).await?;
    println!("{} repositories tracked.", tracked);
    Ok(())
}
