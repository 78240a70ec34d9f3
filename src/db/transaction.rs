/*!
 * Scoped transactions.
 *
 * The closure runs inside one `DatabaseTransaction`: `Ok` commits, `Err`
 * rolls back, and a dropped transaction (panic, cancelled request) is rolled
 * back by sea-orm. The connection returns to the pool in every case.
 */

use crate::errors::ServiceError;
use futures::future::BoxFuture;
use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use tracing::{debug, warn};
use uuid::Uuid;

/// Execute `f` within a database transaction, preserving its error type.
///
/// ```rust,ignore
/// let order_id = with_transaction(&db, |txn| {
///     Box::pin(async move {
///         let order = order::ActiveModel { .. }.insert(txn).await?;
///         order_item::Entity::insert_many(lines).exec(txn).await?;
///         Ok(order.id)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T>(db: &DatabaseConnection, f: F) -> Result<T, ServiceError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    T: Send,
{
    let transaction_id = Uuid::new_v4();
    let start = std::time::Instant::now();

    debug!(transaction_id = %transaction_id, "Starting database transaction");
    counter!("canteen.db.transactions.started", 1);

    let result = db.transaction::<_, T, ServiceError>(f).await;
    let elapsed = start.elapsed();

    match &result {
        Ok(_) => {
            counter!("canteen.db.transactions.committed", 1);
            debug!(transaction_id = %transaction_id, "Transaction committed in {:?}", elapsed);
        }
        Err(e) => {
            counter!("canteen.db.transactions.rolled_back", 1);
            warn!(transaction_id = %transaction_id, error = %e, "Transaction rolled back after {:?}", elapsed);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(err) => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use crate::entities::meal_type;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    async fn pool() -> DatabaseConnection {
        let pool = establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await
        .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn ok_commits() {
        let db = pool().await;

        let id = with_transaction(&db, |txn| {
            Box::pin(async move {
                let row = meal_type::ActiveModel {
                    name: Set("Breakfast".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                Ok(row.id)
            })
        })
        .await
        .unwrap();

        assert!(meal_type::Entity::find_by_id(id).one(&db).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn err_rolls_back_and_keeps_error_type() {
        let db = pool().await;

        let result: Result<(), ServiceError> = with_transaction(&db, |txn| {
            Box::pin(async move {
                meal_type::ActiveModel {
                    name: Set("Lunch".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                Err(ServiceError::menu_item_not_found(99))
            })
        })
        .await;

        assert!(matches!(result, Err(ServiceError::NotFound(msg)) if msg.contains("99")));
        assert_eq!(meal_type::Entity::find().count(&db).await.unwrap(), 0);
    }
}
