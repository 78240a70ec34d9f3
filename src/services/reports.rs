use crate::{
    db::DbPool,
    entities::{menu_item, order, order_item, OrderStatus},
    errors::ServiceError,
    money,
    services::orders::OrderRecord,
};
use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Quantity of one menu item still to be prepared today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct PreparationLine {
    pub item_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyFinancialSummary {
    pub orders: Vec<OrderRecord>,
    #[schema(value_type = String, example = "1250.00")]
    pub total_amount: Decimal,
}

/// `[start, end)` in UTC of the calendar day containing `now`, in `now`'s zone.
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let zone = now.timezone();
    let today = now.date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);

    let midnight = |date: chrono::NaiveDate| {
        let naive = date.and_time(NaiveTime::MIN);
        zone.from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            // midnight skipped by a DST jump; the day then starts an hour later at most
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
    };

    (midnight(today), midnight(tomorrow))
}

/// Read-only daily views over orders.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Items to prepare today: Pending and Confirmed orders, summed by item name.
    pub async fn preparation_summary(&self) -> Result<Vec<PreparationLine>, ServiceError> {
        self.preparation_summary_between(day_bounds(&Local::now())).await
    }

    #[instrument(skip(self))]
    pub async fn preparation_summary_between(
        &self,
        bounds: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<Vec<PreparationLine>, ServiceError> {
        let (start, end) = bounds;
        let lines = order_item::Entity::find()
            .select_only()
            .column_as(menu_item::Column::Name, "item_name")
            .column_as(
                Expr::col((order_item::Entity, order_item::Column::Quantity)).sum(),
                "total_quantity",
            )
            .join(JoinType::InnerJoin, order_item::Relation::Order.def())
            .join(JoinType::InnerJoin, order_item::Relation::MenuItem.def())
            .filter(order::Column::Status.is_in(OrderStatus::awaiting_preparation()))
            .filter(order::Column::OrderDate.gte(start))
            .filter(order::Column::OrderDate.lt(end))
            .group_by(menu_item::Column::Name)
            .order_by_asc(menu_item::Column::Name)
            .into_model::<PreparationLine>()
            .all(&*self.db_pool)
            .await?;

        debug!(lines = lines.len(), "Preparation summary computed");
        Ok(lines)
    }

    /// Today's orders, newest first, with their summed value.
    pub async fn daily_financial_summary(&self) -> Result<DailyFinancialSummary, ServiceError> {
        self.financial_summary_between(day_bounds(&Local::now())).await
    }

    #[instrument(skip(self))]
    pub async fn financial_summary_between(
        &self,
        bounds: (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<DailyFinancialSummary, ServiceError> {
        let (start, end) = bounds;
        let orders: Vec<OrderRecord> = order::Entity::find()
            .filter(order::Column::OrderDate.gte(start))
            .filter(order::Column::OrderDate.lt(end))
            .order_by_desc(order::Column::OrderDate)
            .order_by_desc(order::Column::Id)
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(OrderRecord::from)
            .collect();

        let total_amount = money::to_money(orders.iter().map(|o| o.total_amount).sum());
        debug!(orders = orders.len(), total = %total_amount, "Financial summary computed");

        Ok(DailyFinancialSummary {
            orders,
            total_amount,
        })
    }
}
