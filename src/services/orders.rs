use crate::{
    db::{with_transaction, DbPool},
    entities::{menu_item, order, order_item, OrderStatus},
    errors::ServiceError,
    money,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Longest customer name the orders table holds.
pub const MAX_CUSTOMER_NAME_LEN: usize = 255;

/// The complete desired contents of an order.
///
/// Missing fields deserialize as empty so they are reported as validation
/// errors rather than body rejections.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    #[schema(example = "Asha")]
    pub customer_name: String,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: i32,
    #[schema(minimum = 1)]
    pub quantity: i32,
}

impl Cart {
    /// Store-independent checks, run before any transaction is opened.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "Please select at least one item".to_string(),
            ));
        }
        let name = self.customer_name.trim();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Customer name is required".to_string(),
            ));
        }
        if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Customer name must be at most {} characters",
                MAX_CUSTOMER_NAME_LEN
            )));
        }
        if let Some(line) = self.items.iter().find(|line| line.quantity < 1) {
            return Err(ServiceError::ValidationError(format!(
                "Quantity for menu item {} must be at least 1",
                line.menu_item_id
            )));
        }
        Ok(())
    }
}

/// An order row as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderRecord {
    pub id: i32,
    pub customer_name: String,
    #[schema(value_type = String, example = "100.00")]
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

impl From<order::Model> for OrderRecord {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            customer_name: model.customer_name,
            total_amount: money::to_money(model.total_amount),
            order_date: model.order_date,
            status: model.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReceiptLine {
    pub menu_item_id: i32,
    pub item_name: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "50.00")]
    pub price_at_order: Decimal,
}

/// An order together with its resolved items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderReceipt {
    #[serde(flatten)]
    pub order: OrderRecord,
    pub items: Vec<ReceiptLine>,
}

/// A cart line with its price frozen at transaction time.
#[derive(Debug, Clone, Copy)]
struct PricedLine {
    menu_item_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

/// Service for placing, replacing and tracking canteen orders.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Atomically turns a cart into an order and its items.
    #[instrument(skip(self, cart), fields(customer_name = %cart.customer_name, item_count = cart.items.len()))]
    pub async fn place_order(&self, cart: Cart) -> Result<OrderReceipt, ServiceError> {
        cart.validate()?;

        let order_id = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let lines = resolve_cart(txn, &cart.items).await?;
                let total = order_total(&lines)?;

                let order = order::ActiveModel {
                    customer_name: Set(cart.customer_name.trim().to_string()),
                    total_amount: Set(total),
                    order_date: Set(Utc::now()),
                    status: Set(OrderStatus::Pending),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                insert_lines(txn, order.id, &lines).await?;
                Ok(order.id)
            })
        })
        .await?;

        info!(order_id, "Order placed");
        self.get_order(order_id).await
    }

    /// Replaces the customer name and entire item set of an existing order.
    ///
    /// Item deletion, re-resolution, the order row update and re-insertion
    /// share one transaction. Status is left as it is.
    #[instrument(skip(self, cart), fields(item_count = cart.items.len()))]
    pub async fn set_order_contents(
        &self,
        order_id: i32,
        cart: Cart,
    ) -> Result<OrderReceipt, ServiceError> {
        cart.validate()?;

        with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let existing = order::Entity::find_by_id(order_id)
                    .one(txn)
                    .await?
                    .ok_or_else(ServiceError::order_not_found)?;

                order_item::Entity::delete_many()
                    .filter(order_item::Column::OrderId.eq(order_id))
                    .exec(txn)
                    .await?;

                let lines = resolve_cart(txn, &cart.items).await?;
                let total = order_total(&lines)?;

                let mut active: order::ActiveModel = existing.into();
                active.customer_name = Set(cart.customer_name.trim().to_string());
                active.total_amount = Set(total);
                active.order_date = Set(Utc::now());
                active.update(txn).await?;

                insert_lines(txn, order_id, &lines).await
            })
        })
        .await?;

        info!(order_id, "Order contents replaced");
        self.get_order(order_id).await
    }

    /// Reads an order and its items.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i32) -> Result<OrderReceipt, ServiceError> {
        let db = &*self.db_pool;
        let order = order::Entity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(|e| {
                error!(order_id, error = %e, "Failed to load order");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(ServiceError::order_not_found)?;

        let items = load_receipt_lines(db, order_id).await?;
        Ok(OrderReceipt {
            order: order.into(),
            items,
        })
    }

    /// Sets the status of an order. Every status is reachable from every other.
    #[instrument(skip(self), fields(status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> Result<OrderRecord, ServiceError> {
        let db = &*self.db_pool;
        let existing = order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or_else(ServiceError::order_not_found)?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status);
        let updated = active.update(db).await.map_err(|e| {
            error!(order_id, error = %e, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id, status = %status, "Order status updated");
        Ok(updated.into())
    }

    /// All orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, ServiceError> {
        let orders = order::Entity::find()
            .order_by_desc(order::Column::OrderDate)
            .order_by_desc(order::Column::Id)
            .all(&*self.db_pool)
            .await?;
        Ok(orders.into_iter().map(OrderRecord::from).collect())
    }
}

/// Total of the priced lines; rejected when the money column cannot hold it.
fn order_total(lines: &[PricedLine]) -> Result<Decimal, ServiceError> {
    let total = money::total(lines.iter().map(|l| (l.unit_price, l.quantity)));
    if !money::is_storable(total) {
        return Err(ServiceError::ValidationError(format!(
            "Order total {} exceeds the maximum of {}",
            total,
            money::MAX_AMOUNT
        )));
    }
    Ok(total)
}

/// Looks up every cart line and freezes its current unit price.
async fn resolve_cart<C>(conn: &C, items: &[CartLine]) -> Result<Vec<PricedLine>, ServiceError>
where
    C: ConnectionTrait,
{
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let menu_item = menu_item::Entity::find_by_id(item.menu_item_id)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::menu_item_not_found(item.menu_item_id))?;

        lines.push(PricedLine {
            menu_item_id: menu_item.id,
            quantity: item.quantity,
            unit_price: money::to_money(menu_item.price),
        });
    }
    Ok(lines)
}

async fn insert_lines<C>(conn: &C, order_id: i32, lines: &[PricedLine]) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    let rows = lines.iter().map(|line| order_item::ActiveModel {
        order_id: Set(order_id),
        menu_item_id: Set(line.menu_item_id),
        quantity: Set(line.quantity),
        price_at_order: Set(line.unit_price),
        ..Default::default()
    });

    order_item::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn load_receipt_lines<C>(conn: &C, order_id: i32) -> Result<Vec<ReceiptLine>, ServiceError>
where
    C: ConnectionTrait,
{
    let rows = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .find_also_related(menu_item::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, menu)| match menu {
            Some(menu) => Some(receipt_line(item, menu)),
            None => {
                warn!(
                    order_id,
                    menu_item_id = item.menu_item_id,
                    "Order item references a missing menu item; omitted from receipt"
                );
                None
            }
        })
        .collect())
}

fn receipt_line(item: order_item::Model, menu: menu_item::Model) -> ReceiptLine {
    ReceiptLine {
        menu_item_id: item.menu_item_id,
        item_name: menu.name,
        quantity: item.quantity,
        price_at_order: money::to_money(item.price_at_order),
    }
}
