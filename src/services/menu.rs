use crate::{
    db::DbPool,
    entities::{meal_type, menu_item, order_item},
    errors::ServiceError,
    money,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Body for creating or replacing a menu item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    #[validate(length(min = 1, max = 255, message = "Menu item name is required"))]
    pub name: String,
    #[validate(custom = "validate_price")]
    #[schema(value_type = String, example = "45.00")]
    pub price: Decimal,
    pub meal_type_id: i32,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        let mut err = ValidationError::new("price");
        err.message = Some("Price must not be negative".into());
        return Err(err);
    }
    if !money::is_storable(money::to_money(*price)) {
        let mut err = ValidationError::new("price");
        err.message = Some(format!("Price must not exceed {}", money::MAX_AMOUNT).into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemView {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String, example = "45.00")]
    pub price: Decimal,
    pub meal_type_id: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<menu_item::Model> for MenuItemView {
    fn from(model: menu_item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: money::to_money(model.price),
            meal_type_id: model.meal_type_id,
            is_available: model.is_available,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Meal types and the menu items under them.
#[derive(Clone)]
pub struct MenuService {
    db_pool: Arc<DbPool>,
}

impl MenuService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list_meal_types(&self) -> Result<Vec<meal_type::Model>, ServiceError> {
        Ok(meal_type::Entity::find()
            .order_by_asc(meal_type::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    /// Available items of one meal type, by name.
    #[instrument(skip(self))]
    pub async fn menu_for_meal_type(
        &self,
        meal_type_id: i32,
    ) -> Result<Vec<MenuItemView>, ServiceError> {
        let items = menu_item::Entity::find()
            .filter(menu_item::Column::MealTypeId.eq(meal_type_id))
            .filter(menu_item::Column::IsAvailable.eq(true))
            .order_by_asc(menu_item::Column::Name)
            .all(&*self.db_pool)
            .await?;
        Ok(items.into_iter().map(MenuItemView::from).collect())
    }

    /// Every item, available or not, grouped by meal type.
    #[instrument(skip(self))]
    pub async fn list_all_items(&self) -> Result<Vec<MenuItemView>, ServiceError> {
        let items = menu_item::Entity::find()
            .order_by_asc(menu_item::Column::MealTypeId)
            .order_by_asc(menu_item::Column::Name)
            .all(&*self.db_pool)
            .await?;
        Ok(items.into_iter().map(MenuItemView::from).collect())
    }

    #[instrument(skip(self, input), fields(name = %input.name, meal_type_id = input.meal_type_id))]
    pub async fn create_item(&self, input: MenuItemInput) -> Result<MenuItemView, ServiceError> {
        input.validate()?;
        self.ensure_meal_type(input.meal_type_id).await?;

        let now = Utc::now();
        let created = menu_item::ActiveModel {
            name: Set(input.name.trim().to_string()),
            price: Set(money::to_money(input.price)),
            meal_type_id: Set(input.meal_type_id),
            is_available: Set(input.is_available),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(menu_item_id = created.id, "Menu item created");
        Ok(created.into())
    }

    /// Replaces an item's fields. Past orders keep their captured prices.
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        id: i32,
        input: MenuItemInput,
    ) -> Result<MenuItemView, ServiceError> {
        input.validate()?;

        let existing = menu_item::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::menu_item_not_found(id))?;
        self.ensure_meal_type(input.meal_type_id).await?;

        let mut active: menu_item::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.price = Set(money::to_money(input.price));
        active.meal_type_id = Set(input.meal_type_id);
        active.is_available = Set(input.is_available);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&*self.db_pool).await?;

        info!(menu_item_id = id, "Menu item updated");
        Ok(updated.into())
    }

    /// Deletes an item that no order has ever referenced.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        if menu_item::Entity::find_by_id(id).one(db).await?.is_none() {
            return Err(ServiceError::menu_item_not_found(id));
        }

        let references = order_item::Entity::find()
            .filter(order_item::Column::MenuItemId.eq(id))
            .count(db)
            .await?;
        if references > 0 {
            warn!(menu_item_id = id, references, "Refusing to delete ordered menu item");
            return Err(in_use(id));
        }

        menu_item::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|e| match e.sql_err() {
                // an order raced in between the check and the delete
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => in_use(id),
                _ => ServiceError::DatabaseError(e),
            })?;

        info!(menu_item_id = id, "Menu item deleted");
        Ok(())
    }

    async fn ensure_meal_type(&self, meal_type_id: i32) -> Result<(), ServiceError> {
        match meal_type::Entity::find_by_id(meal_type_id)
            .one(&*self.db_pool)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(ServiceError::ValidationError(format!(
                "Meal type with ID {} does not exist",
                meal_type_id
            ))),
        }
    }
}

fn in_use(id: i32) -> ServiceError {
    ServiceError::Conflict(format!(
        "Menu item with ID {} is part of existing orders; mark it unavailable instead",
        id
    ))
}
