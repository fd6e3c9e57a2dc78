use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::dto::products::{CreateProductRequest, ProductList, TariffList, UpdateProductRequest};
use crate::{
    audit,
    entity::{
        farm_products::{ActiveModel, Column, Entity as FarmProducts},
        farms::Entity as Farms,
        pengiriman::{Column as TariffCol, Entity as Tariffs},
    },
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::identity::{account_for, farm_of},
    state::AppState,
};

fn ensure_quantities(price: Option<Decimal>, stock: Option<Decimal>) -> AppResult<()> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::BadRequest("price_per_kg must not be negative".into()));
    }
    if stock.is_some_and(|s| s < Decimal::ZERO) {
        return Err(AppError::BadRequest("stock_kg must not be negative".into()));
    }
    Ok(())
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::PricePerKg.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::PricePerKg.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::PricePerKg,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Stock => Column::StockKg,
    };

    let mut finder = FarmProducts::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    finder = finder.order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let result = FarmProducts::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Product::from);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::not_found("Product")),
    };
    Ok(ApiResponse::success("Product", result, Some(Meta::empty())))
}

/// Products of the caller's own farm.
pub async fn list_my_products(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<ProductList>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;

    let items: Vec<Product> = FarmProducts::find()
        .filter(Column::FarmId.eq(farm.id))
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Catalogue of one farm, oldest listing first.
pub async fn list_farm_products(state: &AppState, farm_id: i64) -> AppResult<ApiResponse<ProductList>> {
    Farms::find_by_id(farm_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Farm"))?;

    let items: Vec<Product> = FarmProducts::find()
        .filter(Column::FarmId.eq(farm_id))
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn create_product(
    state: &AppState,
    principal: &Principal,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    ensure_quantities(Some(payload.price_per_kg), Some(payload.stock_kg))?;

    let active = ActiveModel {
        id: NotSet,
        farm_id: Set(farm.id),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price_per_kg: Set(payload.price_per_kg),
        weight_per_unit: Set(payload.weight_per_unit),
        stock_kg: Set(payload.stock_kg),
        image_url: Set(payload.image_url),
        status: Set(payload.status),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "product_create",
        "farm_products",
        serde_json::json!({ "product_id": product.id, "farm_id": farm.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    principal: &Principal,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;
    ensure_quantities(payload.price_per_kg, payload.stock_kg)?;

    let existing = FarmProducts::find_by_id(id)
        .filter(Column::FarmId.eq(farm.id))
        .one(&state.orm)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::not_found("Product")),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price_per_kg {
        active.price_per_kg = Set(price);
    }
    if let Some(weight) = payload.weight_per_unit {
        active.weight_per_unit = Set(Some(weight));
    }
    if let Some(stock) = payload.stock_kg {
        active.stock_kg = Set(stock);
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(status) = payload.status {
        active.status = Set(Some(status));
    }
    active.updated_at = Set(chrono::Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "product_update",
        "farm_products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;

    let result = FarmProducts::delete_many()
        .filter(Column::Id.eq(id))
        .filter(Column::FarmId.eq(farm.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product"));
    }

    audit::record(
        &state.pool,
        &principal.subject,
        "product_delete",
        "farm_products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_tariffs(state: &AppState) -> AppResult<ApiResponse<TariffList>> {
    let items: Vec<_> = Tariffs::find()
        .order_by_asc(TariffCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Tariffs",
        TariffList { items },
        Some(Meta::new(1, total, total)),
    ))
}
