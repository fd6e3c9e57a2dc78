use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{
        CreateOrderRequest, CreateOrderResponse, DeleteOrderRequest, FarmOrderGroup, FarmOrderList,
        FarmOrderProduct, FarmOrderRow, InvoiceLine, InvoiceWithLines, OrderDeleted,
        OrderStatusUpdated, ProofOfTransferUploaded, UpdateOrderStatusRequest, UserOrderGroup,
        UserOrderHistory, UserOrderProduct, UserOrderRow,
    },
    entity::{
        farm_products::{Column as ProdCol, Entity as FarmProducts},
        invoice::{ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        pengirim::{Column as CourierCol, Entity as Pengirim},
        pengiriman::Entity as Tariffs,
        proses_pengiriman::{
            ActiveModel as ShipmentActive, Column as ShipmentCol, Entity as Shipments,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::Principal,
    pricing,
    response::{ApiResponse, Meta},
    services::identity::{account_for, can_view_invoice, farm_of},
    state::AppState,
    status::{OrderStatus, ShipmentStatus},
    storage::ImageUpload,
};

/// Reject carts the engine would never accept, before touching the store.
pub fn validate_cart(payload: &CreateOrderRequest) -> AppResult<()> {
    if payload.products.is_empty() || payload.pengiriman_id <= 0 {
        return Err(AppError::BadRequest(
            "Products and Pengiriman ID are required".into(),
        ));
    }
    if payload.products.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest(
            "Quantity must be greater than 0".into(),
        ));
    }
    if payload.distance_km < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "distance_km must not be negative".into(),
        ));
    }
    if payload.distance_km > pricing::MAX_DISTANCE_KM {
        return Err(AppError::BadRequest(format!(
            "distance_km must not exceed {}",
            pricing::MAX_DISTANCE_KM
        )));
    }
    if payload.payment_method.trim().is_empty() {
        return Err(AppError::BadRequest("payment_method is required".into()));
    }
    if let Some(draft) = &payload.shipment {
        let points = [draft.location_pengirim, draft.location_penerima];
        if points.iter().flatten().any(|point| !point.is_valid()) {
            return Err(AppError::BadRequest("Shipment location is out of range".into()));
        }
    }
    Ok(())
}

/// Price the cart, persist invoice and order lines, and take the stock, all in
/// one transaction. Dropping `txn` on an early return rolls everything back.
pub async fn create_order(
    state: &AppState,
    principal: &Principal,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<CreateOrderResponse>> {
    let buyer = account_for(&state.orm, principal).await?;
    validate_cart(&payload)?;

    let tariff = Tariffs::find_by_id(payload.pengiriman_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Pengiriman ID".into()))?;
    let shipping_cost = pricing::shipping_cost(
        payload.distance_km,
        tariff.fuel_consumption,
        tariff.fuel_price,
    )?;

    let txn = state.orm.begin().await?;
    let now = Utc::now();
    let invoice_number = pricing::invoice_number(buyer.id, now, Uuid::new_v4());

    let invoice = InvoiceActive {
        id: NotSet,
        user_id: Set(buyer.id),
        invoice_number: Set(invoice_number.clone()),
        payment_status: Set(OrderStatus::Pending.to_string()),
        payment_method: Set(payload.payment_method.trim().to_string()),
        issued_date: Set(now.into()),
        due_date: Set(pricing::due_date(now).into()),
        total_amount: Set(Decimal::ZERO),
        total_harga_product: Set(Decimal::ZERO),
        shipping_cost: Set(Decimal::ZERO),
        proof_of_transfer: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut origin_farm_id: Option<i64> = None;

    for item in &payload.products {
        let product = FarmProducts::find_by_id(item.product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        let product = match product {
            Some(p) => p,
            None => {
                tracing::warn!(product_id = item.product_id, "order rejected: product not found");
                return Err(AppError::BadRequest("Product not found".into()));
            }
        };

        let quantity = Decimal::from(item.quantity);
        if product.stock_kg < quantity {
            tracing::warn!(
                product_id = product.id,
                stock_kg = %product.stock_kg,
                quantity = item.quantity,
                "order rejected: stock is insufficient"
            );
            return Err(AppError::BadRequest("Stock is insufficient".into()));
        }

        let line_total = pricing::line_total(product.price_per_kg, item.quantity)?;
        OrderActive {
            id: NotSet,
            user_id: Set(buyer.id),
            product_id: Set(product.id),
            quantity: Set(item.quantity),
            total_harga: Set(line_total),
            status: Set(OrderStatus::Pending.to_string()),
            pengiriman_id: Set(tariff.id),
            invoice_id: Set(invoice.id),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;

        // reduce stock, guarded so it can never go negative
        let taken = FarmProducts::update_many()
            .col_expr(ProdCol::StockKg, Expr::col(ProdCol::StockKg).sub(quantity))
            .col_expr(ProdCol::UpdatedAt, Expr::current_timestamp().into())
            .filter(ProdCol::Id.eq(product.id))
            .filter(ProdCol::StockKg.gte(quantity))
            .exec(&txn)
            .await?;
        if taken.rows_affected == 0 {
            return Err(AppError::BadRequest("Stock is insufficient".into()));
        }

        origin_farm_id.get_or_insert(product.farm_id);
    }

    // Read the subtotal back from the stored lines rather than accumulating it.
    let subtotal = Orders::find()
        .select_only()
        .column_as(Expr::col(OrderCol::TotalHarga).sum(), "subtotal")
        .filter(OrderCol::InvoiceId.eq(invoice.id))
        .into_tuple::<Option<Decimal>>()
        .one(&txn)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);
    let total_amount = pricing::invoice_total(subtotal, shipping_cost)?;

    let mut active: InvoiceActive = invoice.into();
    active.total_harga_product = Set(subtotal);
    active.shipping_cost = Set(shipping_cost);
    active.total_amount = Set(total_amount);
    active.updated_at = Set(Utc::now().into());
    let invoice = active.update(&txn).await?;

    let mut shipment_id = None;
    if let (Some(draft), Some(farm_id)) = (payload.shipment, origin_farm_id) {
        if let Some(courier_id) = draft.id_pengirim {
            let courier = Pengirim::find_by_id(courier_id)
                .filter(CourierCol::FarmId.eq(farm_id))
                .one(&txn)
                .await?;
            if courier.is_none() {
                return Err(AppError::BadRequest(
                    "Courier not found for this farm".into(),
                ));
            }
        }

        let shipment = ShipmentActive {
            id: NotSet,
            id_invoice: Set(invoice.id),
            id_farm: Set(farm_id),
            id_pengirim: Set(draft.id_pengirim),
            hari_dikirim: Set(Some(pricing::hari(now.weekday()).to_string())),
            tanggal_dikirim: Set(Some(now.into())),
            hari_diterima: Set(None),
            tanggal_diterima: Set(None),
            status_pengiriman: Set(ShipmentStatus::Pending.to_string()),
            alamat_pengirim: Set(draft.alamat_pengirim),
            alamat_penerima: Set(draft.alamat_penerima),
            pengirim_lon: Set(draft.location_pengirim.map(|p| p.lon)),
            pengirim_lat: Set(draft.location_pengirim.map(|p| p.lat)),
            penerima_lon: Set(draft.location_penerima.map(|p| p.lon)),
            penerima_lat: Set(draft.location_penerima.map(|p| p.lat)),
            image_pengiriman: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;
        shipment_id = Some(shipment.id);
    }

    txn.commit().await?;

    tracing::info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        lines = payload.products.len(),
        total_amount = %invoice.total_amount,
        "order created"
    );
    audit::record(
        &state.pool,
        &principal.subject,
        "order_create",
        "invoice",
        serde_json::json!({ "invoice_id": invoice.id, "invoice_number": invoice.invoice_number }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order and Invoice created successfully",
        CreateOrderResponse {
            invoice_id: invoice.id,
            invoice_number,
            total_harga: pricing::format_currency(invoice.total_harga_product),
            shipping_cost: pricing::format_currency(invoice.shipping_cost),
            total_amount: pricing::format_currency(invoice.total_amount),
            shipment_id,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    principal: &Principal,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderStatusUpdated>> {
    let account = account_for(&state.orm, principal).await?;
    if payload.invoice_id <= 0 || payload.status.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Invoice ID and status are required".into(),
        ));
    }
    let next: OrderStatus = payload.status.parse()?;

    let txn = state.orm.begin().await?;
    let invoice = Invoices::find_by_id(payload.invoice_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let invoice = match invoice {
        Some(i) if can_view_invoice(&txn, &account, &i).await? => i,
        _ => {
            return Err(AppError::NotFound(
                "No orders found with the given invoice ID".into(),
            ));
        }
    };

    let lines = Orders::find()
        .filter(OrderCol::InvoiceId.eq(invoice.id))
        .all(&txn)
        .await?;
    for line in &lines {
        let current: OrderStatus = line.status.parse()?;
        current.ensure_transition(next)?;
    }

    let result = Orders::update_many()
        .col_expr(OrderCol::Status, Expr::value(next.as_str()))
        .col_expr(OrderCol::UpdatedAt, Expr::current_timestamp().into())
        .filter(OrderCol::InvoiceId.eq(invoice.id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(
            "No orders found with the given invoice ID".into(),
        ));
    }

    txn.commit().await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "order_status_update",
        "orders",
        serde_json::json!({ "invoice_id": invoice.id, "status": next.as_str() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order status updated successfully",
        OrderStatusUpdated {
            invoice_id: invoice.id,
            status: next.to_string(),
            updated_lines: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

/// Remove an invoice with its lines and shipment records in one transaction.
pub async fn delete_order(
    state: &AppState,
    principal: &Principal,
    payload: DeleteOrderRequest,
) -> AppResult<ApiResponse<OrderDeleted>> {
    let account = account_for(&state.orm, principal).await?;
    if payload.invoice_id <= 0 {
        return Err(AppError::BadRequest("Invoice ID is required".into()));
    }

    let txn = state.orm.begin().await?;
    let owned = Invoices::find_by_id(payload.invoice_id)
        .filter(InvoiceCol::UserId.eq(account.id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    if owned.is_none() {
        return Err(AppError::not_found("Invoice"));
    }

    Shipments::delete_many()
        .filter(ShipmentCol::IdInvoice.eq(payload.invoice_id))
        .exec(&txn)
        .await?;
    Orders::delete_many()
        .filter(OrderCol::InvoiceId.eq(payload.invoice_id))
        .exec(&txn)
        .await?;
    let deleted = Invoices::delete_by_id(payload.invoice_id)
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(AppError::not_found("Invoice"));
    }

    txn.commit().await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "order_delete",
        "invoice",
        serde_json::json!({ "invoice_id": payload.invoice_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order and Invoice deleted successfully",
        OrderDeleted {
            invoice_id: payload.invoice_id,
        },
        Some(Meta::empty()),
    ))
}

/// Attach proof of payment to an invoice and mark it as `Sending`.
pub async fn upload_proof_of_transfer(
    state: &AppState,
    principal: &Principal,
    invoice_id: i64,
    image: ImageUpload,
) -> AppResult<ApiResponse<ProofOfTransferUploaded>> {
    let account = account_for(&state.orm, principal).await?;
    let path = image.hashed_name()?;

    let invoice = Invoices::find_by_id(invoice_id)
        .filter(InvoiceCol::UserId.eq(account.id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice"))?;
    let current: OrderStatus = invoice.payment_status.parse()?;
    if !current.accepts_proof_of_transfer() {
        return Err(AppError::BadRequest(format!(
            "Payment for this invoice is already {current}"
        )));
    }

    let github = &state.config.github;
    let url = state
        .storage
        .upload(image.content, &github.org, &github.proof_repo, &path)
        .await?;

    let accepting = [OrderStatus::Pending.as_str(), OrderStatus::Sending.as_str()];
    let result = Invoices::update_many()
        .col_expr(InvoiceCol::ProofOfTransfer, Expr::value(url.clone()))
        .col_expr(InvoiceCol::PaymentStatus, Expr::value(OrderStatus::Sending.as_str()))
        .col_expr(InvoiceCol::UpdatedAt, Expr::current_timestamp().into())
        .filter(InvoiceCol::Id.eq(invoice.id))
        .filter(InvoiceCol::PaymentStatus.is_in(accepting))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Invoice payment status changed during upload".into(),
        ));
    }

    audit::record(
        &state.pool,
        &principal.subject,
        "proof_of_transfer_upload",
        "invoice",
        serde_json::json!({ "invoice_id": invoice.id, "url": url }),
    )
    .await;

    Ok(ApiResponse::success(
        "Transfer image uploaded successfully.",
        ProofOfTransferUploaded {
            invoice_id: invoice.id,
            proof_of_transfer: url,
            payment_status: OrderStatus::Sending.to_string(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order_by_invoice(
    state: &AppState,
    principal: &Principal,
    invoice_id: i64,
) -> AppResult<ApiResponse<InvoiceWithLines>> {
    let account = account_for(&state.orm, principal).await?;
    let invoice = Invoices::find_by_id(invoice_id).one(&state.orm).await?;
    let invoice = match invoice {
        Some(i) if can_view_invoice(&state.orm, &account, &i).await? => i,
        _ => return Err(AppError::not_found("Invoice")),
    };

    let orders = sqlx::query_as::<_, InvoiceLine>(
        r#"
        SELECT o.id AS order_id, o.product_id, fp.name AS product_name,
               o.quantity, o.total_harga, o.status
        FROM orders o
        JOIN farm_products fp ON o.product_id = fp.id
        WHERE o.invoice_id = $1
        ORDER BY o.id
        "#,
    )
    .bind(invoice.id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        InvoiceWithLines {
            invoice: invoice.into(),
            orders,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders_by_user(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<UserOrderHistory>> {
    let account = account_for(&state.orm, principal).await?;

    let rows = sqlx::query_as::<_, UserOrderRow>(
        r#"
        SELECT o.id AS order_id, o.invoice_id, o.product_id, fp.name AS product_name,
               fp.price_per_kg, o.quantity, o.total_harga, o.status, o.created_at, o.updated_at,
               i.invoice_number, i.total_amount, i.payment_status, i.payment_method,
               i.issued_date, i.due_date, i.proof_of_transfer
        FROM orders o
        JOIN invoice i ON o.invoice_id = i.id
        JOIN farm_products fp ON o.product_id = fp.id
        WHERE i.user_id = $1
        ORDER BY i.id DESC, o.id
        "#,
    )
    .bind(account.id)
    .fetch_all(&state.pool)
    .await?;

    let items = group_user_orders(rows);
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Orders retrieved successfully.",
        UserOrderHistory { items },
        Some(Meta::new(1, total, total)),
    ))
}

pub async fn list_orders_by_farm(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<FarmOrderList>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;

    let rows = sqlx::query_as::<_, FarmOrderRow>(
        r#"
        SELECT o.id AS order_id, o.invoice_id, o.product_id, fp.name AS product_name,
               o.quantity, o.total_harga, o.status, o.created_at, o.updated_at,
               i.invoice_number, i.total_amount, i.proof_of_transfer,
               a.nama AS nama_pembeli, a.no_telp, a.email
        FROM orders o
        JOIN farm_products fp ON o.product_id = fp.id
        JOIN invoice i ON o.invoice_id = i.id
        JOIN akun a ON i.user_id = a.id
        WHERE fp.farm_id = $1
        ORDER BY i.id DESC, o.id
        "#,
    )
    .bind(farm.id)
    .fetch_all(&state.pool)
    .await?;

    let items = group_farm_orders(rows);
    let total = items.len() as i64;
    tracing::debug!(farm_id = farm.id, invoices = total, "farm orders loaded");
    Ok(ApiResponse::success(
        "Orders retrieved successfully.",
        FarmOrderList { items },
        Some(Meta::new(1, total, total)),
    ))
}

/// Fold rows sorted by invoice into one group per invoice, keeping row order.
pub fn group_user_orders(rows: Vec<UserOrderRow>) -> Vec<UserOrderGroup> {
    let mut groups: Vec<UserOrderGroup> = Vec::new();
    for row in rows {
        let product = UserOrderProduct {
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            price_per_kg: row.price_per_kg,
            quantity: row.quantity,
            total_harga: pricing::format_currency(row.total_harga),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        match groups.last_mut() {
            Some(group) if group.invoice_id == row.invoice_id => group.products.push(product),
            _ => groups.push(UserOrderGroup {
                invoice_id: row.invoice_id,
                invoice_number: row.invoice_number,
                total_amount: pricing::format_currency(row.total_amount),
                payment_status: row.payment_status,
                payment_method: row.payment_method,
                issued_date: row.issued_date,
                due_date: row.due_date,
                proof_of_transfer: row.proof_of_transfer,
                products: vec![product],
            }),
        }
    }
    groups
}

pub fn group_farm_orders(rows: Vec<FarmOrderRow>) -> Vec<FarmOrderGroup> {
    let mut groups: Vec<FarmOrderGroup> = Vec::new();
    for row in rows {
        let product = FarmOrderProduct {
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            total_harga: pricing::format_currency(row.total_harga),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        match groups.last_mut() {
            Some(group) if group.invoice_id == row.invoice_id => group.products.push(product),
            _ => groups.push(FarmOrderGroup {
                invoice_id: row.invoice_id,
                invoice_number: row.invoice_number,
                total_amount: pricing::format_currency(row.total_amount),
                nama_pembeli: row.nama_pembeli,
                no_telp: row.no_telp,
                email: row.email,
                proof_of_transfer: row.proof_of_transfer,
                products: vec![product],
            }),
        }
    }
    groups
}

