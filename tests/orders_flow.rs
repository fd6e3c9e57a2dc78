mod common;

use common::{account, dec, farm, product, setup, tariff};
use farm_distribution_api::{
    dto::orders::{
        CartItem, CreateOrderRequest, DeleteOrderRequest, UpdateOrderStatusRequest,
    },
    entity::{
        audit_logs::{Column as AuditCol, Entity as AuditLogs},
        farm_products::Entity as FarmProducts,
        invoice::{Column as InvoiceCol, Entity as Invoices},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::AppError,
    services::order_service,
    storage::ImageUpload,
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn cart(items: &[(i64, i32)], tariff_id: i64, distance_km: &str) -> CreateOrderRequest {
    CreateOrderRequest {
        products: items
            .iter()
            .map(|&(product_id, quantity)| CartItem {
                product_id,
                quantity,
            })
            .collect(),
        pengiriman_id: tariff_id,
        payment_method: "transfer".into(),
        distance_km: dec(distance_km),
        shipment: None,
    }
}

async fn stock_of(state: &farm_distribution_api::state::AppState, id: i64) -> anyhow::Result<Decimal> {
    Ok(FarmProducts::find_by_id(id)
        .one(&state.orm)
        .await?
        .expect("product exists")
        .stock_kg)
}

async fn invoice_count(state: &farm_distribution_api::state::AppState, buyer_id: i64) -> anyhow::Result<u64> {
    Ok(Invoices::find()
        .filter(InvoiceCol::UserId.eq(buyer_id))
        .count(&state.orm)
        .await?)
}

// Buyer orders 3 kg at 10000/kg over 20 km with a 0.1 l/km, 15000/l tariff.
#[tokio::test]
async fn order_lifecycle_prices_takes_stock_and_cleans_up() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, farmer) = account(state, "peternak").await?;
    let (_, stranger) = account(state, "pembeli").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "10000", "10").await?;
    let tariff_id = tariff(state, "0.1", "15000").await?;

    let created =
        order_service::create_order(state, &buyer, cart(&[(product_id, 3)], tariff_id, "20"))
            .await?;
    let data = created.data.expect("order data");
    assert_eq!(data.total_harga, "Rp.30,000.00");
    assert_eq!(data.shipping_cost, "Rp.30,000.00");
    assert_eq!(data.total_amount, "Rp.60,000.00");
    assert!(data.invoice_number.starts_with(&format!("INV-{buyer_id}-")));
    assert_eq!(stock_of(state, product_id).await?, dec("7"));
    assert_eq!(
        AuditLogs::find()
            .filter(AuditCol::Actor.eq(buyer.subject.as_str()))
            .filter(AuditCol::Action.eq("order_create"))
            .count(&state.orm)
            .await?,
        1
    );

    // stored totals agree with the stored lines
    let invoice = Invoices::find_by_id(data.invoice_id)
        .one(&state.orm)
        .await?
        .expect("invoice stored");
    let lines = Orders::find()
        .filter(OrderCol::InvoiceId.eq(invoice.id))
        .all(&state.orm)
        .await?;
    let line_sum: Decimal = lines.iter().map(|l| l.total_harga).sum();
    assert_eq!(invoice.total_harga_product, line_sum);
    assert_eq!(invoice.total_amount, invoice.total_harga_product + invoice.shipping_cost);
    assert_eq!(invoice.payment_status, "Pending");
    assert_eq!((invoice.due_date - invoice.issued_date).num_days(), 7);

    // reads are idempotent
    let first = order_service::get_order_by_invoice(state, &buyer, invoice.id).await?;
    let second = order_service::get_order_by_invoice(state, &buyer, invoice.id).await?;
    assert_eq!(serde_json::to_value(&first.data)?, serde_json::to_value(&second.data)?);
    assert_eq!(first.data.expect("invoice view").orders.len(), 1);

    // farm owner sees it, a stranger does not
    assert!(order_service::get_order_by_invoice(state, &farmer, invoice.id).await.is_ok());
    assert!(matches!(
        order_service::get_order_by_invoice(state, &stranger, invoice.id).await,
        Err(AppError::NotFound(_))
    ));

    let history = order_service::list_orders_by_user(state, &buyer).await?;
    let groups = history.data.expect("history").items;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].products.len(), 1);
    assert_eq!(groups[0].total_amount, "Rp.60,000.00");

    let farm_orders = order_service::list_orders_by_farm(state, &farmer).await?;
    assert!(
        farm_orders
            .data
            .expect("farm orders")
            .items
            .iter()
            .any(|g| g.invoice_id == invoice.id)
    );

    // proof of transfer moves the payment to Sending
    let proof = order_service::upload_proof_of_transfer(
        state,
        &buyer,
        invoice.id,
        ImageUpload::new("bukti.png", vec![137, 80, 78, 71]),
    )
    .await?
    .data
    .expect("proof data");
    assert_eq!(proof.payment_status, "Sending");
    assert!(proof.proof_of_transfer.starts_with("memory://test-org/proofs/"));
    assert_eq!(fx.storage.len(), 1);

    // status lifecycle
    let status = |s: &str| UpdateOrderStatusRequest {
        invoice_id: invoice.id,
        status: s.into(),
    };
    order_service::update_order_status(state, &buyer, status("Sending")).await?;
    assert!(matches!(
        order_service::update_order_status(state, &buyer, status("Pending")).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        order_service::update_order_status(state, &buyer, status("Shipped")).await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        order_service::update_order_status(state, &stranger, status("Confirmed")).await,
        Err(AppError::NotFound(_))
    ));
    let confirmed = order_service::update_order_status(state, &farmer, status("Confirmed"))
        .await?
        .data
        .expect("status data");
    assert_eq!(confirmed.updated_lines, 1);

    // only the buyer deletes; stock is not given back
    assert!(matches!(
        order_service::delete_order(state, &farmer, DeleteOrderRequest { invoice_id: invoice.id }).await,
        Err(AppError::NotFound(_))
    ));
    order_service::delete_order(state, &buyer, DeleteOrderRequest { invoice_id: invoice.id }).await?;
    assert_eq!(invoice_count(state, buyer_id).await?, 0);
    assert_eq!(
        Orders::find()
            .filter(OrderCol::InvoiceId.eq(invoice.id))
            .count(&state.orm)
            .await?,
        0
    );
    assert_eq!(stock_of(state, product_id).await?, dec("7"));

    Ok(())
}

#[tokio::test]
async fn insufficient_stock_rejects_without_side_effects() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "10000", "2").await?;
    let tariff_id = tariff(state, "0.1", "15000").await?;

    let result =
        order_service::create_order(state, &buyer, cart(&[(product_id, 3)], tariff_id, "20"))
            .await;
    match result {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Stock is insufficient"),
        other => panic!("expected insufficient stock, got {other:?}", other = other.err()),
    }
    assert_eq!(invoice_count(state, buyer_id).await?, 0);
    assert_eq!(stock_of(state, product_id).await?, dec("2"));

    Ok(())
}

#[tokio::test]
async fn unknown_tariff_is_rejected() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "10000", "10").await?;

    let result =
        order_service::create_order(state, &buyer, cart(&[(product_id, 1)], i64::MAX, "5")).await;
    match result {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid Pengiriman ID"),
        other => panic!("expected invalid tariff, got {other:?}", other = other.err()),
    }
    assert_eq!(invoice_count(state, buyer_id).await?, 0);
    assert_eq!(stock_of(state, product_id).await?, dec("10"));

    Ok(())
}

// The first line succeeds, the second refers to a missing product: nothing is kept.
#[tokio::test]
async fn failure_midway_rolls_back_every_line() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "10000", "10").await?;
    let tariff_id = tariff(state, "0.1", "15000").await?;

    let result = order_service::create_order(
        state,
        &buyer,
        cart(&[(product_id, 4), (i64::MAX, 1)], tariff_id, "1"),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    assert_eq!(invoice_count(state, buyer_id).await?, 0);
    assert_eq!(
        Orders::find()
            .filter(OrderCol::UserId.eq(buyer_id))
            .count(&state.orm)
            .await?,
        0
    );
    assert_eq!(stock_of(state, product_id).await?, dec("10"));

    Ok(())
}

// Two products at 12500.50 x 2 and 8000 x 5 over 7.5 km with a 0.25 l/km, 6800/l tariff.
#[tokio::test]
async fn multi_line_invoice_totals_match_stored_lines() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let cheese = product(state, farm_id, "12500.50", "4").await?;
    let milk = product(state, farm_id, "8000", "20").await?;
    let tariff_id = tariff(state, "0.25", "6800").await?;

    let data = order_service::create_order(
        state,
        &buyer,
        cart(&[(cheese, 2), (milk, 5)], tariff_id, "7.5"),
    )
    .await?
    .data
    .expect("order data");
    assert_eq!(data.total_harga, "Rp.65,001.00");
    assert_eq!(data.shipping_cost, "Rp.12,750.00");
    assert_eq!(data.total_amount, "Rp.77,751.00");

    let invoice = Invoices::find_by_id(data.invoice_id)
        .one(&state.orm)
        .await?
        .expect("invoice stored");
    let lines = Orders::find()
        .filter(OrderCol::InvoiceId.eq(invoice.id))
        .all(&state.orm)
        .await?;
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.user_id == buyer_id && l.pengiriman_id == tariff_id));
    let line_sum: Decimal = lines.iter().map(|l| l.total_harga).sum();
    assert_eq!(invoice.total_harga_product, line_sum);
    assert_eq!(invoice.total_amount, invoice.total_harga_product + invoice.shipping_cost);

    assert_eq!(stock_of(state, cheese).await?, dec("2"));
    assert_eq!(stock_of(state, milk).await?, dec("15"));

    let view = order_service::get_order_by_invoice(state, &buyer, invoice.id)
        .await?
        .data
        .expect("invoice view");
    let ordered: Vec<i64> = view.orders.iter().map(|l| l.product_id).collect();
    assert_eq!(ordered, vec![cheese, milk]);

    Ok(())
}

// Each line fits the stock on its own; together they do not.
#[tokio::test]
async fn repeated_product_lines_cannot_oversell() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "10000", "10").await?;
    let tariff_id = tariff(state, "0.1", "15000").await?;

    let result = order_service::create_order(
        state,
        &buyer,
        cart(&[(product_id, 6), (product_id, 6)], tariff_id, "2"),
    )
    .await;
    match result {
        Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Stock is insufficient"),
        other => panic!("expected insufficient stock, got {other:?}", other = other.err()),
    }
    assert_eq!(invoice_count(state, buyer_id).await?, 0);
    assert_eq!(stock_of(state, product_id).await?, dec("10"));

    // the same product twice within the stock is fine
    order_service::create_order(
        state,
        &buyer,
        cart(&[(product_id, 4), (product_id, 6)], tariff_id, "2"),
    )
    .await?;
    assert_eq!(stock_of(state, product_id).await?, Decimal::ZERO);

    Ok(())
}

#[tokio::test]
async fn line_total_beyond_money_column_is_rejected() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (buyer_id, buyer) = account(state, "pembeli").await?;
    let (farmer_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "999999999999.99", "10").await?;
    let tariff_id = tariff(state, "0.1", "15000").await?;

    let result =
        order_service::create_order(state, &buyer, cart(&[(product_id, 2)], tariff_id, "1")).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(invoice_count(state, buyer_id).await?, 0);
    assert_eq!(stock_of(state, product_id).await?, dec("10"));

    Ok(())
}

#[test]
fn invalid_carts_are_rejected_before_any_lookup() {
    for request in [
        cart(&[], 1, "1"),
        cart(&[(1, 0)], 1, "1"),
        cart(&[(1, -2)], 1, "1"),
        cart(&[(1, 1)], 0, "1"),
        cart(&[(1, 1)], 1, "-3"),
        cart(&[(1, 1)], 1, "20000.5"),
        cart(&[(1, 1)], 1, "10000000000000000000000000000"),
    ] {
        assert!(matches!(
            order_service::validate_cart(&request),
            Err(AppError::BadRequest(_))
        ));
    }

    let mut blank_payment = cart(&[(1, 1)], 1, "1");
    blank_payment.payment_method = "  ".into();
    assert!(order_service::validate_cart(&blank_payment).is_err());

    assert!(order_service::validate_cart(&cart(&[(1, 1)], 1, "0")).is_ok());
}
