use chrono::{TimeZone, Utc};
use farm_distribution_api::{
    dto::orders::{FarmOrderRow, UserOrderRow},
    services::order_service::{group_farm_orders, group_user_orders},
};
use rust_decimal::Decimal;

fn user_row(invoice_id: i64, order_id: i64, total_harga: i64) -> UserOrderRow {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    UserOrderRow {
        order_id,
        invoice_id,
        product_id: 1,
        product_name: "Susu".into(),
        price_per_kg: Decimal::new(10000, 0),
        quantity: 1,
        total_harga: Decimal::new(total_harga, 0),
        status: "Pending".into(),
        created_at: at,
        updated_at: at,
        invoice_number: format!("INV-{invoice_id}"),
        total_amount: Decimal::new(1234567, 1),
        payment_status: "Pending".into(),
        payment_method: "transfer".into(),
        issued_date: at,
        due_date: at,
        proof_of_transfer: None,
    }
}

#[test]
fn user_rows_are_grouped_per_invoice_in_order() {
    let groups = group_user_orders(vec![
        user_row(9, 20, 1000),
        user_row(9, 21, 2000),
        user_row(4, 7, 3000),
    ]);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].invoice_id, 9);
    assert_eq!(
        groups[0].products.iter().map(|p| p.order_id).collect::<Vec<_>>(),
        vec![20, 21]
    );
    assert_eq!(groups[0].products[1].total_harga, "Rp.2,000.00");
    assert_eq!(groups[0].total_amount, "Rp.123,456.70");
    assert_eq!(groups[1].invoice_id, 4);
    assert_eq!(groups[1].products.len(), 1);
}

#[test]
fn no_rows_no_groups() {
    assert!(group_user_orders(Vec::new()).is_empty());
    assert!(group_farm_orders(Vec::new()).is_empty());
}

#[test]
fn farm_rows_carry_buyer_contact() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let row = |order_id| FarmOrderRow {
        order_id,
        invoice_id: 3,
        product_id: 2,
        product_name: "Telur".into(),
        quantity: 2,
        total_harga: Decimal::new(56000, 0),
        status: "Sending".into(),
        created_at: at,
        updated_at: at,
        invoice_number: "INV-3".into(),
        total_amount: Decimal::new(112000, 0),
        proof_of_transfer: Some("memory://org/proofs/a.png".into()),
        nama_pembeli: "Budi".into(),
        no_telp: "0812".into(),
        email: "budi@example.com".into(),
    };

    let groups = group_farm_orders(vec![row(1), row(2)]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].nama_pembeli, "Budi");
    assert_eq!(groups[0].total_amount, "Rp.112,000.00");
    assert_eq!(groups[0].products.len(), 2);
}
