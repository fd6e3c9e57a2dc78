use chrono::{Datelike, TimeZone, Utc, Weekday};
use farm_distribution_api::{
    error::AppError,
    pricing::{
        MAX_AMOUNT, PAYMENT_TERM_DAYS, due_date, format_currency, hari, invoice_number,
        invoice_total, line_total, round_money, shipping_cost,
    },
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

#[test]
fn format_currency_groups_thousands_with_two_decimals() {
    assert_eq!(format_currency(dec("1234567.5")), "Rp.1,234,567.50");
    assert_eq!(format_currency(Decimal::ZERO), "Rp.0.00");
    assert_eq!(format_currency(dec("999")), "Rp.999.00");
    assert_eq!(format_currency(dec("1000")), "Rp.1,000.00");
    assert_eq!(format_currency(dec("100000")), "Rp.100,000.00");
}

#[test]
fn format_currency_rounds_half_away_from_zero() {
    assert_eq!(format_currency(dec("0.005")), "Rp.0.01");
    assert_eq!(format_currency(dec("2.345")), "Rp.2.35");
    assert_eq!(format_currency(dec("2.344")), "Rp.2.34");
}

#[test]
fn format_currency_keeps_sign_after_prefix() {
    assert_eq!(format_currency(dec("-1500")), "Rp.-1,500.00");
    assert_eq!(format_currency(dec("-0.001")), "Rp.0.00");
}

#[test]
fn order_scenario_amounts() -> anyhow::Result<()> {
    // tariff 0.1 l/km at 15000 per litre over 20 km, 3 kg at 10000
    let shipping = shipping_cost(dec("20"), dec("0.1"), dec("15000"))?;
    let subtotal = line_total(dec("10000"), 3)?;
    assert_eq!(shipping, dec("30000"));
    assert_eq!(subtotal, dec("30000"));
    let total = invoice_total(subtotal, shipping)?;
    assert_eq!(total, dec("60000"));
    assert_eq!(format_currency(total), "Rp.60,000.00");
    Ok(())
}

#[test]
fn shipping_cost_is_rounded_to_cents() -> anyhow::Result<()> {
    assert_eq!(shipping_cost(dec("3.333"), dec("0.07"), dec("12500"))?, dec("2916.38"));
    assert_eq!(round_money(dec("10.125")), dec("10.13"));
    Ok(())
}

#[test]
fn zero_distance_costs_nothing() -> anyhow::Result<()> {
    assert_eq!(shipping_cost(Decimal::ZERO, dec("0.1"), dec("15000"))?, Decimal::ZERO);
    Ok(())
}

#[test]
fn overflowing_amounts_are_rejected_instead_of_panicking() {
    assert!(matches!(
        shipping_cost(dec("10000000000000000000000000000"), dec("0.1"), dec("15000")),
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(line_total(Decimal::MAX, 2), Err(AppError::BadRequest(_))));
    assert!(matches!(
        invoice_total(Decimal::MAX, Decimal::MAX),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn amounts_are_capped_at_the_money_column_width() -> anyhow::Result<()> {
    assert_eq!(MAX_AMOUNT, dec("999999999999.99"));
    assert_eq!(invoice_total(MAX_AMOUNT, Decimal::ZERO)?, MAX_AMOUNT);
    assert!(invoice_total(MAX_AMOUNT, dec("0.01")).is_err());
    assert!(line_total(dec("500000000000"), 2).is_err());
    Ok(())
}

#[test]
fn invoice_number_contains_buyer_time_and_nonce() {
    let now = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
    let nonce = Uuid::parse_str("0123456789abcdef0123456789abcdef").unwrap();
    assert_eq!(
        invoice_number(7, now, nonce),
        format!("INV-7-{}-01234567", now.timestamp())
    );
}

#[test]
fn invoice_numbers_differ_within_the_same_second() {
    let now = Utc::now();
    let a = invoice_number(1, now, Uuid::new_v4());
    let b = invoice_number(1, now, Uuid::new_v4());
    assert_ne!(a, b);
}

#[test]
fn due_date_is_one_payment_term_after_issue() {
    let issued = Utc.with_ymd_and_hms(2024, 2, 26, 8, 0, 0).unwrap();
    let due = due_date(issued);
    assert_eq!((due - issued).num_days(), PAYMENT_TERM_DAYS);
    assert_eq!((due.month(), due.day()), (3, 4));
}

#[test]
fn indonesian_day_names() {
    let monday = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(monday.weekday(), Weekday::Mon);
    assert_eq!(hari(monday.weekday()), "Senin");
    assert_eq!(hari(Weekday::Fri), "Jumat");
    assert_eq!(hari(Weekday::Sun), "Minggu");
}
