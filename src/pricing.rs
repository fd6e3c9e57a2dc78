//! Money arithmetic for orders and invoices.
//!
//! All amounts are `Decimal` and are rounded half away from zero to two
//! fractional digits whenever they are stored or displayed.

use chrono::{DateTime, Duration, Utc, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Days between the issue date and the due date of an invoice.
pub const PAYMENT_TERM_DAYS: i64 = 7;

const CURRENCY_PREFIX: &str = "Rp.";

/// Longest delivery distance accepted for an order.
pub const MAX_DISTANCE_KM: Decimal = Decimal::from_parts(20_000, 0, 0, false, 0);

/// Largest amount a `NUMERIC(14,2)` money column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount as `Rp.1,234,567.50`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{CURRENCY_PREFIX}{sign}{}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn bounded(amount: Option<Decimal>) -> AppResult<Decimal> {
    match amount.map(round_money) {
        Some(amount) if amount.abs() <= MAX_AMOUNT => Ok(amount),
        _ => Err(AppError::BadRequest("Amount is out of range".into())),
    }
}

/// `distance_km * fuel_consumption * fuel_price`.
pub fn shipping_cost(
    distance_km: Decimal,
    fuel_consumption: Decimal,
    fuel_price: Decimal,
) -> AppResult<Decimal> {
    bounded(
        distance_km
            .checked_mul(fuel_consumption)
            .and_then(|litres| litres.checked_mul(fuel_price)),
    )
}

pub fn line_total(price_per_kg: Decimal, quantity: i32) -> AppResult<Decimal> {
    bounded(price_per_kg.checked_mul(Decimal::from(quantity)))
}

pub fn invoice_total(subtotal: Decimal, shipping: Decimal) -> AppResult<Decimal> {
    bounded(subtotal.checked_add(shipping))
}

pub fn due_date(issued: DateTime<Utc>) -> DateTime<Utc> {
    issued + Duration::days(PAYMENT_TERM_DAYS)
}

/// `INV-{buyer}-{unix seconds}-{nonce}`. The nonce keeps two submissions in
/// the same second apart; the store enforces uniqueness on top of that.
pub fn invoice_number(buyer_id: i64, now: DateTime<Utc>, nonce: Uuid) -> String {
    let nonce = nonce.simple().to_string();
    format!("INV-{}-{}-{}", buyer_id, now.timestamp(), &nonce[..8])
}

/// Indonesian day name, as stored in `hari_dikirim` / `hari_diterima`.
pub fn hari(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}
