use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use farm_distribution_api::{
    dto::shipments::{ShipmentUpdate, parse_point, parse_timestamp},
    error::AppError,
    status::ShipmentStatus,
    storage::ImageUpload,
};

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn blank_and_absent_fields_leave_values_unchanged() {
    let update = ShipmentUpdate::from_fields(
        fields(&[("alamat_penerima", "   "), ("hari_dikirim", "")]),
        None,
    )
    .unwrap();
    assert!(update.alamat_penerima.is_none());
    assert!(update.hari_dikirim.is_none());
    assert!(update.is_empty());
}

#[test]
fn present_fields_are_parsed() {
    let update = ShipmentUpdate::from_fields(
        fields(&[
            ("status_pengiriman", "dikirim"),
            ("id_pengirim", "12"),
            ("tanggal_diterima", "2024-05-03"),
            ("location_penerima", "107.61, -6.91"),
            ("alamat_pengirim", " Jl. Merdeka 1 "),
            ("unknown", "ignored"),
        ]),
        None,
    )
    .unwrap();

    assert_eq!(update.status_pengiriman, Some(ShipmentStatus::Dikirim));
    assert_eq!(update.id_pengirim, Some(12));
    assert_eq!(
        update.tanggal_diterima,
        Some(Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap())
    );
    let point = update.location_penerima.unwrap();
    assert_eq!((point.lon, point.lat), (107.61, -6.91));
    assert_eq!(update.alamat_pengirim.as_deref(), Some("Jl. Merdeka 1"));
    assert!(!update.is_empty());
}

#[test]
fn image_alone_is_an_update() {
    let image = ImageUpload::new("box.png", vec![1, 2]);
    let update = ShipmentUpdate::from_fields(HashMap::new(), Some(image)).unwrap();
    assert!(!update.is_empty());
}

#[test]
fn invalid_values_are_rejected() {
    for pairs in [
        [("status_pengiriman", "lost")],
        [("id_pengirim", "abc")],
        [("tanggal_dikirim", "03/05/2024")],
        [("location_pengirim", "107.6")],
    ] {
        let result = ShipmentUpdate::from_fields(fields(&pairs), None);
        assert!(matches!(result, Err(AppError::BadRequest(_))), "{pairs:?}");
    }
}

#[test]
fn timestamps_accept_rfc3339_with_offset() {
    let ts = parse_timestamp("tanggal_dikirim", "2024-05-03T10:00:00+07:00").unwrap();
    assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 3, 3, 0, 0).unwrap());
}

#[test]
fn points_must_be_in_range() {
    assert!(parse_point("location_pengirim", "181,0").is_err());
    assert!(parse_point("location_pengirim", "0,-91").is_err());
    let point = parse_point("location_pengirim", "-0.5,0.5").unwrap();
    assert_eq!((point.lon, point.lat), (-0.5, 0.5));
}
