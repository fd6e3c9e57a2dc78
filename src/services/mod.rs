pub mod auth_service;
pub mod courier_service;
pub mod farm_service;
pub mod identity;
pub mod order_service;
pub mod product_service;
pub mod profile_service;
pub mod shipment_service;

/// Partial updates treat a blank string like an absent field.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
