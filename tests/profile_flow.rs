mod common;

use axum::http::StatusCode;
use common::{account, courier, farm, product, setup, tariff};
use farm_distribution_api::{
    dto::{
        farms::{CreateFarmRequest, UpdateFarmRequest},
        orders::{CartItem, CreateOrderRequest},
        products::CreateProductRequest,
        profile::UpdateProfileRequest,
    },
    entity::{
        akun::Entity as Akun, farm_products::Entity as FarmProducts, farms::Entity as Farms,
        pengirim::Entity as Couriers,
    },
    error::AppError,
    models::GeoPoint,
    services::{farm_service, order_service, product_service, profile_service},
    storage::ImageUpload,
};
use sea_orm::EntityTrait;

fn one_kg_order(product_id: i64, tariff_id: i64) -> CreateOrderRequest {
    CreateOrderRequest {
        products: vec![CartItem {
            product_id,
            quantity: 1,
        }],
        pengiriman_id: tariff_id,
        payment_method: "transfer".into(),
        distance_km: common::dec("1"),
        shipment: None,
    }
}

#[tokio::test]
async fn profile_update_keeps_blank_fields_and_normalizes_email() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (id, me) = account(state, "pembeli").await?;

    let before = profile_service::get_profile(state, &me).await?;
    assert!(before.meta.is_some());
    let before = before.data.expect("profile");
    assert_eq!(before.id, id);

    let email = format!("New.{}@Example.com", uuid::Uuid::new_v4().simple());
    let updated = profile_service::update_profile(
        state,
        &me,
        UpdateProfileRequest {
            nama: Some("   ".into()),
            email: Some(email.clone()),
            alamat: Some("Jl. Kebun 1".into()),
            location: Some(GeoPoint { lon: 110.4, lat: -7.8 }),
        },
    )
    .await?
    .data
    .expect("profile");

    assert_eq!(updated.nama, before.nama);
    assert_eq!(updated.email, email.to_lowercase());
    assert_eq!(updated.alamat.as_deref(), Some("Jl. Kebun 1"));
    assert_eq!(updated.location, Some(GeoPoint { lon: 110.4, lat: -7.8 }));

    let nothing = profile_service::update_profile(state, &me, UpdateProfileRequest::default()).await;
    assert!(matches!(nothing, Err(AppError::BadRequest(_))));

    let off_map = profile_service::update_profile(
        state,
        &me,
        UpdateProfileRequest {
            location: Some(GeoPoint { lon: 200.0, lat: 0.0 }),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(off_map, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn profile_email_taken_by_another_account_conflicts() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (other_id, _) = account(state, "pembeli").await?;
    let (_, me) = account(state, "pembeli").await?;
    let taken = Akun::find_by_id(other_id)
        .one(&state.orm)
        .await?
        .expect("account exists")
        .email;

    let err = profile_service::update_profile(
        state,
        &me,
        UpdateProfileRequest {
            email: Some(taken),
            ..Default::default()
        },
    )
    .await
    .expect_err("duplicate email");
    assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn profile_image_goes_through_object_storage() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (_, me) = account(state, "pembeli").await?;

    let missing = profile_service::remove_profile_image(state, &me).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let rejected = profile_service::upload_profile_image(
        state,
        &me,
        ImageUpload::new("avatar.gif", b"GIF89a".to_vec()),
    )
    .await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));
    assert!(fx.storage.is_empty());

    let image = ImageUpload::new("Avatar.PNG", b"\x89PNG profile".to_vec());
    let expected = format!("memory://test-org/profiles/{}", image.hashed_name()?);
    let stored = profile_service::upload_profile_image(state, &me, image)
        .await?
        .data
        .expect("profile");
    assert_eq!(stored.image_url.as_deref(), Some(expected.as_str()));
    assert_eq!(fx.storage.len(), 1);

    let cleared = profile_service::remove_profile_image(state, &me)
        .await?
        .data
        .expect("profile");
    assert_eq!(cleared.image_url, None);
    Ok(())
}

#[tokio::test]
async fn deleting_an_account_takes_its_farm_but_not_its_orders() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;

    let (farmer_id, farmer) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "5000", "10").await?;
    let (courier_id, _) = courier(state, farm_id).await?;

    let deleted = profile_service::delete_profile(state, &farmer)
        .await?
        .data
        .expect("deleted");
    assert_eq!(deleted.id, farmer_id);
    assert!(Akun::find_by_id(farmer_id).one(&state.orm).await?.is_none());
    assert!(Farms::find_by_id(farm_id).one(&state.orm).await?.is_none());
    assert!(FarmProducts::find_by_id(product_id).one(&state.orm).await?.is_none());
    assert!(Couriers::find_by_id(courier_id).one(&state.orm).await?.is_none());

    let gone = profile_service::get_profile(state, &farmer).await;
    assert!(gone.is_err());

    let (seller_id, _) = account(state, "peternak").await?;
    let farm_id = farm(state, seller_id).await?;
    let product_id = product(state, farm_id, "5000", "10").await?;
    let tariff_id = tariff(state, "0.1", "10000").await?;
    let (buyer_id, buyer) = account(state, "pembeli").await?;
    order_service::create_order(state, &buyer, one_kg_order(product_id, tariff_id)).await?;

    let err = profile_service::delete_profile(state, &buyer)
        .await
        .expect_err("buyer has an invoice");
    assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    assert!(Akun::find_by_id(buyer_id).one(&state.orm).await?.is_some());
    Ok(())
}

// A buyer's token still says "pembeli" after registering a farm; farm actions
// read the stored account instead.
#[tokio::test]
async fn new_farm_owner_manages_products_with_the_same_token() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (_, me) = account(state, "pembeli").await?;

    let farm = farm_service::create_farm(
        state,
        &me,
        CreateFarmRequest {
            name: "Kebun Baru".into(),
            farm_type: "Sapi".into(),
            alamat: None,
            location: None,
            phone: None,
            email: None,
            image_url: None,
        },
    )
    .await?
    .data
    .expect("farm");

    let created = product_service::create_product(
        state,
        &me,
        CreateProductRequest {
            name: "Keju".into(),
            description: None,
            price_per_kg: common::dec("90000"),
            weight_per_unit: None,
            stock_kg: common::dec("4"),
            image_url: None,
            status: None,
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(created.farm_id, farm.id);

    let profile = profile_service::get_profile(state, &me).await?.data.expect("profile");
    assert_eq!(profile.role, "peternak");
    Ok(())
}

#[tokio::test]
async fn farm_update_and_close_restore_buyer_role() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (_, me) = account(state, "pembeli").await?;

    let missing = farm_service::update_farm(
        state,
        &me,
        UpdateFarmRequest {
            name: Some("Nope".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    farm_service::create_farm(
        state,
        &me,
        CreateFarmRequest {
            name: "Kebun Lama".into(),
            farm_type: "Kambing".into(),
            alamat: None,
            location: None,
            phone: None,
            email: None,
            image_url: None,
        },
    )
    .await?;

    let updated = farm_service::update_farm(
        state,
        &me,
        UpdateFarmRequest {
            name: Some("Kebun Raya".into()),
            farm_type: Some(" ".into()),
            phone: Some("0274123456".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("farm");
    assert_eq!(updated.name, "Kebun Raya");
    assert_eq!(updated.farm_type, "Kambing");
    assert_eq!(updated.phone.as_deref(), Some("0274123456"));

    let nothing = farm_service::update_farm(state, &me, UpdateFarmRequest::default()).await;
    assert!(matches!(nothing, Err(AppError::BadRequest(_))));

    let closed = farm_service::delete_farm(state, &me).await?.data.expect("farm");
    assert_eq!(closed.id, updated.id);
    assert!(Farms::find_by_id(closed.id).one(&state.orm).await?.is_none());

    let profile = profile_service::get_profile(state, &me).await?.data.expect("profile");
    assert_eq!(profile.role, "pembeli");

    let again = farm_service::delete_farm(state, &me).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn farm_with_ordered_products_cannot_close() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (farmer_id, farmer) = account(state, "peternak").await?;
    let farm_id = farm(state, farmer_id).await?;
    let product_id = product(state, farm_id, "5000", "10").await?;
    let tariff_id = tariff(state, "0.1", "10000").await?;
    let (_, buyer) = account(state, "pembeli").await?;
    order_service::create_order(state, &buyer, one_kg_order(product_id, tariff_id)).await?;

    let err = farm_service::delete_farm(state, &farmer)
        .await
        .expect_err("products were ordered");
    assert_eq!(err.status_and_code().0, StatusCode::CONFLICT);
    assert!(Farms::find_by_id(farm_id).one(&state.orm).await?.is_some());

    let profile = profile_service::get_profile(state, &farmer).await?.data.expect("profile");
    assert_eq!(profile.role, "peternak");
    Ok(())
}

#[tokio::test]
async fn products_are_listed_per_farm() -> anyhow::Result<()> {
    let Some(fx) = setup().await? else {
        return Ok(());
    };
    let state = &fx.state;
    let (a_id, _) = account(state, "peternak").await?;
    let (b_id, _) = account(state, "peternak").await?;
    let farm_a = farm(state, a_id).await?;
    let farm_b = farm(state, b_id).await?;
    let first = product(state, farm_a, "1000", "1").await?;
    let second = product(state, farm_a, "2000", "2").await?;
    product(state, farm_b, "3000", "3").await?;

    let listed = product_service::list_farm_products(state, farm_a).await?;
    let ids: Vec<i64> = listed.data.expect("products").items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(listed.meta.is_some());

    let (c_id, _) = account(state, "peternak").await?;
    let empty_farm = farm(state, c_id).await?;
    let empty = product_service::list_farm_products(state, empty_farm)
        .await?
        .data
        .expect("products");
    assert!(empty.items.is_empty());

    let unknown = product_service::list_farm_products(state, i64::MAX).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
    Ok(())
}
