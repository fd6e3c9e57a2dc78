#![allow(dead_code)]

use std::sync::Arc;

use farm_distribution_api::{
    config::{AppConfig, GithubConfig},
    db::{create_pool, orm_from_pool, run_migrations},
    dto::auth::PrincipalKind,
    entity::{
        akun::ActiveModel as AkunActive, farm_products::ActiveModel as ProductActive,
        farms::ActiveModel as FarmActive, pengirim::ActiveModel as CourierActive,
        pengiriman::ActiveModel as TariffActive,
    },
    middleware::auth::Principal,
    state::AppState,
    storage::{MemoryStorage, ObjectStorage},
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub struct Fixture {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
}

/// Connects to the test database, or returns `None` so the caller can skip.
pub async fn setup() -> anyhow::Result<Option<Fixture>> {
    let storage = Arc::new(MemoryStorage::new());
    Ok(setup_with(storage.clone())
        .await?
        .map(|state| Fixture { state, storage }))
}

/// Like [`setup`], with a caller-provided object storage.
pub async fn setup_with(storage: Arc<dyn ObjectStorage>) -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    run_migrations(&orm_from_pool(&pool)).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "flow-test-secret".into(),
        token_ttl_hours: 1,
        github: GithubConfig {
            token: None,
            org: "test-org".into(),
            proof_repo: "proofs".into(),
            shipment_repo: "shipments".into(),
            profile_repo: "profiles".into(),
            author_name: "test".into(),
            author_email: "test@example.com".into(),
        },
    };
    Ok(Some(AppState::new(pool, config, storage)))
}

pub fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

fn unique_phone() -> String {
    let n = Uuid::new_v4().as_u128() % 1_000_000_000_000;
    format!("08{n:012}")
}

/// Insert an account and return a principal for it.
pub async fn account(state: &AppState, role: &str) -> anyhow::Result<(i64, Principal)> {
    let phone = unique_phone();
    let model = AkunActive {
        id: NotSet,
        nama: Set(format!("Test {role}")),
        no_telp: Set(phone.clone()),
        email: Set(format!("{}@example.com", Uuid::new_v4().simple())),
        role: Set(role.to_string()),
        password_hash: Set("not-a-real-hash".into()),
        alamat: Set(None),
        lon: Set(None),
        lat: Set(None),
        image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok((
        model.id,
        Principal {
            subject: phone,
            kind: PrincipalKind::Akun,
        },
    ))
}

pub async fn farm(state: &AppState, owner_id: i64) -> anyhow::Result<i64> {
    let model = FarmActive {
        id: NotSet,
        owner_id: Set(owner_id),
        name: Set("Test Farm".into()),
        farm_type: Set("Sapi".into()),
        alamat: Set(None),
        lon: Set(None),
        lat: Set(None),
        phone: Set(None),
        email: Set(None),
        image_url: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(model.id)
}

pub async fn product(
    state: &AppState,
    farm_id: i64,
    price_per_kg: &str,
    stock_kg: &str,
) -> anyhow::Result<i64> {
    let model = ProductActive {
        id: NotSet,
        farm_id: Set(farm_id),
        name: Set("Susu Segar".into()),
        description: Set(None),
        price_per_kg: Set(dec(price_per_kg)),
        weight_per_unit: Set(None),
        stock_kg: Set(dec(stock_kg)),
        image_url: Set(None),
        status: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(model.id)
}

pub async fn tariff(state: &AppState, fuel_consumption: &str, fuel_price: &str) -> anyhow::Result<i64> {
    let model = TariffActive {
        id: NotSet,
        name: Set("Pickup".into()),
        fuel_consumption: Set(dec(fuel_consumption)),
        fuel_price: Set(dec(fuel_price)),
    }
    .insert(&state.orm)
    .await?;
    Ok(model.id)
}

pub async fn courier(state: &AppState, farm_id: i64) -> anyhow::Result<(i64, Principal)> {
    let phone = unique_phone();
    let model = CourierActive {
        id: NotSet,
        farm_id: Set(farm_id),
        nama: Set("Kurir".into()),
        email: Set(format!("{}@courier.example.com", Uuid::new_v4().simple())),
        no_telp: Set(phone.clone()),
        alamat: Set(None),
        vehicle_plate: Set(None),
        vehicle_type: Set(None),
        vehicle_color: Set(None),
        password_hash: Set("not-a-real-hash".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok((
        model.id,
        Principal {
            subject: phone,
            kind: PrincipalKind::Pengirim,
        },
    ))
}
