use farm_distribution_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::{ROLE_BUYER, ROLE_FARMER, hash_password},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(&pool)).await?;

    let buyer_id = ensure_account(&pool, "Pembeli Demo", "081200000001", "buyer@example.com", "buyer123", ROLE_BUYER).await?;
    let farmer_id = ensure_account(&pool, "Peternak Demo", "081200000002", "farmer@example.com", "farmer123", ROLE_FARMER).await?;
    let farm_id = ensure_farm(&pool, farmer_id).await?;
    seed_products(&pool, farm_id).await?;
    seed_tariffs(&pool).await?;
    ensure_courier(&pool, farm_id).await?;

    println!("Seed completed. Buyer ID: {buyer_id}, Farmer ID: {farmer_id}, Farm ID: {farm_id}");
    Ok(())
}

async fn ensure_account(
    pool: &sqlx::PgPool,
    nama: &str,
    no_telp: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i64> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO akun (nama, no_telp, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(nama)
    .bind(no_telp)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured account {email} (role={role})");
    Ok(id)
}

async fn ensure_farm(pool: &sqlx::PgPool, owner_id: i64) -> anyhow::Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO farms (owner_id, name, farm_type, alamat)
        VALUES ($1, 'Peternakan Sejahtera', 'Sapi Perah', 'Bandung')
        ON CONFLICT (owner_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_products(pool: &sqlx::PgPool, farm_id: i64) -> anyhow::Result<()> {
    let products = vec![
        ("Susu Sapi Segar", "Susu sapi murni per kg", Decimal::new(10000, 0), Decimal::new(100, 0)),
        ("Daging Sapi", "Daging sapi has dalam", Decimal::new(130000, 0), Decimal::new(40, 0)),
        ("Telur Ayam", "Telur ayam kampung", Decimal::new(28000, 0), Decimal::new(60, 0)),
        ("Keju Lokal", "Keju dari susu sapi lokal", Decimal::new(85000, 0), Decimal::new(15, 0)),
    ];

    for (name, desc, price, stock) in products {
        sqlx::query(
            r#"
            INSERT INTO farm_products (farm_id, name, description, price_per_kg, stock_kg, status)
            SELECT $1, $2, $3, $4, $5, 'available'
            WHERE NOT EXISTS (SELECT 1 FROM farm_products WHERE farm_id = $1 AND name = $2)
            "#,
        )
        .bind(farm_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .bind(stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_tariffs(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let tariffs = vec![
        (1_i64, "Motor", Decimal::new(5, 2), Decimal::new(10000, 0)),
        (2_i64, "Pickup", Decimal::new(1, 1), Decimal::new(15000, 0)),
        (3_i64, "Truk", Decimal::new(25, 2), Decimal::new(6800, 0)),
    ];

    for (id, name, fuel_consumption, fuel_price) in tariffs {
        sqlx::query(
            r#"
            INSERT INTO pengiriman (id, name, fuel_consumption, fuel_price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(fuel_consumption)
        .bind(fuel_price)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('pengiriman', 'id'), (SELECT MAX(id) FROM pengiriman))",
    )
    .execute(pool)
    .await?;

    println!("Seeded tariffs");
    Ok(())
}

async fn ensure_courier(pool: &sqlx::PgPool, farm_id: i64) -> anyhow::Result<()> {
    let password_hash = hash_password("courier123").map_err(|e| anyhow::anyhow!(e.to_string()))?;
    sqlx::query(
        r#"
        INSERT INTO pengirim (farm_id, nama, email, no_telp, password_hash, vehicle_type, vehicle_plate)
        VALUES ($1, 'Kurir Demo', 'courier@example.com', '081200000003', $2, 'Pickup', 'D 1234 XY')
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(farm_id)
    .bind(password_hash)
    .execute(pool)
    .await?;

    println!("Ensured courier courier@example.com");
    Ok(())
}
