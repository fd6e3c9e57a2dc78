use chrono::{Datelike, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::{
    audit,
    dto::shipments::{CreateShipmentRequest, ShipmentList, ShipmentUpdate},
    entity::{
        invoice::{Column as InvoiceCol, Entity as Invoices},
        pengirim::{Column as CourierCol, Entity as Pengirim},
        proses_pengiriman::{
            self, ActiveModel as ShipmentActive, Column as ShipmentCol, Entity as Shipments,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::Principal,
    models::ShipmentProcess,
    pricing,
    response::{ApiResponse, Meta},
    services::identity::{
        account_for, courier_for, farm_of, find_farm_of, invoice_has_farm_product,
    },
    state::AppState,
    status::ShipmentStatus,
};

/// Who is editing a shipment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Editor {
    Courier(i64),
    FarmOwner(i64),
}

impl Editor {
    /// Re-check the edit right against the locked row.
    fn ensure_can_edit(self, shipment: &proses_pengiriman::Model) -> AppResult<()> {
        let allowed = match self {
            Editor::Courier(courier_id) => shipment.id_pengirim == Some(courier_id),
            Editor::FarmOwner(farm_id) => shipment.id_farm == farm_id,
        };
        if allowed {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn shipment_list(models: Vec<proses_pengiriman::Model>) -> ApiResponse<ShipmentList> {
    let items: Vec<ShipmentProcess> = models.into_iter().map(Into::into).collect();
    let total = items.len() as i64;
    ApiResponse::success(
        "Shipments retrieved successfully.",
        ShipmentList { items },
        Some(Meta::new(1, total, total)),
    )
}

async fn ensure_courier_of_farm<C: sea_orm::ConnectionTrait>(
    conn: &C,
    courier_id: i64,
    farm_id: i64,
) -> AppResult<()> {
    let courier = Pengirim::find_by_id(courier_id)
        .filter(CourierCol::FarmId.eq(farm_id))
        .one(conn)
        .await?;
    if courier.is_none() {
        return Err(AppError::BadRequest("Courier not found for this farm".into()));
    }
    Ok(())
}

pub async fn create_shipment(
    state: &AppState,
    principal: &Principal,
    payload: CreateShipmentRequest,
) -> AppResult<ApiResponse<ShipmentProcess>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;

    if !invoice_has_farm_product(&state.orm, payload.id_invoice, farm.id).await? {
        return Err(AppError::not_found("Invoice"));
    }
    let points = [payload.location_pengirim, payload.location_penerima];
    if points.iter().flatten().any(|point| !point.is_valid()) {
        return Err(AppError::BadRequest("Shipment location is out of range".into()));
    }
    if let Some(courier_id) = payload.id_pengirim {
        ensure_courier_of_farm(&state.orm, courier_id, farm.id).await?;
    }

    let tanggal_dikirim = payload.tanggal_dikirim;
    let shipment = ShipmentActive {
        id: NotSet,
        id_invoice: Set(payload.id_invoice),
        id_farm: Set(farm.id),
        id_pengirim: Set(payload.id_pengirim),
        hari_dikirim: Set(tanggal_dikirim.map(|t| pricing::hari(t.weekday()).to_string())),
        tanggal_dikirim: Set(tanggal_dikirim.map(Into::into)),
        hari_diterima: Set(None),
        tanggal_diterima: Set(None),
        status_pengiriman: Set(ShipmentStatus::Pending.to_string()),
        alamat_pengirim: Set(payload.alamat_pengirim),
        alamat_penerima: Set(payload.alamat_penerima),
        pengirim_lon: Set(payload.location_pengirim.map(|p| p.lon)),
        pengirim_lat: Set(payload.location_pengirim.map(|p| p.lat)),
        penerima_lon: Set(payload.location_penerima.map(|p| p.lon)),
        penerima_lat: Set(payload.location_penerima.map(|p| p.lat)),
        image_pengiriman: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &principal.subject,
        "shipment_create",
        "proses_pengiriman",
        serde_json::json!({ "shipment_id": shipment.id, "invoice_id": shipment.id_invoice }),
    )
    .await;

    Ok(ApiResponse::success(
        "Shipment created successfully.",
        shipment.into(),
        Some(Meta::empty()),
    ))
}

/// Shipments of the invoices the calling buyer placed.
pub async fn list_for_buyer(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<ShipmentList>> {
    let account = account_for(&state.orm, principal).await?;
    let models = Shipments::find()
        .inner_join(Invoices)
        .filter(InvoiceCol::UserId.eq(account.id))
        .order_by_desc(ShipmentCol::Id)
        .all(&state.orm)
        .await?;
    Ok(shipment_list(models))
}

pub async fn list_for_farm(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<ShipmentList>> {
    let account = account_for(&state.orm, principal).await?;
    let farm = farm_of(&state.orm, account.id).await?;
    let models = Shipments::find()
        .filter(ShipmentCol::IdFarm.eq(farm.id))
        .order_by_desc(ShipmentCol::Id)
        .all(&state.orm)
        .await?;
    Ok(shipment_list(models))
}

pub async fn list_for_courier(
    state: &AppState,
    principal: &Principal,
) -> AppResult<ApiResponse<ShipmentList>> {
    let courier = courier_for(&state.orm, principal).await?;
    let models = Shipments::find()
        .filter(ShipmentCol::IdPengirim.eq(courier.id))
        .order_by_desc(ShipmentCol::Id)
        .all(&state.orm)
        .await?;
    Ok(shipment_list(models))
}

/// Visible to the buyer of the invoice, the farm owner and the assigned courier.
pub async fn get_shipment(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> AppResult<ApiResponse<ShipmentProcess>> {
    let shipment = Shipments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Shipment"))?;

    let visible = if principal.is_courier() {
        let courier = courier_for(&state.orm, principal).await?;
        shipment.id_pengirim == Some(courier.id)
    } else {
        let account = account_for(&state.orm, principal).await?;
        let owns_farm = find_farm_of(&state.orm, account.id)
            .await?
            .is_some_and(|farm| farm.id == shipment.id_farm);
        let bought = Invoices::find_by_id(shipment.id_invoice)
            .filter(InvoiceCol::UserId.eq(account.id))
            .one(&state.orm)
            .await?
            .is_some();
        owns_farm || bought
    };
    if !visible {
        return Err(AppError::not_found("Shipment"));
    }

    Ok(ApiResponse::success("OK", shipment.into(), Some(Meta::empty())))
}

async fn editor_of(
    state: &AppState,
    principal: &Principal,
    shipment: &proses_pengiriman::Model,
) -> AppResult<Editor> {
    if principal.is_courier() {
        let courier = courier_for(&state.orm, principal).await?;
        if shipment.id_pengirim == Some(courier.id) {
            return Ok(Editor::Courier(courier.id));
        }
        return Err(AppError::Forbidden);
    }
    let account = account_for(&state.orm, principal).await?;
    match find_farm_of(&state.orm, account.id).await? {
        Some(farm) if farm.id == shipment.id_farm => Ok(Editor::FarmOwner(farm.id)),
        _ => Err(AppError::Forbidden),
    }
}

fn check_status_change(
    shipment: &proses_pengiriman::Model,
    next: Option<ShipmentStatus>,
) -> AppResult<()> {
    let current: ShipmentStatus = shipment.status_pengiriman.parse()?;
    match next {
        Some(next) if next != current => current.ensure_transition(next),
        _ => Ok(()),
    }
}

/// Apply a partial update. Fields left `None` keep their stored value.
pub async fn update_shipment(
    state: &AppState,
    principal: &Principal,
    id: i64,
    update: ShipmentUpdate,
) -> AppResult<ApiResponse<ShipmentProcess>> {
    let shipment = Shipments::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Shipment"))?;
    let editor = editor_of(state, principal, &shipment).await?;

    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }
    if let Some(courier_id) = update.id_pengirim {
        if let Editor::Courier(current) = editor {
            if current != courier_id {
                return Err(AppError::Forbidden);
            }
        }
        ensure_courier_of_farm(&state.orm, courier_id, shipment.id_farm).await?;
    }
    check_status_change(&shipment, update.status_pengiriman)?;

    // Upload outside the transaction. Object names are content hashes.
    let image_url = match update.image {
        Some(image) => {
            let path = image.hashed_name()?;
            let github = &state.config.github;
            Some(
                state
                    .storage
                    .upload(image.content, &github.org, &github.shipment_repo, &path)
                    .await?,
            )
        }
        None => None,
    };

    let txn = state.orm.begin().await?;
    let current = Shipments::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Shipment"))?;
    editor.ensure_can_edit(&current)?;
    check_status_change(&current, update.status_pengiriman)?;

    let mut active: ShipmentActive = current.into();
    if let Some(tanggal) = update.tanggal_dikirim {
        active.tanggal_dikirim = Set(Some(tanggal.into()));
        if update.hari_dikirim.is_none() {
            active.hari_dikirim = Set(Some(pricing::hari(tanggal.weekday()).to_string()));
        }
    }
    if let Some(hari) = update.hari_dikirim {
        active.hari_dikirim = Set(Some(hari));
    }
    if let Some(tanggal) = update.tanggal_diterima {
        active.tanggal_diterima = Set(Some(tanggal.into()));
        if update.hari_diterima.is_none() {
            active.hari_diterima = Set(Some(pricing::hari(tanggal.weekday()).to_string()));
        }
    }
    if let Some(hari) = update.hari_diterima {
        active.hari_diterima = Set(Some(hari));
    }
    if let Some(courier_id) = update.id_pengirim {
        active.id_pengirim = Set(Some(courier_id));
    }
    if let Some(status) = update.status_pengiriman {
        active.status_pengiriman = Set(status.to_string());
    }
    if let Some(alamat) = update.alamat_pengirim {
        active.alamat_pengirim = Set(Some(alamat));
    }
    if let Some(alamat) = update.alamat_penerima {
        active.alamat_penerima = Set(Some(alamat));
    }
    if let Some(point) = update.location_pengirim {
        active.pengirim_lon = Set(Some(point.lon));
        active.pengirim_lat = Set(Some(point.lat));
    }
    if let Some(point) = update.location_penerima {
        active.penerima_lon = Set(Some(point.lon));
        active.penerima_lat = Set(Some(point.lat));
    }
    if let Some(url) = image_url {
        active.image_pengiriman = Set(Some(url));
    }
    active.updated_at = Set(Utc::now().into());

    let shipment = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        shipment_id = shipment.id,
        status = %shipment.status_pengiriman,
        editor = ?editor,
        "shipment updated"
    );
    audit::record(
        &state.pool,
        &principal.subject,
        "shipment_update",
        "proses_pengiriman",
        serde_json::json!({ "shipment_id": shipment.id, "status": shipment.status_pengiriman }),
    )
    .await;

    Ok(ApiResponse::success(
        "Shipment updated successfully.",
        shipment.into(),
        Some(Meta::empty()),
    ))
}
