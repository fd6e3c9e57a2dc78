//! Resolve a token subject to the rows it owns.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::{
    entity::{
        akun::{self, Column as AkunCol, Entity as Akun},
        farm_products::Column as ProdCol,
        farms::{self, Column as FarmCol, Entity as Farms},
        invoice,
        orders::{Column as OrderCol, Entity as Orders},
        pengirim::{self, Column as CourierCol, Entity as Pengirim},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, ensure_account, ensure_courier},
};

pub async fn account_for<C: ConnectionTrait>(conn: &C, principal: &Principal) -> AppResult<akun::Model> {
    ensure_account(principal)?;
    Akun::find()
        .filter(AkunCol::NoTelp.eq(principal.subject.as_str()))
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("No account found for the given phone number.".into())
        })
}

pub async fn courier_for<C: ConnectionTrait>(conn: &C, principal: &Principal) -> AppResult<pengirim::Model> {
    ensure_courier(principal)?;
    Pengirim::find()
        .filter(CourierCol::NoTelp.eq(principal.subject.as_str()))
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("No courier found for the given phone number.".into())
        })
}

pub async fn find_farm_of<C: ConnectionTrait>(conn: &C, owner_id: i64) -> AppResult<Option<farms::Model>> {
    Ok(Farms::find()
        .filter(FarmCol::OwnerId.eq(owner_id))
        .one(conn)
        .await?)
}

pub async fn farm_of<C: ConnectionTrait>(conn: &C, owner_id: i64) -> AppResult<farms::Model> {
    find_farm_of(conn, owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No farm found for the given owner ID.".into()))
}

/// Whether any line of the invoice is for a product of `farm_id`.
pub async fn invoice_has_farm_product<C: ConnectionTrait>(
    conn: &C,
    invoice_id: i64,
    farm_id: i64,
) -> AppResult<bool> {
    let count = Orders::find()
        .inner_join(crate::entity::FarmProducts)
        .filter(OrderCol::InvoiceId.eq(invoice_id))
        .filter(ProdCol::FarmId.eq(farm_id))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Buyers see their own invoices; farm owners see invoices carrying their products.
pub async fn can_view_invoice<C: ConnectionTrait>(
    conn: &C,
    account: &akun::Model,
    invoice: &invoice::Model,
) -> AppResult<bool> {
    if invoice.user_id == account.id {
        return Ok(true);
    }
    match find_farm_of(conn, account.id).await? {
        Some(farm) => invoice_has_farm_product(conn, invoice.id, farm.id).await,
        None => Ok(false),
    }
}
