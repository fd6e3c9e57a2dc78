use sea_orm::entity::prelude::*;

/// One product line of an invoice. `total_harga` is the price snapshot at order time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub total_harga: Decimal,
    pub status: String,
    pub pengiriman_id: i64,
    pub invoice_id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
    #[sea_orm(
        belongs_to = "super::farm_products::Entity",
        from = "Column::ProductId",
        to = "super::farm_products::Column::Id"
    )]
    FarmProducts,
    #[sea_orm(
        belongs_to = "super::pengiriman::Entity",
        from = "Column::PengirimanId",
        to = "super::pengiriman::Column::Id"
    )]
    Pengiriman,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::farm_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmProducts.def()
    }
}

impl Related<super::pengiriman::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pengiriman.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
