use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoice")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub payment_status: String,
    pub payment_method: String,
    pub issued_date: DateTimeWithTimeZone,
    pub due_date: DateTimeWithTimeZone,
    pub total_amount: Decimal,
    pub total_harga_product: Decimal,
    pub shipping_cost: Decimal,
    pub proof_of_transfer: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::akun::Entity",
        from = "Column::UserId",
        to = "super::akun::Column::Id"
    )]
    Akun,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::proses_pengiriman::Entity")]
    ProsesPengiriman,
}

impl Related<super::akun::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Akun.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::proses_pengiriman::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProsesPengiriman.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
