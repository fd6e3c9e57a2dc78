use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pengirim")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub farm_id: i64,
    pub nama: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub no_telp: String,
    pub alamat: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_color: Option<String>,
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farms::Entity",
        from = "Column::FarmId",
        to = "super::farms::Column::Id"
    )]
    Farms,
    #[sea_orm(has_many = "super::proses_pengiriman::Entity")]
    ProsesPengiriman,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl Related<super::proses_pengiriman::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProsesPengiriman.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
