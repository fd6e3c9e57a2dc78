use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "proses_pengiriman")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub id_invoice: i64,
    pub id_farm: i64,
    pub id_pengirim: Option<i64>,
    pub hari_dikirim: Option<String>,
    pub tanggal_dikirim: Option<DateTimeWithTimeZone>,
    pub hari_diterima: Option<String>,
    pub tanggal_diterima: Option<DateTimeWithTimeZone>,
    pub status_pengiriman: String,
    pub alamat_pengirim: Option<String>,
    pub alamat_penerima: Option<String>,
    pub pengirim_lon: Option<f64>,
    pub pengirim_lat: Option<f64>,
    pub penerima_lon: Option<f64>,
    pub penerima_lat: Option<f64>,
    pub image_pengiriman: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::IdInvoice",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
    #[sea_orm(
        belongs_to = "super::pengirim::Entity",
        from = "Column::IdPengirim",
        to = "super::pengirim::Column::Id"
    )]
    Pengirim,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::pengirim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pengirim.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
