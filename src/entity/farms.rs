use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "farms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub owner_id: i64,
    pub name: String,
    pub farm_type: String,
    pub alamat: Option<String>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::akun::Entity",
        from = "Column::OwnerId",
        to = "super::akun::Column::Id"
    )]
    Akun,
    #[sea_orm(has_many = "super::farm_products::Entity")]
    FarmProducts,
    #[sea_orm(has_many = "super::pengirim::Entity")]
    Pengirim,
}

impl Related<super::akun::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Akun.def()
    }
}

impl Related<super::farm_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FarmProducts.def()
    }
}

impl Related<super::pengirim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pengirim.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
