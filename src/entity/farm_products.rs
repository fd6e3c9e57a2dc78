use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "farm_products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub farm_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: Decimal,
    pub weight_per_unit: Option<Decimal>,
    pub stock_kg: Decimal,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farms::Entity",
        from = "Column::FarmId",
        to = "super::farms::Column::Id"
    )]
    Farms,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
