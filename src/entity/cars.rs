use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[sea_orm(column_name = "type")]
    pub car_type: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price_per_day: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub deposit: Decimal,
    pub status: String,
    pub body_type: Option<String>,
    pub drive_type: Option<String>,
    pub transmission: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    pub seats: Option<i32>,
    pub mileage: Option<i32>,
    pub color: Option<String>,
    pub features: Option<String>,
    pub image_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_urls: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rentals::Entity")]
    Rentals,
}

impl Related<super::rentals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rentals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
