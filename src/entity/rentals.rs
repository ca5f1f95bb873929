use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rentals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub actual_end_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub deposit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub penalty_amount: Decimal,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::cars::Entity",
        from = "Column::CarId",
        to = "super::cars::Column::Id"
    )]
    Cars,
    #[sea_orm(has_many = "super::penalties::Entity")]
    Penalties,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::cars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cars.def()
    }
}

impl Related<super::penalties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Penalties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
