use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    /// JSON-encoded `Profile`
    #[sea_orm(column_type = "Text")]
    pub profile: String,
    /// JSON-encoded `Preferences`
    #[sea_orm(column_type = "Text")]
    pub preferences: String,
    pub average_wpm: f64,
    pub highest_wpm: f64,
    pub total_tests: i32,
    pub average_accuracy: f64,
    pub high_score: i32,
    pub games_played: i32,
    /// Bumped on every write; guards read-modify-write cycles.
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::test_records::Entity")]
    TestRecords,
    #[sea_orm(has_many = "super::achievements::Entity")]
    Achievements,
}

impl Related<super::test_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRecords.def()
    }
}

impl Related<super::achievements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achievements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
