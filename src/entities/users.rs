use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    pub email: String,

    pub first_name: String,

    pub last_name: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// One of `unassigned`, `student`, `instructor`.
    /// Moves out of `unassigned` exactly once.
    pub role: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::students::Entity")]
    Student,
    #[sea_orm(has_one = "super::instructors::Entity")]
    Instructor,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::instructors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
