//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Account, RoleState};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub login: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub nick: Option<String>,
    pub phone: Option<String>,
    /// Role approved by a granter
    pub role: Option<String>,
    /// Role the account asked for itself
    pub requested_role: Option<String>,
    pub granter_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            login: model.login,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            nick: model.nick,
            phone: model.phone,
            role: RoleState {
                requested: model.requested_role,
                approved: model.role,
            },
            granter_id: model.granter_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
