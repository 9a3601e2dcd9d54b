//! 用户实体
//!
//! 用户由外部账号系统维护，这里只读取审核列表展示所需的字段。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_summary(self) -> crate::models::users::entities::UserSummary {
        crate::models::users::entities::UserSummary {
            id: self.id,
            username: self.username,
            full_name: self.full_name,
        }
    }
}
