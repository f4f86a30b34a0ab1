use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{FromQueryResult, PaginatorTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::{DailyCount, MAX_STAT_DAYS};

/// Represents a user in the `users` table.
///
/// The directory is the source of truth for identity and authorization:
/// every session and activity row points back here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique email address, stored lowercase.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Authorization role.
    pub role: Role,
    /// Account status; independent of session openness.
    pub status: Status,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// Authorization role of a user account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "user")]
    User,
}

/// Account status. Toggling this does not open or close sessions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::activity_log::Entity")]
    Activities,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One bucket of the role distribution query.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct RoleCount {
    pub role: Role,
    pub count: i64,
}

impl Model {
    /// Inserts a new active user with an Argon2-hashed password.
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Model, DbErr> {
        let password_hash = hash_password(password)
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))?;

        let user = ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_lowercase()),
            password_hash: Set(password_hash),
            role: Set(role),
            status: Set(Status::Active),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        user.insert(db).await
    }

    /// Checks a candidate password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.to_lowercase()))
            .one(db)
            .await
    }

    /// Updates the account status of `user_id`, returning the updated row or
    /// `None` if no such user exists.
    ///
    /// Sessions are untouched: an inactive user with an open session still
    /// counts towards presence until that session closes.
    pub async fn set_status(
        db: &DatabaseConnection,
        user_id: i64,
        status: Status,
    ) -> Result<Option<Model>, DbErr> {
        let Some(user) = Entity::find_by_id(user_id).one(db).await? else {
            return Ok(None);
        };

        let mut user: ActiveModel = user.into();
        user.status = Set(status);
        Ok(Some(user.update(db).await?))
    }

    pub async fn total_count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Entity::find().count(db).await
    }

    /// Number of accounts whose status is `active` (a directory property,
    /// distinct from live presence).
    pub async fn active_status_count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(Status::Active))
            .count(db)
            .await
    }

    /// Per-day signup counts for the last `days` days, oldest first.
    pub async fn growth(db: &DatabaseConnection, days: i64) -> Result<Vec<DailyCount>, DbErr> {
        let days = days.clamp(1, MAX_STAT_DAYS);
        let cutoff = Utc::now() - Duration::days(days);

        Entity::find()
            .select_only()
            .column_as(Expr::cust("DATE(created_at)"), "date")
            .column_as(Column::Id.count(), "count")
            .filter(Column::CreatedAt.gte(cutoff))
            .group_by(Expr::cust("DATE(created_at)"))
            .order_by_asc(Expr::cust("DATE(created_at)"))
            .into_model::<DailyCount>()
            .all(db)
            .await
    }

    /// Role histogram over the whole directory.
    pub async fn role_distribution(db: &DatabaseConnection) -> Result<Vec<RoleCount>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Role)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Role)
            .into_model::<RoleCount>()
            .all(db)
            .await
    }

    /// Creates the bootstrap admin account if the directory has none yet.
    pub async fn ensure_admin(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<(), DbErr> {
        let existing = Entity::find()
            .filter(Column::Role.eq(Role::Admin))
            .one(db)
            .await?;

        if existing.is_none() {
            Self::create(db, "Admin User", email, password, Role::Admin).await?;
            tracing::info!(email, "Created bootstrap admin user");
        }

        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
