use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{QuerySelect, Set};
use serde::Serialize;

/// A session stays part of the presence window for this many hours after
/// login; anything older is expired even if it was never closed.
pub const ACTIVE_WINDOW_HOURS: i64 = 24;

/// Represents a login session in the `sessions` table.
///
/// Sessions are advisory presence records, not auth sessions: closing one
/// revokes nothing, and a dropped real-time connection does not close it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Opens a new session for `user_id` with the current login time.
    pub async fn open(db: &DatabaseConnection, user_id: i64) -> Result<Model, DbErr> {
        let session = ActiveModel {
            user_id: Set(user_id),
            login_time: Set(Utc::now()),
            logout_time: Set(None),
            ..Default::default()
        };

        session.insert(db).await
    }

    /// Stamps `logout_time` on the given session if it belongs to `user_id`.
    ///
    /// Closing an already-closed session is a no-op that returns the row
    /// unchanged; an unknown id/user pair returns `None`.
    pub async fn close(
        db: &DatabaseConnection,
        session_id: i64,
        user_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        let Some(session) = Entity::find()
            .filter(Column::Id.eq(session_id))
            .filter(Column::UserId.eq(user_id))
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        if session.logout_time.is_some() {
            return Ok(Some(session));
        }

        let mut session: ActiveModel = session.into();
        session.logout_time = Set(Some(Utc::now()));
        Ok(Some(session.update(db).await?))
    }

    /// Distinct user ids with at least one open session inside the presence
    /// window. This is the stored truth the presence count is derived from;
    /// the in-memory connection registry never feeds it.
    pub async fn active_user_ids(db: &DatabaseConnection) -> Result<Vec<i64>, DbErr> {
        let cutoff = Utc::now() - Duration::hours(ACTIVE_WINDOW_HOURS);

        Entity::find()
            .select_only()
            .column(Column::UserId)
            .distinct()
            .filter(Column::LogoutTime.is_null())
            .filter(Column::LoginTime.gte(cutoff))
            .into_tuple::<i64>()
            .all(db)
            .await
    }

    /// Number of distinct users currently contributing to presence.
    pub async fn active_user_count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Ok(Self::active_user_ids(db).await?.len() as u64)
    }
}
