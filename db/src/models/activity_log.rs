use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::models::user::Role;
use crate::models::{DailyCount, MAX_STAT_DAYS};

/// Represents one row of the append-only `activity_logs` table.
///
/// Rows are never updated or deleted, except by cascade when their user is
/// removed from the directory.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
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

/// An activity row joined with its actor's directory fields, as served over
/// the HTTP API and relayed on the real-time channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_role: Role,
}

impl ActivityRecord {
    /// Denormalizes the actor's fields onto the activity row.
    pub fn from_parts(log: Model, actor: &super::user::Model) -> Self {
        Self {
            id: log.id,
            action: log.action,
            timestamp: log.timestamp,
            user_id: log.user_id,
            user_name: actor.name.clone(),
            user_email: actor.email.clone(),
            user_role: actor.role,
        }
    }
}

impl Model {
    /// Appends an activity row for `user_id`.
    pub async fn record(
        db: &DatabaseConnection,
        user_id: i64,
        action: &str,
    ) -> Result<Model, DbErr> {
        let log = ActiveModel {
            user_id: Set(user_id),
            action: Set(action.to_string()),
            timestamp: Set(Utc::now()),
            ..Default::default()
        };

        log.insert(db).await
    }

    /// The `limit` most recent activities, newest first, joined with actor
    /// name/email/role.
    pub async fn recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<ActivityRecord>, DbErr> {
        let rows = Entity::find()
            .find_also_related(super::user::Entity)
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await?;

        Ok(join_actors(rows))
    }

    /// Same as [`recent`], restricted to one actor.
    ///
    /// [`recent`]: Model::recent
    pub async fn by_user(
        db: &DatabaseConnection,
        user_id: i64,
        limit: u64,
    ) -> Result<Vec<ActivityRecord>, DbErr> {
        let rows = Entity::find()
            .find_also_related(super::user::Entity)
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await?;

        Ok(join_actors(rows))
    }

    /// Per-day activity counts for the last `days` days, oldest first.
    pub async fn daily_counts(
        db: &DatabaseConnection,
        days: i64,
    ) -> Result<Vec<DailyCount>, DbErr> {
        let days = days.clamp(1, MAX_STAT_DAYS);
        let cutoff = Utc::now() - Duration::days(days);

        Entity::find()
            .select_only()
            .column_as(Expr::cust("DATE(timestamp)"), "date")
            .column_as(Column::Id.count(), "count")
            .filter(Column::Timestamp.gte(cutoff))
            .group_by(Expr::cust("DATE(timestamp)"))
            .order_by_asc(Expr::cust("DATE(timestamp)"))
            .into_model::<DailyCount>()
            .all(db)
            .await
    }
}

fn join_actors(rows: Vec<(Model, Option<super::user::Model>)>) -> Vec<ActivityRecord> {
    rows.into_iter()
        .filter_map(|(log, actor)| actor.map(|a| ActivityRecord::from_parts(log, &a)))
        .collect()
}
