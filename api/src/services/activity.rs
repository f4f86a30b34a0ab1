//! Persist-then-relay pipeline for activity records.

use db::models::activity_log::{ActivityRecord, Model as ActivityLogModel};
use db::models::user::Entity as UserEntity;
use sea_orm::{DbErr, EntityTrait};
use util::{state::AppState, ws::ConnectionId};

use crate::ws::emit;

/// Persists an activity for `actor_id`, denormalizes the actor's directory
/// fields onto it, and relays it to every live connection except `origin`.
///
/// Persisting strictly before relaying guarantees the broadcast always
/// carries complete actor metadata even if the directory row changes
/// concurrently: stale at worst, never missing.
pub async fn record_and_relay(
    app: &AppState,
    actor_id: i64,
    action: &str,
    origin: Option<ConnectionId>,
) -> Result<ActivityRecord, DbErr> {
    let db = app.db();

    let log = ActivityLogModel::record(db, actor_id, action).await?;
    let actor = UserEntity::find_by_id(actor_id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("User {actor_id} not found")))?;

    let record = ActivityRecord::from_parts(log, &actor);
    emit::activity_created(app.hub(), origin, &record).await;

    Ok(record)
}
