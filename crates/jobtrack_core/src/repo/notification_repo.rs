//! In-app notification persistence.

use crate::model::notification::{InAppNotification, NotificationKind};
use crate::repo::application_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTIFICATIONS_DEFAULT_LIMIT: u32 = 20;
const NOTIFICATIONS_LIMIT_MAX: u32 = 100;

/// Repository interface for in-app notifications.
pub trait NotificationRepository {
    fn create(&self, notification: &InAppNotification) -> RepoResult<()>;
    /// Newest first; limit defaults to 20 and clamps to 100.
    fn list_for_user(&self, user_id: &str, limit: Option<u32>)
        -> RepoResult<Vec<InAppNotification>>;
    /// Returns `false` when `user_id` owns no notification with this id.
    fn mark_read(&self, user_id: &str, id: Uuid) -> RepoResult<bool>;
}

/// SQLite-backed notification repository.
pub struct SqliteNotificationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNotificationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl NotificationRepository for SqliteNotificationRepository<'_> {
    fn create(&self, notification: &InAppNotification) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO notifications (id, user_id, title, message, kind, is_read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                notification.id.to_string(),
                notification.user_id.as_str(),
                notification.title.as_str(),
                notification.message.as_str(),
                notification.kind.as_str(),
                i64::from(notification.is_read),
                notification.created_at,
            ],
        )?;
        Ok(())
    }

    fn list_for_user(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> RepoResult<Vec<InAppNotification>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, message, kind, is_read, created_at
             FROM notifications
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2;",
        )?;
        let mut rows = stmt.query(params![user_id, i64::from(normalize_limit(limit))])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_notification_row(row)?);
        }
        Ok(items)
    }

    fn mark_read(&self, user_id: &str, id: Uuid) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id],
        )?;
        Ok(changed > 0)
    }
}

fn normalize_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => NOTIFICATIONS_DEFAULT_LIMIT,
        Some(value) => value.min(NOTIFICATIONS_LIMIT_MAX),
    }
}

fn parse_notification_row(row: &Row<'_>) -> RepoResult<InAppNotification> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in notifications.id"))
    })?;
    let kind_text: String = row.get("kind")?;
    let kind = NotificationKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in notifications.kind"))
    })?;
    let is_read = match row.get::<_, i64>("is_read")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_read value `{other}` in notifications.is_read"
            )));
        }
    };

    Ok(InAppNotification {
        id,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        message: row.get("message")?,
        kind,
        is_read,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::normalize_limit;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_limit(None), 20);
        assert_eq!(normalize_limit(Some(0)), 20);
        assert_eq!(normalize_limit(Some(7)), 7);
        assert_eq!(normalize_limit(Some(1_000)), 100);
    }
}
