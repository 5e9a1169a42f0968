//! Notification feed. Polled by clients; entries go `unread → read` and are
//! never deleted.

use tracing::debug;

use crate::{
  model::{Notification, NotificationFeed},
  store::UserStore,
  update::{UpdateResult, UserUpdate},
};

/// The user's notifications, or `None` for an unknown user.
pub async fn list<S: UserStore>(
  store: &S,
  email: &str,
) -> Result<Option<NotificationFeed>, S::Error> {
  let user = store.find_user(email).await?;
  Ok(user.map(|u| NotificationFeed { notifications: u.notifications }))
}

/// Append `notification` to the recipient's feed. Any sender may notify any
/// recipient.
pub async fn send<S: UserStore>(
  store: &S,
  recipient: &str,
  notification: Notification,
) -> Result<UpdateResult, S::Error> {
  let result = store
    .update_user(recipient, UserUpdate::PushNotification(notification))
    .await?;
  debug!(%recipient, ?result, "sent notification");
  Ok(result)
}

/// Mark every unread notification read in one update.
pub async fn mark_read<S: UserStore>(store: &S, email: &str) -> Result<UpdateResult, S::Error> {
  let result = store
    .update_user(email, UserUpdate::MarkNotificationsRead)
    .await?;
  debug!(%email, ?result, "marked notifications read");
  Ok(result)
}
