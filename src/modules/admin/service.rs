use crate::modules::{
    auth::repository::session,
    user::{self, repository::User},
};
use sqlx::PgConnection;

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
}

/// True once a user has collected as many warnings as the platform tolerates.
pub fn reaches_threshold(warning_count: i64, max_warnings: i32) -> bool {
    warning_count >= i64::from(max_warnings.max(1))
}

/// Bans the user and signs them out everywhere.
pub async fn ban(conn: &mut PgConnection, user_id: String) -> Result<Option<User>, Error> {
    let Some(user) = user::repository::update_status_by_id(
        &mut *conn,
        user_id.clone(),
        user::repository::Status::Banned,
    )
    .await
    .map_err(|_| Error::UnexpectedError)?
    else {
        return Ok(None);
    };

    let revoked = session::delete_by_user_id(&mut *conn, user_id)
        .await
        .map_err(|_| Error::UnexpectedError)?;

    tracing::info!("Banned user {} and revoked {} sessions", user.id, revoked);

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ban_threshold_is_reached_at_max_warnings() {
        assert!(!reaches_threshold(2, 3));
        assert!(reaches_threshold(3, 3));
        assert!(reaches_threshold(4, 3));
    }

    #[test]
    fn threshold_never_drops_below_one() {
        assert!(!reaches_threshold(0, 0));
        assert!(reaches_threshold(1, 0));
    }
}
