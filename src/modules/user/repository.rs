use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use ulid::Ulid;

use crate::utils::{
    database::is_unique_violation,
    pagination::{Paginated, Pagination},
};

type Result<T> = std::result::Result<T, Error>;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Customer,
    Restaurant,
    DeliveryMan,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Active,
    Pending,
    Banned,
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: Status,
    pub profile_picture: Option<String>,
    pub is_deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

pub struct CreateUserPayload {
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub status: Status,
}

#[derive(Debug)]
pub enum Error {
    UnexpectedError,
    Duplicate,
}

pub async fn create<'e, E>(e: E, payload: CreateUserPayload) -> Result<User>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, User>(
        "
        INSERT INTO users (
            id,
            email,
            phone_number,
            password_hash,
            first_name,
            last_name,
            role,
            status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        ",
    )
    .bind(Ulid::new().to_string())
    .bind(payload.email.to_lowercase())
    .bind(payload.phone_number)
    .bind(payload.password_hash)
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.role)
    .bind(payload.status)
    .fetch_one(e)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            return Error::Duplicate;
        }

        tracing::error!("Error occured while creating a user account: {}", err);
        Error::UnexpectedError
    })
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id.clone())
        .fetch_optional(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while fetching user with id {}: {}", id, err);
            Error::UnexpectedError
        })
}

/// Looks a user up by e-mail (case-insensitive) or phone number.
pub async fn find_by_identifier<'e, E: PgExecutor<'e>>(
    e: E,
    identifier: String,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE email = LOWER($1) OR phone_number = $1 LIMIT 1",
    )
    .bind(identifier)
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred in find_by_identifier: {}", err);
        Error::UnexpectedError
    })
}

pub struct UpdateUserPayload {
    pub phone_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
}

pub async fn update_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    payload: UpdateUserPayload,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        "
            UPDATE users SET
                phone_number = COALESCE($1, phone_number),
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                profile_picture = COALESCE($4, profile_picture),
                updated_at = NOW()
            WHERE
                id = $5
            RETURNING *
        ",
    )
    .bind(payload.phone_number)
    .bind(payload.first_name)
    .bind(payload.last_name)
    .bind(payload.profile_picture)
    .bind(id.clone())
    .fetch_one(e)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            return Error::Duplicate;
        }

        tracing::error!(
            "Error occurred while trying to update a user by id {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn update_password_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    password_hash: String,
) -> Result<()> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
        .bind(password_hash)
        .bind(id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!(
                "Error occurred while trying to update password of user {}: {}",
                id,
                err
            );
            Error::UnexpectedError
        })
}

pub async fn update_status_by_id<'e, E: PgExecutor<'e>>(
    e: E,
    id: String,
    status: Status,
) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "
        UPDATE users SET
            status = $1,
            updated_at = NOW()
        WHERE
            id = $2
            AND is_deleted = FALSE
        RETURNING *
        ",
    )
    .bind(status)
    .bind(id.clone())
    .fetch_optional(e)
    .await
    .map_err(|err| {
        tracing::error!(
            "Error occurred while trying to update status of user {}: {}",
            id,
            err
        );
        Error::UnexpectedError
    })
}

pub async fn soft_delete_by_id<'e, E: PgExecutor<'e>>(e: E, id: String) -> Result<()> {
    sqlx::query("UPDATE users SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
        .bind(id.clone())
        .execute(e)
        .await
        .map(|_| ())
        .map_err(|err| {
            tracing::error!("Error occurred while trying to delete user {}: {}", id, err);
            Error::UnexpectedError
        })
}

#[derive(Deserialize, Default)]
pub struct Filters {
    pub role: Option<Role>,
    pub status: Option<Status>,
    pub search: Option<String>,
}

const FIND_MANY_CONDITION: &str = "
    is_deleted = FALSE
    AND ($1::user_role IS NULL OR role = $1)
    AND ($2::user_status IS NULL OR status = $2)
    AND (
        $3::TEXT IS NULL
        OR email ILIKE CONCAT('%', $3, '%')
        OR first_name ILIKE CONCAT('%', $3, '%')
        OR last_name ILIKE CONCAT('%', $3, '%')
        OR phone_number ILIKE CONCAT('%', $3, '%')
    )
";

pub async fn find_many<'e, E: PgExecutor<'e> + Copy>(
    e: E,
    pagination: Pagination,
    filters: Filters,
) -> Result<Paginated<User>> {
    let items_sql = format!(
        "SELECT * FROM users WHERE {} ORDER BY created_at DESC LIMIT $4 OFFSET $5",
        FIND_MANY_CONDITION
    );
    let count_sql = format!("SELECT COUNT(*) FROM users WHERE {}", FIND_MANY_CONDITION);

    let users = sqlx::query_as::<_, User>(&items_sql)
        .bind(filters.role)
        .bind(filters.status)
        .bind(filters.search.clone())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch many users: {}", err);
            Error::UnexpectedError
        })?;

    let total = sqlx::query_scalar::<_, i64>(&count_sql)
        .bind(filters.role)
        .bind(filters.status)
        .bind(filters.search)
        .fetch_one(e)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to count users: {}", err);
            Error::UnexpectedError
        })?;

    Ok(Paginated::from_query(users, total, &pagination))
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
pub struct RoleCount {
    pub role: Role,
    pub count: i64,
}

pub async fn count_by_role<'e, E: PgExecutor<'e>>(e: E) -> Result<Vec<RoleCount>> {
    sqlx::query_as::<_, RoleCount>(
        "SELECT role, COUNT(*) AS count FROM users WHERE is_deleted = FALSE GROUP BY role",
    )
    .fetch_all(e)
    .await
    .map_err(|err| {
        tracing::error!("Error occurred while counting users by role: {}", err);
        Error::UnexpectedError
    })
}

pub fn is_admin(user: &User) -> bool {
    user.role == Role::Admin
}

pub fn can_sign_in(user: &User) -> std::result::Result<(), Status> {
    match user.status {
        Status::Active => Ok(()),
        status => Err(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(role: Role, status: Status) -> User {
        User {
            id: Ulid::new().to_string(),
            email: "ada@example.com".to_string(),
            phone_number: "+2348000000000".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            role,
            status,
            profile_picture: None,
            is_deleted: false,
            created_at: chrono::Utc::now().naive_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let value = serde_json::to_value(user(Role::Customer, Status::Active)).unwrap();

        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], json!("CUSTOMER"));
        assert_eq!(value["status"], json!("ACTIVE"));
    }

    #[test]
    fn roles_use_screaming_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::from_value::<Role>(json!("DELIVERY_MAN")).unwrap(),
            Role::DeliveryMan
        );
        assert!(serde_json::from_value::<Role>(json!("delivery_man")).is_err());
    }

    #[test]
    fn only_active_users_can_sign_in() {
        assert!(can_sign_in(&user(Role::Customer, Status::Active)).is_ok());
        assert_eq!(
            can_sign_in(&user(Role::Restaurant, Status::Pending)),
            Err(Status::Pending)
        );
        assert_eq!(
            can_sign_in(&user(Role::DeliveryMan, Status::Banned)),
            Err(Status::Banned)
        );
    }

    #[test]
    fn admin_check() {
        assert!(is_admin(&user(Role::Admin, Status::Active)));
        assert!(!is_admin(&user(Role::Restaurant, Status::Active)));
    }
}
