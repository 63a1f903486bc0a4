use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::result::{DatabaseErrorKind, Error};
use serde::Serialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use uuid::Uuid;

use crate::authentication::{CurrentUser, MaybeUser};
use crate::database::queries;
use crate::domain::ImagePayload;
use crate::media;
use crate::pagination::{Paginated, Pagination};
use crate::routes::views::{SubscriptionView, UserView};
use crate::startup::ApplicationState;
use crate::telemetry::spawn_blocking_with_tracing;

#[tracing::instrument(name = "Reading a user profile", skip(app_state, viewer))]
pub async fn get_user(
    State(app_state): State<ApplicationState>,
    MaybeUser(viewer): MaybeUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, UserError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let user = queries::get_user(&mut connection, user_id)
        .await?
        .ok_or(UserError::NotFound)?;
    let view = UserView::load(
        &mut connection,
        &user,
        viewer.map(|viewer| viewer.id),
    )
    .await?;
    Ok(Json(view))
}

#[tracing::instrument(
    name = "Reading own profile",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn current_user(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserView>, UserError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let view = UserView::load(&mut connection, &user, Some(user.id)).await?;
    Ok(Json(view))
}

#[derive(serde::Deserialize)]
pub struct AvatarData {
    pub avatar: String,
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[tracing::instrument(
    name = "Setting avatar",
    skip(app_state, user, data),
    fields(user_id = %user.id)
)]
pub async fn set_avatar(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Json(data): Json<AvatarData>,
) -> Result<Json<AvatarResponse>, UserError> {
    let payload = ImagePayload::try_from(data.avatar)
        .map_err(|e| UserError::InvalidAvatar(e.to_string()))?;
    let media_root = app_state.media_root.clone();
    let avatar_path = spawn_blocking_with_tracing(move || {
        media::store_image(&media_root, "avatars", &payload)
    })
    .await
    .context("Avatar write task failed.")??;

    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    queries::set_avatar(&mut connection, user.id, Some(&avatar_path)).await?;
    if let Some(old) = &user.avatar {
        media::remove_image(&app_state.media_root, old);
    }
    Ok(Json(AvatarResponse {
        avatar: media::media_url(&avatar_path),
    }))
}

#[tracing::instrument(
    name = "Deleting avatar",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn delete_avatar(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, UserError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    queries::set_avatar(&mut connection, user.id, None).await?;
    if let Some(old) = &user.avatar {
        media::remove_image(&app_state.media_root, old);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(serde::Deserialize)]
pub struct SubscriptionsQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub recipes_limit: Option<i64>,
}

#[tracing::instrument(
    name = "Listing subscriptions",
    skip(app_state, user, query),
    fields(user_id = %user.id)
)]
pub async fn list_subscriptions(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<Json<Paginated<SubscriptionView>>, UserError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let count =
        queries::count_subscribed_authors(&mut connection, user.id).await?;
    let authors = queries::subscribed_authors(
        &mut connection,
        user.id,
        query.pagination.offset(app_state.page_size),
        query.pagination.limit(app_state.page_size),
    )
    .await?;
    let mut results = Vec::with_capacity(authors.len());
    for author in &authors {
        results.push(
            SubscriptionView::load(
                &mut connection,
                author,
                user.id,
                query.recipes_limit,
            )
            .await?,
        );
    }
    Ok(Json(Paginated { count, results }))
}

#[tracing::instrument(
    name = "Subscribing to an author",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn subscribe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubscriptionView>), UserError> {
    if user.id == author_id {
        return Err(UserError::SelfSubscription);
    }
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    let author = queries::get_user(&mut connection, author_id)
        .await?
        .ok_or(UserError::NotFound)?;
    queries::insert_subscription(&mut connection, user.id, author_id)
        .await
        .map_err(map_subscription_insert_error)?;
    let view =
        SubscriptionView::load(&mut connection, &author, user.id, None)
            .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[tracing::instrument(
    name = "Unsubscribing from an author",
    skip(app_state, user),
    fields(user_id = %user.id)
)]
pub async fn unsubscribe(
    State(app_state): State<ApplicationState>,
    CurrentUser(user): CurrentUser,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, UserError> {
    let mut connection =
        crate::database::get_connection(app_state.database_pool).await?;
    queries::get_user(&mut connection, author_id)
        .await?
        .ok_or(UserError::NotFound)?;
    let deleted =
        queries::delete_subscription(&mut connection, user.id, author_id)
            .await?;
    if deleted == 0 {
        return Err(UserError::NotSubscribed);
    }
    Ok(StatusCode::NO_CONTENT)
}

fn map_subscription_insert_error(e: Error) -> UserError {
    match e {
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserError::AlreadySubscribed
        }
        // The storage layer also forbids self-subscription; surfacing it
        // as validation keeps concurrent requests consistent.
        Error::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            UserError::SelfSubscription
        }
        other => UserError::DatabaseError(other),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UserError {
    #[error("User not found.")]
    NotFound,
    #[error("{0}")]
    InvalidAvatar(String),
    #[error("Subscribing to yourself is not allowed.")]
    SelfSubscription,
    #[error("Already subscribed to this author.")]
    AlreadySubscribed,
    #[error("Not subscribed to this author.")]
    NotSubscribed,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("Unknown database error.")]
    DatabaseError(#[from] Error),
}

impl IntoResponse for UserError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct UserErrorResponse {
            message: String,
        }
        tracing::error!("{} Reason: {:?}", self, self);
        let (status, message) = match self {
            UserError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            UserError::InvalidAvatar(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            UserError::SelfSubscription | UserError::NotSubscribed => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            UserError::AlreadySubscribed => {
                (StatusCode::CONFLICT, self.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong".to_string(),
            ),
        };
        (status, axum::Json(UserErrorResponse { message }))
            .into_response()
    }
}
