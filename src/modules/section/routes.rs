use super::repository::{self, Section};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Router,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    modules::{
        auth::middleware::AdminAuth,
        product::{self, repository::ProductView},
    },
    types::Context,
    utils::validation,
};

fn server_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Section not found" })),
    )
        .into_response()
}

#[derive(Serialize)]
struct SectionWithProducts {
    #[serde(flatten)]
    section: Section,
    products: Vec<ProductView>,
}

async fn get_sections(State(ctx): State<Arc<Context>>) -> Response {
    let sections = match repository::find_active(&ctx.db_conn.pool).await {
        Ok(sections) => sections,
        Err(_) => return server_error("Failed to fetch sections"),
    };

    let mut result = Vec::with_capacity(sections.len());
    for section in sections {
        let products =
            match product::repository::find_many_by_section_id(&ctx.db_conn.pool, section.id.clone())
                .await
            {
                Ok(listings) => listings.into_iter().map(ProductView::from).collect(),
                Err(_) => return server_error("Failed to fetch sections"),
            };

        result.push(SectionWithProducts { section, products });
    }

    (StatusCode::OK, Json(json!(result))).into_response()
}

#[derive(Deserialize, Validate)]
struct CreateSectionPayload {
    #[validate(length(min = 1, max = 100))]
    title: String,
    #[serde(default)]
    sort_order: i32,
}

async fn create_section(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Json(payload): Json<CreateSectionPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::create(
        &ctx.db_conn.pool,
        repository::CreateSectionPayload {
            title: payload.title,
            sort_order: payload.sort_order,
        },
    )
    .await
    {
        Ok(section) => (StatusCode::CREATED, Json(json!(section))).into_response(),
        Err(_) => server_error("Section creation failed"),
    }
}

#[derive(Deserialize, Validate)]
struct UpdateSectionPayload {
    #[validate(length(min = 1, max = 100))]
    title: Option<String>,
    sort_order: Option<i32>,
    is_active: Option<bool>,
}

async fn update_section(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSectionPayload>,
) -> Response {
    if let Err(errors) = validation::validate(&payload) {
        return errors.into_response();
    }

    match repository::update_by_id(
        &ctx.db_conn.pool,
        id,
        repository::UpdateSectionPayload {
            title: payload.title,
            sort_order: payload.sort_order,
            is_active: payload.is_active,
        },
    )
    .await
    {
        Ok(Some(section)) => (StatusCode::OK, Json(json!(section))).into_response(),
        Ok(None) => not_found(),
        Err(_) => server_error("Failed to update section"),
    }
}

async fn delete_section(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
) -> Response {
    match repository::delete_by_id(&ctx.db_conn.pool, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Section deleted successfully" })),
        )
            .into_response(),
        Ok(false) => not_found(),
        Err(_) => server_error("Failed to delete section"),
    }
}

#[derive(Deserialize)]
struct SetProductsPayload {
    product_ids: Vec<String>,
}

async fn set_section_products(
    State(ctx): State<Arc<Context>>,
    _: AdminAuth,
    Path(id): Path<String>,
    Json(payload): Json<SetProductsPayload>,
) -> Response {
    let product_ids = payload.product_ids.into_iter().unique().collect::<Vec<_>>();

    match repository::find_by_id(&ctx.db_conn.pool, id.clone()).await {
        Ok(Some(_)) => (),
        Ok(None) => return not_found(),
        Err(_) => return server_error("Failed to update section products"),
    };

    match repository::count_existing_products(&ctx.db_conn.pool, product_ids.clone()).await {
        Ok(count) if count == product_ids.len() as i64 => (),
        Ok(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Some products do not exist" })),
            )
                .into_response()
        }
        Err(_) => return server_error("Failed to update section products"),
    };

    let mut tx = match ctx.db_conn.pool.begin().await {
        Ok(tx) => tx,
        Err(err) => {
            tracing::error!("Failed to start transaction: {}", err);
            return server_error("Failed to update section products");
        }
    };

    if repository::set_products(&mut tx, id.clone(), product_ids)
        .await
        .is_err()
    {
        return server_error("Failed to update section products");
    }

    if let Err(err) = tx.commit().await {
        tracing::error!("Failed to commit products of section {}: {}", id, err);
        return server_error("Failed to update section products");
    }

    match product::repository::find_many_by_section_id(&ctx.db_conn.pool, id).await {
        Ok(listings) => (
            StatusCode::OK,
            Json(json!(listings
                .into_iter()
                .map(ProductView::from)
                .collect::<Vec<_>>())),
        )
            .into_response(),
        Err(_) => server_error("Failed to fetch section products"),
    }
}

pub fn get_router() -> Router<Arc<Context>> {
    Router::new()
        .route("/", get(get_sections).post(create_section))
        .route("/:id", patch(update_section).delete(delete_section))
        .route("/:id/products", put(set_section_products))
}
