//! REST API endpoints for claims

use std::collections::BTreeMap;

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::error::ApiError;
use crate::db::repository::ClaimRepository;
use crate::model::{Claim, ClaimCategory, RankedClaim};
use crate::service::ClaimPipeline;

#[derive(OpenApi)]
#[openapi(
    paths(add_claim, open_last_hour, close_claim),
    components(schemas(
        RankedClaim,
        Claim,
        crate::model::ClaimCategory,
        crate::model::ClaimStatus,
        crate::model::Sentiment
    )),
    tags((name = "claims", description = "Claim triage endpoints"))
)]
pub struct ApiDoc;

/// Form payload for submitting a claim
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddClaimForm {
    pub claim: String,
}

/// Analyze a claim, save it and return the enriched record
#[utoipa::path(
    post,
    path = "/claims/add-claim",
    responses(
        (status = 201, description = "Claim ranked and saved", body = RankedClaim),
        (status = 400, description = "Empty claim"),
        (status = 500, description = "Persistence failure")
    ),
    tag = "claims"
)]
#[post("/claims/add-claim")]
pub async fn add_claim(
    pipeline: web::Data<ClaimPipeline>,
    form: web::Form<AddClaimForm>,
) -> Result<HttpResponse, ApiError> {
    let ranked = pipeline.process(&form.claim).await?;
    Ok(HttpResponse::Created().json(ranked))
}

/// List open claims from the last hour, grouped by category
///
/// Covers SERVICE, PAYMENT and OTHER; each group is ordered newest first.
#[utoipa::path(
    get,
    path = "/claims/open-last-hour",
    responses(
        (status = 200, description = "Open claims grouped by category"),
        (status = 500, description = "Database error")
    ),
    tag = "claims"
)]
#[get("/claims/open-last-hour")]
pub async fn open_last_hour(
    repository: web::Data<ClaimRepository>,
) -> Result<HttpResponse, ApiError> {
    let claims = repository.open_last_hour().await?;

    let mut grouped: BTreeMap<ClaimCategory, Vec<Claim>> = BTreeMap::new();
    for claim in claims {
        grouped.entry(claim.category).or_default().push(claim);
    }

    Ok(HttpResponse::Ok().json(grouped))
}

/// Close an open claim by id
#[utoipa::path(
    post,
    path = "/claims/{id}/close",
    params(("id" = i64, Path, description = "Claim id")),
    responses(
        (status = 200, description = "Claim closed"),
        (status = 404, description = "Unknown or already-closed claim")
    ),
    tag = "claims"
)]
#[post("/claims/{id}/close")]
pub async fn close_claim(
    repository: web::Data<ClaimRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    repository.close(id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Configure claim routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_claim)
        .service(open_last_hour)
        .service(close_claim);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use sqlx::sqlite::SqlitePoolOptions;

    use crate::db::init_schema;
    use crate::model::Sentiment;

    async fn test_repository() -> ClaimRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        ClaimRepository::new(pool)
    }

    #[actix_web::test]
    async fn close_unknown_claim_returns_404() {
        let repository = test_repository().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(repository))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/claims/999/close")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn close_twice_returns_404_on_second_call() {
        let repository = test_repository().await;
        let id = repository
            .insert("rude agent", None, Sentiment::Negative, ClaimCategory::Service)
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(repository))
                .configure(configure),
        )
        .await;

        let uri = format!("/claims/{}/close", id);
        let first = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert!(first.status().is_success());

        let second =
            test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(second.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn open_last_hour_groups_by_category() {
        let repository = test_repository().await;
        repository
            .insert("no refund yet", None, Sentiment::Negative, ClaimCategory::Payment)
            .await
            .unwrap();
        repository
            .insert("slow support", None, Sentiment::Negative, ClaimCategory::Service)
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(repository))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/claims/open-last-hour")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["PAYMENT"].as_array().unwrap().len(), 1);
        assert_eq!(body["SERVICE"].as_array().unwrap().len(), 1);
        assert!(body.get("ACCOUNT").is_none());
    }
}
