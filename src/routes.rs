use actix_web::{get, post, web, HttpResponse};
use futures::{stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::error::ServiceError;
use crate::schemas::{NewExpense, Snapshot};
use crate::service::GroupService;
use crate::store::InMemoryStore;

pub type AppService = GroupService<InMemoryStore>;

#[derive(Deserialize)]
struct NameJson {
    name: Option<String>,
}

#[post("/groups")]
async fn create_group(
    service: web::Data<AppService>,
    json: web::Json<NameJson>,
) -> HttpResponse {
    let snapshot = service.create_group(json.name.as_deref().unwrap_or(""));
    HttpResponse::Created().json(json!({ "id": snapshot.id, "group": snapshot }))
}

#[post("/groups/{id}/members")]
async fn add_member(
    service: web::Data<AppService>,
    id: web::Path<String>,
    json: web::Json<NameJson>,
) -> Result<HttpResponse, ServiceError> {
    let added = service.add_member(&id.into_inner(), json.name.as_deref().unwrap_or(""))?;
    let mut response = if added.created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(response.json(json!({ "member": added.member, "group": added.snapshot })))
}

#[get("/groups/{id}")]
async fn get_group(
    service: web::Data<AppService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let snapshot = service.get_group(&id.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "group": snapshot })))
}

#[post("/groups/{id}/expenses")]
async fn add_expense(
    service: web::Data<AppService>,
    id: web::Path<String>,
    json: web::Json<NewExpense>,
) -> Result<HttpResponse, ServiceError> {
    let (expense, snapshot) = service.add_expense(&id.into_inner(), json.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "expense": expense, "group": snapshot })))
}

/// Live update feed as server-sent events: the current snapshot arrives
/// first, then one `group_updated` frame per mutation.
#[get("/groups/{id}/events")]
async fn group_events(
    service: web::Data<AppService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let (snapshot, receiver) = service.subscribe(&id.into_inner())?;

    let first = stream::once(async move { sse_frame(&snapshot) });
    let updates = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(snapshot) => return Some((sse_frame(&snapshot), receiver)),
                // A lagged subscriber just waits for the next full snapshot.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("cache-control", "no-cache"))
        .streaming(first.chain(updates)))
}

fn sse_frame(snapshot: &Snapshot) -> Result<web::Bytes, actix_web::Error> {
    let json = serde_json::to_string(snapshot)
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(web::Bytes::from(format!(
        "event: group_updated\ndata: {json}\n\n"
    )))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed request bodies get the same {"error": ...} shape as the
    // service's own rejections.
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    });

    cfg.app_data(json_config)
        .service(create_group)
        .service(add_member)
        .service(get_group)
        .service(add_expense)
        .service(group_events);
}
