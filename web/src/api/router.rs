use crate::{
    api::{service, AppState},
    types::{AddressRequest, CheckRequest, SelectRequest},
};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

#[get("/start")]
async fn start(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    if let Err(denied) = state.authorize(&req) {
        return denied;
    }

    HttpResponse::Ok().json(service::start_menu())
}

#[post("/select")]
async fn select(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SelectRequest>,
) -> impl Responder {
    if let Err(denied) = state.authorize(&req) {
        return denied;
    }

    log::debug!("select - {:?}", body);
    let reply = service::select(state.sessions.as_ref(), body.user_id, &body.asset).await;

    HttpResponse::Ok().json(reply)
}

#[post("/address")]
async fn address(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<AddressRequest>,
) -> impl Responder {
    if let Err(denied) = state.authorize(&req) {
        return denied;
    }

    HttpResponse::Ok().json(
        service::handle_address(
            &state.dispatcher,
            state.sessions.as_ref(),
            body.user_id,
            &body.text,
        )
        .await,
    )
}

#[post("/check")]
async fn check(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CheckRequest>,
) -> impl Responder {
    if let Err(denied) = state.authorize(&req) {
        return denied;
    }

    log::info!("check - {:?}", body);
    HttpResponse::Ok().json(state.dispatcher.check(body.asset, &body.address).await)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(start)
        .service(select)
        .service(address)
        .service(check);
}
