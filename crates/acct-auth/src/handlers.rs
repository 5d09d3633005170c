use super::*;
use acct_core::ID;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;

pub async fn create<S: Store + 'static>(
    service: web::Data<Service<S>>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, Error> {
    let id = service.signup(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "status": 201,
        "message": "user created",
        "user_id": id,
    })))
}

pub async fn login<S: Store + 'static>(
    service: web::Data<Service<S>>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, Error> {
    let pair = service.login(req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": 200,
        "access_token": pair.access_token,
        "refresh_token": pair.refresh_token,
    })))
}

pub async fn refresh<S: Store + 'static>(
    service: web::Data<Service<S>>,
    req: HttpRequest,
) -> Result<HttpResponse, Error> {
    let pair = service.refresh(header(&req, Kind::Refresh)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": 200,
        "access_token": pair.access_token,
        "refresh_token": pair.refresh_token,
    })))
}

pub async fn users<S: Store + 'static>(
    service: web::Data<Service<S>>,
    auth: Auth,
) -> Result<HttpResponse, Error> {
    let users = service.users(auth.authorized()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": 200,
        "users": users.iter().map(UserInfo::from).collect::<Vec<_>>(),
    })))
}

pub async fn profile<S: Store + 'static>(
    service: web::Data<Service<S>>,
    auth: Auth,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let user = service
        .user(auth.authorized(), ID::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": 200,
        "user": UserInfo::from(&user),
    })))
}

pub async fn delete<S: Store + 'static>(
    service: web::Data<Service<S>>,
    auth: Auth,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let rows = service
        .delete(auth.authorized(), ID::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": 200,
        "resultado": { "affected_rows": rows },
    })))
}

pub async fn update<S: Store + 'static>(
    service: web::Data<Service<S>>,
    auth: Auth,
    req: web::Json<UpdateRequest>,
) -> Result<HttpResponse, Error> {
    let rows = service.update(auth.authorized(), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": 200,
        "resultado": { "affected_rows": rows },
    })))
}
