//! Account Server
//!
//! Serves signup, login, token refresh, and guarded user CRUD
//! from a single actix-web server.
//!
//! ## Submodules
//!
//! - [`routes`]: Route table, generic over the backing store

pub mod routes;

use acct_auth::Crypto;
use acct_auth::Service;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let client = acct_pg::db().await;
    acct_auth::migrate(&client).await.map_err(std::io::Error::other)?;
    let crypto = Arc::new(Crypto::from_env());
    let service = web::Data::new(Service::new(client.clone(), crypto.clone()));
    let crypto = web::Data::from(crypto);
    let client = web::Data::new(client);
    log::info!("starting account server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(service.clone())
            .app_data(crypto.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .configure(routes::accounts::<Arc<Client>>)
    })
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
