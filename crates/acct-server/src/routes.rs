use acct_auth::Error;
use acct_auth::Store;
use actix_web::HttpResponse;
use actix_web::web;

/// Account routes over any store. Body and path failures use the same
/// `{status, ...}` envelope as the handlers.
#[rustfmt::skip]
pub fn accounts<S: Store + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|e, _| Error::Payload(e.to_string()).into()))
        .app_data(web::PathConfig::default().error_handler(|_, _| Error::NotFound.into()))
        .route("/create",       web::post().to(acct_auth::create::<S>))
        .route("/login",        web::post().to(acct_auth::login::<S>))
        .route("/users",        web::get().to(acct_auth::users::<S>))
        .route("/profile/{id}", web::get().to(acct_auth::profile::<S>))
        .route("/delete/{id}",  web::delete().to(acct_auth::delete::<S>))
        .route("/update",       web::put().to(acct_auth::update::<S>))
        .route("/refresh",      web::get().to(acct_auth::refresh::<S>))
        .default_service(web::to(missing));
}

async fn missing() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "status": 404, "message": "route not found" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use acct_auth::Crypto;
    use acct_auth::Memory;
    use acct_auth::Service;
    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::Value;
    use serde_json::json;
    use std::sync::Arc;

    fn bearer(token: &Value) -> String {
        format!("Bearer {}", token.as_str().unwrap())
    }

    #[actix_web::test]
    async fn account_lifecycle() {
        let crypto = Arc::new(Crypto::new(b"route tests"));
        let service = web::Data::new(Service::new(Memory::default(), crypto.clone()));
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(web::Data::from(crypto))
                .configure(accounts::<Memory>),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/create")
            .set_json(json!({ "name": "A", "email": "a@x.com", "password": "1234" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 201);
        assert!(body["user_id"].is_i64());
        let id = body["user_id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/create")
            .set_json(json!({ "name": "A", "email": "a@x.com", "password": "1234" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 422);
        assert!(body["errors"]["email"].is_string());

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@x.com", "password": "1234" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let login: Value = test::read_body_json(resp).await;
        assert_eq!(login["status"], 200);
        assert!(!login["access_token"].as_str().unwrap().is_empty());
        assert!(!login["refresh_token"].as_str().unwrap().is_empty());
        assert_ne!(login["access_token"], login["refresh_token"]);

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Authorization", bearer(&login["access_token"])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["users"][0]["id"], id);
        assert_eq!(body["users"][0]["email"], "a@x.com");
        assert!(body["users"][0].get("hashword").is_none());

        let req = test::TestRequest::get()
            .uri("/refresh")
            .insert_header(("Refresh", bearer(&login["refresh_token"])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let refreshed: Value = test::read_body_json(resp).await;
        assert_ne!(refreshed["access_token"], login["access_token"]);
        assert_ne!(refreshed["refresh_token"], login["refresh_token"]);

        let req = test::TestRequest::get()
            .uri("/refresh")
            .insert_header(("Refresh", bearer(&login["refresh_token"])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);

        let req = test::TestRequest::get()
            .uri(&format!("/profile/{}", id))
            .insert_header(("Authorization", bearer(&refreshed["access_token"])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["user"]["name"], "A");

        let req = test::TestRequest::put()
            .uri("/update")
            .insert_header(("Authorization", bearer(&refreshed["access_token"])))
            .set_json(json!({ "id": id, "name": "Bea", "email": "a@x.com", "password": "abcd" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["resultado"]["affected_rows"], 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/delete/{}", id))
            .insert_header(("Authorization", bearer(&refreshed["access_token"])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["resultado"]["affected_rows"], 1);

        let req = test::TestRequest::get()
            .uri(&format!("/profile/{}", id))
            .insert_header(("Authorization", bearer(&refreshed["access_token"])))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
    }

    #[actix_web::test]
    async fn guard_and_envelope_failures() {
        let crypto = Arc::new(Crypto::new(b"route tests"));
        let service = web::Data::new(Service::new(Memory::default(), crypto.clone()));
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(web::Data::from(crypto))
                .configure(accounts::<Memory>),
        )
        .await;

        let req = test::TestRequest::get().uri("/users").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"]["Authorization"], "please provide your Authorization token");

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Authorization", "Bearer"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Authorization", "Bearer not.a.jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);
        assert!(body["message"].is_string());

        let forged = Crypto::new(b"someone else")
            .issue(1i64.into(), acct_auth::Kind::Access)
            .unwrap();
        let req = test::TestRequest::delete()
            .uri("/delete/1")
            .insert_header(("Authorization", format!("Bearer {}", forged)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/refresh").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["errors"]["Refresh"].is_string());

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "nobody@x.com", "password": "1234" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid credentials");

        let req = test::TestRequest::post()
            .uri("/create")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 422);

        let req = test::TestRequest::get().uri("/nowhere").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
    }

    #[actix_web::test]
    async fn expired_tokens_are_unauthorized() {
        use acct_auth::Claims;
        use acct_auth::Kind;
        let crypto = Arc::new(Crypto::new(b"route tests"));
        let expired = |kind: Kind| {
            let mut claims = Claims::new(1i64.into(), kind, crypto.ttl(kind));
            claims.iat -= 3600;
            claims.exp = claims.iat + 60;
            crypto.encode(&claims).unwrap()
        };
        let access = expired(Kind::Access);
        let refresh = expired(Kind::Refresh);
        let service = web::Data::new(Service::new(Memory::default(), crypto.clone()));
        let app = test::init_service(
            App::new()
                .app_data(service)
                .app_data(web::Data::from(crypto))
                .configure(accounts::<Memory>),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/users")
            .insert_header(("Authorization", format!("Bearer {}", access)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "unauthorized: token expired");

        let req = test::TestRequest::get()
            .uri("/refresh")
            .insert_header(("Refresh", format!("Bearer {}", refresh)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "unauthorized: token expired");
    }
}
