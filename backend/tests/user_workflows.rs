//! End-to-end HTTP tests for the user workflows over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use rstest::{fixture, rstest};
use userbook::Trace;
use userbook::domain::TRACE_ID_HEADER;
use userbook::inbound::http::state::HttpState;
use userbook::inbound::http::users;
use userbook::outbound::memory::InMemoryUserRepository;

#[fixture]
fn state() -> HttpState {
    HttpState::from_repository(Arc::new(InMemoryUserRepository::new()))
}

async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .configure(users::configure),
    )
    .await
}

fn submit(uri: &str, body: &str) -> Request {
    TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.to_owned())
        .to_request()
}

async fn page(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    uri: &str,
) -> (StatusCode, String) {
    let response = test::call_service(app, TestRequest::get().uri(uri).to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

#[rstest]
#[actix_web::test]
async fn add_reject_rename_delete(state: HttpState) {
    let app = init_app(state).await;

    let added = test::call_service(&app, submit("/add", "name=Alice&email=a%40x.com")).await;
    assert_eq!(added.status(), StatusCode::SEE_OTHER);
    let (_, listing) = page(&app, "/").await;
    assert_eq!(listing.matches("<tr><td>").count(), 1);
    assert!(listing.contains("Alice"));

    let rejected = test::call_service(&app, submit("/add", "name=Bob&email=a%40x.com")).await;
    assert_eq!(rejected.status(), StatusCode::CONFLICT);
    let (_, listing) = page(&app, "/").await;
    assert!(!listing.contains("Bob"));

    let renamed =
        test::call_service(&app, submit("/edit/1", "name=Alicia&email=a%40x.com")).await;
    assert_eq!(renamed.status(), StatusCode::SEE_OTHER);
    let (_, listing) = page(&app, "/").await;
    assert!(listing.contains("<td>Alicia</td>"));

    let deleted = test::call_service(&app, submit("/delete/1", "")).await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    let (status, listing) = page(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listing.contains("No users yet."));
}

#[rstest]
#[actix_web::test]
async fn ids_are_not_reused_after_delete(state: HttpState) {
    let app = init_app(state).await;
    test::call_service(&app, submit("/add", "name=Alice&email=a%40x.com")).await;
    test::call_service(&app, submit("/delete/1", "")).await;
    test::call_service(&app, submit("/add", "name=Bob&email=b%40x.com")).await;

    let (status, _) = page(&app, "/edit/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, form) = page(&app, "/edit/2").await;
    assert_eq!(status, StatusCode::OK);
    assert!(form.contains("value=\"Bob\""));
}

#[rstest]
#[actix_web::test]
async fn responses_carry_trace_ids(state: HttpState) {
    let app = init_app(state).await;

    let ok = test::call_service(&app, TestRequest::get().uri("/add").to_request()).await;
    assert!(ok.headers().contains_key(TRACE_ID_HEADER));

    let missing = test::call_service(&app, TestRequest::get().uri("/delete/5").to_request()).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let header_id = missing
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body = test::read_body(missing).await;
    let body = String::from_utf8(body.to_vec()).expect("utf8 body");
    assert!(body.contains(&header_id));
}

#[rstest]
#[actix_web::test]
async fn markup_in_names_is_escaped(state: HttpState) {
    let app = init_app(state).await;
    test::call_service(
        &app,
        submit("/add", "name=%3Cb%3Ebold%3C%2Fb%3E&email=a%40x.com"),
    )
    .await;

    let (_, listing) = page(&app, "/").await;
    assert!(listing.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!listing.contains("<b>bold</b>"));
}
