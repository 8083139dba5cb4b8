mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::{app_state_unroutable, assert_problem_details};
use gateway::config::auth::AuthConfig;
use gateway::middleware::request_trace::RequestTrace;
use gateway::routes;

#[actix_web::test]
async fn unmatched_path_returns_route_list() {
    let state = app_state_unroutable(AuthConfig::strict());

    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/definitely/not/a/route")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body = assert_problem_details(
        resp,
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        Some("Route not found"),
    )
    .await;

    let routes = body["available_routes"]
        .as_array()
        .expect("available_routes should be an array");
    assert!(!routes.is_empty());
    assert!(routes.iter().any(|r| r == "/health"));
}

#[actix_web::test]
async fn post_to_unknown_path_is_also_404() {
    let state = app_state_unroutable(AuthConfig::strict());

    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/graphql").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
