//! Write actions against a mock backend.

mod fixtures;

use eduglobal::model::lecture::NewTopic;
use eduglobal::service::actions::{self, Credentials};
use eduglobal::web::session::SessionSource;
use eduglobal::web::{CookieSession, Notice};
use fixtures::{admin, bearer, fetcher, json, student};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_blank_category_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(json(201, json!({}))).expect(0).mount(&server).await;

    let err = actions::create_category(&fetcher(&server, Some(admin())), "   ").await.unwrap_err();
    assert!(err.is_validation());
    let message = "Category name is required.".to_string();
    let expected = Notice::Field { field: "name".into(), message };
    assert_eq!(Notice::from(&err), expected);
}

#[tokio::test]
async fn test_create_category_trims_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/categories"))
        .and(header("authorization", bearer().as_str()))
        .and(body_json(json!({"name": "Design"})))
        .respond_with(json(201, json!({"category":{"_id":"k1","id":"k1","name":"Design"}})))
        .mount(&server)
        .await;

    let category =
        actions::create_category(&fetcher(&server, Some(admin())), " Design ").await.unwrap();
    assert_eq!(category.id, "k1");
}

#[tokio::test]
async fn test_server_message_becomes_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/categories/k1"))
        .respond_with(json(400, json!({"message":"Category already exists"})))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, Some(admin()));
    let err = actions::update_category(&fetcher, "k1", "Design").await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.message(), "Category already exists");
}

#[tokio::test]
async fn test_login_then_session_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(json(
            200,
            json!({"name":"Ada","email":"ada@example.com","role":"admin","token":"jwt-1"}),
        ))
        .mount(&server)
        .await;

    let credentials = Credentials { email: "ada@example.com".into(), password: "secret".into() };
    let session = actions::login(&fetcher(&server, None), &credentials).await.unwrap();
    assert!(session.is_admin());
    assert!(session.is_logged_in);

    let cookies = CookieSession::new("_EduGlobal_AUTH_KEY_", "");
    cookies.save(&session).unwrap();
    assert_eq!(cookies.session().map(|s| s.token), Some("jwt-1".to_string()));

    // the form input is still there for a retry
    assert_eq!(credentials.email, "ada@example.com");
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(json(401, json!({"message":"Invalid credentials"})))
        .mount(&server)
        .await;

    let credentials = Credentials { email: "ada@example.com".into(), password: "wrong".into() };
    let err = actions::login(&fetcher(&server, None), &credentials).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.message(), "Invalid credentials");

    let bad = Credentials { email: "not-an-email".into(), password: "x".into() };
    assert!(actions::login(&fetcher(&server, None), &bad).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_complete_topic_and_enroll() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lectures/l1/topics/t1/complete"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/courses/c1/enroll"))
        .respond_with(json(200, json!({"message":"enrolled"})))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(&server, Some(student()));
    actions::complete_topic(&fetcher, "l1", "t1").await.unwrap();
    actions::enroll(&fetcher, "c1").await.unwrap();
}

#[tokio::test]
async fn test_add_topic_requires_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(json(201, json!({}))).expect(0).mount(&server).await;

    let topic =
        NewTopic { name: "Intro".into(), resource_type: "video".into(), ..Default::default() };
    let err =
        actions::add_topic(&fetcher(&server, Some(student())), "l1", &topic).await.unwrap_err();
    assert_eq!(err.message(), "Please provide a file or URL.");
}

#[tokio::test]
async fn test_delete_student_needs_admin() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/students/s1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let denied = actions::delete_student(&fetcher(&server, Some(student())), "s1").await;
    assert!(denied.unwrap_err().is_auth());
    actions::delete_student(&fetcher(&server, Some(admin())), "s1").await.unwrap();
}

#[tokio::test]
async fn test_delete_lecture_and_topic() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/lectures/l1"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(json(200, json!({"message":"Lecture deleted"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/topics/t1"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert!(actions::delete_lecture(&fetcher(&server, None), "l1").await.unwrap_err().is_auth());

    let fetcher = fetcher(&server, Some(student()));
    actions::delete_lecture(&fetcher, "l1").await.unwrap();
    actions::delete_topic(&fetcher, "t1").await.unwrap();
}

#[tokio::test]
async fn test_delete_topic_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/topics/t9"))
        .respond_with(json(404, json!({"message":"Topic not found"})))
        .mount(&server)
        .await;

    let err = actions::delete_topic(&fetcher(&server, Some(student())), "t9").await.unwrap_err();
    assert_eq!(err.message(), "Topic not found");
}
