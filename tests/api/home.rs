use crate::utils::{spawn_app, spawn_app_with};
use http::{header::CONTENT_TYPE, StatusCode};

#[tokio::test]
async fn landing_page_is_served_as_html() {
    let app = spawn_app().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|x| x.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/html"));
    assert!(response.text().await.unwrap().contains("/signup"));
}

#[tokio::test]
async fn landing_page_uses_the_configured_theme() {
    let app = spawn_app_with(|c| c.application.theme = "darkly".into()).await;

    let page = app.get("/").await.text().await.unwrap();

    assert!(page.contains("bootswatch/3.3.7/darkly/"));
}
