use crate::utils::spawn_app;
use http::StatusCode;

#[tokio::test]
async fn metrics_count_signup_outcomes() {
    // Arrange
    let app = spawn_app().await;
    app.mock_publish_to_respond_with(200).await;
    let body = "name=le%20guin&email=ursula_le_guin%40gmail.com";

    // Act
    app.post_signup(body).await;
    app.post_signup(body).await;
    let response = app.get("/metrics").await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let metrics = response.text().await.unwrap();
    assert!(metrics.contains("signups_created_total 1"));
    assert!(metrics.contains("signups_conflicted_total 1"));
    assert!(metrics.contains("signups_failed_total 0"));
}
