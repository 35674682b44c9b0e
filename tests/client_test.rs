// tests/client_test.rs

use std::sync::Arc;
use today_music::{client::RobustClient, config::AppConfig};

#[tokio::test(flavor = "multi_thread")]
async fn test_no_transport_retries_by_default() {
    let mut server = mockito::Server::new_async().await;
    // 默认配置不做任何重试：单次上游失败即为最终结果
    let mock = server
        .mock("GET", "/detail")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let config = Arc::new(AppConfig::default());
    let client = RobustClient::new(config).expect("创建客户端失败");

    let result = client.get(&format!("{}/detail", server.url()), None).await;
    assert!(result.is_err());
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_configured_retries_reissue_request() {
    let mut server = mockito::Server::new_async().await;
    // max_retries = 2 时，同一个 5xx 端点应被请求 1 + 2 次
    let mock = server
        .mock("GET", "/detail")
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let mut config = AppConfig::default();
    config.max_retries = 2;
    let client = RobustClient::new(Arc::new(config)).expect("创建客户端失败");

    let result = client.get(&format!("{}/detail", server.url()), None).await;
    assert!(result.is_err());
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_browser_user_agent_is_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/detail")
        .match_header("user-agent", "test-agent/1.0")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let config = Arc::new(AppConfig::default());
    let client = RobustClient::new(config).expect("创建客户端失败");

    let body = client
        .get_text(&format!("{}/detail", server.url()), None)
        .await
        .expect("请求应成功");
    assert_eq!(body, "ok");
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_referer_header_is_attached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/detail")
        .match_header("referer", "https://music.163.com/")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let config = Arc::new(AppConfig::default());
    let client = RobustClient::new(config).expect("创建客户端失败");

    client
        .get_text(
            &format!("{}/detail", server.url()),
            Some("https://music.163.com/"),
        )
        .await
        .expect("请求应成功");
    mock.assert_async().await;
}
