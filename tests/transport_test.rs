#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use quickchart::{
        Error, PostData, QuickChart, Result, StatusCode, Transport, TransportResponse,
        async_trait,
        transport::ERROR_HEADER,
    };
    use reqwest::header::HeaderValue;
    use serde_json::json;
    use url::Url;

    #[derive(Debug, Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<Result<TransportResponse>>>,
        requests: Mutex<Vec<(Url, PostData)>>,
    }

    impl MockTransport {
        fn replying(response: Result<TransportResponse>) -> Arc<Self> {
            let mock = MockTransport::default();
            mock.responses.lock().unwrap().push_back(response);
            Arc::new(mock)
        }

        fn requests(&self) -> Vec<(Url, PostData)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn post_json(&self, url: &Url, body: &PostData) -> Result<TransportResponse> {
            self.requests
                .lock()
                .unwrap()
                .push((url.clone(), body.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Generic("no mocked response".to_string())))
        }
    }

    fn json_response(status: StatusCode, body: serde_json::Value) -> Result<TransportResponse> {
        Ok(TransportResponse::new(status, body.to_string()))
    }

    fn chart(mock: &Arc<MockTransport>) -> QuickChart {
        QuickChart::builder()
            .transport(mock.clone())
            .build()
            .set_config(json!({
                "type": "bar",
                "data": {
                    "labels": ["Hello world", "Foo bar"],
                    "datasets": [{ "label": "Foo", "data": [1, 2] }]
                }
            }))
    }

    #[tokio::test]
    async fn test_short_url() {
        let url = "https://quickchart.io/chart/render/9a560ba4-ab71-4d1e-89ea-ce4741e9d232";
        let mock = MockTransport::replying(json_response(
            StatusCode::OK,
            json!({ "success": true, "url": url }),
        ));

        let qc = chart(&mock);
        assert_eq!(qc.get_short_url().await.unwrap(), url);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0.as_str(), "https://quickchart.io/chart/create");
        assert_eq!(requests[0].1, qc.get_post_data().unwrap());
    }

    #[tokio::test]
    async fn test_short_url_rejected() {
        let mock =
            MockTransport::replying(json_response(StatusCode::OK, json!({ "success": false })));
        let err = chart(&mock).get_short_url().await.unwrap_err();
        assert!(matches!(err, Error::ShortUrlRejected));
        assert!(err.to_string().contains("failure response"));
    }

    #[tokio::test]
    async fn test_short_url_missing_url() {
        let mock =
            MockTransport::replying(json_response(StatusCode::OK, json!({ "success": true })));
        let err = chart(&mock).get_short_url().await.unwrap_err();
        assert!(matches!(err, Error::MissingShortUrl));
    }

    #[tokio::test]
    async fn test_short_url_bad_status() {
        let mock = MockTransport::replying(Ok(TransportResponse::new(
            StatusCode::BAD_GATEWAY,
            Vec::new(),
        )));
        let err = chart(&mock).get_short_url().await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().contains("failed with status code 502"));
    }

    #[tokio::test]
    async fn test_short_url_error_detail() {
        let mut resp = TransportResponse::new(StatusCode::BAD_REQUEST, Vec::new());
        resp.headers
            .insert(ERROR_HEADER, HeaderValue::from_static("foo bar"));
        let mock = MockTransport::replying(Ok(resp));

        let err = chart(&mock).get_short_url().await.unwrap_err();
        assert!(err.to_string().contains("foo bar"));
    }

    #[tokio::test]
    async fn test_short_url_transport_error() {
        let mock =
            MockTransport::replying(Err(Error::Generic("Request timed out".to_string())));
        let err = chart(&mock).get_short_url().await.unwrap_err();
        assert!(err.to_string().contains("Request timed out"));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_short_url_host_policy() {
        let mock = Arc::new(MockTransport::default());
        let qc = QuickChart::builder()
            .host("charts.example.com")
            .transport(mock.clone())
            .build()
            .set_config("{type:'bar'}");

        let err = qc.get_short_url().await.unwrap_err();
        assert!(matches!(err, Error::HostPolicy { ref host } if host == "charts.example.com"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_chart_fails_before_network() {
        let mock = Arc::new(MockTransport::default());
        let qc = QuickChart::builder().transport(mock.clone()).build();

        assert!(matches!(qc.get_short_url().await, Err(Error::MissingChart)));
        assert!(matches!(qc.to_binary().await, Err(Error::MissingChart)));
        assert!(matches!(qc.to_data_url().await, Err(Error::MissingChart)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_to_binary() {
        let mock = MockTransport::replying(Ok(TransportResponse::new(StatusCode::OK, "meow")));
        let qc = chart(&mock).set_format("svg");

        assert_eq!(qc.to_binary().await.unwrap(), b"meow");
        let requests = mock.requests();
        assert_eq!(requests[0].0.as_str(), "https://quickchart.io/chart");
        assert_eq!(requests[0].1.format.as_deref(), Some("svg"));
    }

    #[tokio::test]
    async fn test_to_binary_bad_status() {
        let mut resp = TransportResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Vec::new());
        resp.headers
            .insert(ERROR_HEADER, HeaderValue::from_static("chart is invalid"));
        let mock = MockTransport::replying(Ok(resp));

        match chart(&mock).to_binary().await {
            Err(Error::BadStatus {
                endpoint,
                status,
                detail,
            }) => {
                assert_eq!(endpoint, "render");
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(detail.as_deref(), Some("chart is invalid"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_to_data_url() {
        let mock = MockTransport::replying(Ok(TransportResponse::new(StatusCode::OK, "meow")));
        assert_eq!(
            chart(&mock).to_data_url().await.unwrap(),
            "data:image/png;base64,bWVvdw=="
        );

        let mock = MockTransport::replying(Ok(TransportResponse::new(StatusCode::OK, "<svg/>")));
        let data_url = chart(&mock).set_format("svg").to_data_url().await.unwrap();
        assert!(data_url.starts_with("data:image/svg+xml;base64,"));
    }

    #[tokio::test]
    async fn test_to_file_and_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        let mock = MockTransport::replying(Ok(TransportResponse::new(StatusCode::OK, "meow")));
        chart(&mock).to_file(&path).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"meow");

        let mock = MockTransport::replying(Ok(TransportResponse::new(StatusCode::OK, "purr")));
        let mut out: Vec<u8> = Vec::new();
        chart(&mock).to_writer(&mut out).await.unwrap();
        assert_eq!(out, b"purr");
    }

    #[tokio::test]
    async fn test_failed_render_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        let mock = MockTransport::replying(Ok(TransportResponse::new(
            StatusCode::BAD_GATEWAY,
            Vec::new(),
        )));
        assert!(chart(&mock).to_file(&path).await.is_err());
        assert!(!path.exists());
    }
}
