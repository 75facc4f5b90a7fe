//! HTTP tests for the record service client

#[cfg(test)]
mod http_tests {
    use crate::{RemoteConfig, RemoteRecordStore};
    use chrono::Utc;
    use insta::assert_snapshot;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use survey_core::{
        Error, FreeText, Notifier, RatingInput, RecordStore, RemoteStrategy, StrategyKind,
        SubmissionConfig, SubmissionOutcome, SurveyRecord, SurveySubmitter,
    };
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct Alerts(Mutex<Vec<String>>);

    impl Notifier for Alerts {
        fn alert(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }

        fn inform(&self, _message: &str) {}

        fn progress(&self, _message: &str) {}
    }

    fn record() -> SurveyRecord {
        SurveyRecord {
            response: "4 5 0\nSuggestions: more".to_string(),
            answered: 2,
            total: 3,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_endpoint_snapshot() {
        let config = RemoteConfig::new("https://api.example.org")
            .with_base_path("/survey-demo/")
            .with_collection("responses");

        assert_snapshot!(config.records_url().unwrap().as_str(), @"https://api.example.org/survey-demo/responses");
        assert_snapshot!(config.health_url().unwrap().as_str(), @"https://api.example.org/survey-demo/health");
    }

    #[tokio::test]
    async fn test_create_posts_record_and_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/survey_responses"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "response": "4 5 0\nSuggestions: more",
                "answered": 2,
                "total": 3
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "rec-77" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = RemoteRecordStore::new(
            RemoteConfig::new(server.uri())
                .with_base_path("api")
                .with_api_key("secret"),
        )
        .unwrap();

        let id = store.create(&record()).await.unwrap();

        assert_eq!(id, Some("rec-77".to_string()));
    }

    #[tokio::test]
    async fn test_create_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/survey_responses"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let store = RemoteRecordStore::new(RemoteConfig::new(server.uri())).unwrap();

        assert_eq!(store.create(&record()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_maps_service_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let store = RemoteRecordStore::new(RemoteConfig::new(server.uri())).unwrap();

        match store.create(&record()).await {
            Err(Error::Remote { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        let store = RemoteRecordStore::new(RemoteConfig::new(server.uri())).unwrap();

        assert!(store.health().await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_call_surfaces_once_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(RemoteRecordStore::new(RemoteConfig::new(server.uri())).unwrap());
        let alerts = Arc::new(Alerts::default());
        let config = SubmissionConfig {
            strategy: StrategyKind::Remote,
            ..SubmissionConfig::default()
        };
        let submitter = SurveySubmitter::new(config, Box::new(RemoteStrategy::new(store)), alerts.clone());
        let ratings: Vec<RatingInput> = (1..=12)
            .map(|i| RatingInput::new(format!("rating-{}", i), "3"))
            .collect();
        let text = FreeText::new();
        let before = ratings.clone();

        let outcome = submitter.handle_submit(&ratings, &text).await;

        assert!(matches!(outcome, SubmissionOutcome::DispatchFailed { .. }));
        let alerts = alerts.0.lock().unwrap().clone();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("database unavailable"));
        assert_eq!(ratings, before);
    }
}
