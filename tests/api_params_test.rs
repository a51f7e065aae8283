//! Integration tests for the decoding parameters API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::util::ServiceExt;

    use crate::test_utils::{
        FakeModel, body_to_json, empty_request, json_request, login, test_app, test_app_with,
    };

    #[tokio::test]
    async fn it_gets_default_params() {
        let app = test_app();
        login(&app).await;

        let response = app.oneshot(empty_request("GET", "/api/params")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(
            body,
            serde_json::json!({
                "temperature": 1.0,
                "top_p": 0.85,
                "top_k": 200,
                "max_tokens": 800
            })
        );
    }

    #[tokio::test]
    async fn it_rejects_out_of_range_params() {
        let app = test_app();
        login(&app).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/params",
                serde_json::json!({
                    "temperature": 1.5,
                    "top_p": 0.85,
                    "top_k": 200,
                    "max_tokens": 800
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Updated params are sent with the next message
    #[tokio::test]
    async fn it_uses_updated_params() {
        let model = Arc::new(FakeModel::answering("ok"));
        let app = test_app_with(model.clone());
        login(&app).await;

        let params = serde_json::json!({
            "temperature": 0.2,
            "top_p": 0.5,
            "top_k": 50,
            "max_tokens": 256
        });
        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/params", params.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_to_json(response.into_body()).await, params);

        app.oneshot(json_request(
            "POST",
            "/api/chat",
            serde_json::json!({"message": "oi"}),
        ))
        .await
        .unwrap();

        let request = model.last_request();
        assert_eq!(request["temperature"], 0.2);
        assert_eq!(request["top_p"], 0.5);
        assert_eq!(request["top_k"], 50);
        assert_eq!(request["max_tokens"], 256);
    }
}
