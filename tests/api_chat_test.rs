//! Integration tests for the chat API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::util::ServiceExt;

    use crate::test_utils::{
        FakeModel, body_to_json, empty_request, json_request, login, test_app, test_app_with,
    };

    fn message(text: &str) -> axum::http::Request<axum::body::Body> {
        json_request("POST", "/api/chat", serde_json::json!({ "message": text }))
    }

    /// Sending a message appends both turns to the active thread
    #[tokio::test]
    async fn it_replies_on_the_active_thread() {
        let model = Arc::new(FakeModel::answering("📦 Doação registrada!"));
        let app = test_app_with(model.clone());
        login(&app).await;

        let response = app
            .clone()
            .oneshot(message("Quero doar 5kg de plástico"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["message"]["role"], "assistant");
        assert_eq!(body["message"]["content"], "📦 Doação registrada!");
        assert_eq!(body["thread_index"], 0);
        assert!(!body["session_id"].as_str().unwrap().is_empty());

        let response = app
            .oneshot(empty_request("GET", "/api/threads/active"))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        let messages = body["thread"]["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Quero doar 5kg de plástico");
        assert_eq!(messages[1]["role"], "assistant");

        let prompt = model.last_prompt();
        assert!(prompt.starts_with("Você é o assistente do Recycle."));
        assert!(prompt.ends_with("Usuário: Quero doar 5kg de plástico\n\nAssistente:"));
    }

    /// The thread keeps one session id across turns
    #[tokio::test]
    async fn it_reuses_the_session_id() {
        let model = Arc::new(FakeModel::answering("ok"));
        let app = test_app_with(model.clone());
        login(&app).await;

        let first = app.clone().oneshot(message("oi")).await.unwrap();
        let first = body_to_json(first.into_body()).await;
        let second = app.clone().oneshot(message("tudo bem?")).await.unwrap();
        let second = body_to_json(second.into_body()).await;
        assert_eq!(first["session_id"], second["session_id"]);

        // Earlier turns are replayed in the prompt
        let prompt = model.last_prompt();
        assert!(prompt.contains("Histórico da conversa:\nUsuário: oi\nAssistente: ok\n"));
    }

    #[tokio::test]
    async fn it_ignores_blank_messages() {
        let app = test_app();
        login(&app).await;

        let response = app.clone().oneshot(message("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", "/api/threads/active"))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert!(body["thread"]["messages"].as_array().unwrap().is_empty());
    }

    /// A failing model still produces an assistant turn
    #[tokio::test]
    async fn it_answers_with_fallback_when_model_fails() {
        let app = test_app_with(Arc::new(FakeModel::unreachable()));
        login(&app).await;

        let response = app.clone().oneshot(message("oi")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(
            body["message"]["content"],
            "Não foi possível conectar ao serviço Bedrock. Verifique suas credenciais."
        );

        let response = app
            .oneshot(empty_request("GET", "/api/threads/active"))
            .await
            .unwrap();
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["thread"]["messages"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn it_rejects_missing_message_field() {
        let app = test_app();
        login(&app).await;

        let response = app
            .oneshot(json_request("POST", "/api/chat", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
