use std::sync::Arc;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value, json};
use tower::util::ServiceExt;

use mnemo_api::{routes, state::AppState};
use mnemo_config::{
	AnswerProviderConfig, Config, EmbeddingProviderConfig, LlmProviderConfig, Providers, Qdrant,
	Retrieval, Service, Storage,
};
use mnemo_domain::{Category, EntityRegistry, EvidenceItem, Message};
use mnemo_service::{
	AnswerProvider, BoxFuture, ClassifierProvider, EmbeddingProvider, MnemoService,
	QuestionRequest, VectorIndex,
};
use mnemo_storage::{corpus::Corpus, qdrant::MessageFilter};

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		corpus: mnemo_config::Corpus {
			messages_path: "unused.json".to_string(),
			registry_path: "unused.json".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "messages".to_string(),
				vector_dim: 4,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				dimensions: 4,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			classifier: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			answerer: AnswerProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.2,
				max_tokens: 500,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		retrieval: Retrieval::default(),
	}
}

struct NoNameClassifier;
impl ClassifierProvider for NoNameClassifier {
	fn classify<'a>(
		&'a self,
		_: &'a LlmProviderConfig,
		_: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<Value>> {
		Box::pin(async { Ok(json!({ "user_name": null, "category": [] })) })
	}
}

struct ZeroEmbedding;
impl EmbeddingProvider for ZeroEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(texts.iter().map(|_| vec![0.; cfg.dimensions as usize]).collect()) })
	}
}

struct CannedAnswerer;
impl AnswerProvider for CannedAnswerer {
	fn answer<'a>(
		&'a self,
		_: &'a AnswerProviderConfig,
		_: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async { Ok("The villa is booked for August.".to_string()) })
	}
}

struct BrokenAnswerer;
impl AnswerProvider for BrokenAnswerer {
	fn answer<'a>(
		&'a self,
		_: &'a AnswerProviderConfig,
		_: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async { Err(color_eyre::eyre::eyre!("model endpoint unreachable")) })
	}
}

struct EmptyIndex;
impl VectorIndex for EmptyIndex {
	fn nearest<'a>(
		&'a self,
		_: &'a [f32],
		_: &'a MessageFilter,
		_: u64,
	) -> BoxFuture<'a, color_eyre::Result<Vec<EvidenceItem>>> {
		Box::pin(async { Ok(Vec::new()) })
	}
}

fn test_state(answerer: impl AnswerProvider + 'static) -> AppState {
	let corpus = Corpus::new(
		vec![Message {
			id: 1,
			user_id: None,
			user_name: "vikram desai".to_string(),
			timestamp: 1,
			category: Category::TravelAccommodation,
			text: "Book a villa in Tuscany.".to_string(),
		}],
		EntityRegistry::new(vec!["Vikram Desai".to_string()]),
	);
	let service = MnemoService::with_collaborators(
		test_config(),
		corpus,
		mnemo_service::Providers::new(
			Arc::new(NoNameClassifier),
			Arc::new(ZeroEmbedding),
			Arc::new(answerer),
		),
		Arc::new(EmptyIndex),
	);

	AppState::with_service(service)
}

fn question_request(question: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/question")
		.header("content-type", "application/json")
		.body(Body::from(json!({ "question": question }).to_string()))
		.expect("Failed to build request.")
}

async fn response_json(response: axum::response::Response) -> Value {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&body).expect("Failed to parse response.")
}

#[tokio::test]
async fn health_ok() {
	let app = routes::router(test_state(CannedAnswerer));
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn question_returns_answer() {
	let app = routes::router(test_state(CannedAnswerer));
	let response = app
		.oneshot(question_request("When is the villa booked?"))
		.await
		.expect("Failed to call /question.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = response_json(response).await;

	assert_eq!(json["answer"], "The villa is booked for August.");
}

#[tokio::test]
async fn question_rejects_blank_input() {
	let app = routes::router(test_state(CannedAnswerer));
	let response =
		app.oneshot(question_request("   ")).await.expect("Failed to call /question.");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let json = response_json(response).await;

	assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn question_maps_provider_failure_to_bad_gateway() {
	let app = routes::router(test_state(BrokenAnswerer));
	let response = app
		.oneshot(question_request("When is the villa booked?"))
		.await
		.expect("Failed to call /question.");

	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

	let json = response_json(response).await;

	assert_eq!(json["error_code"], "upstream_unavailable");
}

// QuestionRequest is the wire type; keep its field name pinned.
#[test]
fn question_request_deserializes_wire_shape() {
	let request: QuestionRequest =
		serde_json::from_value(json!({ "question": "hi" })).expect("Failed to parse request.");

	assert_eq!(request.question, "hi");
}
