use anyhow::Result;
use async_trait::async_trait;
use gemini_llm::{GenerateClient, GenerateRequest, GenerateResponse};
use gemini_mcp::tools::{self, AskArgs, EMPTY_RESPONSE_MESSAGE, RESPONSE_LABEL, UNAVAILABLE_PREFIX};
use gemini_mcp::{Availability, Config, ErrorKind, Reply};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Backend double that records every request it sees
struct MockClient {
    outcome: Box<dyn Fn() -> Result<GenerateResponse> + Send + Sync>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockClient {
    fn replying(text: &'static str) -> Arc<Self> {
        Self::with(move || Ok(GenerateResponse::text(text)))
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Self::with(move || Err(anyhow::anyhow!(message)))
    }

    fn with(outcome: impl Fn() -> Result<GenerateResponse> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            outcome: Box::new(outcome),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> GenerateRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl GenerateClient for MockClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        (self.outcome)()
    }
}

fn available(mock: &Arc<MockClient>) -> Availability {
    Availability::available(mock.clone(), "gemini-test")
}

#[tokio::test]
async fn test_unavailable_short_circuits() {
    // Built without a key, so there is no client to call at all
    let availability = Availability::establish(&Config::default());
    assert!(availability.handle().is_none());

    let reply = tools::ask(&availability, AskArgs::new("hello")).await;

    assert_eq!(
        reply,
        format!("{}{}", UNAVAILABLE_PREFIX, availability.error().unwrap())
    );
    assert!(reply.contains("GEMINI_API_KEY"));
    assert!(!reply.contains(RESPONSE_LABEL));
}

#[tokio::test]
async fn test_ask_forwards_plain_prompt() {
    let mock = MockClient::replying("Paris");
    let availability = available(&mock);

    let reply = tools::ask(&availability, AskArgs::new("Capital of France?")).await;

    assert_eq!(reply, format!("{}Paris", RESPONSE_LABEL));
    assert_eq!(mock.calls(), 1);

    let request = mock.last_request();
    assert_eq!(request.model, "gemini-test");
    assert_eq!(request.prompt, "Capital of France?");
    assert_eq!(request.system_instruction, None);
    assert_eq!(request.options.temperature, Some(0.5));
    assert_eq!(request.options.max_output_tokens, Some(8192));
}

#[tokio::test]
async fn test_ask_composes_context() {
    let mock = MockClient::replying("ok");
    let availability = available(&mock);

    tools::ask(
        &availability,
        AskArgs::new("Any bugs?").context("fn add(a: i32) -> i32 { a }"),
    )
    .await;

    assert_eq!(
        mock.last_request().prompt,
        "Context: fn add(a: i32) -> i32 { a }\n\nQuery: Any bugs?"
    );
}

#[tokio::test]
async fn test_ask_persona_sets_system_instruction() {
    let mock = MockClient::replying("ok");
    let availability = available(&mock);

    tools::ask(
        &availability,
        AskArgs::new("Review this").persona("senior architect").temperature(0.9),
    )
    .await;

    let request = mock.last_request();
    assert_eq!(request.prompt, "Review this");
    assert!(request
        .system_instruction
        .as_deref()
        .unwrap()
        .contains("senior architect"));
    assert_eq!(request.options.temperature, Some(0.9));

    // The shared handle stays without an instruction
    assert_eq!(availability.handle().unwrap().system_instruction(), None);
}

#[tokio::test]
async fn test_temperature_is_not_validated() {
    let mock = MockClient::replying("ok");
    let availability = available(&mock);

    tools::ask(&availability, AskArgs::new("").temperature(7.5)).await;

    let request = mock.last_request();
    assert_eq!(request.prompt, "");
    assert_eq!(request.options.temperature, Some(7.5));
}

#[tokio::test]
async fn test_empty_response_is_not_an_error() {
    let mock = MockClient::with(|| Ok(GenerateResponse::text("")));
    let availability = available(&mock);

    let reply = tools::ask(&availability, AskArgs::new("hi")).await;

    assert_eq!(reply, format!("{}{}", RESPONSE_LABEL, EMPTY_RESPONSE_MESSAGE));
}

#[tokio::test]
async fn test_filtered_response_is_safety_error() {
    let mock = MockClient::with(|| {
        Ok(GenerateResponse {
            finish_reason: Some("SAFETY".to_string()),
            ..Default::default()
        })
    });
    let handle = available(&mock).handle().cloned().unwrap();

    let error = handle.call("hi", 0.5, None).await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::SafetyFiltered);
    assert!(error.message.contains("SAFETY"));
}

#[tokio::test]
async fn test_backend_errors_are_classified() {
    let cases = [
        ("Quota Exceeded for today", ErrorKind::RateLimited, "Rate limit or quota exceeded."),
        (
            "Content blocked by SAFETY filter",
            ErrorKind::SafetyFiltered,
            "Content was filtered due to safety policies.",
        ),
        ("connection reset", ErrorKind::Generic, "Error calling Gemini: connection reset"),
    ];

    for (message, kind, rendered) in cases {
        let mock = MockClient::failing(message);
        let availability = available(&mock);

        let error = availability
            .handle()
            .unwrap()
            .call("hi", 0.5, None)
            .await
            .unwrap_err();
        assert_eq!(error.kind, kind, "{}", message);
        assert_eq!(error.message, message);

        let reply = tools::ask(&availability, AskArgs::new("hi")).await;
        assert!(reply.starts_with(RESPONSE_LABEL));
        assert!(reply.contains(rendered), "{}", reply);
        assert!(reply.contains(message));
    }
}

#[tokio::test]
async fn test_call_with_empty_instruction_uses_shared_handle() {
    let mock = MockClient::replying("ok");
    let handle = available(&mock).handle().cloned().unwrap();

    let result = handle.call("hi", 0.2, Some("")).await;

    assert_eq!(result, Ok(Reply::Text("ok".to_string())));
    assert_eq!(mock.last_request().system_instruction, None);
}

#[test]
fn test_status_is_idempotent() {
    let mock = MockClient::replying("ok");
    let availability = available(&mock);

    let first = tools::status(&availability);
    let second = tools::status(&availability);

    assert_eq!(first, second);
    assert!(first.contains("✅ ONLINE"));
    assert!(first.contains("Model: gemini-test"));
    assert!(first.contains("Gemini Available: True\n"));
    assert!(!first.contains("Error:"));
    assert_eq!(mock.calls(), 0);
}

#[test]
fn test_status_offline_without_key_or_model() {
    let config = Config::from_vars(Vec::<(String, String)>::new()).unwrap();
    let availability = Availability::establish(&config);

    let report = tools::status(&availability);

    assert!(report.contains("❌ OFFLINE"));
    assert!(report.contains("Model: N/A"));
    assert!(report.contains("Error: "));
    assert!(report.contains("GEMINI_API_KEY"));
}

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_call_is_quiet_at_info_level() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let failing = MockClient::failing("Quota exceeded for today");
    let reply = tools::ask(&available(&failing), AskArgs::new("hi")).await;
    let blocked = MockClient::with(|| {
        Ok(GenerateResponse {
            block_reason: Some("SAFETY".to_string()),
            ..Default::default()
        })
    });
    tools::ask(&available(&blocked), AskArgs::new("hi")).await;

    assert!(reply.contains("Rate limit or quota exceeded"));
    assert!(logs.0.lock().unwrap().is_empty());
}
