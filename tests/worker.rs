mod common;

use common::{PanickingHub, RecordingHub, EOS_CONFIG, EOS_TOKENIZER};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokviz::worker::{TokenizeRequest, Worker, WorkerUpdate};
use tokviz::{PlaygroundError, SessionManager};

fn request(prompt: &str, model_id: &str) -> TokenizeRequest {
    TokenizeRequest {
        prompt: prompt.to_string(),
        model_id: model_id.to_string(),
        auth_token: None,
    }
}

/// Poll until nothing is in flight, collecting every update on the way.
fn drain(worker: &mut Worker) -> Vec<WorkerUpdate> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut seen = Vec::new();
    while worker.is_busy() {
        assert!(Instant::now() < deadline, "worker never finished");
        seen.extend(worker.poll());
        std::thread::sleep(Duration::from_millis(5));
    }
    seen
}

#[test]
fn announces_loading_only_on_first_use() {
    let hub = RecordingHub::new().serve("gpt2", EOS_TOKENIZER, EOS_CONFIG);
    let sessions = Arc::new(SessionManager::new(hub));
    let mut worker = Worker::default();

    worker.spawn_tokenize(Arc::clone(&sessions), request("hello world", "gpt2"));
    let first = drain(&mut worker);
    assert_eq!(first.len(), 2);
    assert!(matches!(&first[0], WorkerUpdate::Loading { model_id } if model_id == "gpt2"));
    assert!(matches!(&first[1], WorkerUpdate::Done { result: Ok(t), .. } if t.rows.len() == 2));

    worker.spawn_tokenize(Arc::clone(&sessions), request("hello", "gpt2"));
    let second = drain(&mut worker);
    assert_eq!(second.len(), 1);
    assert!(matches!(&second[0], WorkerUpdate::Done { result: Ok(_), .. }));
}

#[test]
fn failures_come_back_as_done() {
    let sessions = Arc::new(SessionManager::new(RecordingHub::new()));
    let mut worker = Worker::default();

    worker.spawn_tokenize(sessions, request("hello", "t5-small"));
    let updates = drain(&mut worker);
    match updates.last() {
        Some(WorkerUpdate::Done { model_id, result }) => {
            assert_eq!(model_id, "t5-small");
            assert_eq!(
                result.as_ref().unwrap_err(),
                &PlaygroundError::Fetch {
                    status: 404,
                    resource: "tokenizer.json".to_string(),
                }
            );
        }
        other => panic!("expected Done, got {:?}", other),
    }
}

#[test]
fn panicking_load_still_reports_done() {
    let sessions = Arc::new(SessionManager::new(PanickingHub));
    let mut worker = Worker::default();

    worker.spawn_tokenize(Arc::clone(&sessions), request("hello", "gpt2"));
    let updates = drain(&mut worker);

    assert!(!worker.is_busy());
    match updates.last() {
        Some(WorkerUpdate::Done {
            result: Err(PlaygroundError::WorkerPanic(message)),
            ..
        }) => assert!(message.contains("tokenizer.json"), "{message}"),
        other => panic!("expected a panic report, got {:?}", other),
    }
    assert!(!sessions.is_cached("gpt2"));

    // The channel and manager survive the crashed thread.
    worker.spawn_tokenize(sessions, request("  ", "gpt2"));
    let updates = drain(&mut worker);
    assert!(matches!(
        updates.last(),
        Some(WorkerUpdate::Done {
            result: Err(PlaygroundError::EmptyPrompt),
            ..
        })
    ));
}
