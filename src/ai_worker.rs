use crate::ai::{GenerativeService, fetch_quiz_item};
use crate::error::GenerationError;
use crate::models::{FetchRequest, FetchResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::thread;
use tracing::{debug, error, info};

/// Run quiz fetches off the UI thread, one at a time, in arrival order.
///
/// `service` is whatever the caller managed to construct; if that failed the
/// worker still answers every request, with the construction error. The
/// thread exits once the request channel is closed.
pub fn spawn_fetch_worker<S>(
    service: Result<S, GenerationError>,
    responses: Sender<FetchResponse>,
    requests: Receiver<FetchRequest>,
) -> io::Result<thread::JoinHandle<()>>
where
    S: GenerativeService + 'static,
{
    thread::Builder::new()
        .name("fruit-master::fetch_worker".to_string())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| GenerationError::Transport(format!("Failed to start runtime: {}", e)));

            for request in requests.iter() {
                debug!(id = request.id, "worker received fetch request");

                let result = match (&runtime, &service) {
                    (Ok(rt), Ok(service)) => rt.block_on(fetch_quiz_item(
                        service,
                        request.difficulty,
                        &request.excluded_words,
                    )),
                    (Err(e), _) | (_, Err(e)) => Err(e.clone()),
                };

                if let Err(e) = &result {
                    error!(id = request.id, error = %e, "fetch failed");
                }

                let response = FetchResponse {
                    request_id: request.id,
                    result,
                };
                if responses.send(response).is_err() {
                    break;
                }
            }
            info!("fetch worker channel disconnected, exiting");
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::generator::MockService;
    use crate::models::Difficulty;
    use std::time::Duration;

    const KIWI_JSON: &str = r#"{"word": "kiwi", "definition": "A small brown fuzzy fruit, green inside.", "options": ["fig", "kiwi", "plum", "lime"], "correctOptionIndex": 1}"#;

    fn request(id: u64) -> FetchRequest {
        FetchRequest {
            id,
            difficulty: Difficulty::Beginner,
            excluded_words: vec![],
        }
    }

    #[test]
    fn test_worker_answers_with_request_id() {
        let service = MockService::new()
            .with_text(Ok(KIWI_JSON.to_string()))
            .with_image(Ok(MockService::image_reply("data:image/png;base64,aGVsbG8=")));
        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (resp_tx, resp_rx) = crossbeam_channel::unbounded();
        let handle = spawn_fetch_worker(Ok(service), resp_tx, req_rx).unwrap();

        req_tx.send(request(7)).unwrap();
        let response = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(response.request_id, 7);
        assert_eq!(response.result.unwrap().word, "kiwi");

        drop(req_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_worker_reports_construction_error() {
        let (req_tx, req_rx) = crossbeam_channel::unbounded();
        let (resp_tx, resp_rx) = crossbeam_channel::unbounded();
        let handle = spawn_fetch_worker::<MockService>(
            Err(GenerationError::transport("OPENROUTER_API_KEY is not set")),
            resp_tx,
            req_rx,
        )
        .unwrap();

        req_tx.send(request(1)).unwrap();
        req_tx.send(request(2)).unwrap();
        for expected in [1, 2] {
            let response = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
            assert_eq!(response.request_id, expected);
            assert!(matches!(response.result, Err(GenerationError::Transport(_))));
        }

        drop(req_tx);
        handle.join().unwrap();
    }
}
