// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SSE STREAMING - Bridge CrewProgress → Server-Sent Events
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::response::{
    sse::{Event, KeepAlive, Sse},
    IntoResponse, Response,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use super::types::{ApiError, GenerateResponse};
use super::AppState;
use crate::crew::{ContentCrew, CrewProgress, ProgressCallback};

/// Intervalo entre verificações de cliente desconectado
const DISCONNECT_POLL: Duration = Duration::from_millis(250);

/// Payload interno enviado pelo broadcast channel
#[derive(Debug, Clone)]
pub enum SsePayload {
    /// Evento de progresso do crew
    Progress(CrewProgress),
    /// Post pronto
    Completed(Box<GenerateResponse>),
    /// Execução abortada
    Failed(ApiError),
}

/// Cria a resposta SSE e roda o crew em background.
///
/// 1. Cria um broadcast channel (receiver criado antes do spawn)
/// 2. Liga o ProgressCallback ao channel
/// 3. Spawna o kickoff em uma task tokio
/// 4. O stream termina quando a task solta o último sender
///
/// Se o cliente desconecta, o kickoff é cancelado entre chamadas ao LLM.
pub fn handle_streaming(state: Arc<AppState>, topic: String) -> Response {
    let (tx, rx) = broadcast::channel::<SsePayload>(64);
    let tx_callback = tx.clone();

    // ProgressCallback síncrono → broadcast::send (non-blocking)
    let progress_callback: ProgressCallback = Arc::new(move |event: CrewProgress| {
        let _ = tx_callback.send(SsePayload::Progress(event));
    });

    let crew = state.crew().with_progress_callback(progress_callback);

    tokio::spawn(drive_run(crew, topic, tx));

    Sse::new(build_sse_stream(rx))
        .keep_alive(KeepAlive::default())
        .into_response()
}

/// Roda o kickoff enquanto houver receiver; o drop do future cancela a
/// chamada em andamento.
///
/// Retorna `None` quando o cliente foi embora antes do fim.
async fn drive_run(
    crew: ContentCrew,
    topic: String,
    tx: broadcast::Sender<SsePayload>,
) -> Option<()> {
    let run = crew.kickoff(&topic);
    tokio::pin!(run);
    let mut poll = tokio::time::interval(DISCONNECT_POLL);

    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            _ = poll.tick() => {
                if tx.receiver_count() == 0 {
                    log::warn!("[SSE] Cliente desconectou, cancelando \"{}\"", topic);
                    return None;
                }
            }
        }
    };

    let payload = match result {
        Ok(output) => SsePayload::Completed(Box::new(GenerateResponse::from(&output))),
        Err(err) => SsePayload::Failed(ApiError::from_crew_error(&err).1),
    };
    let _ = tx.send(payload);
    Some(())
}

/// Constrói o stream SSE a partir do broadcast receiver.
///
/// Emite `stage_started` / `stage_completed` por estágio e termina com
/// `completed` (post final) ou `error`.
fn build_sse_stream(
    rx: broadcast::Receiver<SsePayload>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|msg| async move {
        match msg {
            Ok(payload) => payload_to_event(&payload).map(Ok),
            Err(e) => {
                log::warn!("[SSE] Evento perdido: {}", e);
                None
            }
        }
    })
}

/// Converte um payload em evento SSE nomeado (ou nada)
fn payload_to_event(payload: &SsePayload) -> Option<Event> {
    let (name, json) = match payload {
        SsePayload::Progress(progress @ CrewProgress::StageStarted { .. }) => {
            ("stage_started", serde_json::to_string(progress))
        }
        SsePayload::Progress(progress @ CrewProgress::StageCompleted { .. }) => {
            ("stage_completed", serde_json::to_string(progress))
        }
        // Started/Finished/StageFailed são cobertos pelos eventos terminais
        SsePayload::Progress(_) => return None,
        SsePayload::Completed(response) => ("completed", serde_json::to_string(response)),
        SsePayload::Failed(error) => ("error", serde_json::to_string(error)),
    };

    match json {
        Ok(data) => Some(Event::default().event(name).data(data)),
        Err(e) => {
            log::error!("[SSE] Falha ao serializar {}: {}", name, e);
            None
        }
    }
}
