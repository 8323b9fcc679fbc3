//! Server-Sent Events support

use crate::conversation::ThreadSnapshot;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;

/// Convert snapshot updates to an SSE stream.
///
/// The first event (`init`) carries the state at subscription time; every
/// later change is sent as a `snapshot` event. Intermediate states may be
/// coalesced if the client reads slowly, the latest state is never lost.
/// The stream ends once `shutdown` is cancelled.
pub fn sse_stream(
    snapshot_rx: watch::Receiver<ThreadSnapshot>,
    shutdown: CancellationToken,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut first = true;
    let events = WatchStream::new(snapshot_rx)
        .map(move |snapshot| {
            let event_type = if first { "init" } else { "snapshot" };
            first = false;
            Ok(snapshot_to_event(event_type, &snapshot))
        })
        .take_until(shutdown.cancelled_owned());

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn snapshot_to_event(event_type: &str, snapshot: &ThreadSnapshot) -> Event {
    let data = json!({
        "type": event_type,
        "messages": snapshot.messages,
        "busy": snapshot.busy,
        "draft": snapshot.draft,
    });

    Event::default().event(event_type).data(data.to_string())
}
