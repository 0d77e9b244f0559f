//! Event channel plumbing.

use tokio::sync::mpsc;
use tracing::debug;

use crate::event::AgentEvent;

/// Create one request's event pipe: an emitter held by the agent task and a
/// receiver handed to the client.
#[must_use]
pub fn channel() -> (EventEmitter, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventEmitter { tx }, EventReceiver { rx })
}

/// Producing side, held by the agent task.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    tx: mpsc::UnboundedSender<AgentEvent>,
}

impl EventEmitter {
    /// Emit one event.
    ///
    /// Infallible from the loop's view: a closed receiver means the client
    /// went away, and the event is dropped.
    pub fn emit(&self, event: AgentEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }

    /// Emit the terminal [`AgentEvent::End`]. Consumes the emitter so a
    /// stream cannot continue past its end.
    pub fn finish(self) {
        self.emit(AgentEvent::End);
    }

    /// Whether the client is still listening.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Consuming side, handed to the client.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<AgentEvent>,
}

impl EventReceiver {
    /// Receive the next event. `None` after [`AgentEvent::End`] has been
    /// consumed and the emitter dropped.
    pub async fn recv(&mut self) -> Option<AgentEvent> {
        self.rx.recv().await
    }

    /// Drain all remaining events, through `End`.
    pub async fn collect_all(mut self) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.recv().await {
            let end = event.is_end();
            events.push(event);
            if end {
                break;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeward_core::SessionId;

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let (emitter, receiver) = channel();
        let session_id = SessionId::new();

        emitter.emit(AgentEvent::Session {
            session_id: session_id.clone(),
        });
        emitter.emit(AgentEvent::Text("hello".to_string()));
        emitter.finish();

        let events = receiver.collect_all().await;
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], AgentEvent::Session { .. }));
        assert!(matches!(events[1], AgentEvent::Text(_)));
        assert!(events[2].is_end());
    }

    #[tokio::test]
    async fn test_emit_after_receiver_dropped_is_silent() {
        let (emitter, receiver) = channel();
        drop(receiver);
        assert!(!emitter.is_open());
        emitter.emit(AgentEvent::Text("nobody home".to_string()));
        emitter.finish();
    }

    #[tokio::test]
    async fn test_collect_stops_at_end() {
        let (emitter, receiver) = channel();
        emitter.emit(AgentEvent::Text("a".to_string()));
        emitter.finish();

        let events = receiver.collect_all().await;
        assert_eq!(events.len(), 2);
        assert!(events[1].is_end());
    }
}
