//! Serial message loop between the UI surface and a session.

use a11yx_core::{HostDocument, Notifier};
use tokio::sync::mpsc;

use crate::commands::{UiMessage, UiResponse};
use crate::painter::BadgePainter;
use crate::session::Session;

/// Drain `inbox` in receipt order, one command at a time
///
/// A command runs to completion, repaint included, before the next message
/// is taken. Returns the number of messages processed once the inbox closes
/// or the UI stops listening.
pub async fn serve<N: Notifier>(
    session: &mut Session,
    host: &mut dyn HostDocument,
    painter: &mut dyn BadgePainter,
    mut notifier: Option<&mut N>,
    mut inbox: mpsc::Receiver<UiMessage>,
    outbox: mpsc::Sender<UiResponse>,
) -> usize {
    let mut processed = 0;
    while let Some(message) = inbox.recv().await {
        let context = notifier.as_deref_mut().map(|n| n as &mut dyn Notifier);
        let response = session.dispatch(host, painter, context, &message).await;
        processed += 1;
        if outbox.send(response).await.is_err() {
            tracing::debug!(
                component = module_path!(),
                processed,
                "ui channel closed, stopping"
            );
            break;
        }
    }
    processed
}
