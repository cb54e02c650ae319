use tokio::sync::mpsc;

use crate::session::SessionId;
use crate::tui::types::TuiMsg;
use crate::webhook::WebhookClient;

/// Fire the single outbound call for one dispatch. The result comes back to
/// the UI loop over the channel; the task never touches app state itself.
pub fn spawn_send(
    client: WebhookClient,
    tx: mpsc::UnboundedSender<TuiMsg>,
    session: SessionId,
    text: String,
) {
    tokio::spawn(async move {
        let res = client.send_message(&session, &text).await;
        let _ = tx.send(TuiMsg::Reply(res));
    });
}
