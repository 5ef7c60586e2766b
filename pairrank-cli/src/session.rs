/// Asynchronous sort session.
///
/// The merge sort blocks on every comparison, while an event-driven UI must stay
/// responsive. So the sort runs on its own thread of control and the two sides
/// only ever exchange messages:
///
/// - sorter: runs the engine with a [`DecisionOracle`] that turns every
///   comparison into a [`ComparisonRequest`] and waits on that request's reply slot.
/// - relay: forwards requests into the UI [`Mailbox`] in issue order, and injects
///   exactly one [`UiEvent::Quit`] once the sorter is done.
/// - UI: any [`SessionUi`]. It answers requests at its own pace.
///
/// When the UI stops first, the session cancels the sorter and waits for it,
/// so nothing outlives [`run_session`].
use std::io;

use pairrank_core::{CancelToken, DecisionOracle, OracleError, Ranking, sort_with_cancel};
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinError;
use tracing::debug;

/// One pairwise question from the sorter, with a single-use reply slot.
#[derive(Debug)]
pub struct ComparisonRequest {
    pub a: String,
    pub b: String,
    reply: oneshot::Sender<bool>,
}

impl ComparisonRequest {
    /// A request plus the receiving end of its reply slot.
    pub(crate) fn new(a: &str, b: &str) -> (Self, oneshot::Receiver<bool>) {
        let (reply, answer) = oneshot::channel();
        let request = ComparisonRequest {
            a: a.to_string(),
            b: b.to_string(),
            reply,
        };
        (request, answer)
    }

    /// Deliver the answer (`true` prefers `a`). Consumes the request, so a slot
    /// can only be written once. Returns `false` if the sorter stopped waiting.
    pub fn answer(self, prefer_a: bool) -> bool {
        self.reply.send(prefer_a).is_ok()
    }
}

#[derive(Debug)]
pub enum UiEvent {
    Compare(ComparisonRequest),
    Quit,
}

/// The UI side of the relay. A closed mailbox reads as [`UiEvent::Quit`].
pub struct Mailbox {
    rx: mpsc::UnboundedReceiver<UiEvent>,
}

impl Mailbox {
    /// The relay's sending end and the mailbox it feeds.
    pub(crate) fn channel() -> (mpsc::UnboundedSender<UiEvent>, Mailbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Mailbox { rx })
    }

    /// Block until the next event. Only call from a blocking thread.
    #[cfg(test)]
    pub fn recv_blocking(&mut self) -> UiEvent {
        self.rx.blocking_recv().unwrap_or(UiEvent::Quit)
    }

    /// Next event if one is queued.
    pub fn try_recv(&mut self) -> Option<UiEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(UiEvent::Quit),
        }
    }
}

/// An event-driven UI that answers comparisons.
pub trait SessionUi: Send + 'static {
    /// Run until the UI decides to stop (user quit or [`UiEvent::Quit`]).
    ///
    /// Called on a blocking thread. Dropping an unanswered request cancels the sort.
    fn run(self, mailbox: Mailbox) -> io::Result<()>;
}

#[derive(Debug)]
pub enum SessionOutcome {
    Completed(Ranking),
    /// The UI stopped before the sort finished. No partial ranking.
    Aborted,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("UI runtime failed: {0}")]
    Ui(#[from] io::Error),
    #[error("session worker panicked: {0}")]
    Worker(#[from] JoinError),
}

/// Sorter-side oracle: hand the pair to the relay, then wait for this request's reply.
struct ChannelOracle {
    requests: mpsc::Sender<ComparisonRequest>,
}

impl DecisionOracle for ChannelOracle {
    fn prefer(&mut self, a: &str, b: &str) -> Result<bool, OracleError> {
        let (request, answer) = ComparisonRequest::new(a, b);
        // Either channel closing means the UI is gone.
        self.requests
            .blocking_send(request)
            .map_err(|_| OracleError::Cancelled)?;
        answer.blocking_recv().map_err(|_| OracleError::Cancelled)
    }
}

/// Rank `items` by letting `ui` answer every comparison.
///
/// Returns once the UI loop has stopped and both the sorter and the relay have
/// been joined.
pub async fn run_session<U: SessionUi>(items: Vec<String>, ui: U) -> Result<SessionOutcome, SessionError> {
    // Capacity 1: the sorter can never get ahead of the UI by more than the
    // request it is currently blocked on.
    let (request_tx, request_rx) = mpsc::channel(1);
    let (mailbox_tx, mailbox) = Mailbox::channel();
    let (done_tx, done_rx) = oneshot::channel();
    let (result_tx, mut result_rx) = oneshot::channel();
    let cancel = CancelToken::new();

    let sorter = tokio::task::spawn_blocking({
        let cancel = cancel.clone();
        move || {
            let mut oracle = ChannelOracle { requests: request_tx };
            match sort_with_cancel(&items, &mut oracle, &cancel) {
                Ok(ranking) => {
                    debug!(comparisons = ranking.comparisons(), "sorter finished");
                    // Result first, so it is in place before the UI is told to stop.
                    let _ = result_tx.send(ranking);
                    let _ = done_tx.send(());
                }
                Err(err) => debug!(%err, "sorter stopped without a ranking"),
            }
            // Dropping the oracle closes the request channel.
        }
    });

    let relay = tokio::spawn(relay(request_rx, done_rx, mailbox_tx));

    let ui_result = tokio::task::spawn_blocking(move || ui.run(mailbox)).await;

    // The UI is gone: nobody is left to answer. A no-op if the sort already finished.
    cancel.cancel();
    sorter.await?;
    relay.await?;
    ui_result??;

    let outcome = match result_rx.try_recv() {
        Ok(ranking) => SessionOutcome::Completed(ranking),
        Err(_) => SessionOutcome::Aborted,
    };
    debug!(completed = matches!(outcome, SessionOutcome::Completed(_)), "session over");
    Ok(outcome)
}

/// Forward requests to the UI until the sorter is done, then send a single Quit.
///
/// Completion is watched on two paths (the done signal and the request channel
/// closing) so a finish between two requests is never missed.
async fn relay(
    mut requests: mpsc::Receiver<ComparisonRequest>,
    mut done: oneshot::Receiver<()>,
    mailbox: mpsc::UnboundedSender<UiEvent>,
) {
    loop {
        tokio::select! {
            request = requests.recv() => match request {
                Some(request) => {
                    debug!(a = %request.a, b = %request.b, "relaying comparison");
                    if mailbox.send(UiEvent::Compare(request)).is_err() {
                        debug!("UI mailbox closed, relay stopping");
                        return;
                    }
                }
                None => {
                    debug!("request channel closed");
                    break;
                }
            },
            _ = &mut done => {
                debug!("sort completion signalled");
                break;
            }
            _ = mailbox.closed() => {
                debug!("UI mailbox closed, relay stopping");
                return;
            }
        }
    }
    let _ = mailbox.send(UiEvent::Quit);
}
