use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;



/// Deadline timer owning the generator's cancellation token
pub struct ShutdownManager {
    token: CancellationToken,
    timer: Option<JoinHandle<()>>
}

impl ShutdownManager {

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels now if the deadline has not fired yet and waits for the
    /// timer task to exit.
    pub async fn stop(self) {
        self.token.cancel();

        if let Some(timer) = self.timer {
            let _ = timer.await;
        }
    }
}



/// Starts a timer that cancels the returned manager's token once
/// `deadline` elapses.
///
/// A zero deadline yields a token that is already cancelled and no timer,
/// so the generator can observe it before its first send.
pub fn start_shutdown_manager(deadline: Duration) -> ShutdownManager {

    let token = CancellationToken::new();

    if deadline.is_zero() {
        token.cancel();
        return ShutdownManager { token, timer: None }
    }

    let signal = token.clone();
    let timer = tokio::spawn(async move {

        tokio::select! {
            // somebody cancelled early, nothing to wait for
            _ = signal.cancelled() => (),

            _ = tokio::time::sleep(deadline) => {
                tracing::debug!(?deadline, "deadline reached, cancelling generator");
                signal.cancel();
            }
        }
    });

    ShutdownManager { token, timer: Some(timer) }
}
