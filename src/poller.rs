//! The polling loop: fetch, validate, translate, notify, sleep.
//!
//! Every error is contained within its cycle. Identical consecutive status
//! messages and identical consecutive error reports are sent only once.

use crate::api_client::StatusSource;
use crate::config::PollSettings;
use crate::error::CycleError;
use crate::homework::{check_response, next_cursor, parse_status};
use crate::notifier::Notifier;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

/// What the last successfully delivered messages were.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotificationState {
    pub last_message: Option<String>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message went out.
    Sent,
    /// The status message equals the last one sent.
    Unchanged,
    /// The API reported no homework since the cursor.
    NoUpdate,
}

pub struct Poller<S, N> {
    source: S,
    notifier: N,
    settings: PollSettings,
    cursor: i64,
    state: NotificationState,
    failures: u32,
}

impl<S: StatusSource, N: Notifier> Poller<S, N> {
    pub fn new(source: S, notifier: N, settings: PollSettings, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            settings,
            cursor,
            state: NotificationState::default(),
            failures: 0,
        }
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Runs cycles until `shutdown` resolves. Shutdown is only observed
    /// between cycles.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let delay = self.tick().await;
            debug!("Next poll in {}s", delay.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping poller");
                    break;
                }
            }
        }
    }

    /// One full cycle including error reporting. Returns the delay before
    /// the next one.
    pub async fn tick(&mut self) -> Duration {
        match self.run_cycle().await {
            Ok(outcome) => {
                debug!("Cycle finished: {:?}", outcome);
                self.failures = 0;
            }
            Err(err) => {
                self.failures = self.failures.saturating_add(1);
                self.report(err).await;
            }
        }
        self.next_delay()
    }

    /// Fetch, validate, translate and, if the text changed, notify.
    ///
    /// The cursor only moves forward when the whole cycle succeeded, so an
    /// undelivered update is requested again next time.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let response = self.source.fetch(self.cursor).await?;

        let outcome = match check_response(&response)? {
            None => {
                debug!("No homework updates since {}", self.cursor);
                CycleOutcome::NoUpdate
            }
            Some(homework) => {
                let message = parse_status(&homework)?;
                if self.state.last_message.as_deref() == Some(message.as_str()) {
                    debug!("Status unchanged, nothing to send");
                    CycleOutcome::Unchanged
                } else {
                    self.notifier.send(&message).await?;
                    info!("Status update sent: {}", message);
                    self.state.last_message = Some(message);
                    CycleOutcome::Sent
                }
            }
        };

        if let Some(cursor) = next_cursor(&response) {
            self.cursor = cursor;
        }
        Ok(outcome)
    }

    async fn report(&mut self, err: CycleError) {
        error!("Polling cycle failed: {}", err);

        // The chat is what just failed; reporting there would fail too.
        if matches!(err, CycleError::Send(_)) {
            return;
        }

        let message = format!("Сбой в работе программы: {}", err);
        if self.state.last_error.as_deref() == Some(message.as_str()) {
            debug!("Same error already reported, not sending again");
            return;
        }

        match self.notifier.send(&message).await {
            Ok(()) => self.state.last_error = Some(message),
            Err(e) => error!("Failed to report error to chat: {}", e),
        }
    }

    /// Interval after a clean cycle, doubled per consecutive failure up to
    /// the backoff ceiling.
    fn next_delay(&self) -> Duration {
        let interval = self.settings.interval;
        if self.failures == 0 {
            return interval;
        }
        let exponent = (self.failures - 1).min(16);
        let ceiling = self.settings.max_backoff.max(interval);
        interval.saturating_mul(1 << exponent).min(ceiling)
    }
}
