use std::future::Future;

use anyhow::{Error, Result};
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Runs named long-lived tasks. The first failing task, or Ctrl-C, cancels
/// the shared token so the remaining tasks can wind down.
pub struct Supervisor {
    shutdown: CancellationToken,
    tasks: JoinSet<(&'static str, Result<()>)>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            shutdown: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn spawn<F, Fut>(&mut self, name: &'static str, factory: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let shutdown = self.shutdown.child_token();
        self.tasks.spawn(async move {
            let result = factory(shutdown).await;
            (name, result)
        });
    }

    pub async fn run(mut self) -> Result<()> {
        let mut first_err: Option<Error> = None;

        while !self.tasks.is_empty() {
            tokio::select! {
                Some(outcome) = self.tasks.join_next() => {
                    self.handle_task_outcome(&mut first_err, outcome);
                }
                _ = tokio::signal::ctrl_c(), if !self.shutdown.is_cancelled() => {
                    tracing::info!("Received Ctrl-C, shutting down");
                    self.shutdown.cancel();
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn handle_task_outcome(
        &self,
        first_err: &mut Option<Error>,
        outcome: std::result::Result<(&'static str, Result<()>), JoinError>,
    ) {
        let err = match outcome {
            Ok((name, Ok(()))) => {
                tracing::info!("Task `{}` exited gracefully", name);
                return;
            }
            Ok((name, Err(err))) => {
                tracing::error!("Task `{}` exited with error: {:#}", name, err);
                err
            }
            Err(join_err) => {
                tracing::error!("Task panicked: {:?}", join_err);
                join_err.into()
            }
        };

        if first_err.is_none() {
            *first_err = Some(err);
        }
        if !self.shutdown.is_cancelled() {
            tracing::warn!("Supervisor shutting down");
            self.shutdown.cancel();
        }
    }
}
