//! Scheduler: drives periodic ticks and dispatches bus events.
//!
//! [`Scheduler`] owns a background task that evaluates the enabled modes on
//! every interval and forwards mode commands and alarm events from the bus
//! to the [`ControlSurface`]. The first tick runs immediately.

use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use blindhub_domain::event::HostEvent;

use crate::ports::ControlSurface;

pub struct Scheduler<C> {
    control: C,
    events: broadcast::Receiver<HostEvent>,
    interval: Duration,
}

impl<C: ControlSurface + Send + Sync + 'static> Scheduler<C> {
    /// Spawn the scheduling loop.
    ///
    /// The loop stops once the bus is closed. Abort the returned handle to
    /// stop it earlier.
    pub fn start(
        control: C,
        events: broadcast::Receiver<HostEvent>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let scheduler = Self {
            control,
            events,
            interval,
        };
        tokio::spawn(scheduler.run())
    }

    async fn run(self) {
        let Self {
            control,
            mut events,
            interval,
        } = self;
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let transitions = control.tick().await;
                    tracing::debug!(transitions = transitions.len(), "scheduled tick");
                }
                received = events.recv() => match received {
                    Ok(event) => dispatch(&control, event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "scheduler lagged behind the event bus");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("event bus closed, scheduler stopping");
                        break;
                    }
                },
            }
        }
    }
}

async fn dispatch<C: ControlSurface>(control: &C, event: HostEvent) {
    tracing::debug!(%event, "host event received");
    match event {
        HostEvent::ModeCommand { mode, command } => {
            if let Err(err) = control.command_mode(mode, command).await {
                tracing::warn!(%mode, error = %err, "mode command rejected");
            }
        }
        HostEvent::Alarm(event) => {
            control.alarm(event).await;
        }
    }
}
