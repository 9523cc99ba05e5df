//! # blindhubd: blindhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the tracing subscriber
//! - Construct the virtual integration, the sun provider and the mode store
//! - Construct the controller and restore the persisted mode switches
//! - Start the scheduler on the event bus and hand the bus to the simulator
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use blindhub_adapter_http_axum::state::{AppState, SimulatorState};
use blindhub_adapter_virtual::VirtualIntegration;
use blindhub_adapter_virtual::simulator::Simulator;
use blindhub_adapter_virtual::store::JsonFileModeStore;
use blindhub_adapter_virtual::sun::AstronomicalSun;
use blindhub_app::controller::BlindController;
use blindhub_app::event_bus::InProcessEventBus;
use blindhub_app::ports::SystemClock;
use blindhub_app::scheduler::Scheduler;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Integrations
    let integration = Arc::new(VirtualIntegration::from_config(&config.simulation)?);
    let sun = AstronomicalSun::new(config.location);
    let store = JsonFileModeStore::new(config.state.path.clone());

    // Controller
    let controller = Arc::new(BlindController::new(
        config.rule_set(),
        config.sensor_bindings()?,
        Arc::clone(&integration),
        sun,
        SystemClock,
        Arc::clone(&integration),
        store,
    ));
    controller.start(config.initially_enabled()?).await?;

    // Event bus + scheduler
    let event_bus = InProcessEventBus::new(256);
    let scheduler = Scheduler::start(
        Arc::clone(&controller),
        event_bus.subscribe(),
        config.tick_interval(),
    );

    // Smoke zones changed by hand publish on the same bus the scheduler reads
    let simulator = Simulator::new(Arc::clone(&integration), event_bus.clone());

    // HTTP
    let app = blindhub_adapter_http_axum::router::build_with_simulator(
        AppState::new(controller),
        SimulatorState::new(Arc::new(simulator)),
    );

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "blindhubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    drop(event_bus);
    tracing::info!("blindhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
