//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use blindhub_app::ports::{ControlSurface, HostSimulator};

use crate::state::{AppState, SimulatorState};

/// Build the top-level axum [`Router`].
///
/// Serves the JSON API under `/api` and a liveness check at `/health`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<C>(state: AppState<C>) -> Router
where
    C: ControlSurface + Send + Sync + 'static,
{
    assemble(crate::api::routes().with_state(state))
}

/// Same as [`build`], with the simulator routes mounted under `/api` too.
pub fn build_with_simulator<C, S>(state: AppState<C>, simulator: SimulatorState<S>) -> Router
where
    C: ControlSurface + Send + Sync + 'static,
    S: HostSimulator + Send + Sync + 'static,
{
    assemble(
        crate::api::routes()
            .with_state(state)
            .merge(crate::api::simulator_routes().with_state(simulator)),
    )
}

fn assemble(api: Router) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use blindhub_app::alarm_override::AlarmOutcome;
    use blindhub_domain::alarm::{AlarmEvent, AlarmEventKind, SmokeState};
    use blindhub_domain::device::{DeviceState, Position};
    use blindhub_domain::error::{BlindHubError, NotFoundError};
    use blindhub_domain::id::{DeviceRef, SensorRef};
    use blindhub_domain::mode::{Mode, ModeSwitch, SwitchCommand};
    use blindhub_domain::rule::{RuleTransition, Transition};
    use tower::ServiceExt;

    /// Control surface with only insulation configured.
    #[derive(Default)]
    struct StubControl {
        commands: Mutex<Vec<(Mode, SwitchCommand)>>,
        alarms: Mutex<Vec<AlarmEvent>>,
    }

    impl ControlSurface for StubControl {
        async fn modes(&self) -> Vec<ModeSwitch> {
            vec![ModeSwitch::new(Mode::Insulation)]
        }

        async fn command_mode(
            &self,
            mode: Mode,
            command: SwitchCommand,
        ) -> Result<ModeSwitch, BlindHubError> {
            if mode != Mode::Insulation {
                return Err(NotFoundError {
                    entity: "Mode",
                    id: mode.to_string(),
                }
                .into());
            }
            self.commands.lock().unwrap().push((mode, command));
            let mut switch = ModeSwitch::new(mode);
            switch.enabled = command == SwitchCommand::On;
            Ok(switch)
        }

        async fn tick(&self) -> Vec<RuleTransition> {
            vec![RuleTransition {
                mode: Mode::Insulation,
                rule: 0,
                transition: Transition::Activate,
            }]
        }

        async fn alarm(&self, event: AlarmEvent) -> AlarmOutcome {
            let alarmed = event.kind == AlarmEventKind::Alarm;
            self.alarms.lock().unwrap().push(event);
            AlarmOutcome {
                applied: true,
                alarmed,
                ..AlarmOutcome::default()
            }
        }
    }

    /// Simulator that knows a single smoke zone and a single blind.
    #[derive(Default)]
    struct StubSimulator {
        readings: Mutex<Vec<(SensorRef, Option<f64>)>>,
        smoke: Mutex<Vec<(SensorRef, SmokeState)>>,
    }

    impl HostSimulator for StubSimulator {
        async fn set_reading(
            &self,
            sensor: SensorRef,
            value: Option<f64>,
        ) -> Result<(), BlindHubError> {
            self.readings.lock().unwrap().push((sensor, value));
            Ok(())
        }

        async fn set_smoke_state(
            &self,
            sensor: SensorRef,
            state: SmokeState,
        ) -> Result<(), BlindHubError> {
            if sensor.as_str() != "smoke.kitchen" {
                return Err(NotFoundError {
                    entity: "SmokeZone",
                    id: sensor.to_string(),
                }
                .into());
            }
            self.smoke.lock().unwrap().push((sensor, state));
            Ok(())
        }

        async fn move_blind(
            &self,
            device: DeviceRef,
            level: Position,
        ) -> Result<DeviceState, BlindHubError> {
            if device.as_str() != "blind.living" {
                return Err(NotFoundError {
                    entity: "Device",
                    id: device.to_string(),
                }
                .into());
            }
            Ok(DeviceState {
                auto: false,
                level,
                target: None,
            })
        }
    }

    fn simulated_app() -> (Arc<StubSimulator>, Router) {
        let simulator = Arc::new(StubSimulator::default());
        let router = build_with_simulator(
            AppState::new(Arc::new(StubControl::default())),
            SimulatorState::new(Arc::clone(&simulator)),
        );
        (simulator, router)
    }

    fn app() -> (Arc<StubControl>, Router) {
        let control = Arc::new(StubControl::default());
        let router = build(AppState::new(Arc::clone(&control)));
        (control, router)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (_, app) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_list_configured_modes() {
        let (_, app) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/modes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!([{"mode": "insulation", "enabled": false, "active_rules": []}])
        );
    }

    #[tokio::test]
    async fn should_return_404_for_unconfigured_mode_lookup() {
        let (_, app) = app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/modes/shade")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_switch_mode_on() {
        let (control, app) = app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/modes/insulation",
                r#"{"command":"on"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["enabled"], true);
        assert_eq!(
            *control.commands.lock().unwrap(),
            vec![(Mode::Insulation, SwitchCommand::On)]
        );
    }

    #[tokio::test]
    async fn should_return_400_for_unknown_mode_name() {
        let (control, app) = app();

        let response = app
            .oneshot(json_request("PUT", "/api/modes/sunbathing", r#"{"command":"on"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(control.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_404_when_switching_unconfigured_mode() {
        let (_, app) = app();

        let response = app
            .oneshot(json_request("PUT", "/api/modes/shade", r#"{"command":"off"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Mode shade not found");
    }

    #[tokio::test]
    async fn should_reject_unknown_command() {
        let (_, app) = app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/modes/insulation",
                r#"{"command":"toggle"}"#,
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn should_report_transitions_of_forced_tick() {
        let (_, app) = app();

        let response = app
            .oneshot(json_request("POST", "/api/tick", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!([{"mode": "insulation", "rule": 0, "transition": "activate"}])
        );
    }

    #[tokio::test]
    async fn should_forward_alarm_event() {
        let (control, app) = app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/alarm",
                r#"{"kind":"alarm","source":"smoke.kitchen"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["applied"], true);
        assert_eq!(body["alarmed"], true);
        let alarms = control.alarms.lock().unwrap();
        assert_eq!(alarms[0].kind, AlarmEventKind::Alarm);
        assert_eq!(
            alarms[0].source.as_ref().map(|s| s.as_str()),
            Some("smoke.kitchen")
        );
    }

    #[tokio::test]
    async fn should_not_serve_simulator_routes_by_default() {
        let (_, app) = app();

        let response = app
            .oneshot(json_request("PUT", "/api/sensors/uv", r#"{"value":6.0}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_keep_control_routes_next_to_simulator_routes() {
        let (_, app) = simulated_app();

        let response = app
            .oneshot(json_request("POST", "/api/tick", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_store_sensor_reading() {
        let (simulator, app) = simulated_app();

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/sensors/uv", r#"{"value":6.5}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"sensor": "uv", "value": 6.5})
        );

        let response = app
            .oneshot(json_request("PUT", "/api/sensors/uv", r#"{"value":null}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let readings = simulator.readings.lock().unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].1, Some(6.5));
        assert_eq!(readings[1].1, None);
    }

    #[tokio::test]
    async fn should_change_smoke_zone_state() {
        let (simulator, app) = simulated_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/smoke/smoke.kitchen",
                r#"{"state":"timeout"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["state"], "timeout");
        assert_eq!(simulator.smoke.lock().unwrap()[0].1, SmokeState::Timeout);
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_smoke_zone() {
        let (_, app) = simulated_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/smoke/smoke.attic",
                r#"{"state":"alarm"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "SmokeZone smoke.attic not found"
        );
    }

    #[tokio::test]
    async fn should_move_blind_by_hand() {
        let (_, app) = simulated_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/blinds/blind.living",
                r#"{"level":40}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["level"], 40);
        assert_eq!(body["auto"], false);
    }

    #[tokio::test]
    async fn should_return_400_for_level_above_100() {
        let (_, app) = simulated_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/blinds/blind.living",
                r#"{"level":180}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
