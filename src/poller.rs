//! Poller
//!
//! Fetches the API endpoints on a fixed interval and renders each result into
//! the shared dashboard as soon as it arrives.
//!
//! Each endpoint is fetched in its own task: the sensor and prediction
//! fetches never wait on, cancel or retry each other, and may finish in any
//! order. An endpoint whose previous request is still outstanding is skipped
//! for that tick instead of piling up a second request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::{DashboardApi, Endpoint, HistoryEntry, PredictionResult, SensorReading};
use crate::dashboard::Dashboard;

/// Poll loop settings
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between poll cycles
    pub interval: Duration,
    /// `days` parameter of the history endpoint
    pub history_days: u32,
    /// Fetch history every cycle instead of only the first
    pub refresh_history: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            history_days: 7,
            refresh_history: false,
        }
    }
}

/// Result of one endpoint fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Data arrived and was rendered
    Updated,
    /// The request failed; the banner was shown (sensor/prediction)
    Failed,
    /// A previous request for the same endpoint was still outstanding
    Skipped,
}

/// Published after every completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    Updated(Endpoint),
    Failed(Endpoint),
}

/// Outcomes of one poll cycle
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub outcomes: Vec<(Endpoint, PollOutcome)>,
}

impl CycleReport {
    pub fn any_failed(&self) -> bool {
        self.outcomes.iter().any(|(_, o)| *o == PollOutcome::Failed)
    }

    pub fn outcome(&self, endpoint: Endpoint) -> Option<PollOutcome> {
        self.outcomes
            .iter()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, o)| *o)
    }
}

enum Payload {
    Sensor(SensorReading),
    Prediction(PredictionResult),
    History(Vec<HistoryEntry>),
}

#[derive(Default)]
struct InFlight {
    sensor: AtomicBool,
    prediction: AtomicBool,
    history: AtomicBool,
}

impl InFlight {
    fn flag(&self, endpoint: Endpoint) -> &AtomicBool {
        match endpoint {
            Endpoint::Sensor => &self.sensor,
            Endpoint::Prediction => &self.prediction,
            Endpoint::History => &self.history,
        }
    }
}

/// Held while a request is outstanding; releases the endpoint on drop
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Drives fetches and renders results into a shared dashboard
pub struct Poller {
    api: Arc<dyn DashboardApi>,
    dashboard: Arc<RwLock<Dashboard>>,
    config: PollConfig,
    in_flight: InFlight,
    events: broadcast::Sender<DashboardEvent>,
}

impl Poller {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        dashboard: Arc<RwLock<Dashboard>>,
        config: PollConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(64);

        Self {
            api,
            dashboard,
            config,
            in_flight: InFlight::default(),
            events,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Shared dashboard handle
    pub fn dashboard(&self) -> Arc<RwLock<Dashboard>> {
        Arc::clone(&self.dashboard)
    }

    /// Receive an event after every completed fetch
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Whether a request for `endpoint` is outstanding
    pub fn is_in_flight(&self, endpoint: Endpoint) -> bool {
        self.in_flight.flag(endpoint).load(Ordering::Acquire)
    }

    /// Fetch one endpoint and render the result
    pub async fn fetch(&self, endpoint: Endpoint) -> PollOutcome {
        let Some(_guard) = InFlightGuard::try_acquire(self.in_flight.flag(endpoint)) else {
            tracing::debug!(endpoint = %endpoint, "Previous request still in flight, skipping");
            return PollOutcome::Skipped;
        };

        self.dashboard.write().await.begin_fetch();

        let result = match endpoint {
            Endpoint::Sensor => self.api.fetch_sensor_reading().await.map(Payload::Sensor),
            Endpoint::Prediction => self.api.fetch_prediction().await.map(Payload::Prediction),
            Endpoint::History => self
                .api
                .fetch_history(self.config.history_days)
                .await
                .map(Payload::History),
        };

        let (outcome, event) = {
            let mut dashboard = self.dashboard.write().await;
            dashboard.end_fetch();

            match result {
                Ok(payload) => {
                    match payload {
                        Payload::Sensor(reading) => {
                            tracing::info!(?reading, "Sensor data received");
                            dashboard.apply_sensor_reading(reading);
                        }
                        Payload::Prediction(prediction) => {
                            tracing::info!(?prediction, "Prediction received");
                            dashboard.apply_prediction(prediction);
                        }
                        Payload::History(history) => {
                            tracing::info!(entries = history.len(), "History received");
                            dashboard.apply_history(&history);
                        }
                    }
                    (PollOutcome::Updated, DashboardEvent::Updated(endpoint))
                }
                Err(e) => {
                    tracing::error!(endpoint = %endpoint, error = %e, "Fetch failed");
                    dashboard.fetch_failed(endpoint);
                    (PollOutcome::Failed, DashboardEvent::Failed(endpoint))
                }
            }
        };

        // No subscribers is fine
        let _ = self.events.send(event);
        outcome
    }

    /// Start one poll cycle, each endpoint in its own task
    pub fn poll_cycle(
        self: &Arc<Self>,
        include_history: bool,
    ) -> Vec<(Endpoint, JoinHandle<PollOutcome>)> {
        let cycle_id = Uuid::new_v4();
        tracing::debug!(cycle = %cycle_id, history = include_history, "Starting poll cycle");

        let mut endpoints = vec![Endpoint::Sensor, Endpoint::Prediction];
        if include_history {
            endpoints.push(Endpoint::History);
        }

        endpoints
            .into_iter()
            .map(|endpoint| {
                let poller = Arc::clone(self);
                let span = tracing::info_span!("fetch", cycle = %cycle_id, endpoint = %endpoint);
                let handle =
                    tokio::spawn(async move { poller.fetch(endpoint).await }.instrument(span));
                (endpoint, handle)
            })
            .collect()
    }

    /// Run one poll cycle and wait for every fetch to finish
    pub async fn run_cycle(self: &Arc<Self>, include_history: bool) -> CycleReport {
        let mut report = CycleReport::default();

        for (endpoint, handle) in self.poll_cycle(include_history) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(endpoint = %endpoint, error = %e, "Fetch task aborted");
                    PollOutcome::Failed
                }
            };
            report.outcomes.push((endpoint, outcome));
        }

        report
    }

    /// Start the background poll loop
    ///
    /// The first cycle runs immediately and always includes history.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            history_days = self.config.history_days,
            "Starting poll loop"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut first = true;
            loop {
                ticker.tick().await;

                // Detached: a slow endpoint never delays the next tick
                self.poll_cycle(first || self.config.refresh_history);
                first = false;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::dashboard::{ids, DashboardOptions};
    use crate::local_store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Scripted API: answers from queues, optionally parks sensor fetches
    /// until released
    #[derive(Default)]
    struct FakeApi {
        readings: Mutex<Vec<Result<SensorReading, u16>>>,
        predictions: Mutex<Vec<Result<PredictionResult, u16>>>,
        sensor_calls: AtomicUsize,
        history_days: Mutex<Vec<u32>>,
        gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn reading(rain: f64) -> SensorReading {
            SensorReading {
                soil_moisture: 1.2,
                rain,
                temperature: 22.0,
                relative_humidity: 80.0,
                surface_pressure: None,
                last_updated: None,
            }
        }
    }

    #[async_trait]
    impl DashboardApi for FakeApi {
        async fn fetch_sensor_reading(&self) -> Result<SensorReading, FetchError> {
            self.sensor_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let next = self.readings.lock().unwrap().remove(0);
            next.map_err(|status| FetchError::Status { status })
        }

        async fn fetch_prediction(&self) -> Result<PredictionResult, FetchError> {
            let next = self.predictions.lock().unwrap().remove(0);
            next.map_err(|status| FetchError::Status { status })
        }

        async fn fetch_history(&self, days: u32) -> Result<Vec<HistoryEntry>, FetchError> {
            self.history_days.lock().unwrap().push(days);
            Ok(vec![HistoryEntry {
                timestamp: "2024-06-10 08:00:00".to_string(),
                rain: 3.0,
                temperature: 21.5,
            }])
        }
    }

    fn poller_with(api: FakeApi) -> (Arc<Poller>, Arc<FakeApi>) {
        poller_with_config(api, PollConfig::default())
    }

    fn poller_with_config(api: FakeApi, config: PollConfig) -> (Arc<Poller>, Arc<FakeApi>) {
        let api = Arc::new(api);
        let dashboard = Dashboard::init(&MemoryStore::new(), DashboardOptions::default());
        let poller = Poller::new(api.clone(), Arc::new(RwLock::new(dashboard)), config);
        (Arc::new(poller), api)
    }

    fn low_risk() -> PredictionResult {
        PredictionResult {
            prediction_24: 0,
            prediction_48: 0,
            last_updated: None,
        }
    }

    /// Wait for the fetches of one poll cycle to report back
    async fn next_cycle(
        events: &mut broadcast::Receiver<DashboardEvent>,
        fetches: usize,
    ) -> Vec<DashboardEvent> {
        let mut received = Vec::with_capacity(fetches);
        for _ in 0..fetches {
            received.push(events.recv().await.unwrap());
        }
        received
    }

    #[tokio::test]
    async fn test_cycle_renders_everything() {
        let api = FakeApi {
            readings: Mutex::new(vec![Ok(FakeApi::reading(5.0))]),
            predictions: Mutex::new(vec![Ok(PredictionResult {
                prediction_24: 2,
                prediction_48: 0,
                last_updated: None,
            })]),
            ..Default::default()
        };
        let (poller, api) = poller_with(api);

        let report = poller.run_cycle(true).await;
        assert!(!report.any_failed());
        assert_eq!(report.outcome(Endpoint::History), Some(PollOutcome::Updated));
        assert_eq!(*api.history_days.lock().unwrap(), vec![7]);

        let dashboard = poller.dashboard();
        let dashboard = dashboard.read().await;
        assert_eq!(dashboard.page().text(ids::RAIN), Some("5mm"));
        assert_eq!(dashboard.page().text(ids::FORECAST_24), Some("High Risk (Above 90%)"));
        assert_eq!(dashboard.forecast_chart().unwrap().data(), &[2.0, 0.0]);
        assert_eq!(dashboard.history_chart().unwrap().len(), 1);
        assert!(!dashboard.is_loading());
        assert!(dashboard.last_refreshed().is_some());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_other_endpoint() {
        let api = FakeApi {
            readings: Mutex::new(vec![Err(500)]),
            predictions: Mutex::new(vec![Ok(PredictionResult {
                prediction_24: 1,
                prediction_48: 1,
                last_updated: None,
            })]),
            ..Default::default()
        };
        let (poller, _api) = poller_with(api);

        let report = poller.run_cycle(false).await;
        assert_eq!(report.outcome(Endpoint::Sensor), Some(PollOutcome::Failed));
        assert_eq!(report.outcome(Endpoint::Prediction), Some(PollOutcome::Updated));
        assert!(report.outcome(Endpoint::History).is_none());

        let dashboard = poller.dashboard();
        let dashboard = dashboard.read().await;
        assert_eq!(dashboard.page().text(ids::RAIN), Some(crate::dashboard::PLACEHOLDER));
        assert_eq!(dashboard.page().text(ids::FORECAST_48), Some("Medium Risk (75% - 90%)"));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_values_then_recovery_hides_banner() {
        let api = FakeApi {
            readings: Mutex::new(vec![
                Ok(FakeApi::reading(5.0)),
                Err(404),
                Ok(FakeApi::reading(9.0)),
            ]),
            ..Default::default()
        };
        let (poller, _api) = poller_with(api);
        let dashboard = poller.dashboard();

        assert_eq!(poller.fetch(Endpoint::Sensor).await, PollOutcome::Updated);

        assert_eq!(poller.fetch(Endpoint::Sensor).await, PollOutcome::Failed);
        {
            let d = dashboard.read().await;
            assert_eq!(d.page().text(ids::RAIN), Some("5mm"));
            assert_eq!(
                d.error_message(),
                Some("Failed to fetch sensor data. Please try again later.")
            );
        }

        assert_eq!(poller.fetch(Endpoint::Sensor).await, PollOutcome::Updated);
        let d = dashboard.read().await;
        assert!(d.error_message().is_none());
        assert_eq!(d.page().text(ids::RAIN), Some("9mm"));
        assert_eq!(d.page().text(ids::SOIL_MOISTURE), Some("1.2m"));
    }

    #[tokio::test]
    async fn test_in_flight_guard_skips_overlapping_fetch() {
        let gate = Arc::new(Notify::new());
        let api = FakeApi {
            readings: Mutex::new(vec![Ok(FakeApi::reading(5.0)), Ok(FakeApi::reading(6.0))]),
            gate: Some(gate.clone()),
            ..Default::default()
        };
        let (poller, api) = poller_with(api);

        let first = {
            let poller = Arc::clone(&poller);
            tokio::spawn(async move { poller.fetch(Endpoint::Sensor).await })
        };

        // Wait until the first request is parked at the gate
        while api.sensor_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(poller.is_in_flight(Endpoint::Sensor));
        assert!(poller.dashboard().read().await.is_loading());

        assert_eq!(poller.fetch(Endpoint::Sensor).await, PollOutcome::Skipped);
        assert_eq!(api.sensor_calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), PollOutcome::Updated);
        assert!(!poller.is_in_flight(Endpoint::Sensor));

        // Released: the next tick goes through
        gate.notify_one();
        assert_eq!(poller.fetch(Endpoint::Sensor).await, PollOutcome::Updated);
        assert_eq!(api.sensor_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_events_published() {
        let api = FakeApi {
            readings: Mutex::new(vec![Err(502)]),
            ..Default::default()
        };
        let (poller, _api) = poller_with(api);
        let mut events = poller.subscribe();

        poller.fetch(Endpoint::Sensor).await;
        poller.fetch(Endpoint::History).await;

        assert_eq!(events.recv().await.unwrap(), DashboardEvent::Failed(Endpoint::Sensor));
        assert_eq!(events.recv().await.unwrap(), DashboardEvent::Updated(Endpoint::History));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_runs_on_interval() {
        let interval = Duration::from_secs(60);
        let api = FakeApi {
            readings: Mutex::new(vec![
                Ok(FakeApi::reading(5.0)),
                Err(500),
                Ok(FakeApi::reading(8.0)),
            ]),
            predictions: Mutex::new(vec![Ok(low_risk()), Err(503), Ok(low_risk())]),
            ..Default::default()
        };
        let config = PollConfig {
            interval,
            ..PollConfig::default()
        };
        let (poller, api) = poller_with_config(api, config);
        let dashboard = poller.dashboard();
        let mut events = poller.subscribe();
        let started = tokio::time::Instant::now();

        let poll_loop = Arc::clone(&poller).start();

        // First tick fires at once and includes history
        let first = next_cycle(&mut events, 3).await;
        assert!(first.contains(&DashboardEvent::Updated(Endpoint::History)));
        assert!(started.elapsed() < interval);
        assert_eq!(api.sensor_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.history_days.lock().unwrap().len(), 1);
        assert_eq!(dashboard.read().await.page().text(ids::RAIN), Some("5mm"));

        // Later ticks leave history alone; a failure does not stop the loop
        let second = next_cycle(&mut events, 2).await;
        assert!(second.contains(&DashboardEvent::Failed(Endpoint::Sensor)));
        assert!(started.elapsed() >= interval);
        assert_eq!(api.sensor_calls.load(Ordering::SeqCst), 2);
        assert_eq!(api.history_days.lock().unwrap().len(), 1);
        assert!(dashboard.read().await.error_message().is_some());

        let third = next_cycle(&mut events, 2).await;
        assert!(third.contains(&DashboardEvent::Updated(Endpoint::Sensor)));
        assert!(started.elapsed() >= interval * 2);
        assert_eq!(api.sensor_calls.load(Ordering::SeqCst), 3);
        assert_eq!(api.history_days.lock().unwrap().len(), 1);
        {
            let d = dashboard.read().await;
            assert!(d.error_message().is_none());
            assert_eq!(d.page().text(ids::RAIN), Some("8mm"));
        }

        poll_loop.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_refreshes_history_when_enabled() {
        let api = FakeApi {
            readings: Mutex::new(vec![Ok(FakeApi::reading(5.0)), Ok(FakeApi::reading(6.0))]),
            predictions: Mutex::new(vec![Ok(low_risk()), Ok(low_risk())]),
            ..Default::default()
        };
        let config = PollConfig {
            interval: Duration::from_secs(60),
            history_days: 14,
            refresh_history: true,
        };
        let (poller, api) = poller_with_config(api, config);
        let mut events = poller.subscribe();

        let poll_loop = Arc::clone(&poller).start();

        next_cycle(&mut events, 3).await;
        let second = next_cycle(&mut events, 3).await;
        assert!(second.contains(&DashboardEvent::Updated(Endpoint::History)));
        assert_eq!(api.sensor_calls.load(Ordering::SeqCst), 2);
        assert_eq!(*api.history_days.lock().unwrap(), vec![14, 14]);

        poll_loop.abort();
    }

    #[test]
    fn test_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(300));
        assert_eq!(config.history_days, 7);
        assert!(!config.refresh_history);
    }
}
