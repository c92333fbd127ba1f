// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Delay and hazard request orchestration.
//!
//! The orchestrator lives on the UI thread. Each request bumps the epoch of
//! its slot, flips the loading flag immediately and spawns the network call
//! on a tokio runtime. Completions come back over a channel and are applied
//! by [`PredictionOrchestrator::poll_completions`]; a completion whose epoch
//! is no longer current belongs to a superseded request and is dropped.
//! In-flight calls are never cancelled.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::slot::{RequestEpoch, RequestSlot, Resolution};
use super::transport::{PredictionTransport, TransportError};
use super::types::{
    DelayPredictionRequest, DelayPredictionResponse, HazardAssessmentRequest,
    HazardAssessmentResponse, PredictionParams,
};
use crate::events::{AppEvent, EventBus};
use crate::port::PortPair;

/// Shown when the delay prediction cannot be fetched.
pub const DELAY_FAILURE_MESSAGE: &str = "Could not fetch the delay prediction.";

/// Shown when the hazard assessment cannot be fetched.
pub const HAZARD_FAILURE_MESSAGE: &str = "Could not fetch the hazard assessment.";

/// Request type handled by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Delay,
    Hazard,
}

#[derive(Debug)]
enum Completion {
    Delay {
        epoch: RequestEpoch,
        result: Result<DelayPredictionResponse, TransportError>,
    },
    Hazard {
        epoch: RequestEpoch,
        result: Result<HazardAssessmentResponse, TransportError>,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Issues prediction requests and keeps the latest result per request type.
pub struct PredictionOrchestrator {
    transport: Arc<dyn PredictionTransport>,
    runtime: Handle,
    delay: RequestSlot<DelayPredictionResponse>,
    hazard: RequestSlot<HazardAssessmentResponse>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    events: Option<EventBus>,
    waker: Option<Waker>,
}

impl std::fmt::Debug for PredictionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionOrchestrator")
            .field("delay_epoch", &self.delay.epoch())
            .field("delay_loading", &self.delay.is_loading())
            .field("hazard_epoch", &self.hazard.epoch())
            .field("hazard_loading", &self.hazard.is_loading())
            .finish_non_exhaustive()
    }
}

impl PredictionOrchestrator {
    /// Create an orchestrator that runs network calls on `runtime`.
    #[must_use]
    pub fn new(transport: Arc<dyn PredictionTransport>, runtime: Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            runtime,
            delay: RequestSlot::new(DELAY_FAILURE_MESSAGE),
            hazard: RequestSlot::new(HAZARD_FAILURE_MESSAGE),
            completion_tx,
            completion_rx,
            events: None,
            waker: None,
        }
    }

    /// Publish [`AppEvent::SessionExpired`] on `events` when the backend answers 401.
    #[must_use]
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Call `waker` from the runtime whenever a completion is queued.
    ///
    /// The UI uses this to schedule a repaint so the completion gets polled.
    #[must_use]
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    #[must_use]
    pub fn delay(&self) -> &RequestSlot<DelayPredictionResponse> {
        &self.delay
    }

    #[must_use]
    pub fn hazard(&self) -> &RequestSlot<HazardAssessmentResponse> {
        &self.hazard
    }

    /// Request a delay prediction for `pair`.
    ///
    /// Returns `None` without any I/O when no pair is selected.
    pub fn request_delay(
        &mut self,
        pair: Option<&PortPair>,
        params: &PredictionParams,
    ) -> Option<RequestEpoch> {
        let pair = pair?;
        let request = DelayPredictionRequest::new(pair, params, Utc::now());
        let epoch = self.delay.begin();

        info!(
            "Requesting delay prediction {} -> {} (epoch {})",
            request.origin,
            request.destination,
            epoch.value()
        );

        let transport = Arc::clone(&self.transport);
        let tx = self.completion_tx.clone();
        let waker = self.waker.clone();
        self.runtime.spawn(async move {
            let result = transport.predict_delay(request).await;
            deliver(&tx, waker.as_ref(), Completion::Delay { epoch, result });
        });

        Some(epoch)
    }

    /// Request a hazard assessment for `pair`.
    ///
    /// Returns `None` without any I/O when no pair is selected or either port
    /// lacks coordinates.
    pub fn request_hazard(
        &mut self,
        pair: Option<&PortPair>,
        params: &PredictionParams,
    ) -> Option<RequestEpoch> {
        let request = HazardAssessmentRequest::new(pair?, params, Utc::now())?;
        let epoch = self.hazard.begin();

        info!("Requesting hazard assessment (epoch {})", epoch.value());

        let transport = Arc::clone(&self.transport);
        let tx = self.completion_tx.clone();
        let waker = self.waker.clone();
        self.runtime.spawn(async move {
            let result = transport.assess_hazards(request).await;
            deliver(&tx, waker.as_ref(), Completion::Hazard { epoch, result });
        });

        Some(epoch)
    }

    /// Fire both requests for a freshly completed pair.
    pub fn request_all(&mut self, pair: &PortPair, params: &PredictionParams) {
        self.request_delay(Some(pair), params);
        self.request_hazard(Some(pair), params);
    }

    /// Drop all results and fence off every request still in flight.
    pub fn reset(&mut self) {
        self.delay.invalidate();
        self.hazard.invalidate();
    }

    /// Apply every completion that has arrived so far. Never blocks.
    pub fn poll_completions(&mut self) -> Vec<(RequestKind, Resolution)> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            applied.push(self.apply(completion));
        }
        applied
    }

    /// Wait for the next completion and apply it.
    pub async fn next_completion(&mut self) -> Option<(RequestKind, Resolution)> {
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    fn apply(&mut self, completion: Completion) -> (RequestKind, Resolution) {
        match completion {
            Completion::Delay { epoch, result } => {
                self.report_failure(RequestKind::Delay, epoch, &result);
                let resolution = self.delay.resolve(epoch, result);
                log_resolution(RequestKind::Delay, epoch, resolution);
                (RequestKind::Delay, resolution)
            }
            Completion::Hazard { epoch, result } => {
                self.report_failure(RequestKind::Hazard, epoch, &result);
                let resolution = self.hazard.resolve(epoch, result);
                log_resolution(RequestKind::Hazard, epoch, resolution);
                (RequestKind::Hazard, resolution)
            }
        }
    }

    fn report_failure<T>(
        &self,
        kind: RequestKind,
        epoch: RequestEpoch,
        result: &Result<T, TransportError>,
    ) {
        let Err(e) = result else {
            return;
        };
        warn!("{kind:?} request (epoch {}) failed: {e}", epoch.value());

        if e.is_unauthorized() {
            if let Some(events) = &self.events {
                events.publish(AppEvent::SessionExpired);
            }
        }
    }
}

fn deliver(tx: &mpsc::UnboundedSender<Completion>, waker: Option<&Waker>, completion: Completion) {
    if tx.send(completion).is_err() {
        debug!("Orchestrator dropped before completion arrived");
        return;
    }
    if let Some(wake) = waker {
        wake();
    }
}

fn log_resolution(kind: RequestKind, epoch: RequestEpoch, resolution: Resolution) {
    if resolution == Resolution::Stale {
        debug!("Discarding stale {kind:?} response (epoch {})", epoch.value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::drain;
    use crate::port::{fallback_ports, Port};
    use crate::prediction::slot::FetchStatus;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type DelayReply = Result<DelayPredictionResponse, TransportError>;
    type HazardReply = Result<HazardAssessmentResponse, TransportError>;

    /// Transport whose replies are released by the test, in any order.
    #[derive(Default)]
    struct ScriptedTransport {
        delay_replies: Mutex<VecDeque<oneshot::Receiver<DelayReply>>>,
        hazard_replies: Mutex<VecDeque<oneshot::Receiver<HazardReply>>>,
        delay_requests: Mutex<Vec<DelayPredictionRequest>>,
        hazard_calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn expect_delay(&self) -> oneshot::Sender<DelayReply> {
            let (tx, rx) = oneshot::channel();
            self.delay_replies.lock().unwrap().push_back(rx);
            tx
        }

        fn expect_hazard(&self) -> oneshot::Sender<HazardReply> {
            let (tx, rx) = oneshot::channel();
            self.hazard_replies.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl PredictionTransport for ScriptedTransport {
        async fn predict_delay(&self, request: DelayPredictionRequest) -> DelayReply {
            self.delay_requests.lock().unwrap().push(request);
            let reply = self.delay_replies.lock().unwrap().pop_front();
            match reply {
                Some(rx) => rx.await.unwrap_or(Err(TransportError::Status { status: 599 })),
                None => Err(TransportError::Status { status: 500 }),
            }
        }

        async fn assess_hazards(&self, _request: HazardAssessmentRequest) -> HazardReply {
            self.hazard_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.hazard_replies.lock().unwrap().pop_front();
            match reply {
                Some(rx) => rx.await.unwrap_or(Err(TransportError::Status { status: 599 })),
                None => Err(TransportError::Status { status: 500 }),
            }
        }
    }

    fn pair(a: usize, b: usize) -> PortPair {
        let ports = fallback_ports();
        PortPair {
            origin: ports[a].clone(),
            destination: ports[b].clone(),
        }
    }

    fn delay(hours: f64, probability: f64) -> DelayPredictionResponse {
        DelayPredictionResponse {
            delay_hours: hours,
            delay_probability: Some(probability),
            ..Default::default()
        }
    }

    fn hazards(season: &str) -> HazardAssessmentResponse {
        HazardAssessmentResponse {
            season: season.to_string(),
            month: 7,
            hemisphere: "N".to_string(),
            route_distance_km: 10_536.0,
            planned_hours: 316.0,
            segments: Vec::new(),
        }
    }

    fn orchestrator(transport: &Arc<ScriptedTransport>) -> PredictionOrchestrator {
        PredictionOrchestrator::new(Arc::clone(transport) as Arc<dyn PredictionTransport>, Handle::current())
    }

    #[tokio::test]
    async fn test_no_pair_is_a_silent_no_op() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut orchestrator = orchestrator(&transport);

        assert!(orchestrator.request_delay(None, &PredictionParams::default()).is_none());
        assert!(orchestrator.request_hazard(None, &PredictionParams::default()).is_none());

        assert!(!orchestrator.delay().is_loading());
        assert!(!orchestrator.hazard().is_loading());
        tokio::task::yield_now().await;
        assert!(transport.delay_requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hazard_without_coordinates_is_skipped() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut orchestrator = orchestrator(&transport);
        let mut blind = pair(0, 1);
        blind.destination = Port {
            coordinates: None,
            ..blind.destination
        };

        assert!(orchestrator.request_hazard(Some(&blind), &PredictionParams::default()).is_none());
        assert!(!orchestrator.hazard().is_loading());
        tokio::task::yield_now().await;
        assert_eq!(transport.hazard_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_loading_is_set_before_response() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = transport.expect_delay();
        let mut orchestrator = orchestrator(&transport);

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        assert!(orchestrator.delay().is_loading());

        reply.send(Ok(delay(5.2, 0.6))).unwrap();
        assert_eq!(
            orchestrator.next_completion().await,
            Some((RequestKind::Delay, Resolution::Applied))
        );
        assert!(!orchestrator.delay().is_loading());
        assert_eq!(orchestrator.delay().value(), Some(&delay(5.2, 0.6)));
    }

    #[tokio::test]
    async fn test_late_response_for_superseded_request_is_discarded() {
        let transport = Arc::new(ScriptedTransport::default());
        let first_reply = transport.expect_delay();
        let second_reply = transport.expect_delay();
        let mut orchestrator = orchestrator(&transport);

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        orchestrator.request_delay(Some(&pair(2, 3)), &PredictionParams::default());

        second_reply.send(Ok(delay(1.0, 0.1))).unwrap();
        assert_eq!(
            orchestrator.next_completion().await,
            Some((RequestKind::Delay, Resolution::Applied))
        );

        first_reply.send(Ok(delay(9.0, 0.9))).unwrap();
        assert_eq!(
            orchestrator.next_completion().await,
            Some((RequestKind::Delay, Resolution::Stale))
        );

        assert_eq!(orchestrator.delay().value(), Some(&delay(1.0, 0.1)));
    }

    #[tokio::test]
    async fn test_in_order_completion_ends_on_latest() {
        let transport = Arc::new(ScriptedTransport::default());
        let first_reply = transport.expect_delay();
        let second_reply = transport.expect_delay();
        let mut orchestrator = orchestrator(&transport);

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        orchestrator.request_delay(Some(&pair(2, 3)), &PredictionParams::default());

        first_reply.send(Ok(delay(9.0, 0.9))).unwrap();
        assert_eq!(
            orchestrator.next_completion().await,
            Some((RequestKind::Delay, Resolution::Stale))
        );
        // Still waiting on the newer request
        assert!(orchestrator.delay().is_loading());

        second_reply.send(Ok(delay(1.0, 0.1))).unwrap();
        orchestrator.next_completion().await;
        assert_eq!(orchestrator.delay().value(), Some(&delay(1.0, 0.1)));
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let transport = Arc::new(ScriptedTransport::default());
        let ok_reply = transport.expect_delay();
        let failing_reply = transport.expect_delay();
        let mut orchestrator = orchestrator(&transport);

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        ok_reply.send(Ok(delay(3.0, 0.3))).unwrap();
        orchestrator.next_completion().await;

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        failing_reply.send(Err(TransportError::Status { status: 502 })).unwrap();
        orchestrator.next_completion().await;

        assert_eq!(
            orchestrator.delay().status(),
            FetchStatus::Failed {
                message: DELAY_FAILURE_MESSAGE,
                previous: Some(&delay(3.0, 0.3)),
            }
        );
    }

    #[tokio::test]
    async fn test_unauthorized_publishes_session_expired() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = transport.expect_hazard();
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let mut orchestrator = orchestrator(&transport).with_events(bus);

        orchestrator.request_hazard(Some(&pair(0, 1)), &PredictionParams::default());
        reply.send(Err(TransportError::Unauthorized)).unwrap();
        orchestrator.next_completion().await;

        assert_eq!(drain(&mut rx), vec![AppEvent::SessionExpired]);
        assert_eq!(orchestrator.hazard().error(), Some(HAZARD_FAILURE_MESSAGE));
        assert!(!orchestrator.hazard().is_loading());
    }

    #[tokio::test]
    async fn test_delay_and_hazard_are_independent() {
        let transport = Arc::new(ScriptedTransport::default());
        let delay_reply = transport.expect_delay();
        let hazard_reply = transport.expect_hazard();
        let mut orchestrator = orchestrator(&transport);

        orchestrator.request_all(&pair(0, 1), &PredictionParams::default());
        assert!(orchestrator.delay().is_loading());
        assert!(orchestrator.hazard().is_loading());

        hazard_reply.send(Ok(hazards("JJA"))).unwrap();
        assert_eq!(
            orchestrator.next_completion().await,
            Some((RequestKind::Hazard, Resolution::Applied))
        );
        assert!(orchestrator.delay().is_loading());

        delay_reply.send(Ok(delay(2.0, 0.2))).unwrap();
        orchestrator.next_completion().await;
        assert!(!orchestrator.delay().is_loading());
        assert_eq!(orchestrator.hazard().value().map(|h| h.season.as_str()), Some("JJA"));
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_results() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = transport.expect_delay();
        let mut orchestrator = orchestrator(&transport);

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        orchestrator.reset();
        reply.send(Ok(delay(4.0, 0.4))).unwrap();

        assert_eq!(
            orchestrator.next_completion().await,
            Some((RequestKind::Delay, Resolution::Stale))
        );
        assert!(orchestrator.delay().value().is_none());
        assert!(!orchestrator.delay().is_loading());
    }

    #[tokio::test]
    async fn test_request_carries_haversine_distance() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = transport.expect_delay();
        let mut orchestrator = orchestrator(&transport);
        let singapore_rotterdam = PortPair {
            origin: Port::new("1", "Singapore", 1.29, 103.85, "Asia"),
            destination: Port::new("2", "Rotterdam", 51.91, 4.47, "Europe"),
        };

        orchestrator.request_delay(Some(&singapore_rotterdam), &PredictionParams::default());
        reply.send(Ok(delay(0.0, 0.0))).unwrap();
        orchestrator.next_completion().await;

        let requests = transport.delay_requests.lock().unwrap();
        let distance = requests[0].distance_km.unwrap();
        assert!((distance - 10_536.0).abs() < 50.0);
        assert!((requests[0].cruise_speed_knots - 18.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_waker_fires_and_poll_applies() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = transport.expect_delay();
        let wakes = Arc::new(AtomicUsize::new(0));
        let wakes_clone = Arc::clone(&wakes);
        let mut orchestrator = orchestrator(&transport).with_waker(move || {
            wakes_clone.fetch_add(1, Ordering::SeqCst);
        });

        orchestrator.request_delay(Some(&pair(0, 1)), &PredictionParams::default());
        assert!(orchestrator.poll_completions().is_empty());

        reply.send(Ok(delay(1.5, 0.05))).unwrap();
        while wakes.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            orchestrator.poll_completions(),
            vec![(RequestKind::Delay, Resolution::Applied)]
        );
    }
}
