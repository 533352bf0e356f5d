use crate::{Result, SeatLayoutError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_delays(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            ..Default::default()
        }
    }

    pub fn seat_source(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Client errors and an open breaker will not improve on retry.
pub fn is_retryable(error: &SeatLayoutError) -> bool {
    match error {
        SeatLayoutError::Upstream { status, .. } => *status >= 500 || *status == 429,
        SeatLayoutError::Http(_) | SeatLayoutError::Io(_) => true,
        _ => false,
    }
}

/// Pause before the try that follows `attempt` (1-based), capped at `max_delay`.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
    let factor = config.backoff_multiplier.max(1.0).powi(exponent);
    let capped_ms = (config.initial_delay.as_millis() as f64 * factor)
        .min(config.max_delay.as_millis() as f64);
    let delay = Duration::from_millis(capped_ms as u64);

    if config.jitter {
        delay + Duration::from_millis((capped_ms * 0.1 * rand::random::<f64>()) as u64)
    } else {
        delay
    }
}

/// Re-runs a seat fetch while it fails with a retryable error, up to
/// `max_attempts` tries in total.
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    fetch_name: &str,
    mut fetch: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match fetch().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Seat fetch '{}' recovered on attempt {}/{}", fetch_name, attempt, attempts);
                }
                return Ok(value);
            }
            Err(e) if !is_retryable(&e) => return Err(e),
            Err(e) => e,
        };

        if attempt >= attempts {
            error!("Seat fetch '{}' gave up after {} attempts: {}", fetch_name, attempts, err);
            return Err(err);
        }

        let delay = backoff_delay(config, attempt);
        warn!(
            "Seat fetch '{}' attempt {}/{} failed: {}; next try in {:?}",
            fetch_name, attempt, attempts, err, delay
        );
        sleep(delay).await;
        attempt += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitBreakerState,
    last_failure: Option<Instant>,
}

/// Circuit breaker for the seat status service
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_count: AtomicU32,
    failure_threshold: u32,
    recovery_timeout: Duration,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, recovery_timeout: Duration) -> Self {
        Self {
            failure_count: AtomicU32::new(0),
            failure_threshold: failure_threshold.max(1),
            recovery_timeout,
            inner: Mutex::new(BreakerInner {
                state: CircuitBreakerState::Closed,
                last_failure: None,
            }),
        }
    }

    pub async fn call<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        if !self.should_allow_call() {
            return Err(SeatLayoutError::CircuitOpen);
        }

        match operation().await {
            Ok(result) => {
                self.on_success();
                Ok(result)
            }
            Err(e) => {
                // 4xx means the service answered; only count transport and server faults
                if is_retryable(&e) {
                    self.on_failure();
                }
                Err(e)
            }
        }
    }

    pub fn state(&self) -> CircuitBreakerState {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).state
    }

    fn should_allow_call(&self) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match inner.state {
            CircuitBreakerState::Closed | CircuitBreakerState::HalfOpen => true,
            CircuitBreakerState::Open => match inner.last_failure {
                Some(last) if last.elapsed() >= self.recovery_timeout => {
                    inner.state = CircuitBreakerState::HalfOpen;
                    info!("Circuit breaker half-open, allowing a trial request");
                    true
                }
                _ => false,
            },
        }
    }

    fn on_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state != CircuitBreakerState::Closed {
            info!("Circuit breaker closed");
        }
        inner.state = CircuitBreakerState::Closed;
    }

    fn on_failure(&self) {
        let failure_count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.last_failure = Some(Instant::now());

        let trial_failed = inner.state == CircuitBreakerState::HalfOpen;
        if trial_failed || failure_count >= self.failure_threshold {
            inner.state = CircuitBreakerState::Open;
            warn!("Circuit breaker opened after {} failures", failure_count);
        }
    }
}
