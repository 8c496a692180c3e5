//! Políticas de reintento con backoff lineal.
//!
//! - `RetryPolicy::LEDGER`: lecturas y escrituras de `PgLedger`. Reintenta
//!   fallos de conexión, deadlocks y conflictos de serialización.
//! - `RetryPolicy::template_read(timeout)`: consulta de templates. Sólo
//!   reintenta fallos de conexión y nunca duerme más allá del timeout pedido
//!   por el motor; un statement timeout se propaga sin reintento.
//! - `RetryPolicy::SUBMIT`: reenvío de una operación completa del motor tras
//!   un conflicto de escritura (ver `pg::submit`).

use std::fmt::Display;
use std::thread;
use std::time::{Duration, Instant};

use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Reintentos después del primer intento.
    pub max_retries: u32,
    /// Espera antes del reintento `n` = `base_delay * (n + 1)`.
    pub base_delay: Duration,
    /// Tiempo total máximo desde el primer intento, si lo hay.
    pub budget: Option<Duration>,
}

impl RetryPolicy {
    pub const LEDGER: Self = Self { max_retries: 3,
                                    base_delay: Duration::from_millis(15),
                                    budget: None };

    pub const SUBMIT: Self = Self { max_retries: 10,
                                    base_delay: Duration::from_millis(5),
                                    budget: None };

    pub fn template_read(timeout: Duration) -> Self {
        Self { max_retries: 2,
               base_delay: Duration::from_millis(10),
               budget: Some(timeout) }
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt + 1)
    }

    /// Ejecuta `f` y la repite mientras el error cumpla `retryable` y quede
    /// presupuesto.
    pub fn run<T, E, F, R>(&self, label: &str, retryable: R, mut f: F) -> Result<T, E>
        where F: FnMut() -> Result<T, E>,
              R: Fn(&E) -> bool,
              E: Display
    {
        let started = Instant::now();
        let mut attempt = 0;
        loop {
            match f() {
                Err(e) if attempt < self.max_retries && retryable(&e) => {
                    let delay = self.delay(attempt);
                    if self.budget.is_some_and(|budget| started.elapsed() + delay >= budget) {
                        warn!("{label}: retry budget exhausted after {} attempt(s): {e}", attempt + 1);
                        return Err(e);
                    }
                    warn!("{label}: retryable error (attempt {}): {e} -> sleeping {}ms",
                          attempt + 1,
                          delay.as_millis());
                    thread::sleep(delay);
                    attempt += 1;
                }
                r => return r,
            }
        }
    }
}
