//! Deadline-bounded builds (feature `timeout`).

use std::time::Duration;

use tracing::warn;

use crate::error::{Result, WireboxError};
use crate::injector::Injector;
use crate::name::ProviderName;
use crate::value::Value;

impl Injector {
    /// Like [`Injector::build`], but gives up after `limit`.
    ///
    /// Cacheable builds that another caller is also waiting on keep
    /// running; only this caller stops waiting.
    ///
    /// # Errors
    /// [`WireboxError::TimedOut`] when the deadline passes, otherwise
    /// whatever [`Injector::build`] returns.
    pub async fn build_within(&self, name: &str, limit: Duration) -> Result<Value> {
        match tokio::time::timeout(limit, self.build(name)).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => {
                warn!(provider = name, ?limit, "Build timed out");
                Err(WireboxError::TimedOut {
                    name: ProviderName::from(name),
                    limit,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{Arguments, BoxError, Factory};
    use crate::registry::{RegisterOptions, Registry};

    fn slow(delay: Duration) -> Factory {
        Factory::from_async(move |_: Arguments| async move {
            tokio::time::sleep(delay).await;
            Ok::<_, BoxError>("done")
        })
    }

    #[tokio::test]
    async fn finishes_within_limit() {
        let injector = Registry::new()
            .function("quick", slow(Duration::from_millis(1)), RegisterOptions::new())
            .unwrap()
            .finalize();

        let value = injector.build_within("quick", Duration::from_secs(5)).await.unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"done"));
    }

    #[tokio::test]
    async fn times_out() {
        let injector = Registry::new()
            .function("stuck", slow(Duration::from_secs(60)), RegisterOptions::new())
            .unwrap()
            .finalize();

        let err = injector
            .build_within("stuck", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, WireboxError::TimedOut { ref name, .. } if name == "stuck"));
    }

    #[tokio::test]
    async fn other_errors_pass_through() {
        let injector = Registry::new().finalize();
        let err = injector.build_within("ghost", Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, WireboxError::ProviderNotFound(_)));
    }
}
