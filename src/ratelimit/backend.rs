//! Admission trait for code that guards a request path.

use std::sync::Arc;

use super::clock::Clock;
use super::limiter::Limiter;

/// Something that decides, per call, whether a request may proceed.
///
/// Request-handling code takes this trait rather than a concrete limiter so
/// it can be handed a shared `Arc<Limiter>` or a test double.
pub trait AdmissionControl: Send + Sync {
    /// Returns `true` if the request is admitted.
    fn try_admit(&self) -> bool;
}

impl<C: Clock> AdmissionControl for Limiter<C> {
    fn try_admit(&self) -> bool {
        Limiter::try_admit(self)
    }
}

impl<T: AdmissionControl + ?Sized> AdmissionControl for Arc<T> {
    fn try_admit(&self) -> bool {
        (**self).try_admit()
    }
}
