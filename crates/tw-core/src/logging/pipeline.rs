//! Event processing pipeline.
//!
//! Stages run in a fixed order on the caller's thread:
//!
//! 1. Context injection, so every later stage sees the full event.
//! 2. Sampling; a dropped event stops here and nothing else runs.
//! 3. Redaction, last, so the renderer only ever sees sanitized values.

use super::context::{ContextError, ContextInjector, DynamicContext, StaticContext};
use super::events::Event;
use super::sampler::{Sampler, Sampling};
use tw_redact::Redactor;

/// Result of running an event through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    /// Fully processed and ready to render.
    Emit(Event),
    /// Dropped by the sampler.
    Dropped,
}

impl Processed {
    pub fn into_event(self) -> Option<Event> {
        match self {
            Processed::Emit(event) => Some(event),
            Processed::Dropped => None,
        }
    }
}

/// Context injector, sampler and redactor composed in order.
#[derive(Debug, Clone)]
pub struct Pipeline {
    injector: ContextInjector,
    sampler: Sampler,
    redactor: Redactor,
}

impl Pipeline {
    pub fn new(static_ctx: StaticContext, sampler: Sampler, redactor: Redactor) -> Self {
        Self {
            injector: ContextInjector::new(static_ctx),
            sampler,
            redactor,
        }
    }

    /// Bind per-run context. Must happen before the run's first event.
    pub fn bind_dynamic(&mut self, dynamic: DynamicContext) -> Result<(), ContextError> {
        self.injector.bind(dynamic)
    }

    pub fn injector(&self) -> &ContextInjector {
        &self.injector
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn process(&mut self, mut event: Event) -> Processed {
        self.injector.inject(&mut event.fields);

        if self.sampler.sample(event.level) == Sampling::Drop {
            return Processed::Dropped;
        }

        let fields = std::mem::take(&mut event.fields);
        event.fields = self.redactor.redact_fields(fields);
        Processed::Emit(event)
    }
}
