//! Step observer trait for monitoring physics simulation progress.

/// Trait for observing the phases of a world step.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after every force accumulator has been cleared.
    fn on_start_frame(&mut self) {}

    /// Called after the force registry has been applied.
    fn on_forces_applied(&mut self) {}

    /// Called after all particles have been integrated.
    fn on_integrate(&mut self) {}

    /// Called with the number of contacts written this step.
    fn on_contacts_generated(&mut self, _count: usize) {}

    /// Called after each resolver iteration with the contact it resolved.
    fn on_contact_resolved(&mut self, _iteration: usize, _contact: usize) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
