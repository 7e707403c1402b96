//! Command lifecycle interfaces
//!
//! A command is a unit of work driven by an external scheduler. The scheduler
//! shall call `init` once when the command is started, then `execute`
//! followed by `is_finished` once per fixed-period control cycle, and finally
//! `end` when `is_finished` returns true or the command is cancelled. The
//! scheduler guarantees that no two calls overlap.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An opaque resource claimed by a command.
///
/// Tokens are passed through to the scheduler, which uses them to prevent two
/// commands from driving the same mechanism at once. No meaning is attached
/// to them here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceToken(pub &'static str);

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The lifecycle of a scheduled command.
pub trait Command {
    /// Prepare the command for a fresh run.
    ///
    /// Calling `init` again after a run has ended restarts the command from
    /// scratch.
    fn init(&mut self);

    /// Perform one control cycle.
    fn execute(&mut self);

    /// Poll whether the command has completed.
    ///
    /// Called by the scheduler once per cycle, after `execute`.
    fn is_finished(&mut self) -> bool;

    /// Stop the command.
    ///
    /// `interrupted` is true if the scheduler cancelled the command before
    /// `is_finished` returned true. The command must not assume `execute`
    /// will run again afterwards.
    fn end(&mut self, interrupted: bool);

    /// The resources this command requires exclusive use of.
    fn requirements(&self) -> &[ResourceToken];
}
