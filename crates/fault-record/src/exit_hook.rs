//! Exit hook: what happens once a fault has been recorded.
//!
//! The firmware default resets the system and never returns. Any other
//! behaviour is an explicit choice of the embedding firmware, made by
//! installing a different hook.

/// Invoked as the last step of [`record_fault`](crate::capture::record_fault).
pub trait ExitHook {
    /// Leave the trap context. The default firmware implementation diverges.
    fn on_exit(&mut self);
}

impl<F: FnMut()> ExitHook for F {
    fn on_exit(&mut self) {
        self()
    }
}

/// Hook that returns immediately. Used by host tooling and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnToCaller;

impl ExitHook for ReturnToCaller {
    fn on_exit(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_hooks() {
        let mut calls = 0u32;
        let mut hook = || calls = calls.wrapping_add(1);
        hook.on_exit();
        hook.on_exit();
        assert_eq!(calls, 2);
    }
}
