//! Single-slot pending yes/no action for destructive commands.
//!
//! While a confirmation is pending, any submitted text is interpreted solely
//! as yes/no, never as a command. The slot holds at most one action; a new
//! request overwrites the old one, nothing is queued.

use crate::error::CommandError;

/// A stored confirmation action and its argument.
pub struct PendingConfirmation {
    action: Box<dyn FnMut(&str) -> Result<(), CommandError>>,
    arg: String,
}

impl PendingConfirmation {
    /// Store an action to run once the user confirms.
    pub fn new(
        action: impl FnMut(&str) -> Result<(), CommandError> + 'static,
        arg: impl Into<String>,
    ) -> Self {
        Self {
            action: Box::new(action),
            arg: arg.into(),
        }
    }

    /// Resolve the confirmation, consuming the slot.
    ///
    /// Emits "Confirmed" and invokes the action with the stored argument
    /// when `confirmed` is true, otherwise emits "Aborted" and invokes
    /// nothing.
    pub fn resolve(
        mut self,
        confirmed: bool,
        mut emit: impl FnMut(&str),
    ) -> Result<(), CommandError> {
        if confirmed {
            emit("Confirmed");
            (self.action)(&self.arg)
        } else {
            emit("Aborted");
            Ok(())
        }
    }
}

impl std::fmt::Debug for PendingConfirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingConfirmation")
            .field("arg", &self.arg)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_confirmed_invokes_with_argument() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let inner = Rc::clone(&calls);
        let pending = PendingConfirmation::new(
            move |arg: &str| {
                inner.borrow_mut().push(arg.to_string());
                Ok(())
            },
            "target.txt",
        );

        let mut messages = Vec::new();
        pending
            .resolve(true, |msg| messages.push(msg.to_string()))
            .expect("action succeeds");
        assert_eq!(messages, vec!["Confirmed"]);
        assert_eq!(*calls.borrow(), vec!["target.txt".to_string()]);
    }

    #[test]
    fn test_aborted_invokes_nothing() {
        let calls = Rc::new(RefCell::new(0));
        let inner = Rc::clone(&calls);
        let pending = PendingConfirmation::new(
            move |_: &str| {
                *inner.borrow_mut() += 1;
                Ok(())
            },
            "x",
        );

        let mut messages = Vec::new();
        pending
            .resolve(false, |msg| messages.push(msg.to_string()))
            .expect("nothing ran");
        assert_eq!(messages, vec!["Aborted"]);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_confirmed_propagates_action_error() {
        let pending = PendingConfirmation::new(|_: &str| Err("disk on fire".into()), "x");
        let result = pending.resolve(true, |_| {});
        assert!(result.is_err());
    }
}
