//! Lifecycle management for mapper components

use std::any::Any;

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send + Sync {
    /// Acquire resources
    fn on_configure(&mut self) -> Result<(), String>;

    /// Start processing
    fn on_activate(&mut self) -> Result<(), String>;

    /// Stop processing, keeping resources
    fn on_deactivate(&mut self) -> Result<(), String>;

    /// Release resources
    fn on_cleanup(&mut self) -> Result<(), String>;

    /// Convert to Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

impl LifecycleNodeBase {
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    pub fn get_state(&self) -> State {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }

    /// Move from `from` to `to`, refusing any other starting state
    pub fn transition(&mut self, from: State, to: State) -> Result<(), String> {
        if self.state != from {
            return Err(format!(
                "{}: cannot go to {:?} from {:?} (expected {:?})",
                self.name, to, self.state, from
            ));
        }
        self.state = to;
        Ok(())
    }
}
