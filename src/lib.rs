pub mod common;
pub mod config;
pub mod error;
pub mod estimation;
pub mod geodesy;
pub mod lifecycle;
pub mod logging;
pub mod telemetry;

use crate::lifecycle::LifecycleNode;
use crate::telemetry::BackupRecorder;

/// Owns the long-lived components of a mapping session
pub struct MapperCore {
    components: Vec<Box<dyn LifecycleNode>>,
}

impl Default for MapperCore {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperCore {
    pub fn new() -> Self {
        MapperCore {
            components: Vec::new(),
        }
    }

    /// Register a component with the core
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        self.components.push(Box::new(component));
    }

    /// Configure then activate all registered components
    pub fn init(&mut self) -> Result<(), String> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        Ok(())
    }

    /// Deactivate then clean up all registered components
    pub fn shutdown(&mut self) -> Result<(), String> {
        for component in &mut self.components {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        Ok(())
    }

    pub fn backup_recorder_mut(&mut self) -> Option<&mut BackupRecorder> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<BackupRecorder>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::State;

    #[test]
    fn test_core_drives_recorder_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut core = MapperCore::new();
        core.register(BackupRecorder::new(dir.path().join("backup.txt")));

        core.init().unwrap();
        let recorder = core.backup_recorder_mut().unwrap();
        assert_eq!(recorder.state(), State::Active);
        recorder.record("PATH,1,1,0").unwrap();

        core.shutdown().unwrap();
        assert_eq!(
            core.backup_recorder_mut().unwrap().state(),
            State::Unconfigured
        );
    }

    #[test]
    fn test_no_recorder_registered() {
        let mut core = MapperCore::new();
        assert!(core.backup_recorder_mut().is_none());
    }
}
