use crate::engine::controller::SceneController;
use crate::engine::settings::{SceneSettings, SettingsError};
use crate::engine::surface::RenderSurface;
use crate::signals::SignalBus;
use bevy::log::warn;

/// Holds at most one [`SceneController`] for an application.
///
/// In the Bevy app this is a non-send resource, since the controller shares
/// its scene through `Rc`.
#[derive(Default)]
pub struct SceneContext {
    controller: Option<SceneController>,
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the controller on first call; later calls return the existing
    /// one and ignore their arguments.
    pub fn initialize(
        &mut self,
        settings: SceneSettings,
        surface: RenderSurface,
        bus: SignalBus,
    ) -> Result<&mut SceneController, SettingsError> {
        let controller = match self.controller.take() {
            Some(existing) => {
                warn!("Scene controller already initialized");
                existing
            }
            None => SceneController::new(settings, surface, bus)?,
        };
        Ok(self.controller.insert(controller))
    }

    pub fn get(&self) -> Option<&SceneController> {
        self.controller.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut SceneController> {
        self.controller.as_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.controller.is_some()
    }

    /// Tear the controller down. Returns `false` if there was none.
    pub fn release(&mut self) -> bool {
        match self.controller.take() {
            Some(controller) => {
                controller.release();
                true
            }
            None => false,
        }
    }
}
