//! Suspension of rewriting around the general settings screen.
//!
//! The settings screen shows the stored "home" and "site URL" values for
//! direct editing. If they were rewritten there, saving the form would
//! persist the external origin as the canonical one. The window disables
//! every hook just before the fields are rendered and re-enables them
//! exactly once afterwards, whichever of the two late render stages fires
//! first.
//!
//! ```text
//! Armed --SettingsScreenLoad--> Armed (primed)
//! Armed (primed) --BeforeFields--> Suspended        disable_all
//! Suspended --DateFormats | Footer--> Rearmed       enable_all, once
//! ```

use serde::{Deserialize, Serialize};

use crate::hooks::InterceptionRegistry;

/// Render-pipeline stages of the host application that the window reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// The general settings screen is being loaded.
    SettingsScreenLoad,
    /// Admin notices are printed, right before the form fields.
    BeforeFields,
    /// Date formats are being prepared, after the URL fields.
    DateFormats,
    /// The admin footer is rendered, last thing on the page.
    Footer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Armed,
    Suspended,
    Rearmed,
}

/// Effect of feeding one event to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    None,
    Primed,
    Suspended,
    Rearmed,
}

#[derive(Debug, Clone, Default)]
pub struct AdminSafetyWindow {
    state: WindowState,
    primed: bool,
}

impl AdminSafetyWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> WindowState {
        self.state
    }

    /// Advance the window. Events that do not apply in the current state
    /// are no-ops, which makes the second re-enable trigger harmless.
    pub fn handle(
        &mut self,
        event: LifecycleEvent,
        registry: &mut InterceptionRegistry,
    ) -> Transition {
        let transition = match (self.state, event) {
            (WindowState::Armed, LifecycleEvent::SettingsScreenLoad) if !self.primed => {
                self.primed = true;
                Transition::Primed
            }
            (WindowState::Armed, LifecycleEvent::BeforeFields) if self.primed => {
                self.primed = false;
                registry.disable_all();
                self.state = WindowState::Suspended;
                Transition::Suspended
            }
            (WindowState::Suspended, LifecycleEvent::DateFormats | LifecycleEvent::Footer) => {
                registry.enable_all();
                self.state = WindowState::Rearmed;
                Transition::Rearmed
            }
            _ => Transition::None,
        };

        tracing::debug!(
            event = ?event,
            state = ?self.state,
            transition = ?transition,
            "settings screen window"
        );

        transition
    }
}
