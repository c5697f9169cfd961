use super::Surface;
use std::sync::{ Arc, Mutex };
use std::time::Duration;
use tokio::task::JoinHandle;

/// Viewports at or below this width use tap-to-open dropdowns.
pub const MOBILE_BREAKPOINT: u32 = 768;
pub const DROPDOWN_HIDE_DELAY: Duration = Duration::from_millis(150);

pub struct MobileMenu {
    open: Mutex<bool>,
    surface: Arc<dyn Surface>,
}

impl MobileMenu {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            open: Mutex::new(false),
            surface,
        }
    }

    pub fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the new open state.
    pub fn toggle(&self) -> bool {
        let mut open = self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *open = !*open;
        let icon = if *open { "fas fa-times" } else { "fas fa-bars" };
        self.surface.set_menu_icon(icon);
        *open
    }
}

struct DropdownState {
    visible: Vec<bool>,
    // Bumped on every enter so a stale hide timer can tell it lost.
    generation: Vec<u64>,
}

#[derive(Clone)]
pub struct Dropdowns {
    state: Arc<Mutex<DropdownState>>,
    surface: Arc<dyn Surface>,
    viewport_width: u32,
}

impl Dropdowns {
    pub fn new(count: usize, viewport_width: u32, surface: Arc<dyn Surface>) -> Self {
        Self {
            state: Arc::new(
                Mutex::new(DropdownState {
                    visible: vec![false; count],
                    generation: vec![0; count],
                })
            ),
            surface,
            viewport_width,
        }
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.lock().visible.get(index).copied().unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DropdownState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_visible(&self, state: &mut DropdownState, index: usize, visible: bool) {
        if let Some(slot) = state.visible.get_mut(index) {
            *slot = visible;
            self.surface.set_dropdown_visible(index, visible);
        }
    }

    pub fn mouse_enter(&self, index: usize) {
        let mut state = self.lock();
        if index >= state.visible.len() {
            return;
        }
        state.generation[index] += 1;
        self.set_visible(&mut state, index, true);
    }

    /// Hides the dropdown after [`DROPDOWN_HIDE_DELAY`] unless the pointer
    /// comes back first.
    pub fn mouse_leave(&self, index: usize) -> Option<JoinHandle<()>> {
        let generation = *self.lock().generation.get(index)?;
        let this = self.clone();
        Some(
            tokio::spawn(async move {
                tokio::time::sleep(DROPDOWN_HIDE_DELAY).await;
                let mut state = this.lock();
                if state.generation[index] == generation {
                    this.set_visible(&mut state, index, false);
                }
            })
        )
    }

    /// Tap handling on narrow viewports: closes every other dropdown and
    /// toggles this one. Returns false when the tap is left to the link.
    pub fn click(&self, index: usize) -> bool {
        if self.viewport_width > MOBILE_BREAKPOINT {
            return false;
        }
        let mut state = self.lock();
        if index >= state.visible.len() {
            return false;
        }
        let was_open = state.visible[index];
        for other in 0..state.visible.len() {
            if other != index {
                self.set_visible(&mut state, other, false);
            }
        }
        self.set_visible(&mut state, index, !was_open);
        true
    }
}
