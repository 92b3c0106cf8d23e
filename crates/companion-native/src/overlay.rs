// Draggable glass pane in window pixel space. Pure geometry: the renderer
// reads the rectangle, the event loop feeds it cursor positions, and pointer
// positions inside the pane are normalised to [0,1]² for the displacement
// worker.

use glam::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct GlassOverlay {
    /// Top-left corner in window pixels.
    pub origin: Vec2,
    pub size: Vec2,
    /// Cursor offset from `origin` captured when the drag started.
    grab: Option<Vec2>,
}

impl GlassOverlay {
    pub fn centered(window: Vec2, size: Vec2) -> Self {
        let mut overlay = Self {
            origin: (window - size) * 0.5,
            size,
            grab: None,
        };
        overlay.clamp_into(window);
        overlay
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let local = p - self.origin;
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.size.x && local.y < self.size.y
    }

    /// Begin a drag if `p` is on the pane. Returns whether a drag started.
    pub fn press(&mut self, p: Vec2) -> bool {
        if self.contains(p) {
            self.grab = Some(p - self.origin);
            true
        } else {
            false
        }
    }

    pub fn release(&mut self) {
        self.grab = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Follow the cursor while dragging. Returns whether the pane moved.
    pub fn drag_to(&mut self, p: Vec2, window: Vec2) -> bool {
        let Some(grab) = self.grab else {
            return false;
        };
        let before = self.origin;
        self.origin = p - grab;
        self.clamp_into(window);
        self.origin != before
    }

    /// Keep the pane fully inside the window where it fits.
    pub fn clamp_into(&mut self, window: Vec2) {
        let max = (window - self.size).max(Vec2::ZERO);
        self.origin = self.origin.clamp(Vec2::ZERO, max);
    }

    /// `p` relative to the pane, in \[0,1\]², or `None` when outside.
    pub fn normalized_pointer(&self, p: Vec2) -> Option<Vec2> {
        self.contains(p).then(|| (p - self.origin) / self.size)
    }

    /// `[x, y, width, height]` for the glass uniform.
    pub fn rect(&self) -> [f32; 4] {
        [self.origin.x, self.origin.y, self.size.x, self.size.y]
    }
}
