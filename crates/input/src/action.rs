use glam::Vec2;

/// A high-level input event delivered by the windowing collaborator.
///
/// Scenes consume actions, never raw platform events. Coordinates are in
/// physical pixels relative to the window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Pointer moved to a screen position.
    PointerMoved { x: f32, y: f32 },
    /// Primary button clicked at a screen position.
    PointerClicked { x: f32, y: f32 },
    /// Pointer left the viewport.
    PointerLeft,
    /// The viewport changed size.
    Resized { width: f32, height: f32 },
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Screen position carried by pointer actions.
    pub fn screen_position(&self) -> Option<Vec2> {
        match *self {
            Self::PointerMoved { x, y } | Self::PointerClicked { x, y } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_actions_carry_position() {
        let a = Action::PointerMoved { x: 3.0, y: 4.0 };
        assert_eq!(a.screen_position(), Some(Vec2::new(3.0, 4.0)));
        let b = Action::PointerClicked { x: 1.0, y: 2.0 };
        assert_eq!(b.screen_position(), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn other_actions_have_no_position() {
        assert!(Action::PointerLeft.screen_position().is_none());
        assert!(Action::Noop.screen_position().is_none());
        let r = Action::Resized {
            width: 800.0,
            height: 600.0,
        };
        assert!(r.screen_position().is_none());
    }
}
