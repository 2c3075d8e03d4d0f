// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Per-image editing session state.

use crate::models::annotation::Corner;
use crate::util::geometry::PixelPos;

/// Which annotation kind pointer input creates and edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Keypoints,
    BoundingBoxes,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Keypoints => Mode::BoundingBoxes,
            Mode::BoundingBoxes => Mode::Keypoints,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Keypoints => "keypoints",
            Mode::BoundingBoxes => "bounding_boxes",
        }
    }
}

/// What the primary button is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Moving an existing keypoint.
    DraggingKeypoint { index: usize },
    /// Moving one corner of an existing box.
    DraggingCorner { index: usize, corner: Corner },
    /// Rubber-banding a new box. `far_corner` stays `None` until the pointer
    /// moves with the button held.
    DrawingBox {
        anchor: PixelPos,
        far_corner: Option<PixelPos>,
    },
}

/// Everything the state machine carries from one pointer event to the next.
///
/// The value is passed into the event handler and a new one is returned;
/// nothing else holds interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub mode: Mode,
    /// Every press and release starts from `Interaction::Idle`, so a corner
    /// drag and a new box can never overlap.
    pub interaction: Interaction,
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Fresh state in the other mode. Any in-flight drag is dropped.
    pub fn switch_mode(self) -> Self {
        Self::new(self.mode.toggled())
    }

    /// Drop any in-flight interaction, keeping the mode.
    pub fn reset(self) -> Self {
        Self::new(self.mode)
    }

    pub fn is_idle(&self) -> bool {
        self.interaction == Interaction::Idle
    }

    pub(crate) fn with_interaction(self, interaction: Interaction) -> Self {
        Self {
            interaction,
            ..self
        }
    }

    /// The rectangle being drawn, if the pointer has moved since the press.
    pub fn pending_box(&self) -> Option<(PixelPos, PixelPos)> {
        match self.interaction {
            Interaction::DrawingBox {
                anchor,
                far_corner: Some(far),
            } => Some((anchor, far)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_mode_drops_drag() {
        let state = SessionState::new(Mode::Keypoints)
            .with_interaction(Interaction::DraggingKeypoint { index: 3 });
        let switched = state.switch_mode();
        assert_eq!(switched.mode, Mode::BoundingBoxes);
        assert!(switched.is_idle());
        assert_eq!(switched.switch_mode().mode, Mode::Keypoints);
    }

    #[test]
    fn test_pending_box_requires_far_corner() {
        let anchor = PixelPos::new(1, 2);
        let state = SessionState::new(Mode::BoundingBoxes).with_interaction(
            Interaction::DrawingBox {
                anchor,
                far_corner: None,
            },
        );
        assert_eq!(state.pending_box(), None);

        let far = PixelPos::new(9, 9);
        let state = state.with_interaction(Interaction::DrawingBox {
            anchor,
            far_corner: Some(far),
        });
        assert_eq!(state.pending_box(), Some((anchor, far)));
    }
}
