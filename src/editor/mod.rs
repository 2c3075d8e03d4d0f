// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive editing core: session state, the pointer state machine and
//! the render list it feeds.

pub mod machine;
pub mod render;
pub mod state;

pub use machine::{handle_pointer, ClassPrompt, EditContext, PointerButton, PointerEvent, PointerPhase};
pub use render::{draw_list, DrawItem};
pub use state::{Interaction, Mode, SessionState};
