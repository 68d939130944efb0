//! # Shared World Access
//!
//! The world itself has no internal locking: every operation assumes one
//! thread of control. Callers that must touch a world from several threads
//! (an input callback on a window thread, a tool thread inspecting state)
//! serialize through [`SharedWorld`].
//!
//! ```text
//! Main loop:      lock → create/add/update systems → unlock
//! Input thread:   lock → get_component_mut → unlock
//! ```

mod shared;

pub use shared::SharedWorld;
