//! UI module root: exposes drawing functions for individual panels.

pub mod header;
pub mod hosts;
pub mod notifications;
pub mod theme;
pub mod util;
