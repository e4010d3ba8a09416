//! Internal support modules.

mod frame;

pub(crate) use frame::FrameGuard;
