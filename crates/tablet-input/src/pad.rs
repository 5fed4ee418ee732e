//! Per-pad state.

use crate::device::{PadHandle, PadId, TabletId, ToolId};

/// A tablet pad: the button/ring/strip cluster on the tablet body.
#[derive(Debug, Clone)]
pub struct Pad {
    id: PadId,
    name: Option<String>,
    pub(crate) tablet: Option<TabletId>,
    /// Tool the pad is currently grouped with. Not owned.
    pub(crate) parent: Option<ToolId>,
    /// Mode last reported by a pad button event.
    pub(crate) mode: u32,
}

impl Pad {
    #[must_use]
    pub fn new(handle: &PadHandle, name: Option<String>) -> Self {
        Self {
            id: handle.id,
            name,
            tablet: handle.tablet,
            parent: None,
            mode: 0,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PadId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn tablet(&self) -> Option<TabletId> {
        self.tablet
    }

    #[must_use]
    pub const fn parent(&self) -> Option<ToolId> {
        self.parent
    }

    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }
}
