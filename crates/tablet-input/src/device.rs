//! Hardware handles, identities and diagnostic naming.
//!
//! The device layer hands us opaque identities for tablets, tools and pads.
//! We never own the hardware objects themselves; every record in the
//! manager is keyed by these ids.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Hardware identity of a tablet.
    TabletId,
    "tablet"
);
id_type!(
    /// Hardware identity of a tool (stylus, eraser, puck, ...).
    ToolId,
    "tool"
);
id_type!(
    /// Hardware identity of a pad.
    PadId,
    "pad"
);
id_type!(
    /// Client surface. Owned by the seat, referenced here only by id.
    SurfaceId,
    "surface"
);
id_type!(
    /// Toplevel window owning one or more surfaces.
    WindowId,
    "window"
);

/// Physical tool type as reported by the hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pen,
    Eraser,
    Brush,
    Pencil,
    Airbrush,
    /// A puck. Always drives the cursor with relative deltas.
    Mouse,
    Lens,
    Totem,
}

impl ToolKind {
    #[must_use]
    pub const fn is_mouse(self) -> bool {
        matches!(self, Self::Mouse)
    }
}

/// A tablet as announced by the device layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabletHandle {
    pub id: TabletId,
    #[serde(default)]
    pub name: String,
    /// Physical size of the sensing area in millimetres, if known.
    #[serde(default)]
    pub physical_size: Option<Point>,
}

/// A tool as first seen in a tool event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolHandle {
    pub id: ToolId,
    #[serde(default)]
    pub kind: ToolKind,
    #[serde(default)]
    pub name: String,
}

/// A pad as announced by the device layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadHandle {
    pub id: PadId,
    #[serde(default)]
    pub name: String,
    /// Tablet the pad is physically part of.
    #[serde(default)]
    pub tablet: Option<TabletId>,
}

/// Any device whose removal the manager can be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceId {
    Tablet(TabletId),
    Tool(ToolId),
    Pad(PadId),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tablet(id) => fmt::Display::fmt(id, f),
            Self::Tool(id) => fmt::Display::fmt(id, f),
            Self::Pad(id) => fmt::Display::fmt(id, f),
        }
    }
}

/// Allocates unique diagnostic names for input devices.
///
/// Names are the hardware name lower-cased, whitespace collapsed to `-`,
/// and anything outside `[a-z0-9_-]` dropped. A clash appends `-1`, `-2`,
/// and so on.
#[derive(Debug, Default)]
pub struct DeviceNames {
    taken: HashSet<String>,
}

impl DeviceNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a name for a newly discovered device.
    ///
    /// # Errors
    ///
    /// Returns [`TabletError::Naming`] if the hardware name has no usable
    /// characters.
    pub fn assign(&mut self, hardware_name: &str) -> Result<String, TabletError> {
        let base = normalize(hardware_name);
        if base.is_empty() {
            return Err(TabletError::Naming(hardware_name.to_string()));
        }

        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        self.taken.insert(candidate.clone());
        Ok(candidate)
    }

    /// Give a name back once its device is gone.
    pub fn release(&mut self, name: &str) {
        self.taken.remove(name);
    }
}

fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        let c = c.to_ascii_lowercase();
        if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            continue;
        }
        if pending_dash && !out.is_empty() {
            out.push('-');
        }
        pending_dash = false;
        out.push(c);
    }
    out
}

/// Errors raised while registering tablet devices.
#[derive(Debug, thiserror::Error)]
pub enum TabletError {
    /// The hardware name could not be turned into a diagnostic name.
    #[error("device name {0:?} has no usable characters")]
    Naming(String),

    #[error("no live state for {0}")]
    UnknownDevice(DeviceId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_normalized() {
        let mut names = DeviceNames::new();
        assert_eq!(
            names.assign("Wacom Intuos Pro M Pen").unwrap(),
            "wacom-intuos-pro-m-pen"
        );
        assert_eq!(names.assign("  HUION  (Kamvas)  ").unwrap(), "huion-kamvas");
    }

    #[test]
    fn clashing_names_get_suffixes() {
        let mut names = DeviceNames::new();
        assert_eq!(names.assign("Pad").unwrap(), "pad");
        assert_eq!(names.assign("pad").unwrap(), "pad-1");
        assert_eq!(names.assign("PAD").unwrap(), "pad-2");
    }

    #[test]
    fn released_names_are_reused() {
        let mut names = DeviceNames::new();
        let first = names.assign("Stylus").unwrap();
        names.release(&first);
        assert_eq!(names.assign("Stylus").unwrap(), "stylus");
    }

    #[test]
    fn unusable_name_is_an_error() {
        let mut names = DeviceNames::new();
        assert!(matches!(names.assign("   "), Err(TabletError::Naming(_))));
        assert!(matches!(names.assign("???"), Err(TabletError::Naming(_))));
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(ToolId(7).to_string(), "tool#7");
        assert_eq!(DeviceId::Pad(PadId(2)).to_string(), "pad#2");
    }
}
