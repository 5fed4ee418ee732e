//! Tablet input handling for a compositor seat.
//!
//! Translates raw tablet, tool and pad hardware events into tablet
//! protocol signals while keeping each tool's focus surface in step with
//! the seat's pointer focus.
//!
//! - [`geometry`]: points and rectangles in logical/global space
//! - [`transform`]: active-area mapping of absolute tablet coordinates
//! - [`device`]: hardware handles, identities and diagnostic naming
//! - [`tool`], [`tablet`], [`pad`]: per-device state records
//! - [`event`]: hardware events consumed by the dispatcher
//! - [`protocol`]: collaborator traits (protocol sink, pointer, surfaces)
//! - [`focus`]: tool focus reconciliation
//! - [`manager`]: the event dispatcher owning all device state
//! - [`sim`], [`record`]: in-memory seat and protocol recorder

pub mod device;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod manager;
pub mod pad;
pub mod protocol;
pub mod record;
pub mod sim;
pub mod tablet;
pub mod tool;
pub mod transform;

pub use device::{
    DeviceId, DeviceNames, PadHandle, PadId, SurfaceId, TabletError, TabletHandle, TabletId,
    ToolHandle, ToolId, ToolKind, WindowId,
};
pub use event::{AxisEvent, AxisFlags, TabletEvent};
pub use geometry::{Point, Rect};
pub use manager::TabletManager;
pub use protocol::{InputContext, PadTag, PointerSubsystem, SurfaceModel, TabletProtocol};
pub use tablet::{SettingsProfile, TabletSettings};
pub use transform::ActiveArea;
