//! A [`TabletProtocol`] sink that records every signal.

use std::fmt;

use serde::Serialize;

use crate::device::{SurfaceId, TabletId, ToolId};
use crate::geometry::Point;
use crate::protocol::{PadTag, TabletProtocol};

/// One emitted protocol signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum ProtocolEvent {
    ProximityIn {
        tool: ToolId,
        tablet: TabletId,
        surface: SurfaceId,
    },
    ProximityOut {
        tool: ToolId,
    },
    Motion {
        tool: ToolId,
        local: Point,
    },
    Down {
        tool: ToolId,
    },
    Up {
        tool: ToolId,
    },
    ButtonTool {
        tool: ToolId,
        button: u32,
        pressed: bool,
    },
    Pressure {
        tool: ToolId,
        value: f64,
    },
    Distance {
        tool: ToolId,
        value: f64,
    },
    Rotation {
        tool: ToolId,
        degrees: f64,
    },
    Slider {
        tool: ToolId,
        value: f64,
    },
    Wheel {
        tool: ToolId,
        delta: f64,
    },
    Tilt {
        tool: ToolId,
        tilt: Point,
    },
    Mode {
        pad: PadTag,
        time_ms: u32,
    },
    ButtonPad {
        pad: PadTag,
        button: u32,
        time_ms: u32,
        pressed: bool,
    },
    Ring {
        pad: PadTag,
        ring: u32,
        position: f64,
        finger: bool,
        time_ms: u32,
    },
    Strip {
        pad: PadTag,
        strip: u32,
        position: f64,
        finger: bool,
        time_ms: u32,
    },
}

impl fmt::Display for ProtocolEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProximityIn {
                tool,
                tablet,
                surface,
            } => write!(f, "{tool} proximity_in {tablet} {surface}"),
            Self::ProximityOut { tool } => write!(f, "{tool} proximity_out"),
            Self::Motion { tool, local } => {
                write!(f, "{tool} motion {:.2},{:.2}", local.x, local.y)
            }
            Self::Down { tool } => write!(f, "{tool} down"),
            Self::Up { tool } => write!(f, "{tool} up"),
            Self::ButtonTool {
                tool,
                button,
                pressed,
            } => write!(f, "{tool} button {button:#x} pressed={pressed}"),
            Self::Pressure { tool, value } => write!(f, "{tool} pressure {value:.3}"),
            Self::Distance { tool, value } => write!(f, "{tool} distance {value:.3}"),
            Self::Rotation { tool, degrees } => write!(f, "{tool} rotation {degrees:.1}"),
            Self::Slider { tool, value } => write!(f, "{tool} slider {value:.3}"),
            Self::Wheel { tool, delta } => write!(f, "{tool} wheel {delta:.1}"),
            Self::Tilt { tool, tilt } => write!(f, "{tool} tilt {:.1},{:.1}", tilt.x, tilt.y),
            Self::Mode { pad, .. } => {
                write!(f, "{} mode group={} mode={}", pad.pad, pad.group, pad.mode)
            }
            Self::ButtonPad {
                pad,
                button,
                pressed,
                ..
            } => write!(f, "{} button {button} pressed={pressed}", pad.pad),
            Self::Ring {
                pad,
                ring,
                position,
                ..
            } => write!(f, "{} ring {ring} {position:.1}", pad.pad),
            Self::Strip {
                pad,
                strip,
                position,
                ..
            } => write!(f, "{} strip {strip} {position:.3}", pad.pad),
        }
    }
}

/// Records protocol signals in emission order.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Vec<ProtocolEvent>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[ProtocolEvent] {
        &self.events
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<ProtocolEvent> {
        std::mem::take(&mut self.events)
    }
}

impl TabletProtocol for Recorder {
    fn proximity_in(&mut self, tool: ToolId, tablet: TabletId, surface: SurfaceId) {
        self.events.push(ProtocolEvent::ProximityIn {
            tool,
            tablet,
            surface,
        });
    }

    fn proximity_out(&mut self, tool: ToolId) {
        self.events.push(ProtocolEvent::ProximityOut { tool });
    }

    fn motion(&mut self, tool: ToolId, local: Point) {
        self.events.push(ProtocolEvent::Motion { tool, local });
    }

    fn down(&mut self, tool: ToolId) {
        self.events.push(ProtocolEvent::Down { tool });
    }

    fn up(&mut self, tool: ToolId) {
        self.events.push(ProtocolEvent::Up { tool });
    }

    fn button_tool(&mut self, tool: ToolId, button: u32, pressed: bool) {
        self.events.push(ProtocolEvent::ButtonTool {
            tool,
            button,
            pressed,
        });
    }

    fn pressure(&mut self, tool: ToolId, pressure: f64) {
        self.events.push(ProtocolEvent::Pressure {
            tool,
            value: pressure,
        });
    }

    fn distance(&mut self, tool: ToolId, distance: f64) {
        self.events.push(ProtocolEvent::Distance {
            tool,
            value: distance,
        });
    }

    fn rotation(&mut self, tool: ToolId, degrees: f64) {
        self.events.push(ProtocolEvent::Rotation { tool, degrees });
    }

    fn slider(&mut self, tool: ToolId, position: f64) {
        self.events.push(ProtocolEvent::Slider {
            tool,
            value: position,
        });
    }

    fn wheel(&mut self, tool: ToolId, delta: f64) {
        self.events.push(ProtocolEvent::Wheel { tool, delta });
    }

    fn tilt(&mut self, tool: ToolId, tilt: Point) {
        self.events.push(ProtocolEvent::Tilt { tool, tilt });
    }

    fn mode(&mut self, pad: PadTag, time_ms: u32) {
        self.events.push(ProtocolEvent::Mode { pad, time_ms });
    }

    fn button_pad(&mut self, pad: PadTag, button: u32, time_ms: u32, pressed: bool) {
        self.events.push(ProtocolEvent::ButtonPad {
            pad,
            button,
            time_ms,
            pressed,
        });
    }

    fn ring(&mut self, pad: PadTag, ring: u32, position: f64, finger: bool, time_ms: u32) {
        self.events.push(ProtocolEvent::Ring {
            pad,
            ring,
            position,
            finger,
            time_ms,
        });
    }

    fn strip(&mut self, pad: PadTag, strip: u32, position: f64, finger: bool, time_ms: u32) {
        self.events.push(ProtocolEvent::Strip {
            pad,
            strip,
            position,
            finger,
            time_ms,
        });
    }
}
