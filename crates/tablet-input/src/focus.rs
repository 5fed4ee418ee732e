//! Tool focus reconciliation.
//!
//! A tool's focus surface follows the seat's pointer focus. Whenever the two
//! diverge the tool leaves the old surface (releasing everything the client
//! saw pressed) and enters the new one (replaying what is still pressed), so
//! clients never hold stale button or tip state.

use crate::device::{SurfaceId, TabletId};
use crate::geometry::{Point, Rect};
use crate::protocol::{InputContext, SeatContext, TabletProtocol};
use crate::tool::Tool;

/// Take focus away from a tool.
///
/// Emits tip-up if down, button-up for each held button in press order,
/// then a single proximity-out. The tool's own press state is left alone so
/// it can be replayed on the next surface.
pub fn unfocus_tool(tool: &mut Tool, protocol: &mut dyn TabletProtocol) {
    let Some(surface) = tool.focus.take() else {
        return;
    };

    tracing::debug!(tool = %tool.id(), %surface, "Tool leaving surface");

    if tool.down {
        protocol.up(tool.id());
    }
    for &button in tool.buttons_down() {
        protocol.button_tool(tool.id(), button, false);
    }
    protocol.proximity_out(tool.id());
}

/// Give a tool focus on `surface`, leaving any previous surface first.
///
/// Does nothing if the tool is already focused there.
pub fn focus_tool(
    tool: &mut Tool,
    tablet: TabletId,
    surface: SurfaceId,
    protocol: &mut dyn TabletProtocol,
) {
    if tool.focus == Some(surface) {
        return;
    }
    if tool.focus.is_some() {
        unfocus_tool(tool, protocol);
    }

    tracing::debug!(tool = %tool.id(), %tablet, %surface, "Tool entering surface");

    tool.focus = Some(surface);
    protocol.proximity_in(tool.id(), tablet, surface);
    if tool.down {
        protocol.down(tool.id());
    }
    for &button in tool.buttons_down() {
        protocol.button_tool(tool.id(), button, true);
    }
}

/// Bring the tool's focus in line with the seat's pointer focus.
///
/// With `motion` set, also emits a surface-local motion event for the
/// current position.
pub fn refocus_tablet(
    tablet: TabletId,
    tool: &mut Tool,
    motion: bool,
    cx: &mut InputContext<'_>,
) {
    let Some(surface) = cx.seat.pointer_focus().filter(|_| tool.active) else {
        unfocus_tool(tool, cx.protocol);
        return;
    };

    let Some(bbox) = cx.seat.surface_box(surface) else {
        unfocus_tool(tool, cx.protocol);
        return;
    };

    let cursor = cx.seat.cursor_position();

    focus_tool(tool, tablet, surface, cx.protocol);

    if !motion {
        return;
    }

    let local = local_position(tool, surface, bbox, cursor, &*cx.seat);
    tracing::trace!(tool = %tool.id(), %surface, ?local, "Tool motion");
    cx.protocol.motion(tool.id(), local);
}

/// Surface-local position of a tool.
///
/// Under a pointer constraint the cursor does not move, so the tool's
/// absolute position is mapped onto the window (or surface) size instead.
/// Mouse-type tools are exempt: they drive the cursor relatively anyway.
fn local_position(
    tool: &Tool,
    surface: SurfaceId,
    bbox: Rect,
    cursor: Point,
    seat: &dyn SeatContext,
) -> Point {
    let window = seat.surface_window(surface);
    let x11_scale = window.and_then(|w| seat.x11_scale(w));

    let local = if seat.has_constraint(surface) && !tool.kind().is_mouse() {
        let size = window.map_or(bbox.size(), |w| seat.window_size(w));
        tool.absolute_pos.scale(size)
    } else {
        cursor - bbox.origin()
    };

    match x11_scale {
        Some(scale) => local * scale,
        None => local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ToolHandle, ToolId, ToolKind, WindowId};
    use crate::protocol::PointerSubsystem;
    use crate::record::{ProtocolEvent, Recorder};
    use crate::sim::{Scene, SimSeat, SimSurface, SimWindow};

    const TABLET: TabletId = TabletId(1);
    const TOOL: ToolId = ToolId(10);

    fn tool(kind: ToolKind) -> Tool {
        let mut tool = Tool::new(
            &ToolHandle {
                id: TOOL,
                kind,
                name: String::new(),
            },
            None,
        );
        tool.active = true;
        tool
    }

    fn seat() -> SimSeat {
        SimSeat::new(Scene {
            output: Rect::new(0.0, 0.0, 1000.0, 1000.0),
            cursor: Point::new(150.0, 120.0),
            surfaces: vec![
                SimSurface::new(1, Rect::new(100.0, 100.0, 400.0, 300.0)),
                SimSurface::new(2, Rect::new(600.0, 600.0, 200.0, 200.0)),
            ],
        })
    }

    fn refocus(tool: &mut Tool, seat: &mut SimSeat, rec: &mut Recorder, motion: bool) {
        let mut cx = InputContext::new(rec, seat);
        refocus_tablet(TABLET, tool, motion, &mut cx);
    }

    #[test]
    fn focus_follows_pointer_and_emits_motion() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(tool.focus(), Some(SurfaceId(1)));
        assert_eq!(
            rec.take(),
            vec![
                ProtocolEvent::ProximityIn {
                    tool: TOOL,
                    tablet: TABLET,
                    surface: SurfaceId(1)
                },
                ProtocolEvent::Motion {
                    tool: TOOL,
                    local: Point::new(50.0, 20.0)
                },
            ]
        );
    }

    #[test]
    fn refocus_is_idempotent() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);

        refocus(&mut tool, &mut seat, &mut rec, false);
        assert_eq!(rec.take().len(), 1);

        refocus(&mut tool, &mut seat, &mut rec, false);
        assert!(rec.take().is_empty());
        assert_eq!(tool.focus(), Some(SurfaceId(1)));
    }

    #[test]
    fn losing_focus_releases_tip_then_buttons_then_proximity() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.down = true;
        tool.press_button(0x14b);
        tool.press_button(0x14c);
        refocus(&mut tool, &mut seat, &mut rec, false);
        rec.take();

        tool.active = false;
        refocus(&mut tool, &mut seat, &mut rec, false);

        assert_eq!(
            rec.take(),
            vec![
                ProtocolEvent::Up { tool: TOOL },
                ProtocolEvent::ButtonTool {
                    tool: TOOL,
                    button: 0x14b,
                    pressed: false
                },
                ProtocolEvent::ButtonTool {
                    tool: TOOL,
                    button: 0x14c,
                    pressed: false
                },
                ProtocolEvent::ProximityOut { tool: TOOL },
            ]
        );
        assert!(tool.focus().is_none());
        // Press state survives for replay.
        assert!(tool.is_down());
        assert_eq!(tool.buttons_down(), &[0x14b, 0x14c]);
    }

    #[test]
    fn gaining_focus_replays_held_button() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.press_button(0x14b);

        refocus(&mut tool, &mut seat, &mut rec, false);

        assert_eq!(
            rec.take(),
            vec![
                ProtocolEvent::ProximityIn {
                    tool: TOOL,
                    tablet: TABLET,
                    surface: SurfaceId(1)
                },
                ProtocolEvent::ButtonTool {
                    tool: TOOL,
                    button: 0x14b,
                    pressed: true
                },
            ]
        );
    }

    #[test]
    fn switching_surfaces_leaves_old_before_entering_new() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.down = true;
        refocus(&mut tool, &mut seat, &mut rec, false);
        rec.take();

        seat.warp_absolute(Point::new(0.7, 0.7), TABLET);
        seat.simulate_motion();
        refocus(&mut tool, &mut seat, &mut rec, false);

        assert_eq!(
            rec.take(),
            vec![
                ProtocolEvent::Up { tool: TOOL },
                ProtocolEvent::ProximityOut { tool: TOOL },
                ProtocolEvent::ProximityIn {
                    tool: TOOL,
                    tablet: TABLET,
                    surface: SurfaceId(2)
                },
                ProtocolEvent::Down { tool: TOOL },
            ]
        );
    }

    #[test]
    fn no_pointer_focus_unfocuses() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        refocus(&mut tool, &mut seat, &mut rec, false);
        rec.take();

        seat.set_focus(None);
        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(rec.take(), vec![ProtocolEvent::ProximityOut { tool: TOOL }]);
    }

    #[test]
    fn surface_without_box_unfocuses() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        refocus(&mut tool, &mut seat, &mut rec, false);
        rec.take();

        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.mapped = false;
        }
        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(rec.take(), vec![ProtocolEvent::ProximityOut { tool: TOOL }]);
        assert!(tool.focus().is_none());
    }

    #[test]
    fn unfocused_tool_without_target_emits_nothing() {
        let mut seat = seat();
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.active = false;

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert!(rec.events().is_empty());
    }

    #[test]
    fn constrained_surface_maps_absolute_position_onto_window() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.constrained = true;
            surface.window = Some(SimWindow {
                id: WindowId(5),
                size: Point::new(800.0, 600.0),
                x11_scale: None,
            });
        }
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.set_absolute(Point::new(0.5, 0.25));

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(
            rec.events().last(),
            Some(&ProtocolEvent::Motion {
                tool: TOOL,
                local: Point::new(400.0, 150.0)
            })
        );
    }

    #[test]
    fn constrained_x11_window_scales_mapped_position() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.constrained = true;
            surface.window = Some(SimWindow {
                id: WindowId(5),
                size: Point::new(800.0, 600.0),
                x11_scale: Some(2.0),
            });
        }
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.set_absolute(Point::new(0.5, 0.25));

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(
            rec.events().last(),
            Some(&ProtocolEvent::Motion {
                tool: TOOL,
                local: Point::new(800.0, 300.0)
            })
        );
    }

    #[test]
    fn constrained_surface_without_window_uses_box_size() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.constrained = true;
        }
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);
        tool.set_absolute(Point::new(0.5, 0.5));

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(
            rec.events().last(),
            Some(&ProtocolEvent::Motion {
                tool: TOOL,
                local: Point::new(200.0, 150.0)
            })
        );
    }

    #[test]
    fn mouse_tool_ignores_constraint() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.constrained = true;
        }
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Mouse);
        tool.set_absolute(Point::new(0.5, 0.5));

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(
            rec.events().last(),
            Some(&ProtocolEvent::Motion {
                tool: TOOL,
                local: Point::new(50.0, 20.0)
            })
        );
    }

    #[test]
    fn x11_window_scales_local_position() {
        let mut seat = seat();
        if let Some(surface) = seat.surface_mut(SurfaceId(1)) {
            surface.window = Some(SimWindow {
                id: WindowId(5),
                size: Point::new(400.0, 300.0),
                x11_scale: Some(2.0),
            });
        }
        let mut rec = Recorder::new();
        let mut tool = tool(ToolKind::Pen);

        refocus(&mut tool, &mut seat, &mut rec, true);

        assert_eq!(
            rec.events().last(),
            Some(&ProtocolEvent::Motion {
                tool: TOOL,
                local: Point::new(100.0, 40.0)
            })
        );
    }
}
