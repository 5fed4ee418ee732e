//! Tablet event dispatch.
//!
//! [`TabletManager`] owns every tablet, tool and pad record and turns
//! hardware events into cursor updates and tablet protocol signals. All
//! work happens synchronously inside [`TabletManager::handle_event`].

use std::collections::{HashMap, HashSet};

use crate::device::{
    DeviceId, DeviceNames, PadHandle, PadId, SurfaceId, TabletError, TabletHandle, TabletId,
    ToolHandle, ToolId,
};
use crate::event::{
    AxisEvent, AxisFlags, ButtonEvent, PadAttachEvent, PadButtonEvent, PadRingEvent,
    PadStripEvent, ProximityEvent, TabletEvent, TipEvent,
};
use crate::focus::{refocus_tablet, unfocus_tool};
use crate::geometry::Point;
use crate::pad::Pad;
use crate::protocol::{InputContext, PadTag};
use crate::tablet::{SettingsProfile, Tablet};
use crate::tool::Tool;
use crate::transform::transform_to_active_area;

/// Mode group index used for every pad signal.
const PAD_GROUP: u32 = 0;

/// Owner of all tablet input state for one seat.
#[derive(Debug, Default)]
pub struct TabletManager {
    tablets: HashMap<TabletId, Tablet>,
    tools: HashMap<ToolId, Tool>,
    pads: HashMap<PadId, Pad>,
    /// Devices whose destroy hook already ran. Events naming them are dropped.
    retired: HashSet<DeviceId>,
    names: DeviceNames,
    profile: SettingsProfile,
}

impl TabletManager {
    #[must_use]
    pub fn new(profile: SettingsProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tablet(&self, id: TabletId) -> Option<&Tablet> {
        self.tablets.get(&id)
    }

    #[must_use]
    pub fn tool(&self, id: ToolId) -> Option<&Tool> {
        self.tools.get(&id)
    }

    #[must_use]
    pub fn pad(&self, id: PadId) -> Option<&Pad> {
        self.pads.get(&id)
    }

    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Dispatch one event.
    pub fn handle_event(&mut self, event: &TabletEvent, cx: &mut InputContext<'_>) {
        match event {
            TabletEvent::TabletAdded(handle) => self.new_tablet(handle, cx),
            TabletEvent::PadAdded(handle) => self.new_pad(handle),
            TabletEvent::ToolAxis(e) => self.on_tool_axis(e, cx),
            TabletEvent::ToolTip(e) => self.on_tool_tip(e, cx),
            TabletEvent::ToolButton(e) => self.on_tool_button(e, cx),
            TabletEvent::ToolProximity(e) => self.on_tool_proximity(e, cx),
            TabletEvent::PadButton(e) => self.on_pad_button(e, cx),
            TabletEvent::PadRing(e) => self.on_pad_ring(e, cx),
            TabletEvent::PadStrip(e) => self.on_pad_strip(e, cx),
            TabletEvent::PadAttach(e) => self.on_pad_attach(e),
            TabletEvent::Removed { device } => {
                if let Err(e) = self.remove_device(*device, cx) {
                    tracing::debug!("Ignoring removal: {e}");
                }
            }
            TabletEvent::SurfaceDestroyed { surface } => self.surface_destroyed(*surface),
        }
    }

    /// Register a tablet announced by the device layer.
    pub fn new_tablet(&mut self, handle: &TabletHandle, cx: &mut InputContext<'_>) {
        if self.tablets.contains_key(&handle.id) {
            tracing::debug!(tablet = %handle.id, "Tablet already registered");
            return;
        }
        // An explicit announcement is a new device, even if the id was used before.
        self.retired.remove(&DeviceId::Tablet(handle.id));

        let name = assign_name(&mut self.names, &handle.name, "tablet");
        tracing::info!(tablet = %handle.id, ?name, "New tablet");

        let mut tablet = Tablet::new(handle, name);
        tablet.apply(self.profile.for_device(tablet.name()));
        cx.seat.attach_tablet(handle.id);
        self.tablets.insert(handle.id, tablet);
    }

    /// Register a pad announced by the device layer.
    pub fn new_pad(&mut self, handle: &PadHandle) {
        if self.pads.contains_key(&handle.id) {
            tracing::debug!(pad = %handle.id, "Pad already registered");
            return;
        }
        self.retired.remove(&DeviceId::Pad(handle.id));

        let name = assign_name(&mut self.names, &handle.name, "pad");
        tracing::info!(pad = %handle.id, ?name, tablet = ?handle.tablet, "New tablet pad");

        if let Some(tablet) = handle.tablet.and_then(|t| self.tablets.get_mut(&t)) {
            tablet.link_pad(handle.id);
        }
        self.pads.insert(handle.id, Pad::new(handle, name));
    }

    /// Re-apply settings to every tablet, e.g. after a config reload.
    pub fn set_profile(&mut self, profile: SettingsProfile) {
        self.profile = profile;
        for tablet in self.tablets.values_mut() {
            tablet.apply(self.profile.for_device(tablet.name()));
        }
    }

    pub fn on_tool_axis(&mut self, e: &AxisEvent, cx: &mut InputContext<'_>) {
        let Some((tablet, tool)) = self.tool_on_tablet(e.tablet, &e.tool, cx) else {
            return;
        };

        if tool.active && e.updated.intersects(AxisFlags::POSITION) {
            let delta = e.flagged_delta();
            if tool.kind().is_mouse() {
                cx.seat.move_by(delta);
            } else {
                let pos = e.flagged_position();
                tool.set_absolute(pos);

                if tablet.relative_input {
                    cx.seat.move_by(delta);
                } else {
                    cx.seat.warp_absolute(
                        transform_to_active_area(pos, &tablet.active_area),
                        tablet.id(),
                    );
                }
            }

            if !tool.down {
                cx.seat.simulate_motion();
            }
            refocus_tablet(tablet.id(), tool, true, cx);
        }

        let id = tool.id();
        if e.updated.contains(AxisFlags::PRESSURE) {
            tool.pressure = e.pressure;
            cx.protocol.pressure(id, e.pressure);
        }
        if e.updated.contains(AxisFlags::DISTANCE) {
            tool.distance = e.distance;
            cx.protocol.distance(id, e.distance);
        }
        if e.updated.contains(AxisFlags::ROTATION) {
            tool.rotation = e.rotation;
            cx.protocol.rotation(id, e.rotation);
        }
        if e.updated.contains(AxisFlags::SLIDER) {
            tool.slider = e.slider;
            cx.protocol.slider(id, e.slider);
        }
        if e.updated.contains(AxisFlags::WHEEL) {
            tool.wheel = e.wheel_delta;
            cx.protocol.wheel(id, e.wheel_delta);
        }
        if e.updated.contains(AxisFlags::TILT_X) {
            tool.tilt.x = e.tilt.x;
        }
        if e.updated.contains(AxisFlags::TILT_Y) {
            tool.tilt.y = e.tilt.y;
        }
        if e.updated.intersects(AxisFlags::TILT) {
            cx.protocol.tilt(id, tool.tilt);
        }
    }

    pub fn on_tool_tip(&mut self, e: &TipEvent, cx: &mut InputContext<'_>) {
        let Some((tablet, tool)) = self.tool_on_tablet(e.tablet, &e.tool, cx) else {
            return;
        };

        if tablet.relative_input {
            cx.seat.move_by(Point::ZERO);
        } else {
            cx.seat.warp_absolute(
                transform_to_active_area(e.position, &tablet.active_area),
                tablet.id(),
            );
        }

        if e.down {
            if !tool.active {
                tracing::debug!(tool = %tool.id(), "Tip down without proximity, marking active");
                tool.active = true;
            }
            cx.seat.refocus();
        }

        refocus_tablet(tablet.id(), tool, true, cx);

        if e.down {
            cx.protocol.down(tool.id());
        } else {
            cx.protocol.up(tool.id());
        }
        tool.down = e.down;
    }

    pub fn on_tool_button(&mut self, e: &ButtonEvent, cx: &mut InputContext<'_>) {
        let Some((_, tool)) = self.tool_on_tablet(e.tablet, &e.tool, cx) else {
            return;
        };

        if e.pressed {
            cx.seat.refocus();
        }

        cx.protocol.button_tool(tool.id(), e.button, e.pressed);

        if e.pressed {
            tool.press_button(e.button);
        } else {
            tool.release_button(e.button);
        }
    }

    pub fn on_tool_proximity(&mut self, e: &ProximityEvent, cx: &mut InputContext<'_>) {
        let Some((tablet, tool)) = self.tool_on_tablet(e.tablet, &e.tool, cx) else {
            return;
        };

        if e.in_proximity {
            tool.active = true;
            cx.seat.simulate_motion();
            refocus_tablet(tablet.id(), tool, false, cx);
        } else {
            unfocus_tool(tool, cx.protocol);
            tool.leave_proximity();
        }
    }

    pub fn on_pad_button(&mut self, e: &PadButtonEvent, cx: &mut InputContext<'_>) {
        let Some(pad) = self.ensure_pad(e.pad) else {
            return;
        };
        pad.mode = e.mode;

        let Some(tag) = self.pad_tag(e.pad) else {
            return;
        };
        cx.protocol.mode(tag, e.time_ms);
        cx.protocol.button_pad(tag, e.button, e.time_ms, e.pressed);
    }

    pub fn on_pad_ring(&mut self, e: &PadRingEvent, cx: &mut InputContext<'_>) {
        if self.ensure_pad(e.pad).is_none() {
            return;
        }
        if let Some(tag) = self.pad_tag(e.pad) {
            cx.protocol.ring(tag, e.ring, e.position, e.finger, e.time_ms);
        }
    }

    pub fn on_pad_strip(&mut self, e: &PadStripEvent, cx: &mut InputContext<'_>) {
        if self.ensure_pad(e.pad).is_none() {
            return;
        }
        if let Some(tag) = self.pad_tag(e.pad) {
            cx.protocol.strip(tag, e.strip, e.position, e.finger, e.time_ms);
        }
    }

    pub fn on_pad_attach(&mut self, e: &PadAttachEvent) {
        let Some(tool) = self.ensure_tool(&e.tool) else {
            return;
        };
        if let Some(pad) = self.ensure_pad(e.pad) {
            tracing::debug!(pad = %e.pad, %tool, "Pad attached to tool");
            pad.parent = Some(tool);
        }
    }

    /// Run the destroy hook for a device and retire its id, so later events
    /// naming it are ignored.
    ///
    /// Ids that never had live state are not retired: a device removed
    /// before its first event can still show up later.
    ///
    /// # Errors
    ///
    /// Returns [`TabletError::UnknownDevice`] if there was no live state for
    /// the device, including when it was already removed.
    pub fn remove_device(
        &mut self,
        device: DeviceId,
        cx: &mut InputContext<'_>,
    ) -> Result<(), TabletError> {
        let existed = match device {
            DeviceId::Tablet(id) => self.destroy_tablet(id, cx),
            DeviceId::Tool(id) => self.destroy_tool(id, cx),
            DeviceId::Pad(id) => self.destroy_pad(id),
        };
        if !existed {
            return Err(TabletError::UnknownDevice(device));
        }

        self.retired.insert(device);
        tracing::info!(%device, "Device removed");
        Ok(())
    }

    /// Forget a surface the seat has destroyed.
    ///
    /// The client object is gone, so no signals are sent.
    pub fn surface_destroyed(&mut self, surface: SurfaceId) {
        for tool in self.tools.values_mut() {
            if tool.focus == Some(surface) {
                tracing::debug!(tool = %tool.id(), %surface, "Focus surface destroyed");
                tool.focus = None;
            }
        }
    }

    fn destroy_tool(&mut self, id: ToolId, cx: &mut InputContext<'_>) -> bool {
        let Some(mut tool) = self.tools.remove(&id) else {
            return false;
        };

        unfocus_tool(&mut tool, cx.protocol);
        if let Some(name) = tool.name() {
            self.names.release(name);
        }
        for pad in self.pads.values_mut() {
            if pad.parent == Some(id) {
                pad.parent = None;
            }
        }
        true
    }

    fn destroy_tablet(&mut self, id: TabletId, cx: &mut InputContext<'_>) -> bool {
        let Some(tablet) = self.tablets.remove(&id) else {
            return false;
        };

        for tool in self.tools.values_mut() {
            if tool.tablet == Some(id) {
                unfocus_tool(tool, cx.protocol);
                tool.leave_proximity();
                tool.tablet = None;
            }
        }
        for pad in self.pads.values_mut() {
            if pad.tablet == Some(id) {
                pad.tablet = None;
            }
        }
        cx.seat.detach_tablet(id);
        if let Some(name) = tablet.name() {
            self.names.release(name);
        }
        true
    }

    fn destroy_pad(&mut self, id: PadId) -> bool {
        let Some(pad) = self.pads.remove(&id) else {
            return false;
        };

        if let Some(tablet) = pad.tablet.and_then(|t| self.tablets.get_mut(&t)) {
            tablet.unlink_pad(id);
        }
        if let Some(name) = pad.name() {
            self.names.release(name);
        }
        true
    }

    /// Look up or create the tool, unless it was removed.
    fn ensure_tool(&mut self, handle: &ToolHandle) -> Option<ToolId> {
        if self.retired.contains(&DeviceId::Tool(handle.id)) {
            tracing::debug!(tool = %handle.id, "Dropping event for removed tool");
            return None;
        }
        if !self.tools.contains_key(&handle.id) {
            let name = assign_name(&mut self.names, &handle.name, "tool");
            tracing::info!(tool = %handle.id, kind = ?handle.kind, ?name, "New tablet tool");
            self.tools.insert(handle.id, Tool::new(handle, name));
        }
        Some(handle.id)
    }

    /// Look up or create the tablet, unless it was removed.
    fn ensure_tablet(&mut self, id: TabletId, cx: &mut InputContext<'_>) -> bool {
        if self.retired.contains(&DeviceId::Tablet(id)) {
            tracing::debug!(tablet = %id, "Dropping event for removed tablet");
            return false;
        }
        if !self.tablets.contains_key(&id) {
            tracing::debug!(tablet = %id, "Event for unannounced tablet, creating it");
            let mut tablet = Tablet::new(
                &TabletHandle {
                    id,
                    ..TabletHandle::default()
                },
                None,
            );
            tablet.apply(&self.profile.default);
            cx.seat.attach_tablet(id);
            self.tablets.insert(id, tablet);
        }
        true
    }

    fn ensure_pad(&mut self, id: PadId) -> Option<&mut Pad> {
        if self.retired.contains(&DeviceId::Pad(id)) {
            tracing::debug!(pad = %id, "Dropping event for removed pad");
            return None;
        }
        Some(self.pads.entry(id).or_insert_with(|| {
            tracing::debug!(pad = %id, "Event for unannounced pad, creating it");
            Pad::new(
                &PadHandle {
                    id,
                    ..PadHandle::default()
                },
                None,
            )
        }))
    }

    /// Resolve both records of a tool event, recording where the tool is.
    fn tool_on_tablet(
        &mut self,
        tablet: TabletId,
        tool: &ToolHandle,
        cx: &mut InputContext<'_>,
    ) -> Option<(&Tablet, &mut Tool)> {
        let tool_id = self.ensure_tool(tool)?;
        if !self.ensure_tablet(tablet, cx) {
            return None;
        }

        let tablet = self.tablets.get(&tablet)?;
        let tool = self.tools.get_mut(&tool_id)?;
        tool.tablet = Some(tablet.id());
        Some((tablet, tool))
    }

    fn pad_tag(&self, id: PadId) -> Option<PadTag> {
        let pad = self.pads.get(&id)?;
        Some(PadTag {
            pad: id,
            group: PAD_GROUP,
            mode: pad.mode,
            tool: pad.parent.filter(|t| self.tools.contains_key(t)),
        })
    }
}

/// Reserve a diagnostic name. Failure is logged and leaves the device unnamed.
fn assign_name(names: &mut DeviceNames, hardware_name: &str, kind: &str) -> Option<String> {
    match names.assign(hardware_name) {
        Ok(name) => Some(name),
        Err(e) => {
            tracing::error!(kind, "Device has no usable name: {e}");
            None
        }
    }
}
