//! Trace files and replay.

use std::fmt;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tablet_input::record::{ProtocolEvent, Recorder};
use tablet_input::sim::{Scene, SimSeat};
use tablet_input::{InputContext, SettingsProfile, TabletEvent, TabletManager};

/// A recorded session: the initial seat layout and the hardware events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Trace {
    pub scene: Scene,
    pub events: Vec<TabletEvent>,
}

/// One emitted signal and the index of the event that caused it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub event: usize,
    #[serde(flatten)]
    pub signal: ProtocolEvent,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>4}] {}", self.event, self.signal)
    }
}

/// Read and parse a trace file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid trace.
pub fn load(path: &Path) -> Result<Trace> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trace: {}", path.display()))?;
    parse(&contents).with_context(|| format!("failed to parse trace: {}", path.display()))
}

/// Parse a trace from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not a valid trace, including scene
/// geometry that is not finite.
pub fn parse(contents: &str) -> Result<Trace> {
    let trace: Trace = toml::from_str(contents)?;
    check_scene(&trace.scene).context("invalid scene")?;
    Ok(trace)
}

fn check_scene(scene: &Scene) -> Result<()> {
    ensure!(
        scene.output.is_finite(),
        "output is not finite: {:?}",
        scene.output
    );
    ensure!(
        scene.cursor.is_finite(),
        "cursor is not finite: {:?}",
        scene.cursor
    );
    for surface in &scene.surfaces {
        ensure!(
            surface.rect.is_finite(),
            "{} rect is not finite: {:?}",
            surface.id,
            surface.rect
        );
        if let Some(window) = &surface.window {
            ensure!(
                window.size.is_finite() && window.x11_scale.map_or(true, f64::is_finite),
                "{} geometry is not finite",
                window.id
            );
        }
    }
    Ok(())
}

/// Run every event of `trace` and collect the emitted signals in order.
#[must_use]
pub fn replay(trace: Trace, profile: SettingsProfile) -> Vec<Step> {
    let mut seat = SimSeat::new(trace.scene);
    let mut recorder = Recorder::new();
    let mut manager = TabletManager::new(profile);
    let mut steps = Vec::new();

    for (index, event) in trace.events.iter().enumerate() {
        // The seat drops the surface before announcing it.
        if let TabletEvent::SurfaceDestroyed { surface } = event {
            seat.remove_surface(*surface);
        }

        tracing::trace!(index, ?event, "Dispatching");
        let mut cx = InputContext::new(&mut recorder, &mut seat);
        manager.handle_event(event, &mut cx);

        steps.extend(recorder.take().into_iter().map(|signal| Step {
            event: index,
            signal,
        }));
    }

    steps
}
