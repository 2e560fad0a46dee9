use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use foundation::math::Coordinate;
use layers::BaseLayer;
use layers::raster::tile_index;
use runtime::{Event, EventQueue};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewport::{
    CoordinateTransform, HeadlessSurface, RenderSurface, ViewportConfig, ViewportController,
    ViewportEvent,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless map viewport: replay UI events, inspect bounds")]
struct Args {
    /// Surface width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a JSON event script and print the final viewport state
    Replay {
        /// Script file: a list of steps, or `{ "config": {..}, "steps": [..] }`
        script: PathBuf,
    },

    /// Print bounds, corner report and query polygon for a view
    Bounds {
        /// Center longitude (defaults to VIEWPORT_CENTER_LON or the home view)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Center latitude (defaults to VIEWPORT_CENTER_LAT or the home view)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long)]
        zoom: Option<f64>,

        /// Base layer id: osm or xyz
        #[arg(long)]
        layer: Option<String>,
    },
}

/// One script step: either drive the surface like a user would, or deliver a
/// UI event directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Step {
    Pan { pan: PanTo },
    Resize { resize: [u32; 2] },
    Event(ViewportEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct PanTo {
    lon: f64,
    lat: f64,
    zoom: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Script {
    Steps(Vec<Step>),
    WithConfig {
        #[serde(default)]
        config: Option<ViewportConfig>,
        steps: Vec<Step>,
    },
}

impl Script {
    fn into_parts(self) -> (Option<ViewportConfig>, Vec<Step>) {
        match self {
            Script::Steps(steps) => (None, steps),
            Script::WithConfig { config, steps } => (config, steps),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let out = match args.command {
        Command::Replay { script } => cmd_replay(&script, args.width, args.height)?,
        Command::Bounds {
            lon,
            lat,
            zoom,
            layer,
        } => cmd_bounds(lon, lat, zoom, layer.as_deref(), args.width, args.height)?,
    };
    let payload = serde_json::to_string_pretty(&out).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn cmd_replay(path: &Path, width: u32, height: u32) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let script: Script =
        serde_json::from_str(&text).map_err(|e| format!("parse {path:?}: {e}"))?;
    let (config, steps) = script.into_parts();
    replay(script_config(config)?, &steps, width, height)
}

/// An embedded config must be valid as written; without one the environment
/// decides.
fn script_config(config: Option<ViewportConfig>) -> Result<ViewportConfig, String> {
    match config {
        Some(config) => {
            config.validate().map_err(|e| format!("script config: {e}"))?;
            Ok(config)
        }
        None => Ok(ViewportConfig::from_env()),
    }
}

fn replay(config: ViewportConfig, steps: &[Step], width: u32, height: u32) -> Result<Value, String> {
    let mut vc = ViewportController::mount(HeadlessSurface::new(width, height), config);
    let mut queue = EventQueue::new();
    let mut log = Vec::new();

    for step in steps {
        match step {
            Step::Event(event) => queue.push(event.clone()),
            Step::Pan { pan } => {
                // Flush first so events apply against the view they were recorded on.
                vc.process(&mut queue);
                log.extend(vc.drain_event_log());
                let moved = with_surface(&mut vc, |s| {
                    s.pan_to(Coordinate::new(pan.lon, pan.lat), pan.zoom)
                })?;
                queue.push(moved);
            }
            Step::Resize { resize: [w, h] } => {
                vc.process(&mut queue);
                log.extend(vc.drain_event_log());
                with_surface(&mut vc, |s| s.resize(*w, *h))?;
            }
        }
    }
    let handled = vc.process(&mut queue);
    log.extend(vc.drain_event_log());
    info!("replayed {} steps, {handled} events in final batch", steps.len());

    Ok(describe(&vc, &log))
}

fn cmd_bounds(
    lon: Option<f64>,
    lat: Option<f64>,
    zoom: Option<f64>,
    layer: Option<&str>,
    width: u32,
    height: u32,
) -> Result<Value, String> {
    let mut config = ViewportConfig::from_env();
    if let Some(layer) = layer {
        config.base_layer = layer.parse::<BaseLayer>().map_err(|e| e.to_string())?;
    }
    config.center = Coordinate::new(
        lon.unwrap_or(config.center.lon),
        lat.unwrap_or(config.center.lat),
    );
    config.zoom = zoom.unwrap_or(config.zoom);
    config.validate().map_err(|e| e.to_string())?;

    let mut vc = ViewportController::mount(HeadlessSurface::new(width, height), config);
    vc.compute_bounds_snapshot().map_err(|e| e.to_string())?;
    let log = vc.drain_event_log();
    Ok(describe(&vc, &log))
}

fn with_surface<T>(
    vc: &mut ViewportController<HeadlessSurface>,
    f: impl FnOnce(&mut HeadlessSurface) -> T,
) -> Result<T, String> {
    vc.surface_mut()
        .map(f)
        .ok_or_else(|| "surface already released".to_string())
}

fn describe(vc: &ViewportController<HeadlessSurface>, events: &[Event]) -> Value {
    let snapshot = vc.snapshot();
    let Some(surface) = vc.surface() else {
        return json!({ "snapshot": snapshot, "events": events });
    };
    let transform = CoordinateTransform::new(surface);
    let zoom = snapshot.zoom.round().max(0.0) as u32;
    let (x, y) = tile_index(snapshot.center, zoom);
    let tile_url = surface
        .base_layer(snapshot.selected_layer)
        .map(|l| l.source.tile_url(zoom, x, y));

    json!({
        "snapshot": snapshot,
        "bounds_geojson": snapshot.bounds.map(|b| b.to_geojson()),
        "query_params": snapshot.bounds.map(|b| b.query_params()),
        "overlay_geojson": snapshot.overlay.to_geojson(&transform),
        "overlay_fill": vc.config().overlay_style.to_css_rgba(),
        "center_tile_url": tile_url,
        "surface": {
            "center": surface.center(),
            "zoom": surface.current_zoom(),
            "visibility_batches": surface.visibility_batches(),
        },
        "metrics": vc.metrics().snapshot(),
        "events": events,
    })
}

#[cfg(test)]
mod tests {
    use super::{Script, Step, replay, script_config};
    use foundation::math::Coordinate;
    use pretty_assertions::assert_eq;
    use viewport::{ViewportConfig, ViewportEvent};

    #[test]
    fn script_mixes_pans_and_events() {
        let script: Script = serde_json::from_str(
            r#"{
                "config": { "zoom": 14.0 },
                "steps": [
                    { "pan": { "lon": 85.33, "lat": 27.70, "zoom": 13.0 } },
                    { "type": "toggle_overlay" },
                    { "resize": [0, 0] },
                    { "type": "bounds_snapshot" }
                ]
            }"#,
        )
        .unwrap();
        let (config, steps) = script.into_parts();
        assert_eq!(config.map(|c| c.zoom), Some(14.0));
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[1], Step::Event(ViewportEvent::ToggleOverlay));
        assert_eq!(steps[2], Step::Resize { resize: [0, 0] });
    }

    #[test]
    fn bare_step_list_is_accepted() {
        let script: Script = serde_json::from_str(r#"[{ "type": "select_layer", "id": "xyz" }]"#)
            .unwrap();
        let (config, steps) = script.into_parts();
        assert!(config.is_none());
        assert_eq!(
            steps,
            vec![Step::Event(ViewportEvent::SelectLayer { id: "xyz".into() })]
        );
    }

    #[test]
    fn replay_reports_final_view() {
        let steps: Vec<Step> = serde_json::from_str(
            r#"[
                { "pan": { "lon": 85.33, "lat": 27.70, "zoom": 13.0 } },
                { "type": "toggle_overlay" },
                { "type": "select_layer", "id": "satellite" },
                { "type": "select_layer", "id": "nope" }
            ]"#,
        )
        .unwrap();
        let out = replay(ViewportConfig::default(), &steps, 800, 600).unwrap();

        assert_eq!(out["snapshot"]["selected_layer"], "xyz");
        assert_eq!(out["snapshot"]["zoom"], 13.0);
        assert_eq!(out["snapshot"]["overlay_visible"], true);
        assert_eq!(out["overlay_geojson"]["type"], "Polygon");
        assert_eq!(out["overlay_fill"], "rgba(255, 0, 0, 0.3)");
        let counters = out["metrics"]["counters"].as_array().unwrap();
        assert!(counters.contains(&serde_json::json!(["viewport.rejected.unknown_layer", 1])));
        assert!(out["bounds_geojson"].is_object());
        let url = out["center_tile_url"].as_str().unwrap();
        assert!(url.starts_with("https://www.google.cn/maps/vt"), "{url}");
    }

    #[test]
    fn embedded_config_out_of_range_is_refused() {
        let config = ViewportConfig {
            zoom: 3e9,
            ..ViewportConfig::default()
        };
        let err = script_config(Some(config)).unwrap_err();
        assert!(err.contains("invalid zoom"), "{err}");

        let config = ViewportConfig {
            center: Coordinate::new(f64::NAN, 27.0),
            ..ViewportConfig::default()
        };
        assert!(script_config(Some(config)).is_err());
    }

    #[test]
    fn replay_with_huge_zoom_falls_back_instead_of_panicking() {
        let config = ViewportConfig {
            zoom: 3e9,
            ..ViewportConfig::default()
        };
        let steps: Vec<Step> = serde_json::from_str(r#"[{ "type": "toggle_overlay" }]"#).unwrap();
        let out = replay(config, &steps, 800, 600).unwrap();
        assert_eq!(out["snapshot"]["zoom"], 15.0);
        assert!(out["center_tile_url"].as_str().unwrap().contains("/15/"));
        assert_eq!(out["events"].as_array().unwrap().len(), 2);
    }
}
