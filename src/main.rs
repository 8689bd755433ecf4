//! Marquee engine - Entry Point
//!
//! Drives one marquee instance against the in-process host and prints what the template layer
//! would receive.

use clap::Parser;
use marquee::config::CliOverrides;
use marquee::drag::{PointerEvent, PointerId, DRAG_THRESHOLD};
use marquee::engine::{Marquee, MarqueeCallbacks};
use marquee::host::{MemoryHost, RenderScheduler};
use marquee::layout::RenderedMarquee;
use marquee::model::{Direction, MarqueeParams};
use serde::Serialize;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Number of content blocks the template renders side by side.
const BLOCK_COUNT: usize = 2;

/// Marquee engine - compute marquee styles for a simulated layout
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(version)]
#[command(about = "Compute marquee animation styles for a simulated container and content")]
pub struct Args {
    /// Container span in pixels
    #[arg(long, default_value_t = 450.0)]
    pub container: f64,

    /// Content span in pixels
    #[arg(long, default_value_t = 200.0)]
    pub content: f64,

    /// Scroll speed in pixels per second
    #[arg(long)]
    pub speed: Option<f64>,

    /// Scroll direction
    #[arg(long, value_parser = ["left", "right", "up", "down"])]
    pub direction: Option<String>,

    /// Duplicate content until it covers the container
    #[arg(long)]
    pub auto_fill: bool,

    /// Enable drag-to-scrub
    #[arg(long)]
    pub draggable: bool,

    /// Number of loops (0 loops forever)
    #[arg(long = "loop")]
    pub loop_count: Option<u32>,

    /// Simulate a drag of this many pixels after mounting (implies --draggable)
    #[arg(long, allow_hyphen_values = true)]
    pub drag: Option<f64>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Result<CliOverrides, Box<dyn std::error::Error>> {
        let direction = self
            .direction
            .as_deref()
            .map(str::parse::<Direction>)
            .transpose()?;
        Ok(CliOverrides {
            speed: self.speed,
            direction,
            auto_fill: self.auto_fill.then_some(true),
            draggable: (self.draggable || self.drag.is_some()).then_some(true),
            loop_count: self.loop_count,
        })
    }
}

/// Render requests are only counted; the driver renders explicitly.
#[derive(Default)]
struct CountingScheduler {
    requests: Cell<u32>,
}

impl RenderScheduler for CountingScheduler {
    fn request_render(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// Outcome of a simulated drag.
#[derive(Debug, Serialize)]
struct DragReport {
    distance: f64,
    block_times_ms: Vec<f64>,
}

/// Everything printed by the binary.
#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    rendered: RenderedMarquee,
    render_requests: u32,
    drag: Option<DragReport>,
}

async fn run(args: &Args, params: MarqueeParams) -> Report {
    let host = MemoryHost::new();
    let elements = host.create_marquee(
        (args.container, args.container),
        (args.content, args.content),
    );
    let scheduler = Rc::new(CountingScheduler::default());
    let callbacks = MarqueeCallbacks::default().on_mount(|| {
        info!("mounted");
        Ok(())
    });
    let marquee = Marquee::with_callbacks(
        Rc::new(host.clone()),
        elements,
        Rc::clone(&scheduler) as Rc<dyn RenderScheduler>,
        params,
        callbacks,
    );

    marquee.render();
    marquee.after_render(true).await;
    let rendered = marquee.render();

    let drag = match args.drag {
        Some(distance) if host.has_drag_handler() => {
            Some(simulate_drag(&host, &marquee, rendered.duration_seconds, distance))
        }
        _ => None,
    };

    marquee.dispose().await;

    Report {
        rendered,
        render_requests: scheduler.requests.get(),
        drag,
    }
}

/// Press, cross the threshold, then move by `distance` along the scroll axis.
fn simulate_drag(host: &MemoryHost, marquee: &Marquee, duration: f64, distance: f64) -> DragReport {
    let cycle_ms = duration * 1000.0;
    host.set_blocks(BLOCK_COUNT, cycle_ms);
    host.advance(cycle_ms / 2.0);

    let vertical = marquee.params().direction.is_vertical();
    let at = |offset: f64| {
        if vertical {
            PointerEvent::new(PointerId(1), 0.0, offset)
        } else {
            PointerEvent::new(PointerId(1), offset, 0.0)
        }
    };
    let start = if distance < 0.0 {
        -(DRAG_THRESHOLD + 1.0)
    } else {
        DRAG_THRESHOLD + 1.0
    };

    host.pointer_down(at(0.0));
    host.pointer_move(at(start));
    host.pointer_move(at(start + distance));
    host.pointer_up(at(start + distance));

    DragReport {
        distance,
        block_times_ms: host.blocks().iter().map(|b| b.current_time).collect(),
    }
}

fn print_text(report: &Report) {
    let rendered = &report.rendered;
    println!("class:      {}", rendered.class);
    println!("container:  {}", rendered.container_style);
    if rendered.gradient {
        println!("gradient:   {}", rendered.gradient_style);
    }
    println!("animation:  {}", rendered.animation_style);
    println!("content:    {}", rendered.content_style);
    println!("multiplier: {}", rendered.multiplier);
    println!("duration:   {}s", rendered.duration_seconds);
    if let Some(drag) = &report.drag {
        println!("drag:       {}px -> {:?} ms", drag.distance, drag.block_times_ms);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = marquee::config::load_config_with_precedence(args.config.clone())?;
        let merged = marquee::config::merge_config(config_file);
        let with_env = marquee::config::apply_env_overrides(merged);
        marquee::config::apply_cli_overrides(with_env, args.overrides()?)
    };

    marquee::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let report = run(&args, config.params).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }

    Ok(())
}
