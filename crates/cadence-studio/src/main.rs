mod cli;

use anyhow::Result;

use cadence_engine::logging::{LoggingConfig, init_logging};
use cadence_engine::platform::headless::{HeadlessControl, Journal};
use cadence_engine::{Color, Engine, Subsystems};

fn main() -> Result<()> {
    let options = cli::options(&cli::command().get_matches());

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &options.log_filter {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    let subsystems = if options.headless {
        Subsystems::headless(&HeadlessControl::new(), &Journal::disabled())
    } else {
        Subsystems::native()
    };

    let mut engine = Engine::new(subsystems);
    engine.init(options.engine.clone())?;

    log::info!(
        "running on {} with {} core(s), audio {}",
        engine.platform_name(),
        engine.cpu_core_count(),
        if engine.is_audio_device_ready() { "ready" } else { "off" }
    );

    let result = run(&mut engine, options.frames);
    engine.shutdown();
    result
}

fn run(engine: &mut Engine, frames: Option<u64>) -> Result<()> {
    let mut last_second = 0;

    while !engine.window_should_close() {
        if frames.is_some_and(|n| engine.frame_count() >= n) {
            break;
        }

        engine.update();

        let second = engine.time() as u64;
        if second != last_second {
            last_second = second;
            log::info!("fps: {} (dt {:.2} ms)", engine.fps(), engine.frame_time() * 1000.0);
        }

        if engine.is_window_resized() {
            log::info!("resized to {}x{}", engine.screen_width(), engine.screen_height());
        }

        engine.present(cycle_color(engine.time()))?;
    }

    log::info!("stopped after {} frame(s)", engine.frame_count());
    Ok(())
}

/// Slow walk around the hue circle at low brightness.
fn cycle_color(t: f64) -> Color {
    let hue = (t * 0.05).fract() as f32 * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Color::rgba(r * 0.2, g * 0.2, b * 0.2, 1.0)
}
