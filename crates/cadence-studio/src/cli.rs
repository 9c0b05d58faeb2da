use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use cadence_engine::EngineConfig;

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub headless: bool,
    pub frames: Option<u64>,
    pub log_filter: Option<String>,
    pub engine: EngineConfig,
}

/// Frames a headless run lasts when `--frames` is not given; there is no
/// window to close.
pub const HEADLESS_DEFAULT_FRAMES: u64 = 300;

pub fn command() -> Command {
    Command::new("cadence-studio")
        .about("Opens a window and runs the paced frame loop until it is closed")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("headless")
                .long("headless")
                .help("Run without a display, GPU or audio device")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("N")
                .help("Frame-rate ceiling, 0 for uncapped")
                .value_parser(value_parser!(u32))
                .default_value("60"),
        )
        .arg(
            Arg::new("frames")
                .long("frames")
                .value_name("N")
                .help("Stop after N frames")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("no-audio")
                .long("no-audio")
                .help("Do not open the audio device")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .value_name("TITLE")
                .default_value("cadence studio"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("W")
                .value_parser(value_parser!(u32).range(1..))
                .default_value("1280"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("H")
                .value_parser(value_parser!(u32).range(1..))
                .default_value("720"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("S")
                .help("Seed for the engine's random generator")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .value_name("FILTER")
                .help("env_logger filter, overrides RUST_LOG"),
        )
}

pub fn options(matches: &ArgMatches) -> Options {
    let headless = matches.get_flag("headless");

    let width = matches.get_one::<u32>("width").copied().unwrap_or(1280);
    let height = matches.get_one::<u32>("height").copied().unwrap_or(720);
    let title = matches
        .get_one::<String>("title")
        .cloned()
        .unwrap_or_else(|| "cadence studio".to_string());

    let mut engine = EngineConfig::default()
        .with_title(title)
        .with_size(width, height)
        .with_target_fps(matches.get_one::<u32>("fps").copied().unwrap_or(60))
        .with_audio(!matches.get_flag("no-audio"));

    if let Some(seed) = matches.get_one::<u64>("seed") {
        engine = engine.with_seed(*seed);
    }

    let frames = matches
        .get_one::<u64>("frames")
        .copied()
        .or(headless.then_some(HEADLESS_DEFAULT_FRAMES));

    Options {
        headless,
        frames,
        log_filter: matches.get_one::<String>("log").cloned(),
        engine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        let matches = command()
            .try_get_matches_from(std::iter::once("cadence-studio").chain(args.iter().copied()))
            .unwrap();
        options(&matches)
    }

    #[test]
    fn defaults() {
        let o = parse(&[]);
        assert!(!o.headless);
        assert_eq!(o.frames, None);
        assert_eq!(o.engine.target_fps, 60);
        assert_eq!((o.engine.window.width, o.engine.window.height), (1280, 720));
        assert!(o.engine.audio_enabled);
        assert_eq!(o.engine.seed, None);
    }

    #[test]
    fn headless_run_is_bounded() {
        let o = parse(&["--headless"]);
        assert_eq!(o.frames, Some(HEADLESS_DEFAULT_FRAMES));

        let o = parse(&["--headless", "--frames", "5"]);
        assert_eq!(o.frames, Some(5));
    }

    #[test]
    fn flags_reach_the_engine_config() {
        let o = parse(&[
            "--fps", "0", "--no-audio", "--title", "t", "--width", "320", "--height", "200",
            "--seed", "9", "--log", "debug",
        ]);
        assert_eq!(o.engine.target_fps, 0);
        assert!(!o.engine.audio_enabled);
        assert_eq!(o.engine.window.title, "t");
        assert_eq!((o.engine.window.width, o.engine.window.height), (320, 200));
        assert_eq!(o.engine.seed, Some(9));
        assert_eq!(o.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(command()
            .try_get_matches_from(["cadence-studio", "--width", "0"])
            .is_err());
    }
}
