use rtb_protocol::RotationReachedMode;

const HELP: &str = "\
RTB Skeleton - Minimal RealTimeBattle robot

Talks to the RealTimeBattle server over stdin/stdout. Logs go to stderr.

USAGE:
  rtb-skeleton [OPTIONS]

OPTIONS:
  -h, --help                  Prints help information
  --name <name>               Robot name (default: skeleton)
  --home-colour <hex>         Home colour (default: 00ff00)
  --away-colour <hex>         Away colour (default: ff0000)
  --rotation-reached <0|1|2>  RotationReached notifications (default: 2)
  --buffer <n>                Messages buffered ahead of the robot (default: 100)
  --no-debug                  Do not send Debug lines to the server
  -v, --verbose               Log session events
  -vv, --trace                Log every decoded message
  --log <file>                Write logs to file instead of stderr
";

/// Verbosity level for log output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    #[default]
    Quiet = 0,
    /// Session start-up and shutdown
    Verbose = 1,
    /// Every message received
    Trace = 2,
}

impl Verbosity {
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Warn,
            Verbosity::Verbose => log::LevelFilter::Debug,
            Verbosity::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug)]
pub struct AppArgs {
    pub name: String,
    pub home_colour: String,
    pub away_colour: String,
    pub rotation_reached: RotationReachedMode,
    pub buffer: usize,
    pub debug: bool,
    pub verbosity: Verbosity,
    pub log_file: Option<String>,
}

pub fn parse_args() -> Result<AppArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    parse_from(pargs)
}

fn parse_from(mut pargs: pico_args::Arguments) -> Result<AppArgs, pico_args::Error> {
    // Count -v flags for verbosity level
    let verbosity = if pargs.contains("--trace") || pargs.contains("-vv") {
        Verbosity::Trace
    } else if pargs.contains(["-v", "--verbose"]) {
        Verbosity::Verbose
    } else {
        Verbosity::Quiet
    };

    let args = AppArgs {
        name: pargs
            .opt_value_from_str("--name")?
            .unwrap_or_else(|| "skeleton".to_string()),
        home_colour: pargs
            .opt_value_from_str("--home-colour")?
            .unwrap_or_else(|| "00ff00".to_string()),
        away_colour: pargs
            .opt_value_from_str("--away-colour")?
            .unwrap_or_else(|| "ff0000".to_string()),
        rotation_reached: pargs
            .opt_value_from_str("--rotation-reached")?
            .unwrap_or(RotationReachedMode::RotationsAndSweeps),
        buffer: pargs.opt_value_from_str("--buffer")?.unwrap_or(100),
        debug: !pargs.contains("--no-debug"),
        verbosity,
        log_file: pargs.opt_value_from_str("--log")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Warning: unused arguments left: {:?}.", remaining);
    }

    Ok(args)
}
