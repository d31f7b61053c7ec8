mod parse_args;

use parse_args::{parse_args, AppArgs};
use rtb_protocol::{listen, CommandWriter, ListenSettings, Message, Part, ProtocolError};

use std::f64::consts::PI;
use std::fs::File;

use log::{error, info, warn};

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args);

    if let Err(e) = run(&args) {
        error!("Robot stopped: {}", e);
        std::process::exit(1);
    }
}

/// Logs never go to stdout, which belongs to the server
fn init_logging(args: &AppArgs) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(args.verbosity.level_filter())
        .parse_default_env();

    match &args.log_file {
        Some(path) => match File::create(path) {
            Ok(f) => {
                eprintln!("Logging to: {}", path);
                builder.target(env_logger::Target::Pipe(Box::new(f)));
            }
            Err(e) => {
                eprintln!("Failed to open log file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
}

/// Debug output is best effort; a line that is too long is only logged
fn debug(rtb: &CommandWriter, text: &str) {
    if let Err(e) = rtb.debug(text) {
        warn!("Dropped debug line: {}", e);
    }
}

fn run(args: &AppArgs) -> Result<(), ProtocolError> {
    let settings = ListenSettings {
        send_rotation_reached: args.rotation_reached,
        channel_capacity: args.buffer,
        debug: args.debug,
    };
    let listener = listen(settings)?;
    let rtb = listener.writer();
    info!("Listening as {}", args.name);

    for msg in &listener {
        match msg {
            Message::Initialize { first } => {
                if !first {
                    continue;
                }
                rtb.name(&args.name)?;
                rtb.colour(&args.home_colour, &args.away_colour)?;
            }
            Message::GameOption { option, value } => {
                debug(rtb, &format!("option: {}: {}", option, value));
            }
            Message::GameStarts => {
                rtb.sweep(Part::RADAR, PI / 4.0, -PI / 2.0, PI / 2.0)?;
            }
            Message::Radar {
                distance,
                object,
                angle,
            } => {
                debug(
                    rtb,
                    &format!(
                        "radar: distance={} object={} angle={}",
                        distance, object, angle
                    ),
                );
            }
            Message::ExitRobot => {
                info!("Server asked the robot to exit");
                break;
            }
            other => {
                debug(rtb, &format!("ignored message: {:?}", other));
            }
        }
    }

    debug(rtb, "done");
    Ok(())
}
