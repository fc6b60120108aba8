//! rat808 - drum machine demo
//!
//! Plays a four-on-the-floor loop through the default output device.
//!
//! Run with: cargo run -- [--bpm 120] [--kick-mod] [--seconds 8]

mod sequencer;

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use rat808::{DrumEngine, EngineConfig, EngineError};
use sequencer::Sequencer;
use simple_logger::SimpleLogger;

/// How far ahead of the audio clock hits are scheduled.
const LOOKAHEAD: f64 = 0.1;
/// How often the sequencer wakes up.
const TICK: Duration = Duration::from_millis(25);

struct Args {
    bpm: f64,
    kick_mod: bool,
    seconds: Option<f64>,
}

fn parse_args() -> color_eyre::Result<Args> {
    let mut args = Args {
        bpm: 120.0,
        kick_mod: false,
        seconds: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--kick-mod" => args.kick_mod = true,
            "--bpm" => {
                let value = iter.next().ok_or_else(|| eyre!("--bpm needs a value"))?;
                args.bpm = value.parse().wrap_err("invalid --bpm")?;
            }
            "--seconds" => {
                let value = iter.next().ok_or_else(|| eyre!("--seconds needs a value"))?;
                args.seconds = Some(value.parse().wrap_err("invalid --seconds")?);
            }
            other => return Err(eyre!("unknown argument: {other}")),
        }
    }

    Ok(args)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let args = parse_args()?;

    // Set up audio
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    info!("output: {sample_rate} Hz, {channels} channels");

    let (mut engine, mut renderer) =
        DrumEngine::new(EngineConfig::default().with_sample_rate(sample_rate));
    engine.set_kick_mod_enabled(args.kick_mod);

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| renderer.render_interleaved(data, channels),
        |err| error!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    info!("playing at {} bpm, press Ctrl+C to stop", args.bpm);

    let mut sequencer = Sequencer::new(
        sequencer::four_on_the_floor(),
        args.bpm,
        engine.current_time() + LOOKAHEAD,
    );

    loop {
        match sequencer.schedule(&mut engine, LOOKAHEAD) {
            Ok(_) => {}
            Err(EngineError::QueueFull) => warn!("hits dropped, audio thread is behind"),
            Err(err) => return Err(err.into()),
        }

        if args.seconds.is_some_and(|limit| engine.current_time() >= limit) {
            break;
        }
        thread::sleep(TICK);
    }

    engine.dispose();
    // let the last block of silence reach the device
    thread::sleep(TICK);
    Ok(())
}
