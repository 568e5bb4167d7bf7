//! saavy-playout - schedule a clip with fades and play it on the default
//! output device.
//!
//! Run with: cargo run --bin saavy-playout

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::info;

use saavy_playout::{
    playout::buffer::BufferPlayout, Fade, FadeKind, FadeShape, PlaybackWindow, Playout,
    PlayoutConfig, Track, TrackPlayer, MAX_BLOCK_SIZE,
};

/// Four seconds of a soft two-partial tone
fn synthesize(sample_rate: f32, seconds: f32) -> Arc<[f32]> {
    let frames = (sample_rate * seconds) as usize;
    (0..frames)
        .map(|n| {
            let t = n as f32 / sample_rate;
            0.3 * (TAU * 220.0 * t).sin() + 0.1 * (TAU * 330.0 * t).sin()
        })
        .collect::<Vec<_>>()
        .into()
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    let playout_config = PlayoutConfig::new().sample_rate(sample_rate);

    let (playout, mut voice) = BufferPlayout::new(synthesize(sample_rate, 4.0), playout_config);

    // Placed one second into the timeline, trimmed to its middle three seconds
    let track = Track::builder(playout.duration())
        .name("tone")
        .start(1.0)
        .end(4.0)
        .cue_in(0.5)
        .cue_out(3.5)
        .fade(Fade::new(FadeKind::FadeIn, FadeShape::SCurve, 0.0, 1.0)?)
        .fade(Fade::new(FadeKind::FadeOut, FadeShape::Exponential, 2.0, 3.0)?)
        .build()?;

    info!(
        "track {:?}: {}s..{}s on the timeline, {}s of content",
        track.name(),
        track.start_time(),
        track.end_time(),
        track.duration()
    );

    let mut player = TrackPlayer::new(track, playout);
    let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let block = &mut render_buf[..frames_to_render];
                voice.render_block(block);

                // Copy to output (mono to all channels)
                let out_off = frames_written * channels;
                for (i, &s) in block.iter().enumerate() {
                    for ch in 0..channels {
                        data[out_off + i * channels + ch] = s;
                    }
                }

                frames_written += frames_to_render;
            }
        },
        |err| log::error!("audio error: {}", err),
        None,
    )?;

    stream.play()?;

    let now = player.playout().now();
    let window = PlaybackWindow::starting_at(0.0)?;
    let completion = player.schedule_play(now, &window, 0.8)?;

    println!("Playing... (timeline 0s to {}s)", player.track().end_time());
    if !completion.wait_timeout(Duration::from_secs(10)) {
        player.schedule_stop(0.0);
        return Err(eyre!("playback did not finish in time"));
    }

    // Let the device drain its last buffer
    std::thread::sleep(Duration::from_millis(200));
    println!("Done.");
    Ok(())
}
