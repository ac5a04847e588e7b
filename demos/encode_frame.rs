//! Encodes a few seconds of synthetic video and writes the framed stream to
//! a file.
//!
//! Usage: `cargo run --example encode_frame -- [output.xvc]`
//!
//! Needs `libxvcenc`; point `XVC_LIBRARY_PATH` at it if the engine is not
//! installed in a standard location.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::Write;

use xvcio::enc::YuvFrame;
use xvcio::{Encoder, EncoderConfig};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 180;
const FRAMES: usize = 90;

/// Moving diagonal gradient, enough to give the encoder real work.
fn fill_frame(y: &mut [u8], u: &mut [u8], v: &mut [u8], index: usize) {
    let w = WIDTH as usize;
    for row in 0..HEIGHT as usize {
        for col in 0..w {
            y[row * w + col] = ((row + col + index * 3) & 0xFF) as u8;
        }
    }
    let cw = w / 2;
    for row in 0..(HEIGHT as usize) / 2 {
        for col in 0..cw {
            u[row * cw + col] = ((row + index) & 0xFF) as u8;
            v[row * cw + col] = ((col + index * 2) & 0xFF) as u8;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| "out.xvc".to_string());

    let config = EncoderConfig::new(WIDTH, HEIGHT)
        .with_framerate(30.0)
        .with_qp(30);
    let mut encoder = Encoder::new(config)?;
    let mut output = File::create(&path)?;

    let mut y = vec![0u8; (WIDTH * HEIGHT) as usize];
    let mut u = vec![0u8; (WIDTH * HEIGHT / 4) as usize];
    let mut v = vec![0u8; (WIDTH * HEIGHT / 4) as usize];

    let mut units = 0usize;
    let mut bytes = 0usize;
    for index in 0..FRAMES {
        fill_frame(&mut y, &mut u, &mut v, index);
        let frame = YuvFrame {
            planes: [&y, &u, &v],
            strides: [WIDTH as usize, (WIDTH / 2) as usize, (WIDTH / 2) as usize],
        };
        for unit in encoder.encode(&frame, index as i64)? {
            output.write_all(unit.as_bytes())?;
            bytes += unit.as_bytes().len();
            units += 1;
        }
    }

    loop {
        let drained = encoder.flush()?;
        for unit in &drained.units {
            output.write_all(unit.as_bytes())?;
            bytes += unit.as_bytes().len();
            units += 1;
        }
        if drained.is_done() {
            break;
        }
    }

    println!(
        "wrote {} nal units ({} bytes) for {} frames to {}",
        units, bytes, FRAMES, path
    );
    Ok(())
}
