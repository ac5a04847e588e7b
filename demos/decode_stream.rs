//! Splits a length-framed stream back into NAL units and decodes them,
//! reporting every picture that comes out.
//!
//! Usage: `cargo run --example decode_stream -- input.xvc`
//!
//! Needs `libxvcdec`; point `XVC_LIBRARY_PATH` at it if the engine is not
//! installed in a standard location.

use std::env;
use std::error::Error;

use xvcio::framing::FramedUnits;
use xvcio::{Decoder, DecoderConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: decode_stream <input.xvc>")?;
    let stream = std::fs::read(&path)?;

    let mut decoder = Decoder::new(DecoderConfig::new().with_max_framerate(30.0))?;
    let mut submitted = 0i64;
    let mut pictures = 0usize;

    for payload in FramedUnits::new(&stream) {
        decoder.decode_nal(payload?, submitted)?;
        submitted += 1;
        while let Some(picture) = decoder.decoded_picture()? {
            let stats = picture.stats();
            println!(
                "picture {:>4}: {}x{} {} {} ({} bytes, user_data {})",
                stats.poc,
                stats.width,
                stats.height,
                stats.chroma_format,
                stats.nal_type,
                picture.as_bytes().len(),
                picture.user_data(),
            );
            pictures += 1;
        }
    }

    decoder.flush()?;
    while let Some(picture) = decoder.decoded_picture()? {
        println!(
            "picture {:>4}: {}x{} (drained)",
            picture.stats().poc,
            picture.stats().width,
            picture.stats().height
        );
        pictures += 1;
    }

    println!("{} nal units in, {} pictures out", submitted, pictures);
    Ok(())
}
