//! Feeding the decoder incrementally, as bytes arrive.
//!
//! Run with: cargo run --example streaming

use serde_anon::{Decoder, Progress, StreamBuffer, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Two documents split into arbitrary packets, the way a socket would
    // deliver them.
    let packets: [&[u8]; 5] = [
        b"obj{sensor:str{ther",
        b"mo-1\\}readings:f64*{2.15e1\\;2.2",
        b"e1\\;\\}\\}ob",
        b"j{sensor:str{baro-2\\}readings:f64*{1.013e3\\;\\}",
        b"\\}",
    ];

    let mut buffer = StreamBuffer::new();
    let mut decoder = Decoder::new();

    for (i, packet) in packets.iter().enumerate() {
        buffer.push(packet);
        println!("packet {} ({} bytes)", i, packet.len());

        // Drain everything that is complete; stop when the buffer runs dry.
        while let Progress::Done(value) = decoder.pump(&mut buffer)? {
            report(&value);
        }
        println!("  waiting, state {:?}, depth {}", decoder.state(), decoder.depth());
    }

    Ok(())
}

fn report(value: &Value) {
    let Some(object) = value.as_object() else {
        return;
    };
    let sensor = object.get("sensor").and_then(Value::as_str).unwrap_or("?");
    let readings = object
        .get("readings")
        .and_then(Value::as_f64_array)
        .unwrap_or_default();
    println!("  document from {}: {:?}", sensor, readings);
}
