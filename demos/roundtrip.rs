//! Encodes a small array and map, then decodes them back, printing each step.
//!
//! Run with `cargo run --example roundtrip --features std`.

use mini_cbor::{debug::hex_dump, Reader, Writer};

fn main() {
    let mut buf = [0u8; 64];
    let mut w: Writer = Writer::new(&mut buf);

    w.open_map();
    w.prepend_data(b"payload");
    w.prepend_text("message");
    w.prepend_bool(true);
    w.prepend_text("ok");
    w.wrap_map();

    let encoded = w.stop().expect("buffer was large enough and well-formed");
    println!("encoded {} bytes: {}", encoded.len(), hex_dump(encoded));

    let mut r = Reader::new(encoded);
    let pairs = r.read_map().expect("a map header");
    for _ in 0..pairs {
        let key = r.read_text().expect("a text key");
        match key {
            b"ok" => {
                let value = r.read_simple().expect("a simple value");
                println!("ok = {:?}", value);
            }
            b"message" => {
                let value = r.read_data().expect("byte string value");
                println!("message = {:?}", value);
            }
            other => println!("unexpected key: {:?}", other),
        }
    }
    println!("consumed {} of {} bytes", r.stop(), encoded.len());
}
