//! Basic usage example for MiniPack
//!
//! Run with: cargo run --example basic_usage

use std::collections::BTreeMap;

use minipack::*;

#[derive(Debug, Default, PartialEq)]
struct Person {
    name: String,
    age: u32,
    height: f32,
    lucky: Vec<u32>,
}
aggregate!(Person { name, age, height, lucky });

#[derive(Debug, Default, Clone, Copy, PartialEq)]
enum Side {
    #[default]
    Buy = 1,
    Sell = 2,
}
enum_repr!(Side as u8 { Buy, Sell });

#[derive(Debug, Default, PartialEq)]
struct Quote<'a> {
    symbol: &'a str,
    side: Side,
    price: i64,
    note: Option<String>,
}
aggregate!(Quote<'a> { symbol, side, price, note });

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Matrix3x3 {
    m: [f32; 9],
}
extension!(Matrix3x3, 0);

fn print_hex(label: &str, bytes: &[u8]) {
    let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    println!("  {} ({} bytes): {}", label, bytes.len(), hex.join(" "));
}

fn main() -> Result<()> {
    println!("MiniPack Basic Usage Example");
    println!("============================");

    // Example 1: Aggregate round trip
    println!("\n1. Aggregate:");
    {
        let person = Person {
            name: "Jeff".into(),
            age: 32,
            height: 1.75,
            lucky: vec![69, 420, 1984],
        };

        let mut buf = Buffer::new();
        encode(&mut buf, &person);
        print_hex("Person", buf.as_slice());

        let mut decoded = Person::default();
        decode(&buf, &mut decoded)?;
        println!("  Decoded: {:?}", decoded);
    }

    // Example 2: Zero-copy views and optional fields
    println!("\n2. Borrowed Quote:");
    {
        let quote = Quote {
            symbol: "AAPL",
            side: Side::Sell,
            price: 50_000_000,
            note: Some("limit".into()),
        };

        let buf = Buffer::from(to_vec(&quote).as_slice());
        print_hex("Quote", buf.as_slice());

        let mut decoded = Quote::default();
        decode(&buf, &mut decoded)?;
        println!("  Decoded: {:?}", decoded);
    }

    // Example 3: Maps
    println!("\n3. Map:");
    {
        let names = ["Zero", "One", "Two", "Three", "Four", "Five", "Six"];
        let map: BTreeMap<i32, &str> = names.iter().enumerate().map(|(i, n)| (i as i32, *n)).collect();

        let mut buf = Buffer::new();
        encode(&mut buf, &map);
        print_hex("Map", buf.as_slice());

        let mut decoded: BTreeMap<i32, String> = BTreeMap::new();
        decode(&buf, &mut decoded)?;
        println!("  Decoded: {:?}", decoded);
    }

    // Example 4: Extension
    println!("\n4. Extension:");
    {
        let identity = Matrix3x3 {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };

        let mut buf = Buffer::new();
        encode(&mut buf, &identity);
        print_hex("Matrix3x3", &buf.as_slice()[..3]);

        let mut decoded: Matrix3x3 = bytemuck::Zeroable::zeroed();
        decode(&buf, &mut decoded)?;
        println!("  Decoded: {:?}", decoded.m);
    }

    // Example 5: Error handling
    println!("\n5. Error Handling:");
    {
        let encoded = to_vec(&300u16);

        let truncated = Buffer::from(&encoded[..2]);
        let mut value = 0u16;
        match decode(&truncated, &mut value) {
            Ok(()) => println!("  Unexpected success"),
            Err(e) => println!("  Truncated input: {}", e),
        }

        let full = Buffer::from(encoded.as_slice());
        let mut narrow = 0u8;
        match decode(&full, &mut narrow) {
            Ok(()) => println!("  Unexpected success"),
            Err(e) => println!("  300 into u8: {}", e),
        }
    }

    // Example 6: Buffer reuse
    println!("\n6. Buffer Reuse:");
    {
        let mut buf = Buffer::new();
        for i in 0..100u32 {
            encode(&mut buf, &(i, i * 1000));
        }
        println!("  100 pairs: len={}, capacity={}, heap={}", buf.len(), buf.capacity(), buf.is_heap());

        buf.reset(false);
        println!("  reset(false): len={}, capacity={}", buf.len(), buf.capacity());

        buf.reset(true);
        println!("  reset(true): len={}, capacity={}", buf.len(), buf.capacity());
    }

    println!("\n✓ All examples completed successfully!");

    Ok(())
}
