//! MiniPack against other serializers on the crate's own message shapes
//!
//! Run with: cargo bench comparison_bench
//!
//! rmp-serde is the MessagePack reference; the others are there for scale.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use minipack::{aggregate, bytemuck, extension, Buffer, Decode, Encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
struct Person {
    name: String,
    age: i32,
    height: f32,
    lucky: Vec<i32>,
}
aggregate!(Person { name, age, height, lucky });

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
struct Telemetry {
    sensor: u64,
    readings: Vec<f64>,
    labels: BTreeMap<String, u16>,
    note: Option<String>,
}
aggregate!(Telemetry { sensor, readings, labels, note });

#[repr(C)]
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
struct Matrix3x3 {
    m: [f32; 9],
}
extension!(Matrix3x3, 0);

fn person() -> Person {
    Person {
        name: "Jeff".to_string(),
        age: 32,
        height: 1.75,
        lucky: vec![69, 420, 1984],
    }
}

fn telemetry() -> Telemetry {
    Telemetry {
        sensor: 9_000_000_001,
        readings: (0..32).map(|i| f64::from(i) * 0.25 - 3.0).collect(),
        labels: [("zone", 4u16), ("rack", 17), ("slot", 300)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        note: Some("calibrated".to_string()),
    }
}

fn matrix() -> Matrix3x3 {
    Matrix3x3 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    }
}

/// Every format under test, serialized once up front
struct Encoded {
    minipack: Buffer,
    rmp: Vec<u8>,
    bincode: Vec<u8>,
    postcard: Vec<u8>,
    borsh: Vec<u8>,
    json: Vec<u8>,
}

impl Encoded {
    fn of<T>(value: &T) -> Self
    where
        T: Encode + Serialize + BorshSerialize,
    {
        Self {
            minipack: Buffer::from(minipack::to_vec(value).as_slice()),
            rmp: rmp_serde::to_vec(value).unwrap(),
            bincode: bincode::serialize(value).unwrap(),
            postcard: postcard::to_allocvec(value).unwrap(),
            borsh: borsh::to_vec(value).unwrap(),
            json: serde_json::to_vec(value).unwrap(),
        }
    }

    fn report(&self, name: &str) {
        println!("\n{} message:", name);
        println!("  minipack:  {} bytes", self.minipack.len());
        println!("  rmp-serde: {} bytes", self.rmp.len());
        println!("  bincode:   {} bytes", self.bincode.len());
        println!("  postcard:  {} bytes", self.postcard.len());
        println!("  borsh:     {} bytes", self.borsh.len());
        println!("  json:      {} bytes", self.json.len());
    }
}

fn compare<T>(c: &mut Criterion, name: &str, value: T)
where
    T: Default + PartialEq + Encode + for<'de> Decode<'de>,
    T: Serialize + DeserializeOwned + BorshSerialize + BorshDeserialize,
{
    let encoded = Encoded::of(&value);
    encoded.report(name);

    let mut group = c.benchmark_group(format!("{}_encode", name));
    group.throughput(Throughput::Elements(1));

    group.bench_function("minipack", |b| {
        let mut buf = Buffer::new();
        b.iter(|| {
            buf.reset(false);
            minipack::encode(&mut buf, black_box(&value));
            black_box(buf.len());
        });
    });
    group.bench_function("rmp-serde", |b| {
        let mut out = Vec::with_capacity(encoded.rmp.len());
        b.iter(|| {
            out.clear();
            rmp_serde::encode::write(&mut out, black_box(&value)).unwrap();
            black_box(out.len());
        });
    });
    group.bench_function("bincode", |b| {
        b.iter(|| black_box(bincode::serialize(black_box(&value)).unwrap()));
    });
    group.bench_function("postcard", |b| {
        b.iter(|| black_box(postcard::to_allocvec(black_box(&value)).unwrap()));
    });
    group.bench_function("borsh", |b| {
        b.iter(|| black_box(borsh::to_vec(black_box(&value)).unwrap()));
    });
    group.bench_function("json", |b| {
        b.iter(|| black_box(serde_json::to_vec(black_box(&value)).unwrap()));
    });
    group.finish();

    let mut group = c.benchmark_group(format!("{}_decode", name));
    group.throughput(Throughput::Elements(1));

    group.bench_function("minipack", |b| {
        let mut out = T::default();
        b.iter(|| {
            encoded.minipack.seek(0);
            minipack::decode(black_box(&encoded.minipack), &mut out).unwrap();
        });
        assert!(out == value);
    });
    group.bench_function("rmp-serde", |b| {
        b.iter(|| black_box(rmp_serde::from_slice::<T>(black_box(&encoded.rmp)).unwrap()));
    });
    group.bench_function("bincode", |b| {
        b.iter(|| black_box(bincode::deserialize::<T>(black_box(&encoded.bincode)).unwrap()));
    });
    group.bench_function("postcard", |b| {
        b.iter(|| black_box(postcard::from_bytes::<T>(black_box(&encoded.postcard)).unwrap()));
    });
    group.bench_function("borsh", |b| {
        b.iter(|| black_box(T::try_from_slice(black_box(&encoded.borsh)).unwrap()));
    });
    group.bench_function("json", |b| {
        b.iter(|| black_box(serde_json::from_slice::<T>(black_box(&encoded.json)).unwrap()));
    });
    group.finish();
}

fn bench_person(c: &mut Criterion) {
    compare(c, "person", person());
}

fn bench_telemetry(c: &mut Criterion) {
    compare(c, "telemetry", telemetry());
}

fn bench_matrix(c: &mut Criterion) {
    compare(c, "matrix", matrix());
}

fn bench_stream(c: &mut Criterion) {
    const COUNT: usize = 10_000;
    let people: Vec<Person> = (0..COUNT)
        .map(|i| Person {
            name: format!("person-{}", i),
            age: (i % 90) as i32,
            height: 1.5 + (i % 50) as f32 * 0.01,
            lucky: (0..(i % 6) as i32).collect(),
        })
        .collect();

    let mut group = c.benchmark_group("person_stream");
    group.sample_size(50);
    group.throughput(Throughput::Elements(COUNT as u64));

    // One growing buffer holding every message back to back
    group.bench_with_input(BenchmarkId::new("minipack", COUNT), &people, |b, people| {
        let mut buf = Buffer::new();
        b.iter(|| {
            buf.reset(false);
            for person in people {
                minipack::encode(&mut buf, person);
            }
            black_box(buf.len());
        });
    });

    group.bench_with_input(BenchmarkId::new("rmp-serde", COUNT), &people, |b, people| {
        let mut out = Vec::new();
        b.iter(|| {
            out.clear();
            for person in people {
                rmp_serde::encode::write(&mut out, person).unwrap();
            }
            black_box(out.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_person, bench_telemetry, bench_matrix, bench_stream);
criterion_main!(benches);
