#[macro_use]
extern crate criterion;

use biffchart::{ChartSettings, ChartTree};
use criterion::{Criterion, Throughput};

/// A chart with `groups` bracketed Bar groups, each carrying a bare ChartLine decoration.
fn synthetic_stream(groups: usize) -> Vec<u8> {
    fn rec(out: &mut Vec<u8>, opcode: u16, payload: &[u8]) {
        out.extend_from_slice(&opcode.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
        out.extend_from_slice(payload);
    }

    let mut out = Vec::new();
    rec(&mut out, 0x1002, &[0; 16]); // Chart
    rec(&mut out, 0x1033, &[]);
    for i in 0..groups {
        let mut format = vec![0; 20];
        format[18..].copy_from_slice(&(i as u16).to_le_bytes());
        rec(&mut out, 0x1014, &format); // ChartFormat
        rec(&mut out, 0x1033, &[]);
        rec(&mut out, 0x1017, &[0x9C, 0xFF, 0x96, 0x00, 0x02, 0x00]); // Bar
        rec(&mut out, 0x101C, &[0x02, 0x00]); // ChartLine
        rec(&mut out, 0x1007, &[0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 0x09, 0x00, 0x4D, 0x00]); // LineFormat
        rec(&mut out, 0x7777, &[1, 2, 3, 4]); // unregistered
        rec(&mut out, 0x1034, &[]);
    }
    rec(&mut out, 0x1034, &[]);
    out
}

fn criterion_benchmark(c: &mut Criterion) {
    let data = synthetic_stream(500);
    let mut group = c.benchmark_group("round trip");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("assemble", |b| {
        b.iter(|| ChartTree::from_bytes(&data, ChartSettings::default()).unwrap())
    });

    let tree = ChartTree::from_bytes(&data, ChartSettings::default()).unwrap();
    group.bench_function("serialize", |b| b.iter(|| tree.to_bytes().unwrap()));
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
