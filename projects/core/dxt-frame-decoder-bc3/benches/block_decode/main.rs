use criterion::{criterion_group, criterion_main, Criterion};
use dxt_frame_decoder_bc3::convert_dxt5_to_rgba32_with_order;
use dxt_frame_decoder_bc3::util::{decode_alpha_block, Dxt5DecodeOrder};

#[cfg(not(target_os = "windows"))]
use pprof::criterion::{Output, PProfProfiler};

// A 1920x1088 frame, the usual size of a 1080p video frame padded to whole blocks.
const WIDTH: usize = 1920;
const HEIGHT: usize = 1088;

fn make_blocks(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 255) as u8).collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("DXT5 Decode");

    let dxt5_size = (WIDTH / 4) * (HEIGHT / 4) * 16;
    let input = make_blocks(dxt5_size);
    let mut output = vec![0u8; WIDTH * HEIGHT * 4];

    group.throughput(criterion::Throughput::Bytes(dxt5_size as u64));

    group.bench_function("decode_alpha_blocks", |b| {
        b.iter(|| {
            for (block, pixels) in input.chunks_exact(16).zip(output.chunks_exact_mut(64)) {
                let alpha: &[u8; 8] = block[..8].try_into().unwrap();
                decode_alpha_block(alpha, pixels, 16);
            }
        })
    });

    for &order in Dxt5DecodeOrder::all_values() {
        group.bench_function(format!("convert_dxt5_to_rgba32_{order:?}"), |b| {
            b.iter(|| {
                convert_dxt5_to_rgba32_with_order(&input, &mut output, WIDTH, HEIGHT, order)
                    .unwrap()
            })
        });
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(target_os = "windows")]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
