use criterion::{criterion_group, criterion_main, Criterion};
use dxt_frame_decoder_bc1::convert_dxt1_to_rgba32;
use dxt_frame_decoder_bc1::util::decode_color_block;

#[cfg(not(target_os = "windows"))]
use pprof::criterion::{Output, PProfProfiler};

// A 1920x1088 frame, the usual size of a 1080p video frame padded to whole blocks.
const WIDTH: usize = 1920;
const HEIGHT: usize = 1088;

fn make_blocks(len: usize) -> Vec<u8> {
    // Varying endpoints and indices so both palette modes get exercised.
    (0..len).map(|i| (i % 255) as u8).collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("DXT1 Decode");

    let dxt1_size = (WIDTH / 4) * (HEIGHT / 4) * 8;
    let input = make_blocks(dxt1_size);
    let mut output = vec![0u8; WIDTH * HEIGHT * 4];

    group.throughput(criterion::Throughput::Bytes(dxt1_size as u64));

    group.bench_function("decode_color_blocks", |b| {
        b.iter(|| {
            for (block, pixels) in input.chunks_exact(8).zip(output.chunks_exact_mut(64)) {
                let block: &[u8; 8] = block.try_into().unwrap();
                decode_color_block(block, pixels, 16);
            }
        })
    });

    group.bench_function("convert_dxt1_to_rgba32", |b| {
        b.iter(|| convert_dxt1_to_rgba32(&input, &mut output, WIDTH, HEIGHT).unwrap())
    });

    // Same frame with a 2 pixel overhang on both edges.
    group.bench_function("convert_dxt1_to_rgba32_unaligned", |b| {
        b.iter(|| convert_dxt1_to_rgba32(&input, &mut output, WIDTH - 2, HEIGHT - 2).unwrap())
    });

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
