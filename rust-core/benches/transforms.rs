use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use spectral_cqt::cqt::{CqtConfig, CqtEngine};
use spectral_cqt::spectrum::FftEngine;

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft_forward");
    for &n in &[256usize, 1024, 4096, 16384] {
        let fft = FftEngine::new(n).unwrap();
        let real: Vec<f32> = (0..n).map(|i| (i as f32 * 0.01).sin()).collect();
        let imag = vec![0.0f32; n];
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || (real.clone(), imag.clone()),
                |(mut re, mut im)| {
                    fft.forward(black_box(&mut re), black_box(&mut im)).unwrap();
                    (re, im)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_cqt(c: &mut Criterion) {
    let config = CqtConfig::new(12, 7, 8192, 44100.0, 32.70);
    let fft = FftEngine::new(config.fft_size).unwrap();

    c.bench_function("cqt_kernel_bank_84x8192", |b| {
        b.iter(|| CqtEngine::new(black_box(&config), &fft).unwrap())
    });

    let cqt = CqtEngine::new(&config, &fft).unwrap();
    let mut in_re: Vec<f32> = (0..8192).map(|i| (i as f32 * 0.05).cos()).collect();
    let mut in_im = vec![0.0f32; 8192];
    fft.forward(&mut in_re, &mut in_im).unwrap();
    let mut out_re = vec![0.0f32; 84];
    let mut out_im = vec![0.0f32; 84];

    c.bench_function("cqt_apply_84x8192", |b| {
        b.iter(|| {
            cqt.apply(&in_re, &in_im, &mut out_re, &mut out_im, 12, 7)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_fft, bench_cqt);
criterion_main!(benches);
