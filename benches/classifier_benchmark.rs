use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pawprint::{decode_response, SelectedImage, StandInClassifier};

fn bench_stand_in(c: &mut Criterion) {
    let classifier = StandInClassifier::new();
    let mut rng = rand::rng();
    let mut group = c.benchmark_group("StandIn");

    group.bench_function("keyword_name", |b| b.iter(|| {
        classifier.classify_name(black_box("holiday_cat_photo_0042.png"), &mut rng)
    }));

    group.bench_function("unmatched_name", |b| b.iter(|| {
        classifier.classify_name(black_box("IMG_20240611_183045.jpg"), &mut rng)
    }));

    group.finish();
}

fn bench_preview(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preview");
    group.sample_size(20);

    for (name, size) in [("64KiB", 64 * 1024), ("1MiB", 1024 * 1024), ("10MiB", 10 * 1024 * 1024)] {
        let image = SelectedImage::new("photo.jpg", "image/jpeg", vec![0xA5u8; size]);
        group.bench_function(name, |b| b.iter(|| black_box(&image).data_url()));
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decode");

    group.bench_function("labeled", |b| b.iter(|| {
        decode_response(black_box(br#"{"label": "Dog", "confidence": 0.91}"#)).unwrap()
    }));

    group.bench_function("score_map", |b| b.iter(|| {
        decode_response(black_box(br#"{"cat": 0.12, "dog": 0.88}"#)).unwrap()
    }));

    group.finish();
}

criterion_group!(benches, bench_stand_in, bench_preview, bench_decode);
criterion_main!(benches);
