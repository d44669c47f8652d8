use {
    booruget::tags::{normalize_tag, split_tag_string},
    criterion::{Criterion, criterion_group, criterion_main},
    std::hint::black_box,
};

fn bench_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("tags");

    group.bench_function("normalize/plain", |b| {
        b.iter(|| normalize_tag(black_box("long_hair")))
    });

    group.bench_function("normalize/parens", |b| {
        b.iter(|| normalize_tag(black_box("ganyu (genshin impact)")))
    });

    group.bench_function("split/field", |b| {
        b.iter(|| {
            split_tag_string(black_box(
                "1girl solo long_hair looking_at_viewer blush smile open_mouth",
            ))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tags);
criterion_main!(benches);
