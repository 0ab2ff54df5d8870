use criterion::{Criterion, criterion_group, criterion_main};
use draftpad_engine::{
    Block, BlockType, ContentStorage, DocumentContent, InlineStyle, MemoryStore,
    convert_from_raw, convert_to_raw,
};

fn generate_content(blocks: usize) -> DocumentContent {
    let blocks = (0..blocks)
        .map(|i| {
            Block::new(BlockType::Unstyled, format!("* line {i} with styled text"))
                .apply_style(0..10, InlineStyle::Bold)
        })
        .collect();
    DocumentContent::new(blocks).unwrap()
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence");

    let content = generate_content(100);
    group.bench_function("convert_to_raw_100_blocks", |b| {
        b.iter(|| std::hint::black_box(convert_to_raw(&content)));
    });

    let raw = convert_to_raw(&content);
    group.bench_function("convert_from_raw_100_blocks", |b| {
        b.iter(|| std::hint::black_box(convert_from_raw(&raw).unwrap()));
    });

    group.bench_function("save_and_load_memory_store", |b| {
        let storage = ContentStorage::new(MemoryStore::new());
        b.iter(|| {
            storage.save(&content).unwrap();
            std::hint::black_box(storage.load().unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_roundtrip);
criterion_main!(benches);
