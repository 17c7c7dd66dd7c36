use criterion::{Criterion, criterion_group, criterion_main};
use markdown_strata_syntax::{GrammarBuilder, preset};

fn generate_markdown_content(size: usize) -> String {
    let front_matter = "---\ntitle: Bench\ntags: [a, b]\n---\n\n";
    let base = "# Title\n\nParagraph with $x^2$ math, a citation [@doe99, p. 3] and a note[^1].\n\n- Bullet with https://example.com\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n$$\n\\sum_i x_i\n$$\n\n[^1]: The note.\n\n";
    format!("{front_matter}{}", base.repeat(size))
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = generate_markdown_content(100);

    let base = GrammarBuilder::new().build().unwrap();
    group.bench_function("base_grammar", |b| {
        b.iter(|| std::hint::black_box(base.parse(std::hint::black_box(&content))));
    });

    let standard = preset::standard().unwrap();
    group.bench_function("standard_grammar", |b| {
        b.iter(|| std::hint::black_box(standard.parse(std::hint::black_box(&content))));
    });

    group.bench_function("compose_standard", |b| {
        b.iter(|| std::hint::black_box(preset::standard().unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_parsing);
criterion_main!(benches);
