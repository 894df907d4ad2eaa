//! Benchmarks for local library retriever generation.
//!
//! Rendering is pure and runs on every build, so it should stay cheap. The
//! up-to-date check reads the existing file and skips the write.

use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pipeline_lib_build::generator::{self, GeneratedArtifactDescriptor, LibraryRetrieverGenerator};

fn descriptor(root: &Path) -> GeneratedArtifactDescriptor {
    GeneratedArtifactDescriptor::new(
        generator::DEFAULT_CLASS_NAME,
        generator::DEFAULT_PACKAGE,
        root,
    )
}

fn bench_render(c: &mut Criterion) {
    let descriptor = descriptor(Path::new("/work/lib/build/generated-src"));
    c.bench_function("render_retriever", |b| {
        b.iter(|| generator::render(black_box(&descriptor)))
    });
}

fn bench_up_to_date(c: &mut Criterion) {
    let temp = tempfile::TempDir::new().unwrap();
    let descriptor = descriptor(temp.path());
    LibraryRetrieverGenerator::new().generate(&descriptor).unwrap();

    c.bench_function("generate_up_to_date", |b| {
        b.iter(|| {
            LibraryRetrieverGenerator::new()
                .generate(black_box(&descriptor))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_render, bench_up_to_date);
criterion_main!(benches);
