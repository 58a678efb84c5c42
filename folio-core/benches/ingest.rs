//! Ingestion benchmarks

use criterion::{criterion_group, criterion_main, Criterion};
use folio_core::decoder::Fb2Decoder;
use folio_core::segment;

/// A synthetic book with `paragraphs` body paragraphs
fn synthetic_fb2(paragraphs: usize) -> Vec<u8> {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><FictionBook><description><title-info>\
         <genre>prose</genre><author><first-name>Bench</first-name><last-name>Mark</last-name></author>\
         <book-title>Benchmark</book-title><date>2024</date></title-info></description><body><section>",
    );
    for i in 0..paragraphs {
        xml.push_str(&format!(
            "<p>Paragraph {} with <emphasis>some</emphasis> inline markup and enough words to matter.</p>",
            i
        ));
    }
    xml.push_str("</section></body></FictionBook>");
    xml.into_bytes()
}

fn ingest_benchmark(c: &mut Criterion) {
    let data = synthetic_fb2(5_000);
    let decoder = Fb2Decoder::new();

    c.bench_function("parse_fb2_5k_paragraphs", |b| {
        b.iter(|| decoder.parse_bytes(std::hint::black_box(&data)).unwrap())
    });

    let text = decoder.parse_bytes(&data).unwrap().full_text;
    c.bench_function("segment_5k_paragraphs", |b| {
        b.iter(|| segment(std::hint::black_box(&text)))
    });
}

criterion_group!(benches, ingest_benchmark);
criterion_main!(benches);
