use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recfile::{from_str, Database, Descriptor, Field, Record, RecordSet};

fn library(records: usize) -> Database {
    let mut set = RecordSet::new(Descriptor::new("Book"));
    set.descriptor
        .special_fields
        .push(Field::new("mandatory", "Title"));
    set.descriptor
        .special_fields
        .push(Field::new("unique", "Id"));

    for i in 0..records {
        let mut record = Record::new();
        record.push("Id", i.to_string());
        record.push("Title", format!("Book number {}", i));
        record.push("Author", format!("Author {}", i % 17));
        record.push("Notes", "A perfectly ordinary book with nothing to say");
        set.records.push(record);
    }

    Database {
        record_sets: vec![set],
    }
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 1000].iter() {
        let text = library(*size).to_rec_string().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_parse_with_continuations(c: &mut Criterion) {
    let mut text = String::from("%rec: Note\n\n");
    for i in 0..500 {
        text.push_str(&format!("Body: line {}\n", i));
        text.push_str("+ continued once\n");
        text.push_str("+ continued twice\n");
        text.push('\n');
    }

    c.bench_function("parse_continuations", |b| {
        b.iter(|| from_str(black_box(&text)))
    });
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [10, 100, 1000].iter() {
        let db = library(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &db, |b, db| {
            b.iter(|| db.to_rec_string())
        });
    }
    group.finish();
}

fn benchmark_round_trip(c: &mut Criterion) {
    let text = library(100).to_rec_string().unwrap();

    c.bench_function("round_trip_100", |b| {
        b.iter(|| {
            let db = from_str(black_box(&text)).unwrap();
            db.to_rec_string().unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_parse_with_continuations,
    benchmark_write,
    benchmark_round_trip
);
criterion_main!(benches);
