use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use proctor_core::parser::parse_quiz_str;

fn make_quiz_json(questions: usize) -> String {
    let mut items = Vec::with_capacity(questions);
    for n in 1..=questions {
        items.push(format!(
            r#"{{
                "question_number": {n},
                "question": "Question number {n} text body",
                "options": {{"A": "option a", "B": "option b", "C": "option c", "D": "option d"}},
                "answer": ["B"]
            }}"#
        ));
    }
    format!("[{}]", items.join(","))
}

fn bench_parsing(c: &mut Criterion) {
    let small = make_quiz_json(10);
    let large = make_quiz_json(500);
    let path = PathBuf::from("bench.json");

    c.bench_function("parse_quiz_10", |b| {
        b.iter(|| parse_quiz_str(black_box(&small), &path).unwrap())
    });

    c.bench_function("parse_quiz_500", |b| {
        b.iter(|| parse_quiz_str(black_box(&large), &path).unwrap())
    });
}

criterion_group!(benches, bench_parsing);
criterion_main!(benches);
