use criterion::{black_box, criterion_group, criterion_main, Criterion};

use galist_core::model::{Circle, Connection, Submission, Template};
use galist_core::ExerciseInstance;

fn make_template(n: usize) -> Template {
    let addresses: Vec<String> = (0..n).map(|i| format!("p{i}")).collect();
    let pairs: Vec<(i64, &str)> = addresses
        .iter()
        .enumerate()
        .map(|(i, a)| (i as i64 * 3 + 1, a.as_str()))
        .collect();
    Template::from_pairs("bench", "Benchmark", "", &pairs)
}

fn make_submission(exercise: &ExerciseInstance, links: usize) -> Submission {
    let nodes = exercise.expected_structure();
    Submission {
        circles: nodes
            .iter()
            .map(|n| Circle::new(format!("n{}", n.value), n.value, n.address.clone()))
            .collect(),
        connections: nodes
            .windows(2)
            .take(links)
            .map(|w| Connection::new(format!("n{}", w[0].value), format!("n{}", w[1].value)))
            .collect(),
    }
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for n in [5usize, 50, 500] {
        let exercise = ExerciseInstance::new(&make_template(n)).unwrap();
        let perfect = make_submission(&exercise, n);
        let half = make_submission(&exercise, n / 2);

        group.bench_function(format!("{n}_nodes_perfect"), |b| {
            b.iter(|| exercise.validate(black_box(&perfect), None))
        });

        group.bench_function(format!("{n}_nodes_half_linked"), |b| {
            b.iter(|| exercise.validate(black_box(&half), None))
        });
    }

    group.bench_function("empty", |b| {
        let exercise = ExerciseInstance::new(&make_template(5)).unwrap();
        let empty = Submission::default();
        b.iter(|| exercise.validate(black_box(&empty), None))
    });

    group.finish();
}

fn bench_template_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let small_toml = generate_template_toml(5);
    let large_toml = generate_template_toml(200);

    group.bench_function("5_templates", |b| {
        b.iter(|| {
            galist_core::parser::parse_template_str(
                black_box(&small_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.bench_function("200_templates", |b| {
        b.iter(|| {
            galist_core::parser::parse_template_str(
                black_box(&large_toml),
                black_box("bench.toml".as_ref()),
            )
        })
    });

    group.finish();
}

fn generate_template_toml(n: usize) -> String {
    let mut s = String::new();
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[templates]]
key = "bench_{i}"
sequence = [1, 2, 3, 4, 5]

[templates.addresses]
1 = "a{i}"
2 = "b{i}"
3 = "c{i}"
4 = "d{i}"
5 = "e{i}"
"#
        ));
    }
    s
}

criterion_group!(benches, bench_grade, bench_template_parsing);
criterion_main!(benches);
