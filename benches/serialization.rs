use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_ini_tree::{from_sections, from_str, parse_sections, to_sections, to_string, Shape};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Metadata {
    created: String,
    updated: String,
    version: u32,
}

#[derive(Serialize, Deserialize, Clone)]
struct Limits {
    max_connections: u32,
    timeout_secs: f64,
}

#[derive(Serialize, Deserialize, Clone)]
struct NestedData {
    id: u32,
    label: Option<String>,
    metadata: Metadata,
    limits: Option<Limits>,
}

fn sample_user() -> User {
    User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    }
}

fn sample_nested() -> NestedData {
    NestedData {
        id: 42,
        label: None,
        metadata: Metadata {
            created: "2023-01-01T00:00:00Z".to_string(),
            updated: "2023-12-31T23:59:59Z".to_string(),
            version: 3,
        },
        limits: Some(Limits {
            max_connections: 512,
            timeout_secs: 2.5,
        }),
    }
}

fn benchmark_serialize_simple(c: &mut Criterion) {
    let user = sample_user();

    c.bench_function("serialize_simple_struct", |b| {
        b.iter(|| to_string(black_box(&user)))
    });
}

fn benchmark_deserialize_simple(c: &mut Criterion) {
    let ini = "[User]\nid = 123\nname = Alice\nemail = alice@example.com\nactive = True\n";

    c.bench_function("deserialize_simple_struct", |b| {
        b.iter(|| from_str::<User>(black_box(ini)))
    });
}

fn benchmark_serialize_nested(c: &mut Criterion) {
    let data = sample_nested();

    c.bench_function("serialize_nested_struct", |b| {
        b.iter(|| to_string(black_box(&data)))
    });
}

fn benchmark_deserialize_nested(c: &mut Criterion) {
    let ini = to_string(&sample_nested()).unwrap();

    c.bench_function("deserialize_nested_struct", |b| {
        b.iter(|| from_str::<NestedData>(black_box(&ini)))
    });
}

fn benchmark_section_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("section_tree");
    let data = sample_nested();
    let tree = to_sections(&data).unwrap();

    group.bench_function("to_sections", |b| b.iter(|| to_sections(black_box(&data))));
    group.bench_function("from_sections", |b| {
        b.iter(|| from_sections::<NestedData>(black_box(&tree)))
    });
    group.bench_function("trace_shape", |b| b.iter(Shape::of::<NestedData>));

    group.finish();
}

fn benchmark_parse_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_sections");

    for size in [10, 50, 100, 500].iter() {
        let mut ini = String::new();
        for i in 0..*size {
            ini.push_str(&format!(
                "[Section{}]\nname = Item {}\nprice = {}\nnote = \"  padded  \"\nempty =\n\n",
                i,
                i,
                9.99 + f64::from(i)
            ));
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &ini, |b, ini| {
            b.iter(|| parse_sections(black_box(ini)))
        });
    }
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let user = sample_user();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("ini_serialize", |b| {
        b.iter(|| serde_ini_tree::to_string(black_box(&user)))
    });

    group.bench_function("json_serialize", |b| {
        b.iter(|| serde_json::to_string(black_box(&user)))
    });

    let ini_str = serde_ini_tree::to_string(&user).unwrap();
    let json_str = serde_json::to_string(&user).unwrap();

    group.bench_function("ini_deserialize", |b| {
        b.iter(|| serde_ini_tree::from_str::<User>(black_box(&ini_str)))
    });

    group.bench_function("json_deserialize", |b| {
        b.iter(|| serde_json::from_str::<User>(black_box(&json_str)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let user = sample_user();

    c.bench_function("roundtrip_simple", |b| {
        b.iter(|| {
            let serialized = to_string(black_box(&user)).unwrap();
            let _deserialized: User = from_str(black_box(&serialized)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_serialize_simple,
    benchmark_deserialize_simple,
    benchmark_serialize_nested,
    benchmark_deserialize_nested,
    benchmark_section_tree,
    benchmark_parse_text,
    benchmark_comparison_with_json,
    benchmark_roundtrip
);
criterion_main!(benches);
