use criterion::{black_box, criterion_group, criterion_main, Criterion};
use latchkey::{argument, Container, DescriptorTable, ParameterSpec, TypeDescriptor};
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let container = Container::new();
    container.set_value("answer", 42u64);

    // Prime the cache
    let _ = container.get("answer").unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = container.get("answer").unwrap();
            black_box(v);
        })
    });
}

fn bench_factory_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    c.bench_function("factory_cold_expensive", |b| {
        b.iter_batched(
            || {
                let container = Container::new();
                container.set_factory("expensive", |_| ExpensiveToCreate {
                    data: (0..1000).collect(),
                });
                container
            },
            |container| {
                let v = container.get_as::<ExpensiveToCreate>("expensive").unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_transient_factory(c: &mut Criterion) {
    let container = Container::new();
    container.set_factory("fresh", |_| [0u8; 64]);
    container.transient("fresh");

    c.bench_function("transient_factory", |b| {
        b.iter(|| {
            let v = container.get("fresh").unwrap();
            black_box(v);
        })
    });
}

fn bench_autowire_chain(c: &mut Criterion) {
    struct Config;
    struct Database {
        #[allow(dead_code)]
        config: Arc<Config>,
    }
    struct App {
        #[allow(dead_code)]
        db: Arc<Database>,
    }

    fn table() -> DescriptorTable {
        let mut types = DescriptorTable::new();
        types.declare("Config", TypeDescriptor::new(|_| Config));
        types.declare(
            "Database",
            TypeDescriptor::new(|args| Database {
                config: argument::<Config>(args, 0).expect("config"),
            })
            .param(ParameterSpec::service("config", "Config")),
        );
        types.declare(
            "App",
            TypeDescriptor::new(|args| App {
                db: argument::<Database>(args, 0).expect("db"),
            })
            .param(ParameterSpec::service("db", "Database")),
        );
        types
    }

    c.bench_function("autowire_chain_cold", |b| {
        b.iter_batched(
            || Container::with_introspector(table()),
            |container| {
                let v = container.get("App").unwrap();
                black_box(v);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    let container = Container::with_introspector(table());
    let _ = container.get("App").unwrap();
    c.bench_function("autowire_chain_hot", |b| {
        b.iter(|| {
            let v = container.get("App").unwrap();
            black_box(v);
        })
    });
}

fn bench_get_tagged(c: &mut Criterion) {
    let container = Container::new();
    for i in 0..16 {
        let id = format!("handler.{}", i);
        container.set_value(id.clone(), i as u32);
        container.tag(&id, ["handler"]);
    }
    // Prime the cache
    let _ = container.get_tagged("handler").unwrap();

    c.bench_function("get_tagged_16", |b| {
        b.iter(|| {
            let v = container.get_tagged("handler").unwrap();
            black_box(v.len());
        })
    });
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_factory_cold,
    bench_transient_factory,
    bench_autowire_chain,
    bench_get_tagged
);
criterion_main!(benches);
