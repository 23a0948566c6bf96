use criterion::{Criterion, criterion_group, criterion_main};
use pipex_core::{Binder, Executor, Group, MethodCall, MethodSpec, Registry, Value, Workspace};
use std::hint::black_box;

fn set_index(call: &mut MethodCall<'_>) -> anyhow::Result<()> {
    let v = call.keyword(0)?.clone();
    call.write_output(0, v)
}

fn add_one(call: &mut MethodCall<'_>) -> anyhow::Result<()> {
    let x = call.input(0)?.as_index()?;
    call.write_output(0, Value::Index(x + 1))
}

fn run_nested(call: &mut MethodCall<'_>) -> anyhow::Result<()> {
    call.run_embedded()
}

fn build_registry() -> Registry {
    let mut b = Registry::builder();
    b.variable("a", Group::Index, "").unwrap();
    b.variable("b", Group::Index, "").unwrap();
    b.method(MethodSpec::new("Set", set_index).gout(Group::Index).keyword("value", Group::Index))
        .unwrap();
    b.method(MethodSpec::new("Inc", add_one).gout(Group::Index).gin(Group::Index))
        .unwrap();
    b.method(MethodSpec::new("Nest", run_nested).embeds_pipeline()).unwrap();
    b.build().unwrap()
}

// Set(a) followed by n increments ping-ponging between a and b
fn flat_source(n: usize) -> String {
    let mut src = String::from("Set(a) { 0 }\n");
    for i in 0..n {
        if i % 2 == 0 {
            src.push_str("Inc(b, a) {}\n");
        } else {
            src.push_str("Inc(a, b) {}\n");
        }
    }
    src
}

fn nested_source(depth: usize) -> String {
    let mut src = String::from("Set(a) { 0 }\n");
    for _ in 0..depth {
        src.push_str("Nest {\n Inc(b, a) {}\n");
    }
    for _ in 0..depth {
        src.push_str("}\n");
    }
    src
}

fn bench_executor(c: &mut Criterion) {
    let reg = build_registry();
    let binder = Binder::new(&reg);
    let exec = Executor::new(&reg);

    let flat = binder.bind_str("flat", &flat_source(1000)).unwrap();
    c.bench_function("exec_flat_1000", |b| {
        b.iter(|| {
            let mut ws = Workspace::new(&reg);
            exec.run_silent(black_box(&flat), &mut ws).unwrap();
            black_box(ws.occupied_count())
        })
    });

    let nested = binder.bind_str("nested", &nested_source(32)).unwrap();
    c.bench_function("exec_nested_32", |b| {
        b.iter(|| {
            let mut ws = Workspace::new(&reg);
            exec.run_silent(black_box(&nested), &mut ws).unwrap();
            black_box(ws.occupied_count())
        })
    });

    let src = flat_source(1000);
    c.bench_function("bind_flat_1000", |b| {
        b.iter(|| black_box(binder.bind_str("flat", black_box(&src)).unwrap()))
    });
}

criterion_group!(benches, bench_executor);
criterion_main!(benches);
