use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cstep::interpreter::Interpreter;
use cstep::parser::parse;

const WORKLOAD: &str = r#"
int fib(int n) {
    if (n < 2) return n;
    return fib(n - 1) + fib(n - 2);
}

int main() {
    int total = 0;
    for (int i = 0; i < 200; i++) {
        total += i % 7 == 0 ? i * 2 : i;
    }
    return total + fib(15);
}
"#;

fn bench_interpreter(c: &mut Criterion) {
    c.bench_function("parse_only", |b| {
        b.iter(|| {
            let program = parse(black_box(WORKLOAD)).expect("parse");
            black_box(program);
        })
    });

    c.bench_function("run_prepared", |b| {
        let mut interpreter = Interpreter::from_source(WORKLOAD).expect("parse");
        b.iter(|| {
            interpreter.reset();
            let value = interpreter.run().expect("run");
            black_box(value);
        })
    });

    c.bench_function("step_to_end", |b| {
        let mut interpreter = Interpreter::from_source(WORKLOAD).expect("parse");
        interpreter.enable_stepping();
        b.iter(|| {
            interpreter.reset();
            while !interpreter.is_finished() {
                black_box(interpreter.step().expect("step"));
            }
        })
    });
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
