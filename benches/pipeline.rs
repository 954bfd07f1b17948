use criterion::{black_box, criterion_group, criterion_main, Criterion};

use minic::interpreter::engine::Interpreter;
use minic::parser::parse::Parser;
use minic::preprocess;
use minic::runner;

const WORKLOADS: [(&str, &str); 2] = [
    (
        "sum_loop",
        r#"
            int main(void) {
                int s = 0;
                for (int i = 1; i <= 10000; i += 1) {
                    s += i;
                }
                printf("%d\n", s);
                return 0;
            }
        "#,
    ),
    (
        "primes",
        r#"
            int main(void) {
                int count = 0;
                for (int n = 2; n < 1000; n += 1) {
                    int p = 1;
                    for (int i = 2; i * i <= n; i += 1) {
                        if (n % i == 0) { p = 0; }
                    }
                    count += p;
                }
                printf("%d\n", count);
                return 0;
            }
        "#,
    ),
];

fn bench_pipeline(c: &mut Criterion) {
    for (label, source) in WORKLOADS {
        c.bench_function(&format!("sanitize_{label}"), |b| {
            b.iter(|| {
                let sanitized = preprocess::sanitize(black_box(source));
                black_box(sanitized);
            })
        });

        c.bench_function(&format!("parse_{label}"), |b| {
            let sanitized = preprocess::sanitize(source);
            b.iter(|| {
                let mut parser = Parser::new(black_box(&sanitized)).expect("lex");
                let program = parser.parse_program().expect("parse");
                black_box(program);
            })
        });

        c.bench_function(&format!("execute_{label}"), |b| {
            let sanitized = preprocess::sanitize(source);
            let mut parser = Parser::new(&sanitized).expect("lex");
            let program = parser.parse_program().expect("parse");
            b.iter(|| {
                let mut interpreter = Interpreter::new();
                interpreter.run(black_box(&program.body)).expect("run");
                black_box(interpreter.take_output());
            })
        });

        c.bench_function(&format!("full_pipeline_{label}"), |b| {
            b.iter(|| {
                let result = runner::run(black_box(source)).expect("run");
                black_box(result.output);
            })
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
