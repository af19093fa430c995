//! End-to-end walk benchmark over the mock transport.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use snmp_walker::testing::{MockTransport, ResponseBuilder};
use snmp_walker::{ClientBuilder, Oid, Value};
use std::hint::black_box;
use tokio::runtime::Runtime;

fn scripted_mock(entries: u32) -> MockTransport {
    let mut mock = MockTransport::new("127.0.0.1:161".parse().unwrap());
    let base = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10]);
    for i in 1..=entries {
        mock.queue_response(
            ResponseBuilder::new(0)
                .varbind(base.child(i), Value::Counter32(i * 1500))
                .build_v2c(b"public"),
        );
    }
    mock.queue_response(
        ResponseBuilder::new(0)
            .varbind(Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 11, 1]), Value::Counter32(0))
            .build_v2c(b"public"),
    );
    mock
}

fn bench_walk(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("walk");

    for entries in [10u32, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(entries), &entries, |b, &n| {
            b.to_async(&runtime).iter_batched(
                || scripted_mock(n),
                |mock| async move {
                    let client = ClientBuilder::new("unused", "public")
                        .build_with(mock)
                        .unwrap();
                    let outcome = client
                        .walk(Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 10]))
                        .unwrap()
                        .run()
                        .await;
                    black_box(outcome.results.len())
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
