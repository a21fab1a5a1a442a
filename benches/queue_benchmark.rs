/*!
 * Ready Queue Benchmarks
 *
 * Steady-state rotation through the circular buffer at several capacities
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rr_scheduler::ReadyQueue;

fn bench_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_rotation");

    for capacity in [8usize, 100, 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut queue = ReadyQueue::with_capacity(capacity);
                for i in 0..capacity {
                    queue.enqueue(i).unwrap();
                }

                b.iter(|| {
                    let item = queue.dequeue().unwrap();
                    queue.enqueue(black_box(item)).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_fill_and_drain(c: &mut Criterion) {
    c.bench_function("queue_fill_drain_100", |b| {
        let mut queue = ReadyQueue::with_capacity(100);
        b.iter(|| {
            for i in 0..100u32 {
                queue.enqueue(i).unwrap();
            }
            while let Ok(item) = queue.dequeue() {
                black_box(item);
            }
        });
    });
}

criterion_group!(benches, bench_rotation, bench_fill_and_drain);
criterion_main!(benches);
