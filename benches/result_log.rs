//! Criterion benchmarks for result-log folding.
//!
//! A monitoring pass folds one log per module into an accumulator, then the
//! host reads the worst message and the full listing. These measure both
//! sides as the number of modules grows.
//!
//! Run with: cargo bench --bench result_log

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use devmon::{ResultLog, Severity};

/// One module's log: a handful of messages spread over the severities.
fn module_log(index: usize) -> ResultLog {
    let mut log = ResultLog::empty();
    log.log(Severity::Ok, format!("module {index}: reachable"));
    log.log(Severity::Info, format!("module {index}: 4 interfaces"));
    if index % 7 == 0 {
        log.log(Severity::Warning, format!("module {index}: slow"));
    }
    if index % 31 == 0 {
        log.log(Severity::Failure, format!("module {index}: link down"));
    }
    log
}

fn fold_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_log_fold");

    for modules in [8usize, 64, 512] {
        let logs: Vec<ResultLog> = (0..modules).map(module_log).collect();
        group.throughput(Throughput::Elements(modules as u64));
        group.bench_with_input(BenchmarkId::from_parameter(modules), &logs, |b, logs| {
            b.iter(|| {
                let mut combined = ResultLog::empty();
                for log in logs.iter().cloned() {
                    combined.combine(log);
                }
                black_box(combined)
            });
        });
    }

    group.finish();
}

fn summary_reads(c: &mut Criterion) {
    let combined: ResultLog = (0..512).map(module_log).collect();

    c.bench_function("worst_message", |b| {
        b.iter(|| black_box(combined.worst_message()))
    });
    c.bench_function("all_messages", |b| {
        b.iter(|| black_box(combined.all_messages()))
    });
}

criterion_group!(benches, fold_throughput, summary_reads);
criterion_main!(benches);
