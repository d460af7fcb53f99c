//! 健康检测执行器基准测试
//!
//! 测试状态快照合并、报告构造与执行器并发运行的性能

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use service_pulse::error::CheckError;
use service_pulse::health::executor::{health_check, HealthCheckExecutor, HealthIndicatorFunction};
use service_pulse::health::{check_status, check_status_with, HealthReport, StatusResult};

/// 构造 N 个立即完成的探测调用，其中每隔一个失败
fn build_checks(n: usize) -> Vec<HealthIndicatorFunction> {
    (0..n)
        .map(|i| {
            let key = format!("probe-{i}");
            if i % 2 == 0 {
                health_check(move || {
                    let key = key.clone();
                    async move { Ok(check_status(&key, true)) }
                })
            } else {
                health_check(move || {
                    let key = key.clone();
                    async move {
                        Err(CheckError::unhealthy(
                            format!("{key} is not available"),
                            check_status(&key, false),
                        )
                        .into())
                    }
                })
            }
        })
        .collect()
}

/// 报告构造基准测试
fn report_assembly_benchmark(c: &mut Criterion) {
    c.bench_function("report_from_partitions", |b| {
        b.iter(|| {
            let mut info = StatusResult::new();
            let mut errors = StatusResult::new();
            for i in 0..16 {
                info.merge(check_status(&format!("up-{i}"), true)).unwrap();
                errors
                    .merge(check_status_with(
                        &format!("down-{i}"),
                        false,
                        [(
                            "message".to_string(),
                            serde_json::json!("timeout of 500ms exceeded"),
                        )],
                    ))
                    .unwrap();
            }
            black_box(HealthReport::from_partitions(info, errors))
        });
    });

    c.bench_function("report_serialization", |b| {
        let report = HealthReport::from_partitions(
            check_status("db", true),
            check_status_with(
                "cache",
                false,
                [(
                    "message".to_string(),
                    serde_json::json!("timeout of 500ms exceeded"),
                )],
            ),
        );

        b.iter(|| {
            let json = serde_json::to_string(&report).unwrap();
            black_box(json)
        });
    });
}

/// 执行器并发运行基准测试
fn executor_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("executor_run_16_probes", |b| {
        b.iter(|| {
            let report = runtime.block_on(async {
                let executor = HealthCheckExecutor::new();
                executor.check(build_checks(16)).await.unwrap()
            });
            black_box(report)
        });
    });

    c.bench_function("executor_run_64_probes", |b| {
        b.iter(|| {
            let report = runtime.block_on(async {
                let executor = HealthCheckExecutor::new();
                executor.check(build_checks(64)).await.unwrap()
            });
            black_box(report)
        });
    });
}

criterion_group!(benches, report_assembly_benchmark, executor_benchmark);
criterion_main!(benches);
