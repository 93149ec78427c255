use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crash_dispatch::infrastructure::mocks::{MockHandle, MockPresenter};
use crash_dispatch::{
    CrashContextExtractor, CrashDescriptor, CrashHook, DedupToken, EventDeduplicator, HostValue,
    MuteKind, MuteRegistry, RawCrashCallback, SystemClock,
};
use std::sync::Arc;
use std::thread;

fn hook() -> CrashHook {
    CrashHook::builder()
        .with_self_package("io.crashdispatch")
        .with_presenter(Arc::new(MockPresenter::new()))
        .build()
        .unwrap()
}

/// Benchmark the dedup check for fresh and repeated tokens
fn bench_deduplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduplication");
    let dedup = EventDeduplicator::new(Arc::new(SystemClock::new()));

    group.bench_function("repeated_token", |b| {
        let token = DedupToken::new(100, 0, "com.example");
        dedup.should_dispatch(&token);
        b.iter(|| dedup.should_dispatch(black_box(&token)))
    });

    group.bench_function("fresh_tokens", |b| {
        let mut pid = 0;
        b.iter(|| {
            pid += 1;
            dedup.should_dispatch(&DedupToken::new(black_box(pid), 0, "com.example"))
        })
    });

    group.finish();
}

/// Benchmark extraction across accessor layouts
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");
    let extractor = CrashContextExtractor::new();

    let info = MockHandle::new()
        .with_field("packageName", HostValue::Str("com.example".into()))
        .into_handle();
    let field_record = MockHandle::new()
        .with_field("pid", HostValue::Int(100))
        .with_field("processName", HostValue::Str("com.example".into()))
        .with_field("info", HostValue::Handle(info.clone()))
        .into_handle();
    let getter_record = MockHandle::new()
        .with_field("mPid", HostValue::Int(100))
        .with_method("getProcessName", HostValue::Str("com.example".into()))
        .with_method("getApplicationInfo", HostValue::Handle(info))
        .into_handle();

    for (name, record) in [("fields", field_record), ("fallbacks", getter_record)] {
        let raw = RawCrashCallback::new().with_process_record(record);
        group.bench_with_input(BenchmarkId::from_parameter(name), &raw, |b, raw| {
            b.iter(|| extractor.extract(black_box(raw)))
        });
    }

    group.finish();
}

/// Benchmark mute lookups with growing registries
fn bench_mute_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("mute_lookup");

    for size in [10, 1_000, 10_000] {
        let mutes = MuteRegistry::new();
        for i in 0..size {
            mutes.mute(&format!("com.app{}", i), MuteKind::UntilRestart);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &mutes, |b, mutes| {
            b.iter(|| mutes.is_muted(black_box("com.not.muted")))
        });
    }

    group.finish();
}

/// Benchmark full dispatch of duplicate callbacks from many threads
fn bench_concurrent_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_dispatch");

    for threads in [2, 4, 8] {
        let callbacks_per_thread = 1_000;
        group.throughput(Throughput::Elements((threads * callbacks_per_thread) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let hook = hook();
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let hook = hook.clone();
                            thread::spawn(move || {
                                for pid in 0..callbacks_per_thread {
                                    let descriptor =
                                        CrashDescriptor::builder(pid as i32, "com.example")
                                            .package_name("com.example")
                                            .build();
                                    black_box(hook.dispatch(&descriptor));
                                }
                            })
                        })
                        .collect();

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_deduplication,
    bench_extraction,
    bench_mute_lookup,
    bench_concurrent_dispatch
);
criterion_main!(benches);
