//! Basic example wiring a crash hook to a toy host.
//!
//! Three interception points report the same crash; only one dialog is
//! shown. A muted app and a secondary process are then filtered out.

use crash_dispatch::{
    CrashHook, DispatchSettings, HostHandle, HostTrigger, HostValue, MuteKind, RawCrashCallback,
    StaticCatalog, StaticSettings,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

/// A host object backed by a field map.
#[derive(Debug, Default)]
struct ToyObject {
    fields: HashMap<&'static str, HostValue>,
}

impl ToyObject {
    fn with(mut self, name: &'static str, value: HostValue) -> Self {
        self.fields.insert(name, value);
        self
    }
}

impl HostHandle for ToyObject {
    fn call(&self, _method: &str) -> Option<HostValue> {
        None
    }

    fn field(&self, name: &str) -> Option<HostValue> {
        self.fields.get(name).cloned()
    }
}

fn process_record(pid: i64, process: &str, package: &str) -> Arc<dyn HostHandle> {
    let info = ToyObject::default().with("packageName", HostValue::Str(package.to_string()));
    Arc::new(
        ToyObject::default()
            .with("pid", HostValue::Int(pid))
            .with("processName", HostValue::Str(process.to_string()))
            .with("info", HostValue::Handle(Arc::new(info)))
            .with("pkgList", HostValue::StrList(vec![package.to_string()])),
    )
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = Arc::new(StaticCatalog::new());
    catalog.insert("com.example.notes", "Notes");
    catalog.insert("com.example.music", "Music");

    let settings = Arc::new(StaticSettings::new(
        DispatchSettings::new().with_only_main(true),
    ));

    let hook = CrashHook::builder()
        .with_self_package("io.crashdispatch")
        .with_settings(settings)
        .with_catalog(catalog)
        .build()
        .unwrap();

    println!("=== Crash Dispatch Example ===\n");

    println!("One crash, three interception points:");
    let record = process_record(4100, "com.example.notes", "com.example.notes");
    for _ in 0..3 {
        let callback = RawCrashCallback::new().with_process_record(Arc::clone(&record));
        println!("  -> {:?}", hook.on_crash_callback(&callback));
    }

    println!("\nMuted until unlock:");
    hook.mute("com.example.music", MuteKind::UntilUnlock);
    let music = RawCrashCallback::new().with_process_record(process_record(
        4200,
        "com.example.music",
        "com.example.music",
    ));
    println!("  -> {:?}", hook.on_crash_callback(&music));

    println!("\nAfter unlock:");
    hook.on_trigger(HostTrigger::DeviceUnlocked);
    let music = RawCrashCallback::new().with_process_record(process_record(
        4201,
        "com.example.music",
        "com.example.music",
    ));
    println!("  -> {:?}", hook.on_crash_callback(&music));

    println!("\nSecondary process with main-only filter:");
    let remote = RawCrashCallback::new().with_process_record(process_record(
        4300,
        "com.example.notes:sync",
        "com.example.notes",
    ));
    println!("  -> {:?}", hook.on_crash_callback(&remote));

    let snapshot = hook.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Presented: {}, duplicates: {}, muted: {}, filtered: {}",
        snapshot.crashes_presented,
        snapshot.duplicates_dropped,
        snapshot.muted_dropped,
        snapshot.policy_dropped
    );
}
