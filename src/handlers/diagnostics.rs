use std::sync::{Arc, Mutex, OnceLock};

use axum::{extract::State, Json};
use sysinfo::System;
use tracing::info;

use crate::models::DiagnosticsResponse;
use crate::session::SessionBroker;

static SYSTEM_MONITOR: OnceLock<Mutex<System>> = OnceLock::new();

/// Session and host diagnostics
pub async fn diagnostics(State(broker): State<Arc<SessionBroker>>) -> Json<DiagnosticsResponse> {
    // Aggregate counters from the broker
    let stats = broker.stats().await;

    // System stats
    let (cpu_usage, memory_alloc, memory_free, memory_total) = {
        let sys_lock = SYSTEM_MONITOR.get_or_init(|| Mutex::new(System::new_all()));
        match sys_lock.lock() {
            Ok(mut sys) => {
                sys.refresh_cpu();
                sys.refresh_memory();
                (
                    sys.global_cpu_info().cpu_usage(),
                    sys.used_memory(),
                    sys.free_memory(),
                    sys.total_memory(),
                )
            }
            Err(_) => (0.0, 0, 0, 0),
        }
    };

    info!(
        "Diagnostics: CPU: {:.2}%, Mem: {}/{} MB (Free: {} MB), Conn: {}, Users: {}",
        cpu_usage,
        memory_alloc / 1024 / 1024,
        memory_total / 1024 / 1024,
        memory_free / 1024 / 1024,
        stats.connections,
        stats.users
    );

    Json(DiagnosticsResponse {
        n_conn: stats.connections,
        n_users: stats.users,
        n_activity: stats.activity_entries,
        document_bytes: stats.document_bytes,
        cpu_usage,
        memory_alloc,
        memory_total,
        memory_free,
    })
}
