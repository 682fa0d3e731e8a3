//! Ctrl+C во время выгрузки: первый сигнал поднимает флаг отмены
//! (выгрузка останавливается и откатывается), второй завершает процесс.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Код выхода при повторном Ctrl+C
const ABORT_EXIT_CODE: i32 = 130;

/// Слушает Ctrl+C в отдельном потоке со своим однопоточным runtime
pub fn cancel_on_ctrl_c(cancel: Arc<AtomicBool>) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            runtime.block_on(async move {
                if !cancel_when(tokio::signal::ctrl_c(), cancel).await {
                    return;
                }
                if tokio::signal::ctrl_c().await.is_ok() {
                    eprintln!("\nПовторный Ctrl+C, выход без отката");
                    std::process::exit(ABORT_EXIT_CODE);
                }
            });
        })?;
    Ok(())
}

/// Ждёт сигнал и поднимает флаг; `false`, если сигнал не удалось получить
async fn cancel_when<F>(signal: F, cancel: Arc<AtomicBool>) -> bool
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            tracing::warn!("Received Ctrl+C, cancelling upload");
            eprintln!("\nОтмена: выгрузка остановится после текущей строки, загруженные строки будут удалены");
            cancel.store(true, Ordering::SeqCst);
            true
        }
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            false
        }
    }
}
