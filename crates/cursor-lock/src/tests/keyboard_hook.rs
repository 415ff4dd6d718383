use crate::keyboard_hook::run_hook_message_loop;

use std::{sync::mpsc, thread, time::Duration};

/// WHAT: A hook thread whose installer already timed out exits on its own
/// WHY: Nobody can post WM_QUIT to it, so it would keep a global hook alive forever
#[test]
fn given_installer_gone_when_hook_thread_reports_ready_then_thread_exits() {
    // Given: The installer side of the ready channel is already dropped
    let (ready_tx, ready_rx) = mpsc::channel();
    drop(ready_rx);

    // When: The hook thread starts
    let (done_tx, done_rx) = mpsc::channel();
    thread::spawn(move || {
        run_hook_message_loop(ready_tx);
        let _ = done_tx.send(());
    });

    // Then: It returns instead of pumping messages
    assert!(done_rx.recv_timeout(Duration::from_secs(2)).is_ok());
}
