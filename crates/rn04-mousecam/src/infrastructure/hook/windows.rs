//! Windows low-level mouse hook implementation.
//!
//! This module installs a WH_MOUSE_LL hook using the Windows API. The hook
//! runs on a dedicated Win32 message-loop thread. Middle-button presses and
//! releases are swallowed (the foreground application never sees them) and
//! forwarded to the remap consumer; cursor moves always pass through to the
//! OS and are additionally forwarded to the consumer while a pan is active.
//!
//! Only one hook may be installed per process: the hook callback routes
//! through process-wide state because Windows gives it no user pointer.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments. The hook
//! callback must never panic; unwinding across the `extern "system"`
//! boundary would abort the process.

#![cfg(target_os = "windows")]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::info;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, HC_ACTION, HHOOK, MSG, MSLLHOOKSTRUCT, WH_MOUSE_LL, WM_MBUTTONDOWN,
    WM_MBUTTONUP, WM_MOUSEMOVE, WM_QUIT,
};

use rn04_core::protocol::launch::DEFAULT_MOVE_THROTTLE_MS;

use super::{HookError, MouseEvent, MouseHook};

/// How long `install()` waits for the hook thread to report readiness.
const INSTALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Sender used by the hook callback to deliver events to the consumer.
/// `uninstall()` takes it out, which closes the channel.
static EVENT_SENDER: Mutex<Option<Sender<MouseEvent>>> = Mutex::new(None);

/// Atomic flag: `true` between a middle-button press and its release.
/// Cursor moves only reach the channel while this is set.
static PAN_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Minimum interval between forwarded cursor moves, in milliseconds.
static MOVE_THROTTLE_MS: AtomicU32 = AtomicU32::new(DEFAULT_MOVE_THROTTLE_MS);

/// Hook timestamp of the last forwarded cursor move. Zero means no move has
/// been forwarded since the current pan began.
static LAST_MOVE_MS: AtomicU32 = AtomicU32::new(0);

/// Win32 thread id of the message-loop thread, for posting WM_QUIT.
static HOOK_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Windows low-level mouse hook.
///
/// Installs `WH_MOUSE_LL` and runs a dedicated Win32 message loop thread.
pub struct WindowsMouseHook {
    /// Minimum interval between forwarded cursor moves, in milliseconds.
    /// Zero disables throttling.
    move_throttle_ms: u32,
}

impl WindowsMouseHook {
    /// Creates a new (uninstalled) hook with the given move throttle.
    pub fn new(move_throttle_ms: u32) -> Self {
        Self { move_throttle_ms }
    }
}

impl Default for WindowsMouseHook {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_THROTTLE_MS)
    }
}

impl MouseHook for WindowsMouseHook {
    fn install(&self) -> Result<mpsc::Receiver<MouseEvent>, HookError> {
        let (tx, rx) = mpsc::channel::<MouseEvent>();

        {
            let mut guard = EVENT_SENDER.lock().expect("hook sender lock poisoned");
            if guard.is_some() {
                return Err(HookError::AlreadyInstalled);
            }
            *guard = Some(tx);
        }

        PAN_ACTIVE.store(false, Ordering::SeqCst);
        MOVE_THROTTLE_MS.store(self.move_throttle_ms, Ordering::SeqCst);
        LAST_MOVE_MS.store(0, Ordering::SeqCst);

        // The thread reports back once SetWindowsHookExW has run, so that an
        // install failure surfaces here instead of inside the thread.
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let spawned = thread::Builder::new()
            .name("mousecam-hook-loop".to_string())
            .spawn(move || run_hook_message_loop(ready_tx));

        if let Err(e) = spawned {
            clear_sender();
            return Err(HookError::InstallFailed(e.to_string()));
        }

        match ready_rx.recv_timeout(INSTALL_TIMEOUT) {
            Ok(Ok(())) => Ok(rx),
            Ok(Err(message)) => {
                clear_sender();
                Err(HookError::InstallFailed(message))
            }
            Err(_) => {
                clear_sender();
                post_quit_to_hook_thread();
                Err(HookError::InstallFailed(
                    "hook thread did not report readiness".to_string(),
                ))
            }
        }
    }

    fn uninstall(&self) {
        // Dropping the sender closes the channel; the consumer drains what is
        // already queued and then sees the disconnect.
        clear_sender();
        PAN_ACTIVE.store(false, Ordering::SeqCst);
        post_quit_to_hook_thread();
    }
}

/// Takes the global sender out, closing the event channel.
fn clear_sender() {
    *EVENT_SENDER.lock().expect("hook sender lock poisoned") = None;
}

/// Asks the message-loop thread to exit, if one is running.
fn post_quit_to_hook_thread() {
    let thread_id = HOOK_THREAD_ID.swap(0, Ordering::SeqCst);
    if thread_id != 0 {
        // SAFETY: Posting WM_QUIT makes GetMessageW on the hook thread return
        // FALSE so the loop can unhook and exit. Posting to an already-exited
        // thread fails harmlessly.
        unsafe {
            PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)).ok();
        }
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop(ready_tx: Sender<Result<(), String>>) {
    // SAFETY: SetWindowsHookExW requires the calling thread to run a message
    // loop, which this thread enters below. GetCurrentThreadId has no
    // preconditions; the id is stored so uninstall() can post WM_QUIT here.
    let installed = unsafe {
        HOOK_THREAD_ID.store(GetCurrentThreadId(), Ordering::SeqCst);
        SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0)
    };

    let mouse_hook: HHOOK = match installed {
        Ok(hook) => hook,
        Err(e) => {
            HOOK_THREAD_ID.store(0, Ordering::SeqCst);
            let _ = ready_tx.send(Err(e.to_string()));
            return;
        }
    };

    info!("low-level mouse hook installed");
    let _ = ready_tx.send(Ok(()));

    // Win32 message loop – blocks until WM_QUIT is posted
    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(mouse_hook).ok();
    }

    HOOK_THREAD_ID.store(0, Ordering::SeqCst);
    info!("low-level mouse hook removed");
}

/// `true` when the move at `time_ms` should be forwarded to the consumer.
///
/// Records the timestamp of each forwarded move so that at most one move per
/// throttle interval crosses the channel. The first move of a pan is always
/// forwarded.
fn should_forward_move(time_ms: u32) -> bool {
    let throttle = MOVE_THROTTLE_MS.load(Ordering::SeqCst);
    if throttle == 0 {
        return true;
    }
    let last = LAST_MOVE_MS.load(Ordering::SeqCst);
    if last != 0 && time_ms.wrapping_sub(last) < throttle {
        return false;
    }
    LAST_MOVE_MS.store(time_ms, Ordering::SeqCst);
    true
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS, and it
/// must not panic.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
    let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);

    let x = mhs.pt.x;
    let y = mhs.pt.y;
    let time_ms = mhs.time;

    let event = match w_param.0 as u32 {
        WM_MBUTTONDOWN => {
            PAN_ACTIVE.store(true, Ordering::SeqCst);
            // The first move of a fresh pan must not be throttled away.
            LAST_MOVE_MS.store(0, Ordering::SeqCst);
            Some(MouseEvent::MiddleDown { x, y, time_ms })
        }
        WM_MBUTTONUP => {
            PAN_ACTIVE.store(false, Ordering::SeqCst);
            Some(MouseEvent::MiddleUp { x, y, time_ms })
        }
        WM_MOUSEMOVE => {
            if PAN_ACTIVE.load(Ordering::SeqCst) && should_forward_move(time_ms) {
                Some(MouseEvent::Move { x, y, time_ms })
            } else {
                None
            }
        }
        _ => None,
    };

    let Some(event) = event else {
        // SAFETY: Forward to the next hook in the chain.
        return CallNextHookEx(None, n_code, w_param, l_param);
    };

    // A poisoned lock is treated as "no consumer"; the callback must never
    // panic, so no expect() here.
    let mut delivered = false;
    if let Ok(guard) = EVENT_SENDER.lock() {
        if let Some(sender) = guard.as_ref() {
            // Ignore send errors (channel closed during shutdown).
            delivered = sender.send(event).is_ok();
        }
    }

    // Middle-button edges are swallowed only while a consumer is listening;
    // without one the click keeps behaving like an ordinary middle click.
    // Moves are never withheld from the OS.
    if delivered && !matches!(event, MouseEvent::Move { .. }) {
        return LRESULT(1);
    }

    // SAFETY: Forward the event to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
