//! Interactive Ctrl-C handling.

use console::Term;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::output::print_warning;

/// Listen for Ctrl-C and cancel `cancel` once the user confirms.
///
/// Declining the prompt keeps the run going and re-arms the listener.
pub fn spawn_interrupt_handler(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        tracing::warn!("Could not listen for Ctrl-C: {}", e);
                        break;
                    }
                }
            }

            let confirmed = tokio::task::spawn_blocking(confirm_exit)
                .await
                .unwrap_or(true);

            if confirmed {
                tracing::info!("Interrupted by user");
                cancel.cancel();
                break;
            }

            tracing::debug!("Interrupt declined, continuing");
        }
    })
}

/// Ask the user whether to exit and read a single key.
///
/// Without a terminal to read from, the interrupt is taken as confirmed.
fn confirm_exit() -> bool {
    let term = Term::stderr();
    print_warning("do you really want to exit? (y/n)");
    match term.read_char() {
        Ok(c) => is_confirmation(c),
        Err(_) => true,
    }
}

/// Whether `key` answers the exit prompt with yes.
pub fn is_confirmation(key: char) -> bool {
    matches!(key, 'y' | 'Y')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_keys() {
        assert!(is_confirmation('y'));
        assert!(is_confirmation('Y'));
        assert!(!is_confirmation('n'));
        assert!(!is_confirmation('\n'));
    }

    #[tokio::test]
    async fn test_handler_exits_when_cancelled_elsewhere() {
        let cancel = CancellationToken::new();
        let handle = spawn_interrupt_handler(cancel.clone());
        cancel.cancel();
        handle.await.unwrap();
    }
}
