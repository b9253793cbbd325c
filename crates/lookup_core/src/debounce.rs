//! Trailing-edge debounce: only the value that stays put for `delay` is published.

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle};

pub struct Debouncer<V> {
    input: watch::Sender<V>,
    output: watch::Receiver<V>,
    timer_task: JoinHandle<()>,
}

impl<V> Debouncer<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Must be called from within a tokio runtime.
    pub fn new(initial: V, delay: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);
        let timer_task = tokio::spawn(run_timer(input_rx, output_tx, delay));
        Self {
            input,
            output,
            timer_task,
        }
    }

    pub fn push(&self, value: V) {
        self.input.send_replace(value);
    }

    pub fn current(&self) -> V {
        self.input.borrow().clone()
    }

    pub fn settled(&self) -> V {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<V> {
        self.output.clone()
    }
}

impl<V> Drop for Debouncer<V> {
    fn drop(&mut self) {
        self.timer_task.abort();
    }
}

async fn run_timer<V>(mut input: watch::Receiver<V>, output: watch::Sender<V>, delay: Duration)
where
    V: Clone + PartialEq,
{
    loop {
        if input.changed().await.is_err() {
            return;
        }

        // Restart the window on every change until the input goes quiet.
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }

        let value = input.borrow_and_update().clone();
        output.send_if_modified(|settled| {
            if *settled == value {
                return false;
            }
            *settled = value;
            true
        });
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
