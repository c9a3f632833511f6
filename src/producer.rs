use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::builtin::Counter;



/// Source of the values pushed into the pipeline.
///
/// `produce` is called once per hand-off, only after the channel has a
/// free slot for the value. `None` means the source is exhausted.
#[async_trait]
pub trait Producer<T> {

    // Call inside self Process/Task
    async fn init(&mut self);

    fn produce(&mut self) -> Option<T>;

    // Call before shutdown
    async fn terminate(&mut self);
}



/// Emits 1, 2, 3, ... onto `output` until `cancel` fires.
///
/// `on_emit` runs on the producing task right after each value was handed
/// to the channel. `output` is dropped exactly once, when this returns.
pub async fn generate<F>(cancel: CancellationToken, output: mpsc::Sender<i64>, on_emit: F)
where
    F: FnMut(i64) + Send,
{
    generate_with(Counter::default(), cancel, output, on_emit).await
}


pub async fn generate_with<T, Prod, F>(mut producer: Prod,
                                       cancel: CancellationToken,
                                       output: mpsc::Sender<T>,
                                       mut on_emit: F)
where
    T    : Clone + Send,
    Prod : Producer<T> + Send,
    F    : FnMut(T) + Send,
{
    producer.init().await;
    tracing::trace!("generator started");

    let mut emitted: u64 = 0;

    loop {

        // a ready send must not keep beating an already fired cancel
        if cancel.is_cancelled() {
            tracing::debug!(emitted, "generator cancelled");
            break
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(emitted, "generator cancelled");
                break
            }
            permit = output.reserve() => {
                match permit {
                    Ok(permit) => {
                        let Some(next) = producer.produce() else {
                            tracing::debug!(emitted, "producer exhausted");
                            break
                        };
                        permit.send(next.clone());
                        on_emit(next);
                        emitted += 1;
                    }
                    Err(_) => {
                        // not exist any receiver
                        tracing::debug!(emitted, "generator output closed by consumers");
                        break
                    }
                }
            }
        }
    }

    // release the shared channel, workers see closure once it is empty
    drop(output);

    producer.terminate().await;
    tracing::trace!("generator stopped");
}



// ------------------------------------------------------


pub struct Context<T, Prod, F>
where
    Prod: Producer<T>
{
    producer: Prod,
    output: mpsc::Sender<T>,
    on_emit: F,
    shutdown: CancellationToken
}

impl<T, Prod, F> Context<T, Prod, F>
where
    T    : Clone + Send + 'static,
    Prod : Producer<T> + Send + 'static,
    F    : FnMut(T) + Send + 'static
{

    pub fn new(producer: Prod,
               output: mpsc::Sender<T>,
               on_emit: F,
               shutdown: CancellationToken) -> Self {
        Context {
            producer,
            output,
            on_emit,
            shutdown
        }
    }

    #[inline]
    pub fn run(self) -> JoinHandle<()> {
        tokio::spawn(generate_with(self.producer, self.shutdown, self.output, self.on_emit))
    }
}
