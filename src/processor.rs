use std::time::Duration;

use async_trait::async_trait;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{builtin::Relay, dispatcher::{SharedInput, StageName}};



#[async_trait]
pub trait Processor<Input, Output> {

    async fn init(&mut self);

    async fn handle_message(&mut self, msg: Input) -> ProcResult<Output>;

    async fn terminate(&mut self);
}


pub enum ProcResult<Output> {

    /// skip this message
    Continue,

    /// forward to the stage output
    Dispatch(Output)
}



/// Forwards every value of `input` to `output` unchanged, sleeping `delay`
/// after each one. Drops `output` once `input` is closed and drained and
/// returns how many values went through.
pub async fn relay<T>(input: SharedInput<T>, output: mpsc::Sender<T>, delay: Duration) -> u64
where
    T: Send + 'static
{
    Context::new("relay".to_owned(), input, output, Relay, delay).work().await
}



// ------------------------------------------------------



pub struct Context<Input, Output, Proc>
where
    Input: Send + 'static,
    Output: Send + 'static,
    Proc: Processor<Input, Output> + Send + 'static
{
    stage: StageName,
    recv: SharedInput<Input>,
    output: mpsc::Sender<Output>,
    proc: Proc,
    item_delay: Duration
}

impl<Input, Output, Proc> Context<Input, Output, Proc>
where
    Input  : Send + 'static,
    Output : Send + 'static,
    Proc   : Processor<Input, Output> + Send + 'static
{

    pub fn new(stage: StageName,
               recv: SharedInput<Input>,
               output: mpsc::Sender<Output>,
               proc: Proc,
               item_delay: Duration) -> Self
    {
        Context {
            stage,
            recv,
            output,
            proc,
            item_delay
        }
    }


    #[inline]
    pub fn run(self) -> JoinHandle<u64> {
        tokio::spawn(self.work())
    }


    /// Resolves to the number of messages dispatched downstream
    async fn work(mut self) -> u64 {

        self.proc.init().await;
        tracing::trace!(stage = %self.stage, "worker started");

        let mut forwarded: u64 = 0;

        while let Some(msg) = self.recv.recv().await {
            match self.proc.handle_message(msg).await {
                ProcResult::Continue => (),
                ProcResult::Dispatch(m) => {

                    if self.output.send(m).await.is_err() {
                        tracing::warn!(stage = %self.stage, forwarded, "worker output closed by collector");
                        break
                    }
                    forwarded += 1;
                }
            }

            // simulated load, not interrupted by cancellation
            if !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }
        }

        tracing::trace!(stage = %self.stage, forwarded, "worker input closed");

        // close this worker's output, the fan-in drain loop ends on it
        let Context { output, mut proc, .. } = self;
        drop(output);

        proc.terminate().await;
        forwarded
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    struct Doubler;

    #[async_trait]
    impl Processor<i64, i64> for Doubler {
        async fn init(&mut self) {}
        async fn terminate(&mut self) {}

        async fn handle_message(&mut self, msg: i64) -> ProcResult<i64> {
            if msg % 2 == 0 {
                ProcResult::Continue
            } else {
                ProcResult::Dispatch(msg * 2)
            }
        }
    }

    #[tokio::test]
    async fn relay_preserves_order_and_closes_output() {
        let (in_tx, in_rx) = mpsc::channel(1);
        let (out_tx, mut out_rx) = mpsc::channel(1);

        let worker = tokio::spawn(relay(SharedInput::new(in_rx), out_tx, Duration::from_millis(1)));

        tokio::spawn(async move {
            for v in 1..=20_i64 {
                in_tx.send(v).await.unwrap();
            }
        });

        let mut got = vec![];
        while let Some(v) = out_rx.recv().await {
            got.push(v);
        }
        assert_eq!(worker.await.unwrap(), 20);
        assert_eq!(got, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn custom_processor_can_skip() {
        let (in_tx, in_rx) = mpsc::channel(1);
        let (out_tx, mut out_rx) = mpsc::channel(1);

        let worker = Context::new("doubler".to_owned(), SharedInput::new(in_rx), out_tx, Doubler, Duration::ZERO).run();

        tokio::spawn(async move {
            for v in 1..=5_i64 {
                in_tx.send(v).await.unwrap();
            }
        });

        let mut got = vec![];
        while let Some(v) = out_rx.recv().await {
            got.push(v);
        }
        assert_eq!(got, vec![2, 6, 10]);

        // skipped messages are not counted as forwarded
        assert_eq!(worker.await.unwrap(), 3);
    }
}
