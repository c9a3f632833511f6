use async_trait::async_trait;

use crate::{ProcResult, Processor};



/// Pass-through stage, hands every message on untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Relay;


#[async_trait]
impl<T> Processor<T, T> for Relay
where
    T: Send + 'static
{

    async fn init(&mut self) { }

    async fn terminate(&mut self) { }

    async fn handle_message(&mut self, msg: T) -> ProcResult<T> {
        ProcResult::Dispatch(msg)
    }
}
