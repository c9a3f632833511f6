use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};



pub type StageName = String;



/// Single queue read by many competing workers.
///
/// Whichever worker grabs the lock first takes the next value, there is no
/// fixed assignment. The lock is held only across one `recv`, never while a
/// worker is processing, so a slow worker does not stall the others.
pub struct SharedInput<T> {
    recv: Arc<Mutex<mpsc::Receiver<T>>>
}

impl<T> Clone for SharedInput<T> {
    fn clone(&self) -> Self {
        SharedInput { recv: Arc::clone(&self.recv) }
    }
}

impl<T> SharedInput<T>
where
    T: Send + 'static
{

    pub fn new(recv: mpsc::Receiver<T>) -> Self {
        SharedInput { recv: Arc::new(Mutex::new(recv)) }
    }

    /// `None` once the producer dropped its sender and the queue is empty
    #[inline]
    pub async fn recv(&self) -> Option<T> {
        self.recv.lock().await.recv().await
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn each_value_taken_exactly_once() {
        let (tx, rx) = mpsc::channel(1);
        let shared = SharedInput::new(rx);

        let mut handles = vec![];
        for _ in 0..3 {
            let input = shared.clone();
            handles.push(tokio::spawn(async move {
                let mut got = vec![];
                while let Some(v) = input.recv().await {
                    got.push(v);
                }
                got
            }));
        }
        drop(shared);

        for v in 0..300_i64 {
            tx.send(v).await.unwrap();
        }
        drop(tx);

        let mut all = vec![];
        for h in handles {
            let got = h.await.unwrap();

            // each consumer sees its share in queue order
            assert!(got.windows(2).all(|w| w[0] < w[1]));
            all.extend(got);
        }
        all.sort_unstable();
        assert_eq!(all, (0..300).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn closure_seen_by_every_consumer() {
        let (tx, rx) = mpsc::channel::<i64>(1);
        let shared = SharedInput::new(rx);
        drop(tx);

        assert_eq!(shared.clone().recv().await, None);
        assert_eq!(shared.recv().await, None);
    }
}
