use crossbeam_channel as channel;
use log::debug;
use std::thread;

#[derive(Debug)]
enum Message<T> {
    Work(usize, T),
    Quit,
}

struct Worker<T, R> {
    rx: channel::Receiver<Message<T>>,
    tx: channel::Sender<(usize, R)>,
}

impl<T, R> Worker<T, R> {
    fn run(self, job: &impl Fn(T) -> R) {
        while let Ok(message) = self.rx.recv() {
            let (index, item) = match message {
                Message::Work(index, item) => (index, item),
                Message::Quit => break,
            };
            if self.tx.send((index, job(item))).is_err() {
                break;
            }
        }
    }
}

/// Runs independent jobs on a bounded number of threads. Results come back in input order
/// no matter which worker finished first.
pub struct WorkerPool {
    num_workers: usize,
}

impl WorkerPool {
    pub fn new(num_workers: usize) -> WorkerPool {
        WorkerPool {
            num_workers: num_workers.max(1),
        }
    }

    pub fn map<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Sync,
    {
        let count = items.len();
        let threads = self.num_workers.min(count);
        if threads <= 1 {
            return items.into_iter().map(job).collect();
        }
        debug!("running {count} jobs on {threads} threads");

        let (work_tx, work_rx) = channel::unbounded();
        let (result_tx, result_rx) = channel::unbounded();
        let messages = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Message::Work(index, item))
            .chain((0..threads).map(|_| Message::Quit));
        for message in messages {
            if work_tx.send(message).is_err() {
                break;
            }
        }
        drop(work_tx);

        let job = &job;
        thread::scope(|scope| {
            for _ in 0..threads {
                let worker = Worker {
                    rx: work_rx.clone(),
                    tx: result_tx.clone(),
                };
                scope.spawn(move || worker.run(job));
            }
        });
        drop(result_tx);

        let mut results: Vec<Option<R>> = (0..count).map(|_| None).collect();
        for (index, result) in result_rx.iter() {
            results[index] = Some(result);
        }
        results.into_iter().flatten().collect()
    }
}
